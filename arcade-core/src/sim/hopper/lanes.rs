//! Per-lane spawn timing shared by the road and the river.

use crate::geometry::interval_gap;
use crate::rng::SeededRng;

/// A deferred spawn pulls the accumulator back by this much so the attempt
/// repeats shortly instead of waiting a full interval.
pub const SPAWN_RETRY_MS: f32 = 200.0;

/// Despawn margin past the exit edge, in tiles.
const EXIT_MARGIN_TILES: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Pixel geometry of the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Board {
    pub tile_w: f32,
    pub tile_h: f32,
    pub offset_x: f32,
    pub cols: u32,
    pub rows: u32,
}

impl Board {
    #[inline]
    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile_w
    }

    /// Left edge of a freshly spawned body, one tile outside the entry edge.
    pub fn entry_x(&self, dir: Direction, len_tiles: u32) -> f32 {
        match dir {
            Direction::Right => self.offset_x - len_tiles as f32 * self.tile_w - self.tile_w,
            Direction::Left => self.offset_x + self.width() + self.tile_w,
        }
    }

    /// True once the whole body is beyond the exit edge plus margin.
    pub fn is_past_exit(&self, dir: Direction, x: f32, len_tiles: u32) -> bool {
        let margin = EXIT_MARGIN_TILES * self.tile_w;
        match dir {
            Direction::Right => x > self.offset_x + self.width() + margin,
            Direction::Left => x + len_tiles as f32 * self.tile_w < self.offset_x - margin,
        }
    }

    /// Inclusive pixel range of a tile column.
    #[inline]
    pub fn column_px(&self, col: i32) -> (f32, f32) {
        let left = self.offset_x + col as f32 * self.tile_w;
        (left, left + self.tile_w - 1.0)
    }
}

/// Anything that travels along a lane.
pub trait LaneBody {
    fn row(&self) -> u32;
    fn dir(&self) -> Direction;
    fn x(&self) -> f32;
    fn len_tiles(&self) -> u32;
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaneConfig {
    pub row: u32,
    pub dir: Direction,
    /// Pixels per second.
    pub speed: f32,
    pub interval_ms: f32,
    pub jitter_ms: f32,
    pub max_entities: usize,
    /// Candidate body lengths in tiles, picked uniformly per spawn.
    pub lengths: Vec<u32>,
    pub min_gap_tiles: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub lane: usize,
    pub row: u32,
    pub dir: Direction,
    pub speed: f32,
    pub len_tiles: u32,
    pub x: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct LaneTimer {
    elapsed_ms: f32,
    /// Interval plus jitter, rolled once per spawn cycle.
    target_ms: Option<f32>,
}

#[derive(Clone, Debug)]
pub struct LaneSpawner {
    board: Board,
    lanes: Vec<LaneConfig>,
    timers: Vec<LaneTimer>,
}

impl LaneSpawner {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            lanes: Vec::new(),
            timers: Vec::new(),
        }
    }

    pub fn configure(&mut self, lanes: Vec<LaneConfig>) {
        self.timers = vec![LaneTimer::default(); lanes.len()];
        self.lanes = lanes;
    }

    pub fn lanes(&self) -> &[LaneConfig] {
        &self.lanes
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Advances every lane timer by `dt` seconds and returns the spawns that
    /// are due and fit. Deferred spawns stay pending.
    pub fn tick<B: LaneBody>(
        &mut self,
        dt: f32,
        rng: &mut SeededRng,
        bodies: &[B],
    ) -> Vec<SpawnRequest> {
        let mut spawned: Vec<SpawnRequest> = Vec::new();

        for (index, lane) in self.lanes.iter().enumerate() {
            let timer = &mut self.timers[index];
            timer.elapsed_ms += dt * 1000.0;
            let target = *timer
                .target_ms
                .get_or_insert_with(|| lane.interval_ms + rng.next_f32() * lane.jitter_ms);

            let occupancy = bodies.iter().filter(|body| body.row() == lane.row).count()
                + spawned.iter().filter(|request| request.row == lane.row).count();
            if timer.elapsed_ms < target || occupancy >= lane.max_entities {
                continue;
            }

            let len_tiles = rng.pick(&lane.lengths).unwrap_or(1);
            let x = self.board.entry_x(lane.dir, len_tiles);
            if !has_room(&self.board, lane, x, len_tiles, bodies) {
                timer.elapsed_ms -= SPAWN_RETRY_MS;
                continue;
            }

            *timer = LaneTimer::default();
            spawned.push(SpawnRequest {
                lane: index,
                row: lane.row,
                dir: lane.dir,
                speed: lane.speed,
                len_tiles,
                x,
            });
        }

        spawned
    }
}

/// Minimum empty space between a body placed at `x` and every body already in
/// the lane travelling the same way.
pub fn has_room<B: LaneBody>(
    board: &Board,
    lane: &LaneConfig,
    x: f32,
    len_tiles: u32,
    bodies: &[B],
) -> bool {
    let min_gap = lane.min_gap_tiles * board.tile_w;
    let end = x + len_tiles as f32 * board.tile_w;
    bodies
        .iter()
        .filter(|body| body.row() == lane.row && body.dir() == lane.dir)
        .all(|body| {
            let body_end = body.x() + body.len_tiles() as f32 * board.tile_w;
            interval_gap(x, end, body.x(), body_end) >= min_gap
        })
}
