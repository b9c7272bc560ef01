//! River lanes: logs, diving turtles and crocodiles. Open water is lethal;
//! only surfaced bodies can be ridden.

use crate::geometry::intervals_touch;
use crate::rng::SeededRng;

use super::lanes::{Board, Direction, LaneBody, LaneConfig, LaneSpawner};

pub const PASSENGER_CHANCE: f32 = 0.15;

/// Extra uptime, in seconds, added to half the diving bodies.
const LONG_CYCLE_EXTRA_MIN: f32 = 3.0;
const LONG_CYCLE_EXTRA_SPAN: f32 = 3.0;

const BODY_WIDTH_RATIO: f32 = 0.95;
const BODY_INSET_RATIO: f32 = 0.025;
const HEAD_LEN_RATIO: f32 = 0.85;
const MOUTH_LEN_RATIO: f32 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformKind {
    Log,
    Turtle,
    Croc,
}

/// Dive timing in seconds. A cycle starts submerged for `down`, then
/// surfaces, and flags a warning during the last `warn` before diving again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubmergeCycle {
    pub period: f32,
    pub down: f32,
    pub warn: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiveState {
    Submerged,
    Surfaced,
    Warning,
}

impl SubmergeCycle {
    pub fn state_at(&self, age: f32) -> DiveState {
        let phase = age % self.period;
        if phase < self.down {
            DiveState::Submerged
        } else if phase >= self.period - self.warn {
            DiveState::Warning
        } else {
            DiveState::Surfaced
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaterLane {
    pub lane: LaneConfig,
    pub kind: PlatformKind,
    pub submerge: Option<SubmergeCycle>,
}

/// Pixel extents of a crocodile's head, recomputed from its current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrocGeometry {
    pub tail_x: f32,
    pub tip_x: f32,
    pub head_start_x: f32,
    pub head_len: f32,
    pub mouth_len: f32,
}

impl CrocGeometry {
    /// Always-lethal snout at the leading end of the head.
    pub fn mouth(&self, dir: Direction) -> (f32, f32) {
        match dir {
            Direction::Right => (self.tip_x - self.mouth_len, self.tip_x),
            Direction::Left => (self.head_start_x, self.head_start_x + self.mouth_len),
        }
    }

    /// Part of the head that can be stood on regardless of the dive phase.
    pub fn safe_head(&self, dir: Direction) -> (f32, f32) {
        match dir {
            Direction::Right => (self.tip_x - self.head_len, self.tip_x - self.mouth_len),
            Direction::Left => (
                self.head_start_x + self.mouth_len,
                self.head_start_x + self.head_len,
            ),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Platform {
    pub x: f32,
    pub row: u32,
    pub len_tiles: u32,
    pub dir: Direction,
    pub speed: f32,
    pub kind: PlatformKind,
    pub submerge: Option<SubmergeCycle>,
    /// Seconds since spawn. Only ever grows.
    pub age: f32,
    pub has_passenger: bool,
}

impl LaneBody for Platform {
    fn row(&self) -> u32 {
        self.row
    }

    fn dir(&self) -> Direction {
        self.dir
    }

    fn x(&self) -> f32 {
        self.x
    }

    fn len_tiles(&self) -> u32 {
        self.len_tiles
    }
}

impl Platform {
    pub fn dive_state(&self) -> DiveState {
        match self.submerge {
            Some(cycle) if self.kind != PlatformKind::Log => cycle.state_at(self.age),
            _ => DiveState::Surfaced,
        }
    }

    #[inline]
    pub fn body_submerged(&self) -> bool {
        self.dive_state() == DiveState::Submerged
    }

    /// About to dive; renderers flash the body.
    #[inline]
    pub fn about_to_dive(&self) -> bool {
        self.dive_state() == DiveState::Warning
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.dir.sign() * self.speed
    }

    pub fn body_px(&self, tile_w: f32) -> (f32, f32) {
        (self.x, self.x + self.len_tiles as f32 * tile_w)
    }

    pub fn croc_geometry(&self, board: &Board) -> CrocGeometry {
        let width = self.len_tiles as f32 * board.tile_w * BODY_WIDTH_RATIO;
        let tail_x = self.x + board.tile_w * BODY_INSET_RATIO;
        let tip_x = tail_x + width;
        let head_len = board.tile_w * HEAD_LEN_RATIO;
        let head_start_x = match self.dir {
            Direction::Right => tip_x - head_len,
            Direction::Left => tail_x,
        };
        CrocGeometry {
            tail_x,
            tip_x,
            head_start_x,
            head_len,
            mouth_len: head_len * MOUTH_LEN_RATIO,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WaterSystem {
    spawner: LaneSpawner,
    lanes: Vec<WaterLane>,
    platforms: Vec<Platform>,
    passenger_active: bool,
}

impl WaterSystem {
    pub fn new(board: Board) -> Self {
        Self {
            spawner: LaneSpawner::new(board),
            lanes: Vec::new(),
            platforms: Vec::new(),
            passenger_active: false,
        }
    }

    /// Replaces the lane set and clears the river.
    pub fn configure(&mut self, lanes: Vec<WaterLane>) {
        self.spawner
            .configure(lanes.iter().map(|entry| entry.lane.clone()).collect());
        self.lanes = lanes;
        self.platforms.clear();
        self.passenger_active = false;
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn lanes(&self) -> &[WaterLane] {
        &self.lanes
    }

    pub fn passenger_active(&self) -> bool {
        self.passenger_active
    }

    pub fn update(&mut self, dt: f32, rng: &mut SeededRng) {
        let board = *self.spawner.board();
        for platform in &mut self.platforms {
            platform.x += platform.velocity() * dt;
            platform.age += dt;
        }

        let mut passenger_left = false;
        self.platforms.retain(|p| {
            let gone = board.is_past_exit(p.dir, p.x, p.len_tiles);
            passenger_left |= gone && p.has_passenger;
            !gone
        });
        if passenger_left {
            self.passenger_active = false;
        }

        for request in self.spawner.tick(dt, rng, &self.platforms) {
            let lane = &self.lanes[request.lane];
            let submerge = match (lane.kind, lane.submerge) {
                (PlatformKind::Turtle | PlatformKind::Croc, Some(base)) => {
                    let period = if rng.chance(0.5) {
                        base.period + LONG_CYCLE_EXTRA_MIN + rng.next_f32() * LONG_CYCLE_EXTRA_SPAN
                    } else {
                        base.period
                    };
                    Some(SubmergeCycle { period, ..base })
                }
                _ => None,
            };

            let carries_passenger = !self.passenger_active
                && matches!(lane.kind, PlatformKind::Log | PlatformKind::Turtle)
                && rng.chance(PASSENGER_CHANCE);
            if carries_passenger {
                self.passenger_active = true;
            }

            self.platforms.push(Platform {
                x: request.x,
                row: request.row,
                len_tiles: request.len_tiles,
                dir: request.dir,
                speed: request.speed,
                kind: lane.kind,
                submerge,
                age: 0.0,
                has_passenger: carries_passenger,
            });
        }
    }

    /// True when the tile touches a crocodile mouth.
    pub fn hazard_at(&self, row: u32, col: i32) -> bool {
        let board = self.spawner.board();
        let (left, right) = board.column_px(col);
        self.platforms
            .iter()
            .filter(|p| p.row == row && p.kind == PlatformKind::Croc)
            .any(|p| {
                let (m0, m1) = p.croc_geometry(board).mouth(p.dir);
                intervals_touch(left, right, m0, m1)
            })
    }

    /// Signed velocity in px/s of whatever the tile is standing on, or `None`
    /// for open water.
    pub fn carry_speed(&self, row: u32, col: i32) -> Option<f32> {
        let board = self.spawner.board();
        let (left, right) = board.column_px(col);
        for platform in self.platforms.iter().filter(|p| p.row == row) {
            if !platform.body_submerged() {
                let (start, end) = platform.body_px(board.tile_w);
                if intervals_touch(left, right, start, end) {
                    return Some(platform.velocity());
                }
            }
            if platform.kind == PlatformKind::Croc {
                let (h0, h1) = platform.croc_geometry(board).safe_head(platform.dir);
                if intervals_touch(left, right, h0, h1) {
                    return Some(platform.velocity());
                }
            }
        }
        None
    }

    /// Collects a passenger riding a surfaced body under the tile.
    pub fn try_pickup(&mut self, row: u32, col: i32) -> bool {
        let board = *self.spawner.board();
        let (left, right) = board.column_px(col);
        let found = self.platforms.iter_mut().find(|p| {
            let (start, end) = p.body_px(board.tile_w);
            p.has_passenger
                && p.row == row
                && !p.body_submerged()
                && intervals_touch(left, right, start, end)
        });
        match found {
            Some(platform) => {
                platform.has_passenger = false;
                self.passenger_active = false;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, platform: Platform) {
        if platform.has_passenger {
            self.passenger_active = true;
        }
        self.platforms.push(platform);
    }
}
