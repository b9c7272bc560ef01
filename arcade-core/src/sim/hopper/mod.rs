//! Lane-crossing hopper: cross five road lanes and five river lanes, then
//! land on a free lily pad.

use crate::error::RuleCode;
use crate::input::{InputState, Key};
use crate::rng::SeededRng;

use super::{GameEvent, GameKind, Hud, RunStats, Scene, Simulation, TICK_SECONDS};

pub mod lanes;
pub mod pads;
pub mod traffic;
pub mod water;

#[cfg(test)]
mod tests;

use lanes::{Board, Direction, LaneConfig};
use pads::Pads;
use traffic::TrafficSystem;
use water::{PlatformKind, SubmergeCycle, WaterLane, WaterSystem};

pub const TILE_SIZE: f32 = 48.0;
pub const BOARD_COLS: u32 = 13;
pub const BOARD_ROWS: u32 = 13;

pub const HOME_ROW: u32 = 0;
pub const FIRST_WATER_ROW: u32 = 1;
pub const LAST_WATER_ROW: u32 = 5;
pub const MEDIAN_ROW: u32 = 6;
pub const FIRST_ROAD_ROW: u32 = 7;
pub const LAST_ROAD_ROW: u32 = 11;
pub const START_ROW: u32 = 12;
pub const START_COL: i32 = 6;

pub const STARTING_LIVES: u32 = 3;
pub const LIFE_SECONDS: f32 = 30.0;

pub const SCORE_PER_ROW: u64 = 10;
pub const SCORE_PAD: u32 = 50;
pub const SCORE_PAD_PER_SECOND: u32 = 10;
pub const SCORE_PASSENGER: u32 = 200;
pub const LEVEL_BONUS_PER_LEVEL: u32 = 250;

/// Lanes run this long before the player gets control so the river is not
/// empty at the start of a level.
const PREWARM_SECONDS: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Home,
    Water,
    Median,
    Road,
    Start,
}

pub fn row_kind(row: u32) -> RowKind {
    match row {
        HOME_ROW => RowKind::Home,
        FIRST_WATER_ROW..=LAST_WATER_ROW => RowKind::Water,
        MEDIAN_ROW => RowKind::Median,
        FIRST_ROAD_ROW..=LAST_ROAD_ROW => RowKind::Road,
        _ => RowKind::Start,
    }
}

pub fn board() -> Board {
    Board {
        tile_w: TILE_SIZE,
        tile_h: TILE_SIZE,
        offset_x: 0.0,
        cols: BOARD_COLS,
        rows: BOARD_ROWS,
    }
}

/// Lane layout for one level. Pure in `level`; later levels run faster and
/// spawn more often.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelParams {
    pub speed_mult: f32,
    pub interval_mult: f32,
    pub road: Vec<LaneConfig>,
    pub water: Vec<WaterLane>,
}

impl LevelParams {
    pub fn for_level(level: u32) -> Self {
        let g = level.saturating_sub(1).min(8) as f32;
        let speed_mult = 1.0 + 0.12 * g;
        let interval_mult = (1.0 - 0.06 * g).max(0.55);

        let lane = |row, dir, speed: f32, interval: f32, jitter: f32, max, lengths: &[u32], gap| {
            LaneConfig {
                row,
                dir,
                speed: speed * speed_mult,
                interval_ms: interval * interval_mult,
                jitter_ms: jitter * interval_mult,
                max_entities: max,
                lengths: lengths.to_vec(),
                min_gap_tiles: gap,
            }
        };

        let road = vec![
            lane(11, Direction::Left, 70.0, 1800.0, 900.0, 3, &[1], 1.5),
            lane(10, Direction::Right, 95.0, 2200.0, 1000.0, 3, &[1, 2], 1.5),
            lane(9, Direction::Left, 60.0, 2600.0, 1200.0, 3, &[2], 1.5),
            lane(8, Direction::Right, 120.0, 2000.0, 800.0, 3, &[1], 2.0),
            lane(7, Direction::Left, 80.0, 3000.0, 1200.0, 2, &[2, 3], 1.5),
        ];

        let river = |config: LaneConfig, kind, submerge| WaterLane {
            lane: config,
            kind,
            submerge,
        };
        let water = vec![
            river(
                lane(5, Direction::Left, 55.0, 2400.0, 800.0, 4, &[2, 3], 1.0),
                PlatformKind::Turtle,
                Some(SubmergeCycle {
                    period: 7.0,
                    down: 1.5,
                    warn: 1.5,
                }),
            ),
            river(
                lane(4, Direction::Right, 70.0, 2600.0, 1000.0, 3, &[3, 4], 1.5),
                PlatformKind::Log,
                None,
            ),
            river(
                lane(3, Direction::Left, 45.0, 3800.0, 1200.0, 2, &[3], 2.0),
                PlatformKind::Croc,
                Some(SubmergeCycle {
                    period: 9.0,
                    down: 2.5,
                    warn: 2.0,
                }),
            ),
            river(
                lane(2, Direction::Right, 60.0, 2200.0, 800.0, 4, &[2], 1.0),
                PlatformKind::Turtle,
                Some(SubmergeCycle {
                    period: 8.0,
                    down: 2.0,
                    warn: 2.0,
                }),
            ),
            river(
                lane(1, Direction::Left, 85.0, 2400.0, 900.0, 3, &[2, 3], 1.5),
                PlatformKind::Log,
                None,
            ),
        ];

        Self {
            speed_mult,
            interval_mult,
            road,
            water,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GameMode {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    /// Left edge in pixels. Floats while riding, snapped to the grid on land.
    pub x: f32,
    pub row: u32,
}

impl Player {
    /// Column under the player's centre.
    pub fn col(&self, board: &Board) -> i32 {
        ((self.x + board.tile_w / 2.0 - board.offset_x) / board.tile_w).floor() as i32
    }
}

#[derive(Clone, Debug)]
pub struct HopperWorld {
    mode: GameMode,
    score: u64,
    lives: u32,
    level: u32,
    board: Board,
    traffic: TrafficSystem,
    water: WaterSystem,
    pads: Pads,
    player: Player,
    furthest_row: u32,
    life_timer: f32,
    stats: RunStats,
    rng: SeededRng,
}

impl HopperWorld {
    pub fn new(seed: u32) -> Self {
        let board = board();
        let mut world = Self {
            mode: GameMode::Playing,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            board,
            traffic: TrafficSystem::new(board),
            water: WaterSystem::new(board),
            pads: Pads::default(),
            player: Player {
                x: 0.0,
                row: START_ROW,
            },
            furthest_row: START_ROW,
            life_timer: LIFE_SECONDS,
            stats: RunStats::default(),
            rng: SeededRng::new(seed),
        };
        world.setup_level();
        world.reset_player();
        world
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn traffic(&self) -> &TrafficSystem {
        &self.traffic
    }

    pub fn water(&self) -> &WaterSystem {
        &self.water
    }

    pub fn pads(&self) -> &Pads {
        &self.pads
    }

    pub fn life_timer(&self) -> f32 {
        self.life_timer
    }

    fn setup_level(&mut self) {
        let params = LevelParams::for_level(self.level);
        self.traffic.configure(params.road);
        self.water.configure(params.water);
        self.pads.reset();

        let warm_ticks = (PREWARM_SECONDS / TICK_SECONDS) as u32;
        for _ in 0..warm_ticks {
            self.traffic.update(TICK_SECONDS, &mut self.rng);
            self.water.update(TICK_SECONDS, &mut self.rng);
        }
    }

    fn reset_player(&mut self) {
        self.player = Player {
            x: self.board.offset_x + START_COL as f32 * self.board.tile_w,
            row: START_ROW,
        };
        self.furthest_row = START_ROW;
        self.life_timer = LIFE_SECONDS;
    }

    fn handle_move(&mut self, input: &InputState, events: &mut Vec<GameEvent>) {
        let Some((dx, dy)) = input.pressed().iter().find_map(|key| match key {
            Key::Up => Some((0, -1)),
            Key::Down => Some((0, 1)),
            Key::Left => Some((-1, 0)),
            Key::Right => Some((1, 0)),
            _ => None,
        }) else {
            return;
        };

        let before = self.player;
        let next_row = self.player.row as i32 + dy;
        if (HOME_ROW as i32..=START_ROW as i32).contains(&next_row) {
            self.player.row = next_row as u32;
        }
        let max_x = self.board.offset_x + (self.board.cols - 1) as f32 * self.board.tile_w;
        self.player.x = (self.player.x + dx as f32 * self.board.tile_w).clamp(self.board.offset_x, max_x);

        if row_kind(self.player.row) != RowKind::Water {
            let col = self.player.col(&self.board);
            self.player.x = self.board.offset_x + col as f32 * self.board.tile_w;
        }
        if self.player == before {
            return;
        }

        self.stats.hops += 1;
        events.push(GameEvent::Hopped);
        if self.player.row < self.furthest_row {
            self.score += SCORE_PER_ROW * u64::from(self.furthest_row - self.player.row);
            self.furthest_row = self.player.row;
        }
    }

    /// Applies whatever the player is standing on. Returns true when the
    /// player was reset, either by dying or by reaching a pad.
    fn resolve_position(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let row = self.player.row;
        let col = self.player.col(&self.board);

        match row_kind(row) {
            RowKind::Road => {
                if self.traffic.overlaps(row, col) {
                    self.lose_life(events);
                    return true;
                }
            }
            RowKind::Water => {
                if self.water.hazard_at(row, col) {
                    self.lose_life(events);
                    return true;
                }
                let Some(velocity) = self.water.carry_speed(row, col) else {
                    self.lose_life(events);
                    return true;
                };
                self.player.x += velocity * TICK_SECONDS;
                let col = self.player.col(&self.board);
                if col < 0 || col >= self.board.cols as i32 {
                    self.lose_life(events);
                    return true;
                }
                if self.water.try_pickup(row, col) {
                    self.score += u64::from(SCORE_PASSENGER);
                    self.stats.passengers += 1;
                    events.push(GameEvent::PassengerRescued {
                        points: SCORE_PASSENGER,
                    });
                }
            }
            RowKind::Home => {
                self.reach_home(col, events);
                return true;
            }
            RowKind::Median | RowKind::Start => {}
        }
        false
    }

    fn reach_home(&mut self, col: i32, events: &mut Vec<GameEvent>) {
        if !self.pads.fill(col) {
            self.lose_life(events);
            return;
        }

        let points = SCORE_PAD + SCORE_PAD_PER_SECOND * self.life_timer.max(0.0).floor() as u32;
        self.score += u64::from(points);
        self.stats.pads_filled += 1;
        events.push(GameEvent::PadFilled { col, points });

        if self.pads.all_filled() {
            let bonus = self.level * LEVEL_BONUS_PER_LEVEL;
            self.score += u64::from(bonus);
            self.stats.levels_cleared += 1;
            events.push(GameEvent::LevelCleared {
                level: self.level,
                bonus,
            });
            self.level += 1;
            self.setup_level();
        }
        self.reset_player();
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        self.stats.lives_lost += 1;
        events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        self.reset_player();
        if self.lives == 0 {
            self.mode = GameMode::GameOver;
            events.push(GameEvent::RunEnded { score: self.score });
        }
    }
}

impl Simulation for HopperWorld {
    fn kind(&self) -> GameKind {
        GameKind::HighwayHopper
    }

    fn step(&mut self, input: &InputState, events: &mut Vec<GameEvent>) {
        if matches!(self.mode, GameMode::GameOver) {
            return;
        }
        self.stats.ticks += 1;

        self.handle_move(input, events);
        self.traffic.update(TICK_SECONDS, &mut self.rng);
        self.water.update(TICK_SECONDS, &mut self.rng);

        if self.resolve_position(events) {
            return;
        }

        self.life_timer -= TICK_SECONDS;
        if self.life_timer <= 0.0 {
            self.lose_life(events);
        }
    }

    fn reset(&mut self, seed: u32) {
        *self = Self::new(seed);
    }

    fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            level: self.level,
            timer: Some(self.life_timer.max(0.0)),
            countdown: None,
        }
    }

    fn is_over(&self) -> bool {
        matches!(self.mode, GameMode::GameOver)
    }

    fn run_stats(&self) -> RunStats {
        self.stats
    }

    fn scene(&self) -> Scene<'_> {
        Scene::Hopper(self)
    }

    fn validate(&self) -> Result<(), RuleCode> {
        if self.level < 1 {
            return Err(RuleCode::GlobalLevelNonZero);
        }

        let consistent = match self.mode {
            GameMode::Playing => self.lives > 0,
            GameMode::GameOver => self.lives == 0,
        };
        if !consistent {
            return Err(RuleCode::GlobalModeLivesConsistency);
        }

        let col = self.player.col(&self.board);
        if self.player.row > START_ROW || col < 0 || col >= self.board.cols as i32 {
            return Err(RuleCode::HopperPlayerBounds);
        }
        if self.furthest_row > self.player.row {
            return Err(RuleCode::HopperPlayerBounds);
        }

        let road_ok = self.traffic.lanes().iter().all(|lane| {
            self.traffic.vehicles().iter().filter(|v| v.row == lane.row).count() <= lane.max_entities
        });
        let river_ok = self.water.lanes().iter().all(|entry| {
            self.water
                .platforms()
                .iter()
                .filter(|p| p.row == entry.lane.row)
                .count()
                <= entry.lane.max_entities
        });
        if !road_ok || !river_ok {
            return Err(RuleCode::LaneOccupancy);
        }

        if self.pads.all_filled() {
            return Err(RuleCode::PadState);
        }

        Ok(())
    }
}
