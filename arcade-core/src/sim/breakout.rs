use crate::error::RuleCode;
use crate::geometry::Rect;
use crate::input::{InputState, Key};
use crate::rng::SeededRng;

use super::{GameEvent, GameKind, Hud, RunStats, Scene, Simulation};

pub const FIELD_WIDTH: f32 = 960.0;
pub const FIELD_HEIGHT: f32 = 640.0;

pub const PADDLE_HEIGHT: f32 = 16.0;
pub const PADDLE_SPEED: f32 = 7.0;
pub const PADDLE_Y: f32 = FIELD_HEIGHT - 36.0;
pub const PADDLE_EDGE_MARGIN: f32 = 10.0;

pub const BALL_RADIUS: f32 = 8.0;
pub const BALL_SERVE_Y: f32 = FIELD_HEIGHT - 80.0;
pub const MIN_BOUNCE_SPEED: f32 = 1.5;

pub const BRICK_COLUMNS: usize = 14;
pub const BRICK_HEIGHT: f32 = 22.0;
pub const BRICK_ROW_GAP: f32 = 8.0;
pub const BRICK_TOP_MARGIN: f32 = 50.0;
pub const BRICK_SIDE_MARGIN: f32 = 40.0;
pub const BRICK_GUTTER: f32 = 6.0;
pub const POINTS_PER_RANK: u32 = 10;
pub const LEVEL_BONUS_PER_LEVEL: u32 = 200;

pub const COUNTDOWN_PULSES: u32 = 3;
pub const PULSE_TICKS: u32 = 60;

pub const STARTING_LIVES: u32 = 3;

/// Difficulty knobs for one level. Pure in `level`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelParams {
    pub paddle_width: f32,
    pub rows: usize,
    pub launch_speed: f32,
    pub max_speed: f32,
    pub speed_up: f32,
    pub edge_mult: f32,
}

impl LevelParams {
    pub fn for_level(level: u32) -> Self {
        match level {
            0 | 1 => Self {
                paddle_width: 180.0,
                rows: 4,
                launch_speed: 1.6,
                max_speed: 4.2,
                speed_up: 0.015,
                edge_mult: 3.0,
            },
            2 => Self {
                paddle_width: 160.0,
                rows: 5,
                launch_speed: 1.8,
                max_speed: 4.6,
                speed_up: 0.02,
                edge_mult: 3.2,
            },
            _ => {
                let g = (level - 2).min(5) as f32;
                Self {
                    paddle_width: (140.0 - 6.0 * g).max(120.0),
                    rows: (4 + level as usize).min(8),
                    launch_speed: (1.8 + 0.15 * g).min(3.0),
                    max_speed: (4.6 + 0.25 * g).min(6.0),
                    speed_up: (0.02 + 0.005 * g).min(0.04),
                    edge_mult: (3.0 + 0.2 * g).min(4.0),
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GameMode {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Paddle {
    fn clamp(&mut self) {
        self.x = self
            .x
            .clamp(PADDLE_EDGE_MARGIN, FIELD_WIDTH - self.w - PADDLE_EDGE_MARGIN);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub r: f32,
}

impl Ball {
    fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }

    fn clamp_speed(&mut self, max: f32) {
        let speed = self.speed();
        if speed > max {
            let k = max / speed;
            self.vx *= k;
            self.vy *= k;
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Brick {
    pub rect: Rect,
    /// 1 for the bottom row, growing upward.
    pub rank: u32,
    pub value: u32,
    pub alive: bool,
}

/// Brick breaker with a serve countdown before every launch.
#[derive(Clone, Debug)]
pub struct BreakoutWorld {
    mode: GameMode,
    score: u64,
    lives: u32,
    level: u32,
    params: LevelParams,
    paddle: Paddle,
    ball: Ball,
    bricks: Vec<Brick>,
    countdown: u32,
    countdown_ticks: u32,
    launch_dir: f32,
    stats: RunStats,
    rng: SeededRng,
}

impl BreakoutWorld {
    pub fn new(seed: u32) -> Self {
        let params = LevelParams::for_level(1);
        let mut world = Self {
            mode: GameMode::Playing,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            params,
            paddle: Paddle {
                x: 0.0,
                y: PADDLE_Y,
                w: params.paddle_width,
                h: PADDLE_HEIGHT,
            },
            ball: Ball {
                x: FIELD_WIDTH / 2.0,
                y: BALL_SERVE_Y,
                vx: 0.0,
                vy: 0.0,
                r: BALL_RADIUS,
            },
            bricks: Vec::new(),
            countdown: COUNTDOWN_PULSES,
            countdown_ticks: 0,
            launch_dir: 1.0,
            stats: RunStats::default(),
            rng: SeededRng::new(seed),
        };
        world.apply_level();
        world
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn params(&self) -> &LevelParams {
        &self.params
    }

    /// Pulses left before the serve; zero once the ball is in play.
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn controls_locked(&self) -> bool {
        self.countdown > 0
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|brick| brick.alive).count()
    }

    fn apply_level(&mut self) {
        self.params = LevelParams::for_level(self.level);
        self.paddle.w = self.params.paddle_width;
        self.paddle.x = (FIELD_WIDTH - self.paddle.w) / 2.0;
        self.build_bricks();
        self.launch_dir = self.rng.sign();
        self.serve();
    }

    fn build_bricks(&mut self) {
        let rows = self.params.rows;
        let brick_w = (FIELD_WIDTH - 2.0 * BRICK_SIDE_MARGIN) / BRICK_COLUMNS as f32;
        self.bricks.clear();
        for row in 0..rows {
            let rank = (rows - row) as u32;
            for col in 0..BRICK_COLUMNS {
                self.bricks.push(Brick {
                    rect: Rect::new(
                        BRICK_SIDE_MARGIN + col as f32 * brick_w,
                        BRICK_TOP_MARGIN + row as f32 * (BRICK_HEIGHT + BRICK_ROW_GAP),
                        brick_w - BRICK_GUTTER,
                        BRICK_HEIGHT,
                    ),
                    rank,
                    value: rank * POINTS_PER_RANK,
                    alive: true,
                });
            }
        }
    }

    /// Parks the ball and restarts the countdown. Controls stay locked until
    /// the last pulse.
    fn serve(&mut self) {
        self.ball.x = FIELD_WIDTH / 2.0;
        self.ball.y = BALL_SERVE_Y;
        self.ball.vx = 0.0;
        self.ball.vy = 0.0;
        self.countdown = COUNTDOWN_PULSES;
        self.countdown_ticks = 0;
    }

    fn update_paddle(&mut self, input: &InputState) {
        if !self.controls_locked() {
            if let Some(pointer_x) = input.pointer_x() {
                self.paddle.x = pointer_x - self.paddle.w / 2.0;
            }
            if input.is_down(Key::Left) {
                self.paddle.x -= PADDLE_SPEED;
            }
            if input.is_down(Key::Right) {
                self.paddle.x += PADDLE_SPEED;
            }
        }
        self.paddle.clamp();
    }

    fn tick_countdown(&mut self, events: &mut Vec<GameEvent>) {
        self.countdown_ticks += 1;
        if self.countdown_ticks < PULSE_TICKS {
            return;
        }
        self.countdown -= 1;
        self.countdown_ticks = 0;
        events.push(GameEvent::CountdownPulse {
            remaining: self.countdown,
        });
        if self.countdown == 0 {
            self.ball.vx = self.params.launch_speed * self.launch_dir;
            self.ball.vy = -self.params.launch_speed;
        }
    }

    fn move_ball(&mut self) {
        let ball = &mut self.ball;
        ball.x += ball.vx;
        ball.y += ball.vy;

        if ball.x < ball.r {
            ball.vx = ball.vx.abs();
        } else if ball.x > FIELD_WIDTH - ball.r {
            ball.vx = -ball.vx.abs();
        }
        if ball.y < ball.r {
            ball.vy = ball.vy.abs();
        }
    }

    fn hit_paddle(&mut self, events: &mut Vec<GameEvent>) {
        let (ball, paddle) = (&mut self.ball, &self.paddle);
        let over_paddle = ball.x > paddle.x && ball.x < paddle.x + paddle.w;
        if ball.vy <= 0.0 || ball.y + ball.r < paddle.y || !over_paddle {
            return;
        }

        let half = paddle.w / 2.0;
        let offset = (ball.x - (paddle.x + half)) / half;
        ball.vx = offset * self.params.edge_mult;
        ball.vy = -ball.vy.abs().max(MIN_BOUNCE_SPEED);
        ball.y = paddle.y - ball.r - 1.0;
        ball.clamp_speed(self.params.max_speed);
        events.push(GameEvent::PaddleHit);
    }

    /// Resolves the first brick containing the ball centre, if any.
    fn hit_brick(&mut self, events: &mut Vec<GameEvent>) {
        let (bx, by) = (self.ball.x, self.ball.y);
        let Some(brick) = self
            .bricks
            .iter_mut()
            .find(|brick| brick.alive && brick.rect.contains_point(bx, by))
        else {
            return;
        };

        brick.alive = false;
        let points = brick.value;
        self.score += u64::from(points);
        self.stats.hits += 1;
        self.stats.obstacles_destroyed += 1;
        events.push(GameEvent::ObstacleDestroyed { points });

        self.ball.vy = -self.ball.vy;
        let boost = 1.0 + self.params.speed_up;
        self.ball.vx *= boost;
        self.ball.vy *= boost;
        self.ball.clamp_speed(self.params.max_speed);
    }

    fn advance_level(&mut self, events: &mut Vec<GameEvent>) {
        let bonus = self.level * LEVEL_BONUS_PER_LEVEL;
        self.score += u64::from(bonus);
        self.stats.levels_cleared += 1;
        events.push(GameEvent::LevelCleared {
            level: self.level,
            bonus,
        });
        self.level += 1;
        self.apply_level();
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        self.stats.lives_lost += 1;
        events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.mode = GameMode::GameOver;
            self.ball.vx = 0.0;
            self.ball.vy = 0.0;
            events.push(GameEvent::RunEnded { score: self.score });
        } else {
            self.serve();
        }
    }
}

impl Simulation for BreakoutWorld {
    fn kind(&self) -> GameKind {
        GameKind::Breakout
    }

    fn step(&mut self, input: &InputState, events: &mut Vec<GameEvent>) {
        if matches!(self.mode, GameMode::GameOver) {
            return;
        }
        self.stats.ticks += 1;

        self.update_paddle(input);
        if self.controls_locked() {
            self.tick_countdown(events);
            return;
        }

        self.move_ball();
        self.hit_paddle(events);
        self.hit_brick(events);

        if self.bricks_left() == 0 {
            self.advance_level(events);
            return;
        }

        if self.ball.y - self.ball.r > FIELD_HEIGHT {
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
            timer: None,
            countdown: (self.countdown > 0).then_some(self.countdown),
        }
    }

    fn is_over(&self) -> bool {
        matches!(self.mode, GameMode::GameOver)
    }

    fn run_stats(&self) -> RunStats {
        self.stats
    }

    fn scene(&self) -> Scene<'_> {
        Scene::Breakout(self)
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

        let min_x = PADDLE_EDGE_MARGIN;
        let max_x = FIELD_WIDTH - self.paddle.w - PADDLE_EDGE_MARGIN;
        if self.paddle.x < min_x || self.paddle.x > max_x {
            return Err(RuleCode::PaddleBounds);
        }

        let ball = self.ball;
        let finite = ball.x.is_finite() && ball.y.is_finite() && ball.vx.is_finite() && ball.vy.is_finite();
        let launch = self.params.launch_speed * std::f32::consts::SQRT_2;
        let speed_cap = self.params.max_speed.max(launch) + 1e-3;
        if !finite || ball.speed() > speed_cap {
            return Err(RuleCode::BallState);
        }
        if self.controls_locked() && ball.speed() != 0.0 {
            return Err(RuleCode::BallState);
        }

        if self.bricks.len() != self.params.rows * BRICK_COLUMNS || self.bricks_left() == 0 {
            return Err(RuleCode::BrickState);
        }

        Ok(())
    }
}
