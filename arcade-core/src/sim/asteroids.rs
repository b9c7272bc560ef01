use std::f32::consts::{FRAC_PI_2, TAU};

use crate::error::RuleCode;
use crate::geometry::{circles_overlap, distance, wrap_coord};
use crate::input::{InputState, Key};
use crate::rng::SeededRng;

use super::{GameEvent, GameKind, Hud, RunStats, Scene, Simulation};

pub const WORLD_WIDTH: f32 = 960.0;
pub const WORLD_HEIGHT: f32 = 640.0;

pub const SHIP_RADIUS: f32 = 15.0;
pub const SHIP_THRUST: f32 = 0.1;
pub const SHIP_TURN_SPEED: f32 = 0.07;
pub const FRICTION: f32 = 0.99;
pub const SHIP_RESPAWN_INVULNERABLE_TICKS: u32 = 120;

pub const BULLET_SPEED: f32 = 7.0;
pub const BULLET_RADIUS: f32 = 2.0;
pub const SHIP_BULLET_LIMIT: usize = 10;

pub const BASE_ASTEROID_COUNT: usize = 3;
pub const ASTEROID_SPEED: f32 = 1.0;
pub const ASTEROID_RADIUS_LARGE: f32 = 100.0;
pub const ASTEROID_RADIUS_MEDIUM: f32 = 50.0;
pub const ASTEROID_RADIUS_SMALL: f32 = 25.0;
pub const SCORE_LARGE_ASTEROID: u32 = 20;
pub const SCORE_MEDIUM_ASTEROID: u32 = 50;
pub const SCORE_SMALL_ASTEROID: u32 = 100;

pub const ALIEN_FIRST_LEVEL: u32 = 5;
pub const ALIEN_SPAWN_CHANCE: f32 = 0.001;
pub const ALIEN_RADIUS: f32 = 30.0;
pub const ALIEN_SPEED: f32 = 2.0;
pub const ALIEN_FIRE_INTERVAL_TICKS: u32 = 60;
pub const SCORE_ALIEN: u32 = 200;

pub const STARTING_LIVES: u32 = 3;

const ALIEN_AIM_DIVISOR: f32 = 100.0;
const SPAWN_SAFE_DISTANCE: f32 = 200.0;
const SPAWN_ATTEMPTS: u32 = 20;

/// Per-level knobs. Pure in `level`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelParams {
    pub asteroid_count: usize,
    pub aliens_enabled: bool,
}

impl LevelParams {
    pub fn for_level(level: u32) -> Self {
        Self {
            asteroid_count: BASE_ASTEROID_COUNT + level as usize,
            aliens_enabled: level >= ALIEN_FIRST_LEVEL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsteroidTier {
    Large,
    Medium,
    Small,
}

impl AsteroidTier {
    pub fn radius(self) -> f32 {
        match self {
            Self::Large => ASTEROID_RADIUS_LARGE,
            Self::Medium => ASTEROID_RADIUS_MEDIUM,
            Self::Small => ASTEROID_RADIUS_SMALL,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Self::Large => SCORE_LARGE_ASTEROID,
            Self::Medium => SCORE_MEDIUM_ASTEROID,
            Self::Small => SCORE_SMALL_ASTEROID,
        }
    }

    /// Tier of the two fragments left behind, if any.
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GameMode {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Heading in radians, counter-clockwise with `y` pointing down.
    pub angle: f32,
    pub radius: f32,
    pub thrusting: bool,
    pub invulnerable_ticks: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct Asteroid {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
    pub tier: AsteroidTier,
    alive: bool,
}

impl Asteroid {
    #[inline]
    pub fn radius(&self) -> f32 {
        self.tier.radius()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    alive: bool,
}

impl Bullet {
    fn in_bounds(&self) -> bool {
        self.x >= 0.0 && self.x <= WORLD_WIDTH && self.y >= 0.0 && self.y <= WORLD_HEIGHT
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Alien {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub radius: f32,
    fire_cooldown: u32,
}

/// Asteroid-clearing shooter.
#[derive(Clone, Debug)]
pub struct AsteroidsWorld {
    mode: GameMode,
    score: u64,
    lives: u32,
    level: u32,
    ship: Ship,
    asteroids: Vec<Asteroid>,
    bullets: Vec<Bullet>,
    alien: Option<Alien>,
    alien_bullets: Vec<Bullet>,
    stats: RunStats,
    rng: SeededRng,
}

impl AsteroidsWorld {
    pub fn new(seed: u32) -> Self {
        let mut world = Self {
            mode: GameMode::Playing,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            ship: Self::create_ship(),
            asteroids: Vec::with_capacity(32),
            bullets: Vec::with_capacity(SHIP_BULLET_LIMIT),
            alien: None,
            alien_bullets: Vec::new(),
            stats: RunStats::default(),
            rng: SeededRng::new(seed),
        };
        world.setup_level();
        world
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn alien(&self) -> Option<&Alien> {
        self.alien.as_ref()
    }

    pub fn alien_bullets(&self) -> &[Bullet] {
        &self.alien_bullets
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.mode, GameMode::GameOver)
    }

    fn create_ship() -> Ship {
        Ship {
            x: WORLD_WIDTH / 2.0,
            y: WORLD_HEIGHT / 2.0,
            vx: 0.0,
            vy: 0.0,
            angle: FRAC_PI_2,
            radius: SHIP_RADIUS,
            thrusting: false,
            invulnerable_ticks: 0,
        }
    }

    fn setup_level(&mut self) {
        let params = LevelParams::for_level(self.level);
        self.asteroids.clear();
        self.alien = None;
        self.alien_bullets.clear();
        for _ in 0..params.asteroid_count {
            let (x, y) = self.belt_spawn_point();
            let asteroid = self.create_asteroid(AsteroidTier::Large, x, y);
            self.asteroids.push(asteroid);
        }
    }

    /// Random point that keeps a fresh large asteroid clear of the ship. Falls
    /// back to the last candidate once attempts run out.
    fn belt_spawn_point(&mut self) -> (f32, f32) {
        let mut x = 0.0;
        let mut y = 0.0;
        for _ in 0..SPAWN_ATTEMPTS {
            x = self.rng.range_f32(0.0, WORLD_WIDTH);
            y = self.rng.range_f32(0.0, WORLD_HEIGHT);
            if distance(x, y, self.ship.x, self.ship.y) >= SPAWN_SAFE_DISTANCE {
                break;
            }
        }
        (x, y)
    }

    fn create_asteroid(&mut self, tier: AsteroidTier, x: f32, y: f32) -> Asteroid {
        let vx = self.rng.next_f32() * ASTEROID_SPEED * self.rng.sign();
        let vy = self.rng.next_f32() * ASTEROID_SPEED * self.rng.sign();
        Asteroid {
            x,
            y,
            vx,
            vy,
            angle: self.rng.range_f32(0.0, TAU),
            tier,
            alive: true,
        }
    }

    fn update_ship(&mut self, input: &InputState, events: &mut Vec<GameEvent>) {
        let ship = &mut self.ship;
        if input.is_down(Key::Left) {
            ship.angle += SHIP_TURN_SPEED;
        }
        if input.is_down(Key::Right) {
            ship.angle -= SHIP_TURN_SPEED;
        }
        ship.thrusting = input.is_down(Key::Up);
        if ship.thrusting {
            ship.vx += SHIP_THRUST * ship.angle.cos();
            ship.vy -= SHIP_THRUST * ship.angle.sin();
        } else {
            ship.vx *= FRICTION;
            ship.vy *= FRICTION;
        }

        ship.x = wrap_coord(ship.x + ship.vx, ship.radius, WORLD_WIDTH);
        ship.y = wrap_coord(ship.y + ship.vy, ship.radius, WORLD_HEIGHT);
        ship.invulnerable_ticks = ship.invulnerable_ticks.saturating_sub(1);

        if input.was_pressed(Key::Fire) {
            self.fire(events);
        }
    }

    fn fire(&mut self, events: &mut Vec<GameEvent>) {
        if self.bullets.len() >= SHIP_BULLET_LIMIT {
            return;
        }
        let (cos, sin) = (self.ship.angle.cos(), self.ship.angle.sin());
        let nose = 4.0 / 3.0 * self.ship.radius;
        self.bullets.push(Bullet {
            x: self.ship.x + nose * cos,
            y: self.ship.y - nose * sin,
            vx: BULLET_SPEED * cos,
            vy: -BULLET_SPEED * sin,
            alive: true,
        });
        self.stats.shots += 1;
        events.push(GameEvent::ShotFired);
    }

    fn update_projectiles(projectiles: &mut Vec<Bullet>) {
        for bullet in projectiles.iter_mut() {
            bullet.x += bullet.vx;
            bullet.y += bullet.vy;
            if !bullet.in_bounds() {
                bullet.alive = false;
            }
        }
        projectiles.retain(|entry| entry.alive);
    }

    fn update_asteroids(&mut self) {
        for asteroid in &mut self.asteroids {
            let r = asteroid.tier.radius();
            asteroid.x = wrap_coord(asteroid.x + asteroid.vx, r, WORLD_WIDTH);
            asteroid.y = wrap_coord(asteroid.y + asteroid.vy, r, WORLD_HEIGHT);
        }
    }

    fn update_alien(&mut self) {
        let params = LevelParams::for_level(self.level);
        if params.aliens_enabled && self.alien.is_none() && self.rng.chance(ALIEN_SPAWN_CHANCE) {
            self.spawn_alien();
        }

        let Some(alien) = self.alien.as_mut() else {
            return;
        };
        alien.x += alien.vx;
        if alien.x < -alien.radius || alien.x > WORLD_WIDTH + alien.radius {
            self.alien = None;
            return;
        }

        alien.fire_cooldown = alien.fire_cooldown.saturating_sub(1);
        if alien.fire_cooldown == 0 {
            alien.fire_cooldown = ALIEN_FIRE_INTERVAL_TICKS;
            let (ax, ay) = (alien.x, alien.y);
            self.alien_bullets.push(Bullet {
                x: ax,
                y: ay,
                vx: (self.ship.x - ax) / ALIEN_AIM_DIVISOR,
                vy: (self.ship.y - ay) / ALIEN_AIM_DIVISOR,
                alive: true,
            });
        }
    }

    fn spawn_alien(&mut self) {
        let from_left = self.rng.chance(0.5);
        // Start just inside the edge so the first move does not cull it.
        let x = if from_left {
            -ALIEN_RADIUS + ALIEN_SPEED
        } else {
            WORLD_WIDTH + ALIEN_RADIUS - ALIEN_SPEED
        };
        let y = self.rng.range_f32(0.0, WORLD_HEIGHT);
        self.alien = Some(Alien {
            x,
            y,
            vx: if from_left { ALIEN_SPEED } else { -ALIEN_SPEED },
            radius: ALIEN_RADIUS,
            fire_cooldown: ALIEN_FIRE_INTERVAL_TICKS,
        });
    }

    fn handle_collisions(&mut self, events: &mut Vec<GameEvent>) {
        // Fragments appended past this index were born this tick and are not
        // eligible for hits until the next one.
        let eligible = self.asteroids.len();

        for bullet_index in 0..self.bullets.len() {
            let (bx, by) = (self.bullets[bullet_index].x, self.bullets[bullet_index].y);
            for asteroid_index in 0..eligible {
                let asteroid = self.asteroids[asteroid_index];
                if !asteroid.alive {
                    continue;
                }
                if circles_overlap(bx, by, BULLET_RADIUS, asteroid.x, asteroid.y, asteroid.radius()) {
                    self.bullets[bullet_index].alive = false;
                    self.destroy_asteroid(asteroid_index, events);
                    break;
                }
            }
        }

        if let Some(alien) = self.alien {
            for bullet in &mut self.bullets {
                if !bullet.alive {
                    continue;
                }
                if circles_overlap(bullet.x, bullet.y, BULLET_RADIUS, alien.x, alien.y, alien.radius) {
                    bullet.alive = false;
                    self.alien = None;
                    self.score += u64::from(SCORE_ALIEN);
                    self.stats.hits += 1;
                    self.stats.aliens_killed += 1;
                    events.push(GameEvent::AlienDestroyed { points: SCORE_ALIEN });
                    break;
                }
            }
        }

        self.bullets.retain(|entry| entry.alive);
        self.asteroids.retain(|entry| entry.alive);

        if self.ship.invulnerable_ticks == 0 && self.ship_hit() {
            self.lose_life(events);
        }
    }

    /// Reports at most one contact so a single tick costs at most one life.
    fn ship_hit(&mut self) -> bool {
        let ship = self.ship;
        let asteroid_contact = self.asteroids.iter().any(|asteroid| {
            circles_overlap(ship.x, ship.y, ship.radius, asteroid.x, asteroid.y, asteroid.radius())
        });
        if asteroid_contact {
            return true;
        }

        if let Some(index) = self
            .alien_bullets
            .iter()
            .position(|bullet| circles_overlap(ship.x, ship.y, ship.radius, bullet.x, bullet.y, BULLET_RADIUS))
        {
            self.alien_bullets.remove(index);
            return true;
        }

        if let Some(alien) = self.alien {
            if circles_overlap(ship.x, ship.y, ship.radius, alien.x, alien.y, alien.radius) {
                self.alien = None;
                return true;
            }
        }

        false
    }

    fn destroy_asteroid(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        let (tier, x, y) = {
            let asteroid = &mut self.asteroids[index];
            asteroid.alive = false;
            (asteroid.tier, asteroid.x, asteroid.y)
        };

        let points = tier.points();
        self.score += u64::from(points);
        self.stats.hits += 1;
        self.stats.obstacles_destroyed += 1;
        events.push(GameEvent::ObstacleDestroyed { points });

        if let Some(child) = tier.child() {
            for _ in 0..2 {
                let fragment = self.create_asteroid(child, x, y);
                self.asteroids.push(fragment);
            }
        }
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        self.stats.lives_lost += 1;
        events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.mode = GameMode::GameOver;
            events.push(GameEvent::RunEnded { score: self.score });
            return;
        }

        self.ship = Self::create_ship();
        self.ship.invulnerable_ticks = SHIP_RESPAWN_INVULNERABLE_TICKS;
    }

    fn advance_level(&mut self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::LevelCleared {
            level: self.level,
            bonus: 0,
        });
        self.stats.levels_cleared += 1;
        self.level += 1;
        self.setup_level();
    }
}

impl Simulation for AsteroidsWorld {
    fn kind(&self) -> GameKind {
        GameKind::Asteroids
    }

    fn step(&mut self, input: &InputState, events: &mut Vec<GameEvent>) {
        if self.is_game_over() {
            return;
        }
        self.stats.ticks += 1;

        self.update_ship(input, events);
        Self::update_projectiles(&mut self.bullets);
        self.update_asteroids();
        self.update_alien();
        Self::update_projectiles(&mut self.alien_bullets);

        self.handle_collisions(events);

        if !self.is_game_over() && self.asteroids.is_empty() {
            self.advance_level(events);
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
            countdown: None,
        }
    }

    fn is_over(&self) -> bool {
        self.is_game_over()
    }

    fn run_stats(&self) -> RunStats {
        self.stats
    }

    fn scene(&self) -> Scene<'_> {
        Scene::Asteroids(self)
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

        let r = self.ship.radius;
        if !(-r..=WORLD_WIDTH + r).contains(&self.ship.x)
            || !(-r..=WORLD_HEIGHT + r).contains(&self.ship.y)
        {
            return Err(RuleCode::ShipBounds);
        }

        if self.bullets.len() > SHIP_BULLET_LIMIT {
            return Err(RuleCode::PlayerBulletLimit);
        }
        if self.bullets.iter().any(|bullet| !bullet.alive || !bullet.in_bounds()) {
            return Err(RuleCode::PlayerBulletState);
        }

        for asteroid in &self.asteroids {
            let r = asteroid.radius();
            let in_bounds = (-r..=WORLD_WIDTH + r).contains(&asteroid.x)
                && (-r..=WORLD_HEIGHT + r).contains(&asteroid.y);
            if !asteroid.alive || !in_bounds {
                return Err(RuleCode::AsteroidState);
            }
        }

        if let Some(alien) = self.alien {
            let in_bounds = (-alien.radius..=WORLD_WIDTH + alien.radius).contains(&alien.x)
                && (0.0..=WORLD_HEIGHT).contains(&alien.y);
            if !in_bounds || self.level < ALIEN_FIRST_LEVEL {
                return Err(RuleCode::AlienState);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_world() -> AsteroidsWorld {
        let mut world = AsteroidsWorld::new(0xDEAD_BEEF);
        world.asteroids.clear();
        world
    }

    fn still_asteroid(tier: AsteroidTier, x: f32, y: f32) -> Asteroid {
        Asteroid {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            tier,
            alive: true,
        }
    }

    fn still_bullet(x: f32, y: f32) -> Bullet {
        Bullet {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            alive: true,
        }
    }

    fn count(world: &AsteroidsWorld, tier: AsteroidTier) -> usize {
        world.asteroids.iter().filter(|a| a.tier == tier).count()
    }

    #[test]
    fn level_setup_spawns_three_plus_level_large_asteroids() {
        let mut world = AsteroidsWorld::new(17);
        for level in 1..=9 {
            world.level = level;
            world.setup_level();
            assert_eq!(world.asteroids.len(), 3 + level as usize);
            assert_eq!(count(&world, AsteroidTier::Large), world.asteroids.len());
        }
    }

    #[test]
    fn large_asteroid_splits_into_two_mediums() {
        let mut world = bare_world();
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 200.0, 150.0));
        world.bullets.push(still_bullet(200.0, 150.0));

        let mut events = Vec::new();
        world.step(&InputState::new(), &mut events);

        assert_eq!(world.score, 20);
        assert_eq!(world.asteroids.len(), 2);
        assert_eq!(count(&world, AsteroidTier::Medium), 2);
        assert!(world.bullets.is_empty());
        assert_eq!(events, vec![GameEvent::ObstacleDestroyed { points: 20 }]);
    }

    #[test]
    fn small_asteroid_leaves_no_fragments() {
        let mut world = bare_world();
        world.asteroids.push(still_asteroid(AsteroidTier::Small, 200.0, 150.0));
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 800.0, 80.0));
        world.bullets.push(still_bullet(200.0, 150.0));

        world.step(&InputState::new(), &mut Vec::new());

        assert_eq!(world.score, 100);
        assert_eq!(world.asteroids.len(), 1);
        assert_eq!(count(&world, AsteroidTier::Large), 1);
    }

    #[test]
    fn one_bullet_scores_once_against_stacked_asteroids() {
        let mut world = bare_world();
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 200.0, 150.0));
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 200.0, 150.0));
        world.bullets.push(still_bullet(200.0, 150.0));

        world.step(&InputState::new(), &mut Vec::new());

        assert_eq!(world.score, 20);
        assert_eq!(count(&world, AsteroidTier::Large), 1);
        assert_eq!(count(&world, AsteroidTier::Medium), 2);
        assert_eq!(world.stats.hits, 1);
    }

    #[test]
    fn fragments_cannot_be_hit_in_the_tick_they_spawn() {
        let mut world = bare_world();
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 200.0, 150.0));
        world.bullets.push(still_bullet(200.0, 150.0));
        world.bullets.push(still_bullet(200.0, 150.0));

        world.step(&InputState::new(), &mut Vec::new());
        assert_eq!(world.score, 20);
        assert_eq!(world.bullets.len(), 1);

        world.step(&InputState::new(), &mut Vec::new());
        assert_eq!(world.score, 70);
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn overlapping_hazards_cost_a_single_life() {
        let mut world = bare_world();
        let (sx, sy) = (world.ship.x, world.ship.y);
        world.asteroids.push(still_asteroid(AsteroidTier::Small, sx, sy));
        world.asteroids.push(still_asteroid(AsteroidTier::Medium, sx + 5.0, sy));

        let mut events = Vec::new();
        world.step(&InputState::new(), &mut events);

        assert_eq!(world.lives, STARTING_LIVES - 1);
        assert_eq!(world.ship.invulnerable_ticks, SHIP_RESPAWN_INVULNERABLE_TICKS);
        let lost = events
            .iter()
            .filter(|event| matches!(event, GameEvent::LifeLost { .. }))
            .count();
        assert_eq!(lost, 1);
    }

    #[test]
    fn run_ends_exactly_once() {
        let mut world = bare_world();
        world.lives = 1;
        let (sx, sy) = (world.ship.x, world.ship.y);
        world.asteroids.push(still_asteroid(AsteroidTier::Large, sx, sy));

        let mut events = Vec::new();
        world.step(&InputState::new(), &mut events);
        world.step(&InputState::new(), &mut events);

        let ended: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, GameEvent::RunEnded { .. }))
            .collect();
        assert_eq!(ended, vec![&GameEvent::RunEnded { score: 0 }]);
        assert!(world.is_over());
        world.validate().expect("game over state must stay valid");
    }

    #[test]
    fn fire_is_capped_at_ten_live_bullets() {
        let mut world = bare_world();
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 100.0, 560.0));
        let mut input = InputState::new();
        let mut events = Vec::new();

        for _ in 0..12 {
            input.tap(Key::Fire);
            world.step(&input, &mut events);
            input.end_frame();
        }

        assert_eq!(world.bullets.len(), SHIP_BULLET_LIMIT);
        assert_eq!(world.stats.shots, SHIP_BULLET_LIMIT as u32);
        world.validate().expect("state must stay valid while firing");
    }

    #[test]
    fn held_fire_does_not_autofire() {
        let mut world = bare_world();
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 100.0, 560.0));
        let mut input = InputState::new();
        input.press(Key::Fire);

        for _ in 0..5 {
            world.step(&input, &mut Vec::new());
            input.end_frame();
        }

        assert_eq!(world.stats.shots, 1);
    }

    #[test]
    fn clearing_the_field_advances_the_level() {
        let mut world = bare_world();
        world.asteroids.push(still_asteroid(AsteroidTier::Small, 200.0, 150.0));
        world.bullets.push(still_bullet(200.0, 150.0));

        let mut events = Vec::new();
        world.step(&InputState::new(), &mut events);

        assert_eq!(world.level, 2);
        assert_eq!(world.score, 100);
        assert_eq!(world.lives, STARTING_LIVES);
        assert_eq!(world.asteroids.len(), LevelParams::for_level(2).asteroid_count);
        assert!(events.contains(&GameEvent::LevelCleared { level: 1, bonus: 0 }));
    }

    #[test]
    fn alien_kill_awards_two_hundred() {
        let mut world = bare_world();
        world.level = ALIEN_FIRST_LEVEL;
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 100.0, 560.0));
        world.alien = Some(Alien {
            x: 600.0,
            y: 100.0,
            vx: ALIEN_SPEED,
            radius: ALIEN_RADIUS,
            fire_cooldown: ALIEN_FIRE_INTERVAL_TICKS,
        });
        world.bullets.push(still_bullet(602.0, 100.0));

        world.step(&InputState::new(), &mut Vec::new());

        assert!(world.alien.is_none());
        assert_eq!(world.score, u64::from(SCORE_ALIEN));
        assert_eq!(world.stats.aliens_killed, 1);
    }

    #[test]
    fn spawned_alien_enters_from_an_edge() {
        let mut world = bare_world();
        world.level = ALIEN_FIRST_LEVEL;
        world.spawn_alien();
        let alien = world.alien.expect("alien spawned");
        assert!(alien.x < 0.0 || alien.x > WORLD_WIDTH);
        assert_eq!(alien.vx.abs(), ALIEN_SPEED);
        assert_eq!(alien.vx > 0.0, alien.x < 0.0);
    }

    #[test]
    fn aliens_never_appear_before_their_level() {
        let mut world = AsteroidsWorld::new(5);
        let mut input = InputState::new();
        input.press(Key::Left);
        for _ in 0..3_000 {
            world.step(&input, &mut Vec::new());
            if world.level >= ALIEN_FIRST_LEVEL || world.is_over() {
                break;
            }
            assert!(world.alien.is_none());
        }
    }

    #[test]
    fn ship_wraps_past_its_radius() {
        let mut world = bare_world();
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 100.0, 560.0));
        world.ship.x = -SHIP_RADIUS;
        world.ship.vx = -1.0;

        world.step(&InputState::new(), &mut Vec::new());

        assert_eq!(world.ship.x, WORLD_WIDTH + SHIP_RADIUS);
    }

    #[test]
    fn validate_flags_bullet_overflow() {
        let mut world = bare_world();
        world.asteroids.push(still_asteroid(AsteroidTier::Large, 100.0, 560.0));
        for _ in 0..=SHIP_BULLET_LIMIT {
            world.bullets.push(still_bullet(50.0, 50.0));
        }
        assert_eq!(world.validate(), Err(RuleCode::PlayerBulletLimit));
    }

    #[test]
    fn validate_flags_dead_mode_with_lives() {
        let mut world = bare_world();
        world.mode = GameMode::GameOver;
        assert_eq!(world.validate(), Err(RuleCode::GlobalModeLivesConsistency));
    }
}
