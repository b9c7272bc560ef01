use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RuleCode;
use crate::input::InputState;

pub mod asteroids;
pub mod breakout;
pub mod hopper;

#[cfg(test)]
pub(crate) mod scripted;

pub use asteroids::AsteroidsWorld;
pub use breakout::BreakoutWorld;
pub use hopper::HopperWorld;

/// Fixed timestep every simulation advances by.
pub const TICK_SECONDS: f32 = 1.0 / 60.0;
pub const TICK_MS: f32 = 1000.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Asteroids,
    Breakout,
    HighwayHopper,
}

/// How a qualifying run is labelled in the local top-10 table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameStyle {
    /// Up to three upper-case letters, `???` when left blank.
    Initials,
    /// The sanitized player name, up to 24 characters.
    FullName,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [
        GameKind::Asteroids,
        GameKind::Breakout,
        GameKind::HighwayHopper,
    ];

    /// Identifier sent to the leaderboard service.
    pub fn id(self) -> &'static str {
        match self {
            Self::Asteroids => "asteroids",
            Self::Breakout => "breakout",
            Self::HighwayHopper => "highway-hopper",
        }
    }

    /// Namespace for keys in the local profile.
    pub fn storage_prefix(self) -> &'static str {
        match self {
            Self::Asteroids => "asteroids",
            Self::Breakout => "breakout",
            Self::HighwayHopper => "highway_hopper",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Asteroids => "Asteroids",
            Self::Breakout => "Breakout",
            Self::HighwayHopper => "Highway Hopper",
        }
    }

    pub fn name_style(self) -> NameStyle {
        match self {
            Self::Asteroids | Self::Breakout => NameStyle::Initials,
            Self::HighwayHopper => NameStyle::FullName,
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == value || kind.storage_prefix() == value)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Things that happened during one tick, in the order they happened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    ShotFired,
    ObstacleDestroyed { points: u32 },
    AlienDestroyed { points: u32 },
    PaddleHit,
    Hopped,
    PassengerRescued { points: u32 },
    PadFilled { col: i32, points: u32 },
    CountdownPulse { remaining: u32 },
    LifeLost { lives_left: u32 },
    LevelCleared { level: u32, bonus: u32 },
    /// Raised exactly once per run, on the tick lives reach zero.
    RunEnded { score: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Seconds left on a per-life timer, for games that have one.
    pub timer: Option<f32>,
    /// Remaining serve countdown pulses.
    pub countdown: Option<u32>,
}

/// Counters for a single run. Folded into lifetime statistics when the run
/// ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunStats {
    pub ticks: u64,
    pub shots: u32,
    pub hits: u32,
    pub obstacles_destroyed: u32,
    pub aliens_killed: u32,
    pub lives_lost: u32,
    pub levels_cleared: u32,
    pub hops: u32,
    pub pads_filled: u32,
    pub passengers: u32,
}

impl RunStats {
    /// Hit percentage, zero when nothing was fired.
    pub fn accuracy(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            100.0 * self.hits as f32 / self.shots as f32
        }
    }
}

/// Read-only view of a world for the render step.
#[derive(Clone, Copy)]
pub enum Scene<'a> {
    Asteroids(&'a AsteroidsWorld),
    Breakout(&'a BreakoutWorld),
    Hopper(&'a HopperWorld),
}

pub trait Simulation {
    fn kind(&self) -> GameKind;

    /// Advances one fixed tick, appending what happened to `events`. A
    /// finished run ignores further steps.
    fn step(&mut self, input: &InputState, events: &mut Vec<GameEvent>);

    /// Starts a fresh run at level 1.
    fn reset(&mut self, seed: u32);

    fn hud(&self) -> Hud;

    fn is_over(&self) -> bool;

    fn run_stats(&self) -> RunStats;

    fn scene(&self) -> Scene<'_>;

    fn validate(&self) -> Result<(), RuleCode>;
}

pub fn new_simulation(kind: GameKind, seed: u32) -> Box<dyn Simulation + Send> {
    match kind {
        GameKind::Asteroids => Box::new(AsteroidsWorld::new(seed)),
        GameKind::Breakout => Box::new(BreakoutWorld::new(seed)),
        GameKind::HighwayHopper => Box::new(HopperWorld::new(seed)),
    }
}
