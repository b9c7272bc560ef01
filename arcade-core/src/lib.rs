pub mod driver;
pub mod error;
pub mod geometry;
pub mod highscores;
pub mod input;
pub mod leaderboard;
pub mod rng;
pub mod session;
pub mod sim;
pub mod storage;
pub mod submit;

pub use driver::GameDriver;
pub use error::{RuleCode, StorageError, SubmitError, TransportError};
pub use input::{InputState, Key};
pub use session::{GameSession, Renderer};
pub use sim::{GameEvent, GameKind, Hud, RunStats, Scene, Simulation};
