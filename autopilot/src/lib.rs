pub mod benchmark;
pub mod bots;
pub mod runner;
pub mod transport;
pub mod util;
