//! Built-in game variants

pub mod common;
pub mod tumble;
pub mod ways;

pub use common::{Board, Scratch, StepsOutcome, play_steps};
pub use tumble::{TumbleCheckpoint, TumbleExt, TumbleFixed, TumbleGame};
pub use ways::{WaysFixed, WaysGame};
