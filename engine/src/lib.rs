//! Tennis match engine library.
//!
//! Ball flight, rally refereeing, AI opponents and the frame loop that ties
//! them together. Exposed for the binaries and integration tests.

pub mod ai;
pub mod ball;
pub mod config;
pub mod court;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod player;
pub mod rally;
pub mod scoreboard;
pub mod shot;
pub mod stamina;
pub mod state;
pub mod trajectory;

pub use error::{EngineError, Result};
