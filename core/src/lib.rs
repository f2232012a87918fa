//! Board model and game state machine for a minesweeper-style puzzle.
//!
//! Everything here is pure and in-memory: hosts inject a [`Clock`] and a [`BoardGenerator`]
//! (which owns the RNG), then drive a [`GameSession`] with board coordinates.
#![no_std]

extern crate alloc;

pub use board::*;
pub use cell::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use records::*;
pub use reveal::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod clock;
mod config;
mod error;
mod game;
mod generator;
mod records;
mod reveal;
mod session;
mod types;
