//! # cursor-core
//!
//! Pure navigation logic for the mailbox cursor (no I/O, instant tests).
//!
//! This crate decides *what* a move through the mailbox must do without
//! performing any of it. The three-slot window, the move planner and the
//! probe recovery policy are plain data and functions.
//!
//! ## Design Philosophy
//!
//! Everything here is synchronous and side-effect free:
//! - The window is mutated only through [`CursorWindow::shift`] and
//!   [`CursorWindow::set_ahead`]
//! - [`CursorWindow::plan`] maps a window and a direction to a [`Step`]
//! - [`recover`] maps a raw probe result to a slot value
//!
//! The page fetches themselves are performed by `cursor-client`, which
//! interprets the steps produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod recovery;
pub mod state;
pub mod window;

pub use recovery::{recover, RefetchOutcome};
pub use state::EphemeralCursorState;
pub use window::{CursorWindow, Direction, Step};
