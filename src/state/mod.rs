//! State management module
//!
//! This module contains the simulated time-of-day state that the
//! scheduler callback advances on every tick.

pub mod clock_state;

// Re-export main types
pub use clock_state::ClockState;
