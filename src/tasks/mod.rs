//! Background task module
//!
//! This module contains the pausable interval timer that drives the
//! widget animation.

pub mod interval_timer;

// Re-export main types
pub use interval_timer::IntervalTimer;
