//! Simulated time-of-day state

use chrono::{Local, NaiveDateTime, TimeDelta};
use tracing::trace;

/// Simulated clock state advanced by the tick callback.
///
/// `tick_count` counts ticks since construction and is only consulted
/// for the low-battery oscillation parity.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockState {
    pub time: NaiveDateTime,
    pub tick_count: u64,
}

impl ClockState {
    /// Create a clock state starting at the given date, or now
    pub fn new(start: Option<NaiveDateTime>) -> Self {
        Self {
            time: start.unwrap_or_else(|| Local::now().naive_local()),
            tick_count: 0,
        }
    }

    /// Advance the simulated time by one tick.
    ///
    /// Normal mode steps +1 second, countdown steps -1 second.
    /// Low-battery mode ignores countdown and alternates +1/-1 starting
    /// with +1 on tick 0.
    pub fn advance(&mut self, countdown: bool, low_battery: bool) {
        let step = if low_battery {
            if self.tick_count % 2 == 0 {
                1
            } else {
                -1
            }
        } else if countdown {
            -1
        } else {
            1
        };

        // Out-of-range dates keep the previous time rather than panic
        if let Some(next) = self.time.checked_add_signed(TimeDelta::seconds(step)) {
            self.time = next;
        }
        self.tick_count += 1;
        trace!("tick {}: simulated time {}", self.tick_count, self.time);
    }

    /// Reset the simulated time without touching the tick counter
    pub fn set_time(&mut self, time: NaiveDateTime) {
        self.time = time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(3, 24, 0)
            .unwrap()
    }

    fn seconds_of(state: &ClockState) -> u32 {
        use chrono::Timelike;
        state.time.second()
    }

    #[test]
    fn normal_mode_increases_by_one_second() {
        let mut state = ClockState::new(Some(start()));
        for expected in 1..=5 {
            state.advance(false, false);
            assert_eq!(seconds_of(&state), expected);
        }
        assert_eq!(state.tick_count, 5);
    }

    #[test]
    fn countdown_mode_decreases_by_one_second() {
        let mut state = ClockState::new(Some(start()));
        state.advance(true, false);
        assert_eq!(state.time, start() - TimeDelta::seconds(1));
        state.advance(true, false);
        assert_eq!(state.time, start() - TimeDelta::seconds(2));
    }

    #[test]
    fn low_battery_oscillates_starting_forward() {
        let mut state = ClockState::new(Some(start()));

        state.advance(false, true);
        assert_eq!(state.time, start() + TimeDelta::seconds(1));
        state.advance(false, true);
        assert_eq!(state.time, start());
        state.advance(false, true);
        assert_eq!(state.time, start() + TimeDelta::seconds(1));
    }

    #[test]
    fn low_battery_ignores_countdown() {
        let mut state = ClockState::new(Some(start()));
        state.advance(true, true);
        assert_eq!(state.time, start() + TimeDelta::seconds(1));
    }

    #[test]
    fn minute_wraps_forward() {
        let late = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(3, 24, 59)
            .unwrap();
        let mut state = ClockState::new(Some(late));
        state.advance(false, false);
        assert_eq!(seconds_of(&state), 0);
        use chrono::Timelike;
        assert_eq!(state.time.minute(), 25);
    }

    #[test]
    fn set_time_keeps_tick_count() {
        let mut state = ClockState::new(Some(start()));
        state.advance(false, false);
        state.set_time(start());
        assert_eq!(state.time, start());
        assert_eq!(state.tick_count, 1);
    }
}
