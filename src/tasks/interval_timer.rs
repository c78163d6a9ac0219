//! Pausable interval timer background task
//!
//! A general-purpose periodic callback mechanism supporting pause,
//! resume, and live period changes, independent of clock semantics.
//! Every operation is a state-guarded no-op when misapplied; callers
//! may pause and resume in any order without errors.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Timer lifecycle phase.
///
/// `ResumePending` covers the one-shot wait between `resume()` and the
/// next firing; the phase guard keeps a stale one-shot from racing a
/// fresh periodic arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerPhase {
    Idle,
    Running,
    Paused,
    ResumePending,
}

/// Timer state machine with the clock injected through `now` arguments,
/// so transitions are testable without sleeping.
#[derive(Debug)]
pub(crate) struct TimerCore {
    phase: TimerPhase,
    period: Duration,
    last_start: Instant,
    remaining: Duration,
    resume_at: Instant,
}

impl TimerCore {
    pub(crate) fn new(period: Duration, now: Instant) -> Self {
        Self {
            phase: TimerPhase::Idle,
            period,
            last_start: now,
            remaining: Duration::ZERO,
            resume_at: now,
        }
    }

    pub(crate) fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Begin periodic firing. The first fire is one full period out,
    /// never immediate.
    pub(crate) fn start(&mut self, now: Instant) {
        if self.phase != TimerPhase::Idle {
            return;
        }
        self.last_start = now;
        self.phase = TimerPhase::Running;
    }

    /// Stop firing and remember the time left until the next fire.
    /// No-op unless running, so a second pause cannot clobber the
    /// remembered remainder.
    pub(crate) fn pause(&mut self, now: Instant) {
        if self.phase != TimerPhase::Running {
            return;
        }
        self.remaining = self
            .period
            .saturating_sub(now.duration_since(self.last_start));
        self.phase = TimerPhase::Paused;
    }

    /// Arm a one-shot wait for the remembered remainder. No-op unless
    /// paused.
    pub(crate) fn resume(&mut self, now: Instant) {
        if self.phase != TimerPhase::Paused {
            return;
        }
        self.resume_at = now + self.remaining;
        self.phase = TimerPhase::ResumePending;
    }

    /// The one-shot fire at the end of a resume. Returns whether the
    /// callback should be invoked; a stale one-shot in any other phase
    /// is swallowed.
    pub(crate) fn fire_one_shot(&mut self, now: Instant) -> bool {
        if self.phase != TimerPhase::ResumePending {
            return false;
        }
        self.last_start = now;
        self.phase = TimerPhase::Running;
        true
    }

    /// A periodic fire. Returns whether the callback should be invoked.
    pub(crate) fn fire_periodic(&mut self, now: Instant) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.last_start = now;
        true
    }

    /// Change the period, then literally pause and resume to re-arm
    /// under the new period. The pause/resume state guards apply as-is:
    /// while running this re-times the next fire against the new
    /// period; while paused the pause is swallowed and the resume
    /// re-arms with the stale remainder.
    pub(crate) fn set_period(&mut self, period: Duration, now: Instant) {
        self.period = period;
        self.pause(now);
        self.resume(now);
    }

    /// When the driver should next wake up, if at all
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            TimerPhase::Running => Some(self.last_start + self.period),
            TimerPhase::ResumePending => Some(self.resume_at),
            TimerPhase::Idle | TimerPhase::Paused => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// Control commands delivered to the driver task
#[derive(Debug)]
enum TimerCommand {
    Pause,
    Resume,
    SetPeriod(Duration),
}

/// Handle to a running interval timer.
///
/// Dropping the handle closes the command channel and stops the driver
/// task; there is no other hard-stop, pausing indefinitely is the
/// closest equivalent.
#[derive(Debug)]
pub struct IntervalTimer {
    cmd_tx: mpsc::UnboundedSender<TimerCommand>,
}

impl IntervalTimer {
    /// Spawn the driver task and begin firing `callback` every
    /// `period`. Must be called within a tokio runtime.
    pub fn start<F>(mut callback: F, period: Duration) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut core = TimerCore::new(period, Instant::now());
            core.start(Instant::now());
            debug!("Interval timer started with period {:?}", period);

            loop {
                match core.next_deadline() {
                    Some(deadline) => {
                        tokio::select! {
                            _ = sleep_until(deadline) => {
                                let now = Instant::now();
                                let fired = if core.phase() == TimerPhase::ResumePending {
                                    core.fire_one_shot(now)
                                } else {
                                    core.fire_periodic(now)
                                };
                                if fired {
                                    callback();
                                }
                            }
                            cmd = cmd_rx.recv() => match cmd {
                                Some(cmd) => apply_command(&mut core, cmd),
                                None => break,
                            }
                        }
                    }
                    // Nothing armed, wait for the next command
                    None => match cmd_rx.recv().await {
                        Some(cmd) => apply_command(&mut core, cmd),
                        None => break,
                    },
                }
            }

            debug!("Interval timer task stopped");
        });

        Self { cmd_tx }
    }

    /// Stop firing, remembering the time left until the next fire
    pub fn pause(&self) {
        self.send(TimerCommand::Pause);
    }

    /// Wait out the remembered remainder once, then fire periodically
    pub fn resume(&self) {
        self.send(TimerCommand::Resume);
    }

    /// Change the firing period at runtime
    pub fn set_period(&self, period: Duration) {
        self.send(TimerCommand::SetPeriod(period));
    }

    fn send(&self, cmd: TimerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("Interval timer task is no longer running");
        }
    }
}

fn apply_command(core: &mut TimerCore, cmd: TimerCommand) {
    let now = Instant::now();
    match cmd {
        TimerCommand::Pause => core.pause(now),
        TimerCommand::Resume => core.resume(now),
        TimerCommand::SetPeriod(period) => core.set_period(period, now),
    }
}
