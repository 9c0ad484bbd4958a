use std::time::Duration;

use super::traits::{StepOutcome, Stepwise};
use crate::error::{ensure_in_range, Error, Result};

/// Slowest continuous-run speed (one unit per second).
pub const SPEED_MIN: u32 = 1;
/// Fastest continuous-run speed (ten units per second).
pub const SPEED_MAX: u32 = 10;

/// Lifecycle of a simulation run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimState {
    /// No progress yet; configuration and data may change freely.
    Idle,
    /// Continuous mode: ticks advance the kernel.
    Running,
    /// Progress exists but ticks are suspended.
    Paused,
    /// The kernel has no work left; restart via `toggle` or `reset`.
    Completed,
}

/// Immutable view of the simulation after a unit of work.
///
/// Carries everything the render collaborator needs to redraw without
/// touching the kernel: the controller status fields plus the kernel's
/// own frame.
#[derive(Clone, Debug)]
pub struct Snapshot<F> {
    /// Controller state at snapshot time.
    pub state: SimState,
    /// Units of work performed so far (point visitations or iterations).
    pub units: usize,
    /// Clusters discovered (or configured) so far.
    pub clusters: usize,
    /// Kernel-specific drawable state.
    pub frame: F,
}

/// Drives a [`Stepwise`] kernel: manual stepping, timed continuous runs,
/// and guarded reconfiguration.
///
/// The controller owns the kernel exclusively. All mutation happens
/// through it, which is what makes the illegal-state rules enforceable:
/// while [`SimState::Running`], both manual steps and configuration
/// changes are rejected rather than racing the tick source.
#[derive(Debug)]
pub struct Simulator<S> {
    kernel: S,
    state: SimState,
    speed: u32,
    last_step: Option<Duration>,
}

impl<S: Stepwise> Simulator<S> {
    /// Wrap a kernel. The simulation starts Idle at speed 1.
    pub fn new(kernel: S) -> Self {
        Self {
            kernel,
            state: SimState::Idle,
            speed: SPEED_MIN,
            last_step: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Continuous-run speed in units per second.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Shared access to the kernel, available in every state.
    pub fn kernel(&self) -> &S {
        &self.kernel
    }

    /// Mutable access to the kernel for reconfiguration and point
    /// placement. Rejected while Running; this is the single gate that
    /// keeps every kernel setter an illegal operation mid-run.
    pub fn kernel_mut(&mut self) -> Result<&mut S> {
        if self.state == SimState::Running {
            return Err(Error::Busy {
                operation: "reconfigure the kernel",
            });
        }
        Ok(&mut self.kernel)
    }

    /// Set the continuous-run speed. Rejected while Running.
    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        if self.state == SimState::Running {
            return Err(Error::Busy {
                operation: "change the speed",
            });
        }
        ensure_in_range("speed", f64::from(speed), f64::from(SPEED_MIN), f64::from(SPEED_MAX))?;
        self.speed = speed;
        Ok(())
    }

    /// Perform exactly one unit of work by hand.
    ///
    /// Rejected while Running (a scheduled tick would double-advance the
    /// same unit) and after completion. The first step of a run validates
    /// the configuration and moves the state to Paused.
    pub fn step(&mut self) -> Result<StepOutcome> {
        match self.state {
            SimState::Running => Err(Error::Busy { operation: "step" }),
            SimState::Completed => Err(Error::Finished),
            SimState::Idle | SimState::Paused => {
                if self.state == SimState::Idle {
                    self.kernel.validate()?;
                }
                let outcome = self.kernel.advance();
                self.state = match outcome {
                    StepOutcome::Advanced => SimState::Paused,
                    StepOutcome::Done => {
                        tracing::debug!(units = self.kernel.units_done(), "simulation completed");
                        SimState::Completed
                    }
                };
                Ok(outcome)
            }
        }
    }

    /// Enter continuous mode. No-op while already Running; rejected after
    /// completion (restart with [`Simulator::toggle`] or
    /// [`Simulator::reset`]).
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            SimState::Running => Ok(()),
            SimState::Completed => Err(Error::Finished),
            SimState::Idle | SimState::Paused => {
                if self.state == SimState::Idle {
                    self.kernel.validate()?;
                }
                self.state = SimState::Running;
                self.last_step = None;
                tracing::debug!(speed = self.speed, "simulation running");
                Ok(())
            }
        }
    }

    /// Leave continuous mode, preserving all progress. No-op unless
    /// Running.
    pub fn pause(&mut self) {
        if self.state == SimState::Running {
            self.state = SimState::Paused;
            tracing::debug!(units = self.kernel.units_done(), "simulation paused");
        }
    }

    /// The play/pause button: start if Idle or Paused, pause if Running,
    /// and rewind-then-start if the previous run completed.
    pub fn toggle(&mut self) -> Result<()> {
        match self.state {
            SimState::Running => {
                self.pause();
                Ok(())
            }
            SimState::Completed => {
                self.kernel.rewind();
                self.state = SimState::Idle;
                self.start()
            }
            SimState::Idle | SimState::Paused => self.start(),
        }
    }

    /// Discard all progress and draw a fresh data set, returning to Idle.
    /// Valid in every state; a tick already scheduled when this is called
    /// observes the state change and does nothing.
    pub fn reset(&mut self) {
        self.state = SimState::Idle;
        self.last_step = None;
        self.kernel.regenerate();
        tracing::debug!("simulation reset");
    }

    /// One firing of the host's timer or animation-frame source.
    ///
    /// `now` is a monotonic timestamp supplied by the host. At most one
    /// unit of work is performed per call, and only when at least
    /// `1000ms / speed` has elapsed since the previous unit. Returns
    /// whether the host should schedule another tick: `false` once the
    /// simulation is no longer Running, including the tick that performs
    /// the final unit.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.state != SimState::Running {
            return false;
        }

        let interval = Duration::from_millis(1000) / self.speed;
        if let Some(last) = self.last_step {
            if now.saturating_sub(last) < interval {
                return true;
            }
        }
        self.last_step = Some(now);

        match self.kernel.advance() {
            StepOutcome::Advanced => true,
            StepOutcome::Done => {
                self.state = SimState::Completed;
                tracing::debug!(units = self.kernel.units_done(), "simulation completed");
                false
            }
        }
    }

    /// Snapshot the controller status and kernel frame for rendering.
    pub fn snapshot(&self) -> Snapshot<S::Frame> {
        Snapshot {
            state: self.state,
            units: self.kernel.units_done(),
            clusters: self.kernel.clusters_found(),
            frame: self.kernel.frame(),
        }
    }
}
