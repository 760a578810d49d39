//! Run state and ignore-once flag shared between the monitor thread and
//! whoever controls it.
//!
//! One mutex guards the whole state; one condition variable wakes the
//! monitor thread out of its interval sleep or its paused wait. Every
//! wait re-checks its predicate after waking, so a `resume()` that lands
//! before the thread starts waiting is never lost.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Monitor run state. `Exited` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Exited,
}

#[derive(Debug)]
struct ControlState {
    run_state: RunState,
    /// Skip the next detected change without notifying.
    ignore_next: bool,
    /// The monitor thread is blocked in [`Control::wait_while_paused`].
    parked: bool,
    /// Running → Paused transitions so far.
    pauses: u64,
}

/// Pause count observed before a clipboard read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch(u64);

#[derive(Debug)]
pub struct Control {
    state: Mutex<ControlState>,
    wake: Condvar,
}

impl Default for Control {
    fn default() -> Self {
        Self::new()
    }
}

impl Control {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ControlState {
                run_state: RunState::Running,
                ignore_next: false,
                parked: false,
                pauses: 0,
            }),
            wake: Condvar::new(),
        }
    }

    /// Running → Paused. Idempotent; no-op once exited.
    pub fn pause(&self) {
        let mut state = self.state.lock();
        match state.run_state {
            RunState::Running => {
                state.run_state = RunState::Paused;
                state.pauses += 1;
                tracing::debug!("monitor paused");
            }
            RunState::Paused => {}
            RunState::Exited => tracing::debug!("pause ignored, monitor exited"),
        }
    }

    /// Paused → Running, waking a parked monitor thread. Idempotent;
    /// no-op once exited.
    pub fn resume(&self) {
        let mut state = self.state.lock();
        match state.run_state {
            RunState::Paused => {
                state.run_state = RunState::Running;
                self.wake.notify_all();
                tracing::debug!("monitor resumed");
            }
            RunState::Running => {}
            RunState::Exited => tracing::debug!("resume ignored, monitor exited"),
        }
    }

    /// Any state → Exited. Idempotent.
    pub fn request_exit(&self) {
        let mut state = self.state.lock();
        if state.run_state != RunState::Exited {
            state.run_state = RunState::Exited;
            self.wake.notify_all();
            tracing::debug!("monitor exit requested");
        }
    }

    /// `true` resumes, `false` pauses.
    pub fn set_run(&self, run: bool) {
        if run {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Arm the ignore-once flag. Arming twice before a change is the
    /// same as arming once.
    pub fn arm_ignore(&self) {
        self.state.lock().ignore_next = true;
    }

    /// Mark the start of a read. Pass the result to [`settle`](Self::settle).
    pub fn epoch(&self) -> Epoch {
        Epoch(self.state.lock().pauses)
    }

    /// Run `f` on the ignore-once flag if the monitor is running and has
    /// not been paused since `since`. Returns `None` otherwise.
    ///
    /// The run-state check and `f` share one lock acquisition, so a
    /// pause/resume cycle cannot slip between them.
    pub fn settle<R>(&self, since: Epoch, f: impl FnOnce(&mut bool) -> R) -> Option<R> {
        let mut state = self.state.lock();
        if state.run_state != RunState::Running || state.pauses != since.0 {
            return None;
        }
        Some(f(&mut state.ignore_next))
    }

    pub fn ignore_pending(&self) -> bool {
        self.state.lock().ignore_next
    }

    pub fn run_state(&self) -> RunState {
        self.state.lock().run_state
    }

    pub fn is_parked(&self) -> bool {
        self.state.lock().parked
    }

    /// Sleep for `interval`, returning early only if exit is requested.
    /// Returns the run state at wake-up.
    pub fn sleep(&self, interval: Duration) -> RunState {
        let deadline = Instant::now() + interval;
        let mut state = self.state.lock();
        while state.run_state != RunState::Exited {
            if self.wake.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        state.run_state
    }

    /// Block while paused. Returns `Running` or `Exited`.
    pub fn wait_while_paused(&self) -> RunState {
        let mut state = self.state.lock();
        if state.run_state == RunState::Paused {
            state.parked = true;
            tracing::debug!("monitor parked");
            while state.run_state == RunState::Paused {
                self.wake.wait(&mut state);
            }
            state.parked = false;
        }
        state.run_state
    }
}
