use core::time::Duration;
use std::time::Instant;

/// Throttle state: either ready to run or inside a cool-down window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleState {
    Idle,
    CoolingDown { since: Instant },
}

/// Leading-edge throttle for event handlers.
///
/// The first call runs immediately and opens a window; calls inside the
/// window are dropped, never replayed. The first call after the window runs
/// immediately again.
#[derive(Clone, Debug)]
pub struct Throttle {
    window: Duration,
    state: ThrottleState,
    /// Number of calls dropped inside a window.
    dropped: u64,
}

impl Throttle {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            state: ThrottleState::Idle,
            dropped: 0,
        }
    }

    /// Return the configured window.
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Returns true if the call may run now.
    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    /// Same as [`Throttle::allow`] with an explicit clock reading.
    pub fn allow_at(&mut self, now: Instant) -> bool {
        self.settle(now);
        match self.state {
            ThrottleState::Idle => {
                self.state = ThrottleState::CoolingDown { since: now };
                true
            }
            ThrottleState::CoolingDown { .. } => {
                self.dropped = self.dropped.saturating_add(1);
                false
            }
        }
    }

    /// State as observed at `now`.
    pub fn state_at(&mut self, now: Instant) -> ThrottleState {
        self.settle(now);
        self.state
    }

    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    fn settle(&mut self, now: Instant) {
        if let ThrottleState::CoolingDown { since } = self.state {
            if now.saturating_duration_since(since) >= self.window {
                self.state = ThrottleState::Idle;
            }
        }
    }
}
