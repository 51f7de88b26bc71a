//! Per-second countdown that blocks new recognition requests.

use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownState {
    Idle,
    Counting { remaining_seconds: u32 },
}

/// Observable change reported by [`CooldownTimer::poll_at`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownEvent {
    Tick { remaining_seconds: u32 },
    Expired,
}

/// Single countdown instance; starting again restarts the window.
#[derive(Clone, Debug)]
pub struct CooldownTimer {
    state: CooldownState,
    next_tick: Option<Instant>,
}

impl CooldownTimer {
    pub fn new() -> Self {
        Self {
            state: CooldownState::Idle,
            next_tick: None,
        }
    }

    pub fn state(&self) -> CooldownState {
        self.state
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self.state, CooldownState::Counting { .. })
    }

    pub fn remaining_seconds(&self) -> u32 {
        match self.state {
            CooldownState::Idle => 0,
            CooldownState::Counting { remaining_seconds } => remaining_seconds,
        }
    }

    /// Start (or restart) a countdown of `window_seconds`.
    ///
    /// Any countdown in progress is replaced, never extended. A zero window
    /// leaves the timer idle.
    pub fn start_at(&mut self, window_seconds: u32, now: Instant) {
        if window_seconds == 0 {
            self.cancel();
            return;
        }
        self.state = CooldownState::Counting {
            remaining_seconds: window_seconds,
        };
        self.next_tick = Some(now + TICK);
    }

    pub fn cancel(&mut self) {
        self.state = CooldownState::Idle;
        self.next_tick = None;
    }

    /// Advance the countdown to `now`, catching up on any missed seconds.
    pub fn poll_at(&mut self, now: Instant) -> Option<CooldownEvent> {
        let mut event = None;
        while let (Some(due), CooldownState::Counting { remaining_seconds }) =
            (self.next_tick, self.state)
        {
            if due > now {
                break;
            }
            let remaining_seconds = remaining_seconds.saturating_sub(1);
            if remaining_seconds == 0 {
                self.cancel();
                return Some(CooldownEvent::Expired);
            }
            self.state = CooldownState::Counting { remaining_seconds };
            self.next_tick = Some(due + TICK);
            event = Some(CooldownEvent::Tick { remaining_seconds });
        }
        event
    }
}

impl Default for CooldownTimer {
    fn default() -> Self {
        Self::new()
    }
}
