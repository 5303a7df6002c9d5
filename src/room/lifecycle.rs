//! Room lifecycle: countdown ticks and the one-shot disposal sequence.
//!
//! STATES
//! ======
//! Active (countdown > 0) → Locked (countdown == 0) → Grace (disposal timer
//! armed) → Terminated (disposal ran).
//!
//! The tick that brings the countdown to zero arms the grace timer in the
//! same step, so teardown lands exactly `grace` ticks after drawing closes.
//! A room created with no countdown stays Locked until its first tick.
//! Arming and termination are both guarded by flags and happen at most once.

use serde::Serialize;

use super::state::RoomState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Active,
    Locked,
    Grace,
    Terminated,
}

/// What a single tick changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The countdown was decremented.
    pub counted: bool,
    /// The grace timer must be scheduled now.
    pub arm_grace: bool,
}

#[derive(Debug, Default)]
pub struct Lifecycle {
    grace_armed: bool,
    terminated: bool,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one time unit.
    pub fn tick(&mut self, state: &mut RoomState) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.terminated {
            return outcome;
        }
        if state.countdown > 0 {
            state.countdown -= 1;
            outcome.counted = true;
        }
        if state.countdown == 0 && !self.grace_armed {
            self.grace_armed = true;
            outcome.arm_grace = true;
        }
        outcome
    }

    /// Mark the room terminated. Returns `true` only the first time, so the
    /// caller runs disposal exactly once.
    pub fn terminate(&mut self) -> bool {
        !std::mem::replace(&mut self.terminated, true)
    }

    #[must_use]
    pub fn phase(&self, state: &RoomState) -> Phase {
        if self.terminated {
            Phase::Terminated
        } else if self.grace_armed {
            Phase::Grace
        } else if state.countdown == 0 {
            Phase::Locked
        } else {
            Phase::Active
        }
    }
}
