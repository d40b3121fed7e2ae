/// Countdown advanced by the session clock. Dropping a timer cancels it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Timer {
    remaining_ms: f64,
    period_ms: Option<f64>,
}

impl Timer {
    pub const fn once(delay_ms: f64) -> Self {
        Self {
            remaining_ms: delay_ms,
            period_ms: None,
        }
    }

    pub const fn every(period_ms: f64) -> Self {
        Self {
            remaining_ms: period_ms,
            period_ms: Some(period_ms),
        }
    }

    pub const fn is_periodic(&self) -> bool {
        self.period_ms.is_some()
    }

    pub const fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }

    /// Returns `true` once the full delay has elapsed. Periodic timers rearm
    /// themselves, carrying over any overshoot.
    pub fn tick(&mut self, delta_ms: f64) -> bool {
        self.remaining_ms -= delta_ms;
        if self.remaining_ms > 0.0 {
            return false;
        }
        if let Some(period_ms) = self.period_ms {
            self.remaining_ms += period_ms.max(1.0);
        }
        true
    }
}

/// Ticks the timer in `slot`, clearing it when a one-shot fires.
pub fn tick_slot(slot: &mut Option<Timer>, delta_ms: f64) -> bool {
    let Some(timer) = slot else {
        return false;
    };
    let fired = timer.tick(delta_ms);
    if fired && !timer.is_periodic() {
        *slot = None;
    }
    fired
}

/// Every pending timer a session owns. At most one of each kind exists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timers {
    /// Chase/scatter toggle, only runs while playing.
    pub cycle: Option<Timer>,
    pub power: Option<Timer>,
    pub level_advance: Option<Timer>,
    pub death_reset: Option<Timer>,
}

impl Timers {
    pub fn cancel_all(&mut self) {
        *self = Self::default();
    }

    pub fn start_cycle(&mut self, period_ms: f64) {
        if self.cycle.is_none() {
            self.cycle = Some(Timer::every(period_ms));
        }
    }

    pub fn cancel_cycle(&mut self) {
        self.cycle = None;
    }
}
