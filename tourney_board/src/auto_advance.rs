use std::time::{Duration, Instant};

/// Debounce for moving on to the gameplay screen after a pick.
///
/// Every pick restarts the countdown. The caller supplies the current time,
/// nothing here sleeps or spawns.
#[derive(Clone, Debug)]
pub struct AutoAdvance {
    delay: Duration,
    deadline: Option<Instant>,
}

impl AutoAdvance {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels a pending countdown and starts a new one.
    pub fn reschedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once the countdown has run out, and clears it.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
