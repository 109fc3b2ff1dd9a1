use std::time::{Duration, Instant};

pub const DEFAULT_TYPING_IDLE: Duration = Duration::from_millis(2_000);

/// Debounces local keystrokes into typing on/off signals.
///
/// Every method returns the flag to send to the server, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSignal {
    idle_after: Duration,
    last_keystroke: Option<Instant>,
}

impl Default for TypingSignal {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_IDLE)
    }
}

impl TypingSignal {
    pub fn new(idle_after: Duration) -> Self {
        Self {
            idle_after,
            last_keystroke: None,
        }
    }

    pub fn idle_after(&self) -> Duration {
        self.idle_after
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_active(&self) -> bool {
        self.last_keystroke.is_some()
    }

    /// Only the first keystroke of a burst produces `true`.
    pub fn on_keystroke(&mut self, now: Instant) -> Option<bool> {
        let started = self.last_keystroke.is_none();
        self.last_keystroke = Some(now);
        started.then_some(true)
    }

    /// Produces `false` once the idle period has passed since the last keystroke.
    pub fn poll(&mut self, now: Instant) -> Option<bool> {
        let last = self.last_keystroke?;
        if now.saturating_duration_since(last) < self.idle_after {
            return None;
        }

        self.last_keystroke = None;
        Some(false)
    }

    /// Ends an active burst immediately.
    pub fn stop(&mut self) -> Option<bool> {
        self.last_keystroke.take().map(|_| false)
    }
}
