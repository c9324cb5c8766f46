use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Startup readiness of the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    /// Waiting for the surface; `attempts` polls have been made so far.
    Waiting { attempts: u32 },
    Ready,
    GaveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessOutcome {
    Ready,
    StillWaiting,
    GaveUp,
}

/// Work that became due on a `take_due` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DueWork {
    /// A debounced text change elapsed.
    pub apply_filters: bool,
    /// A deferred tab-switch reapply elapsed.
    pub reapply: bool,
    /// The surface should be polled for readiness.
    pub poll_readiness: bool,
}

/// Host-clocked timers for the engine's three deferred behaviors.
///
/// Time is a monotonic offset supplied by the host on every call, which keeps
/// the timers deterministic under test.
#[derive(Debug, Clone)]
pub struct FilterScheduler {
    text_debounce: Duration,
    tab_switch_delay: Duration,
    ready_poll_interval: Duration,
    ready_max_attempts: u32,
    text_deadline: Option<Duration>,
    /// Text controls with input waiting on the shared debounce deadline.
    text_controls: Vec<String>,
    tab_deadline: Option<Duration>,
    next_poll: Option<Duration>,
    readiness: Readiness,
}

impl FilterScheduler {
    #[must_use]
    pub fn new(
        text_debounce: Duration,
        tab_switch_delay: Duration,
        ready_poll_interval: Duration,
        ready_max_attempts: u32,
    ) -> Self {
        Self {
            text_debounce,
            tab_switch_delay,
            ready_poll_interval,
            ready_max_attempts,
            text_deadline: None,
            text_controls: Vec::new(),
            tab_deadline: None,
            next_poll: None,
            readiness: Readiness::Waiting { attempts: 0 },
        }
    }

    #[must_use]
    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    /// Restarts the text debounce window for input on control `id`.
    ///
    /// All text controls share one deadline; any keystroke pushes it back.
    pub fn schedule_text(&mut self, id: &str, now: Duration) {
        if !self.text_controls.iter().any(|pending| pending == id) {
            self.text_controls.push(id.to_owned());
        }
        self.text_deadline = Some(now + self.text_debounce);
    }

    /// Drops control `id` from the pending debounce. The deadline is cleared
    /// once no text control is waiting on it.
    pub fn cancel_text(&mut self, id: &str) {
        self.text_controls.retain(|pending| pending != id);
        if self.text_controls.is_empty() {
            self.text_deadline = None;
        }
    }

    #[must_use]
    pub fn text_pending(&self) -> bool {
        self.text_deadline.is_some()
    }

    /// Text controls whose input is still waiting on the debounce.
    #[must_use]
    pub fn pending_text_controls(&self) -> &[String] {
        &self.text_controls
    }

    pub fn schedule_tab_reapply(&mut self, now: Duration) {
        self.tab_deadline = Some(now + self.tab_switch_delay);
    }

    /// Starts bounded readiness polling unless already resolved.
    pub fn begin_waiting(&mut self, now: Duration) {
        if matches!(self.readiness, Readiness::Waiting { .. }) && self.next_poll.is_none() {
            self.next_poll = Some(now + self.ready_poll_interval);
        }
    }

    pub fn mark_ready(&mut self) {
        self.readiness = Readiness::Ready;
        self.next_poll = None;
    }

    /// Records one readiness poll result.
    pub fn record_poll(&mut self, ready: bool, now: Duration) -> ReadinessOutcome {
        if ready {
            self.mark_ready();
            return ReadinessOutcome::Ready;
        }
        let Readiness::Waiting { attempts } = self.readiness else {
            return ReadinessOutcome::GaveUp;
        };
        let attempts = attempts + 1;
        if attempts >= self.ready_max_attempts {
            self.readiness = Readiness::GaveUp;
            self.next_poll = None;
            return ReadinessOutcome::GaveUp;
        }
        self.readiness = Readiness::Waiting { attempts };
        self.next_poll = Some(now + self.ready_poll_interval);
        ReadinessOutcome::StillWaiting
    }

    /// Pops every timer whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Duration) -> DueWork {
        let mut due = DueWork::default();
        if self.text_deadline.is_some_and(|deadline| deadline <= now) {
            self.text_deadline = None;
            self.text_controls.clear();
            due.apply_filters = true;
        }
        if self.tab_deadline.is_some_and(|deadline| deadline <= now) {
            self.tab_deadline = None;
            due.reapply = true;
        }
        if self.next_poll.is_some_and(|deadline| deadline <= now) {
            self.next_poll = None;
            due.poll_readiness = true;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> FilterScheduler {
        FilterScheduler::new(
            Duration::from_millis(300),
            Duration::from_millis(100),
            Duration::from_millis(50),
            3,
        )
    }

    #[test]
    fn text_debounce_restarts_on_each_keystroke() {
        let mut scheduler = scheduler();
        scheduler.schedule_text("search", Duration::from_millis(0));
        scheduler.schedule_text("search", Duration::from_millis(200));
        assert!(!scheduler.take_due(Duration::from_millis(300)).apply_filters);
        assert!(scheduler.take_due(Duration::from_millis(500)).apply_filters);
        assert!(!scheduler.take_due(Duration::from_millis(900)).apply_filters);
    }

    #[test]
    fn cancelling_one_text_control_keeps_the_others_pending() {
        let mut scheduler = scheduler();
        scheduler.schedule_text("search", Duration::ZERO);
        scheduler.schedule_text("region", Duration::from_millis(100));

        scheduler.cancel_text("search");
        assert!(scheduler.text_pending());
        assert_eq!(scheduler.pending_text_controls(), ["region".to_owned()]);
        assert!(scheduler.take_due(Duration::from_millis(400)).apply_filters);

        scheduler.schedule_text("search", Duration::from_millis(500));
        scheduler.cancel_text("search");
        assert!(!scheduler.text_pending());
        assert!(!scheduler.take_due(Duration::from_millis(900)).apply_filters);
    }

    #[test]
    fn readiness_polling_is_bounded() {
        let mut scheduler = scheduler();
        scheduler.begin_waiting(Duration::ZERO);
        let mut now = Duration::ZERO;
        let mut outcomes = Vec::new();
        for _ in 0..5 {
            now += Duration::from_millis(50);
            if scheduler.take_due(now).poll_readiness {
                outcomes.push(scheduler.record_poll(false, now));
            }
        }
        assert_eq!(
            outcomes,
            [
                ReadinessOutcome::StillWaiting,
                ReadinessOutcome::StillWaiting,
                ReadinessOutcome::GaveUp
            ]
        );
        assert_eq!(scheduler.readiness(), Readiness::GaveUp);
    }
}
