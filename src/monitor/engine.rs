//! `MonitorEngine`: owns every registered [`Monitor`] for one iteration and
//! funnels events to them, tracking hot-state temperature for liveness.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::event::EventObject;
use crate::monitor::traits::Monitor;
use crate::monitor::types::{
    LivenessViolation, MonitorViolation, SafetyViolation, StateTemperature,
};
use crate::util::MonitorId;

struct MonitorSlot {
    monitor: Mutex<Box<dyn Monitor>>,
    hot_threshold: u64,
    hot_streak: AtomicU64,
}

/// Registry and dispatcher for every monitor active in the current
/// iteration.
///
/// Duplicate registration under the same name is tolerated: the new monitor
/// simply gets its own id and runs independently (see DESIGN.md).
pub struct MonitorEngine {
    slots: DashMap<MonitorId, MonitorSlot>,
}

impl MonitorEngine {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Registers a monitor with a liveness threshold: the number of
    /// consecutive fair steps it may stay in a hot state before the run is
    /// declared a liveness bug.
    pub fn register(&self, monitor: Box<dyn Monitor>, hot_threshold: u64) -> MonitorId {
        let id = MonitorId::new();
        self.slots.insert(
            id,
            MonitorSlot {
                monitor: Mutex::new(monitor),
                hot_threshold,
                hot_streak: AtomicU64::new(0),
            },
        );
        id
    }

    /// True if no monitors are registered (nothing to check).
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Delivers an event to every registered monitor. Returns the first
    /// safety violation raised, if any. A monitor that cools off as a
    /// direct result of this event has its hot-streak reset immediately;
    /// the streak is otherwise only ever advanced by `advance_hot_streaks`,
    /// once per fair step, so a monitor that stays hot without receiving any
    /// further events still accumulates time against its threshold.
    pub fn notify_event(&self, event: &dyn EventObject) -> Option<MonitorViolation> {
        let mut violation = None;
        for entry in self.slots.iter() {
            let id = *entry.key();
            let slot = entry.value();
            let mut monitor = slot.monitor.lock();
            if let Err(message) = monitor.on_event(event) {
                if violation.is_none() {
                    violation = Some(MonitorViolation::Safety(SafetyViolation {
                        monitor: id,
                        monitor_name: monitor.name(),
                        message,
                    }));
                }
                continue;
            }
            if !matches!(monitor.temperature(monitor.current_state()), StateTemperature::Hot) {
                slot.hot_streak.store(0, Ordering::SeqCst);
            }
        }
        violation
    }

    /// Advances every currently-hot monitor's streak by one fair step,
    /// independent of whether it was handed an event this step. This is what
    /// makes a monitor that goes hot and then simply stops hearing about
    /// anything (e.g. a periodic timer that gets stopped) still overstay its
    /// threshold instead of freezing at whatever streak it last had.
    pub fn advance_hot_streaks(&self) {
        for entry in self.slots.iter() {
            let slot = entry.value();
            let monitor = slot.monitor.lock();
            if matches!(monitor.temperature(monitor.current_state()), StateTemperature::Hot) {
                slot.hot_streak.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Called at each fair-cycle boundary:
    /// checks whether any monitor has overstayed its hot-state threshold.
    pub fn check_liveness(&self) -> Option<LivenessViolation> {
        for entry in self.slots.iter() {
            let id = *entry.key();
            let slot = entry.value();
            let hot_steps = slot.hot_streak.load(Ordering::SeqCst);
            if hot_steps > slot.hot_threshold {
                let monitor = slot.monitor.lock();
                return Some(LivenessViolation {
                    monitor: id,
                    monitor_name: monitor.name(),
                    state: monitor.current_state(),
                    hot_steps,
                    threshold: slot.hot_threshold,
                });
            }
        }
        None
    }

    /// Called once, at the very end of an iteration: any monitor still in a
    /// hot state is a liveness violation regardless of whether its streak
    /// ever crossed the configured threshold. A run that ends mid-promise
    /// never gets another fair step to redeem it.
    pub fn check_hot_at_finish(&self) -> Option<LivenessViolation> {
        for entry in self.slots.iter() {
            let id = *entry.key();
            let slot = entry.value();
            let monitor = slot.monitor.lock();
            if matches!(monitor.temperature(monitor.current_state()), StateTemperature::Hot) {
                return Some(LivenessViolation {
                    monitor: id,
                    monitor_name: monitor.name(),
                    state: monitor.current_state(),
                    hot_steps: slot.hot_streak.load(Ordering::SeqCst),
                    threshold: slot.hot_threshold,
                });
            }
        }
        None
    }
}

impl Default for MonitorEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Halt;

    struct FlipFlop {
        state: &'static str,
    }

    impl Monitor for FlipFlop {
        fn name(&self) -> &'static str {
            "FlipFlop"
        }

        fn current_state(&self) -> &'static str {
            self.state
        }

        fn temperature(&self, state: &'static str) -> StateTemperature {
            match state {
                "hot" => StateTemperature::Hot,
                "cold" => StateTemperature::Cold,
                _ => StateTemperature::Neutral,
            }
        }

        fn on_event(&mut self, _event: &dyn EventObject) -> Result<(), String> {
            self.state = "hot";
            Ok(())
        }
    }

    struct Picky;

    impl Monitor for Picky {
        fn name(&self) -> &'static str {
            "Picky"
        }

        fn current_state(&self) -> &'static str {
            "watching"
        }

        fn on_event(&mut self, _event: &dyn EventObject) -> Result<(), String> {
            Err("saw something it shouldn't have".to_string())
        }
    }

    #[test]
    fn stays_hot_past_threshold_raises_liveness_violation() {
        let engine = MonitorEngine::new();
        engine.register(Box::new(FlipFlop { state: "cold" }), 2);

        engine.notify_event(&Halt);
        for _ in 0..4 {
            engine.advance_hot_streaks();
        }

        let violation = engine.check_liveness();
        assert!(violation.is_some());
    }

    #[test]
    fn hot_monitor_with_no_further_events_is_caught_at_finish() {
        let engine = MonitorEngine::new();
        engine.register(Box::new(FlipFlop { state: "cold" }), 100);

        engine.notify_event(&Halt);

        assert!(engine.check_liveness().is_none());
        assert!(engine.check_hot_at_finish().is_some());
    }

    #[test]
    fn safety_violation_surfaces_from_notify() {
        let engine = MonitorEngine::new();
        engine.register(Box::new(Picky), 100);

        let violation = engine.notify_event(&Halt);
        assert!(matches!(violation, Some(MonitorViolation::Safety(_))));
    }
}
