// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Main-controller election: at most one instance receives environment-wide
// events (incoming URLs, hardware buttons) at any time.

use tracing::{debug, info};

use stellwerk_core::error::{Result, StellwerkError};
use stellwerk_core::types::InstanceId;

use crate::registry::InstanceRegistry;

/// What an election changed, so the dispatcher can notify the affected
/// instances after releasing the router lock.
#[derive(Debug, Default)]
pub struct ElectionOutcome {
    /// Previous holder whose flag was cleared (absent when re-electing the
    /// same instance or when the slot was empty).
    pub previous: Option<InstanceId>,
    /// Whether the slot now points at a different instance than before.
    pub changed: bool,
    /// Instances whose `enabled` flag was forced off by `disable_others`.
    pub disabled: Vec<InstanceId>,
}

/// The single optional main-controller reference.
///
/// Always points into the registry or is empty. The invariant "at most one
/// instance holds the role" is maintained here: assigning a new holder
/// clears the previous holder's flag before setting the new one, inside
/// the same router lock, so no observer ever sees both or neither.
pub struct MainControllerSlot {
    current: Option<InstanceId>,
}

impl MainControllerSlot {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Elect `id` as main controller.
    ///
    /// Electing an unregistered id is rejected with `InvalidInstance`.
    /// With `disable_others`, every other instance's `enabled` flag is
    /// forced off so only the elected instance responds to environment
    /// events.
    pub fn set_main(
        &mut self,
        registry: &mut InstanceRegistry,
        id: InstanceId,
        disable_others: bool,
    ) -> Result<ElectionOutcome> {
        if !registry.contains(id) {
            return Err(StellwerkError::InvalidInstance(id));
        }

        let mut outcome = ElectionOutcome::default();
        if let Some(previous) = self.current {
            if previous != id {
                registry.set_main_flag(previous, false);
                outcome.previous = Some(previous);
            }
        }

        outcome.changed = self.current != Some(id);
        registry.set_main_flag(id, true);
        self.current = Some(id);

        if disable_others {
            for other in registry.all() {
                if other != id && registry.is_enabled(other) {
                    // Known id, cannot fail.
                    let _ = registry.set_enabled(other, false);
                    outcome.disabled.push(other);
                }
            }
        }

        if outcome.changed {
            info!(instance = %id, previous = ?outcome.previous, "main controller elected");
        }
        Ok(outcome)
    }

    /// The current main controller, if any.
    ///
    /// Self-heals: if the slot points at an instance that has been
    /// unregistered or whose sink is dead, it is cleared and `None` is
    /// returned — never a dangling reference.
    pub fn current(&mut self, registry: &InstanceRegistry) -> Option<InstanceId> {
        if let Some(id) = self.current {
            if registry.sink(id).is_none() {
                debug!(instance = %id, "main controller vanished, clearing slot");
                self.current = None;
            }
        }
        self.current
    }

    /// Teardown path: empty the slot if `id` holds it. Returns whether the
    /// slot was cleared.
    pub fn clear_if_current(&mut self, registry: &mut InstanceRegistry, id: InstanceId) -> bool {
        if self.current == Some(id) {
            registry.set_main_flag(id, false);
            self.current = None;
            info!(instance = %id, "main controller slot cleared");
            return true;
        }
        false
    }
}

impl Default for MainControllerSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::EventSink;
    use std::sync::Arc;

    struct NullSink;
    impl EventSink for NullSink {}

    fn sink() -> Arc<dyn EventSink> {
        Arc::new(NullSink)
    }

    #[test]
    fn electing_unknown_instance_is_rejected() {
        let mut registry = InstanceRegistry::new();
        let mut slot = MainControllerSlot::new();

        let err = slot
            .set_main(&mut registry, InstanceId(3), false)
            .unwrap_err();
        assert!(matches!(err, StellwerkError::InvalidInstance(InstanceId(3))));
        assert_eq!(slot.current(&registry), None);
    }

    #[test]
    fn handoff_clears_previous_holder() {
        let mut registry = InstanceRegistry::new();
        let mut slot = MainControllerSlot::new();
        let a = sink();
        let b = sink();
        let id_a = registry.register(&a);
        let id_b = registry.register(&b);

        slot.set_main(&mut registry, id_a, false).expect("elect a");
        assert!(registry.is_main_controller(id_a));

        let outcome = slot.set_main(&mut registry, id_b, false).expect("elect b");
        assert!(outcome.changed);
        assert_eq!(outcome.previous, Some(id_a));
        assert_eq!(slot.current(&registry), Some(id_b));
        assert!(!registry.is_main_controller(id_a));
        assert!(registry.is_main_controller(id_b));
    }

    #[test]
    fn reelecting_same_instance_changes_nothing() {
        let mut registry = InstanceRegistry::new();
        let mut slot = MainControllerSlot::new();
        let a = sink();
        let id_a = registry.register(&a);

        slot.set_main(&mut registry, id_a, false).expect("elect");
        let outcome = slot.set_main(&mut registry, id_a, false).expect("re-elect");
        assert!(!outcome.changed);
        assert_eq!(outcome.previous, None);
    }

    #[test]
    fn disable_others_forces_enabled_off() {
        let mut registry = InstanceRegistry::new();
        let mut slot = MainControllerSlot::new();
        let sinks: Vec<_> = (0..3).map(|_| sink()).collect();
        let ids: Vec<_> = sinks.iter().map(|s| registry.register(s)).collect();

        let outcome = slot
            .set_main(&mut registry, ids[1], true)
            .expect("elect with disable_others");

        assert_eq!(outcome.disabled, vec![ids[0], ids[2]]);
        assert!(!registry.is_enabled(ids[0]));
        assert!(registry.is_enabled(ids[1]));
        assert!(!registry.is_enabled(ids[2]));
    }

    #[test]
    fn teardown_of_current_holder_empties_slot() {
        let mut registry = InstanceRegistry::new();
        let mut slot = MainControllerSlot::new();
        let a = sink();
        let id_a = registry.register(&a);

        slot.set_main(&mut registry, id_a, false).expect("elect");
        assert!(slot.clear_if_current(&mut registry, id_a));
        assert_eq!(slot.current(&registry), None);

        // Clearing for a non-holder is a no-op.
        assert!(!slot.clear_if_current(&mut registry, id_a));
    }

    #[test]
    fn current_self_heals_when_holder_dies() {
        let mut registry = InstanceRegistry::new();
        let mut slot = MainControllerSlot::new();
        let a = sink();
        let id_a = registry.register(&a);

        slot.set_main(&mut registry, id_a, false).expect("elect");
        drop(a);
        assert_eq!(slot.current(&registry), None);
    }
}
