// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide table of live bridge instances.
//
// The registry is plain data — no locking, no native I/O. Thread safety is
// the dispatcher's concern: one router lock guards the registry, the
// pending queue, and the election slot together (see dispatcher.rs).

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use tracing::{debug, info};

use stellwerk_core::error::{Result, StellwerkError};
use stellwerk_core::types::{CorrelationKey, InstanceId};

use crate::sink::EventSink;

/// Bookkeeping for one registered bridge instance.
///
/// Holds a non-owning handle to the UI-owned sink. A dead `Weak` means the
/// UI object is already gone; such entries are invisible to dispatch and
/// swept opportunistically.
struct InstanceEntry {
    sink: Weak<dyn EventSink>,
    enabled: bool,
    button_events_enabled: bool,
    is_main_controller: bool,
    correlation: Option<CorrelationKey>,
}

/// Table mapping instance ids to live bridge instances.
///
/// Ids are assigned as a monotonic sequence starting at 0 and never
/// reused. Keyed by a `BTreeMap` so iteration order is id order, which is
/// registration order — broadcast delivery and "first qualifying
/// instance" resolution both depend on that.
pub struct InstanceRegistry {
    entries: BTreeMap<InstanceId, InstanceEntry>,
    next_id: u64,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Register a sink and assign it the next instance id.
    ///
    /// The new instance starts enabled, with button events on, no
    /// correlation key, and no main-controller status.
    pub fn register(&mut self, sink: &Arc<dyn EventSink>) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;

        self.entries.insert(
            id,
            InstanceEntry {
                sink: Arc::downgrade(sink),
                enabled: true,
                button_events_enabled: true,
                is_main_controller: false,
                correlation: None,
            },
        );

        info!(instance = %id, "bridge instance registered");
        id
    }

    /// Remove an entry. Idempotent: unknown or already-removed ids are a
    /// no-op, not an error.
    pub fn unregister(&mut self, id: InstanceId) {
        if self.entries.remove(&id).is_some() {
            info!(instance = %id, "bridge instance unregistered");
        }
    }

    /// Whether an entry exists for this id (live or not).
    pub fn contains(&self, id: InstanceId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Upgrade the stored handle for this id.
    ///
    /// Returns `None` if the id was never registered, was unregistered, or
    /// the UI object behind it is already gone.
    pub fn sink(&self, id: InstanceId) -> Option<Arc<dyn EventSink>> {
        self.entries.get(&id).and_then(|e| e.sink.upgrade())
    }

    pub fn is_enabled(&self, id: InstanceId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.enabled)
    }

    /// Flip the `enabled` flag. Returns whether the value actually
    /// changed, so the caller can decide to emit a change notice.
    pub fn set_enabled(&mut self, id: InstanceId, enabled: bool) -> Result<bool> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(StellwerkError::InvalidInstance(id))?;
        let changed = entry.enabled != enabled;
        entry.enabled = enabled;
        if changed {
            debug!(instance = %id, enabled, "instance enabled flag changed");
        }
        Ok(changed)
    }

    pub fn button_events_enabled(&self, id: InstanceId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.button_events_enabled)
    }

    pub fn set_button_events_enabled(&mut self, id: InstanceId, enabled: bool) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(StellwerkError::InvalidInstance(id))?;
        entry.button_events_enabled = enabled;
        Ok(())
    }

    pub fn correlation_key(&self, id: InstanceId) -> Option<&CorrelationKey> {
        self.entries.get(&id).and_then(|e| e.correlation.as_ref())
    }

    /// Attach a correlation key to an instance so targeted events can find
    /// it. Replaces any previously claimed key.
    pub fn set_correlation_key(&mut self, id: InstanceId, key: CorrelationKey) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(StellwerkError::InvalidInstance(id))?;
        debug!(instance = %id, key = %key, "correlation key claimed");
        entry.correlation = Some(key);
        Ok(())
    }

    /// Dispatch-purpose lookup by correlation key.
    ///
    /// Disabled and dead instances are invisible here. With several
    /// claimants the earliest-registered one wins.
    pub fn lookup_by_correlation(&self, key: &CorrelationKey) -> Option<InstanceId> {
        self.entries
            .iter()
            .find(|(_, e)| {
                e.enabled && e.correlation.as_ref() == Some(key) && e.sink.strong_count() > 0
            })
            .map(|(id, _)| *id)
    }

    pub fn is_main_controller(&self, id: InstanceId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.is_main_controller)
    }

    /// Set or clear the main-controller flag. Returns whether the value
    /// changed. Election logic (at most one holder) lives in election.rs;
    /// this only mutates the per-entry flag.
    pub(crate) fn set_main_flag(&mut self, id: InstanceId, is_main: bool) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) if entry.is_main_controller != is_main => {
                entry.is_main_controller = is_main;
                true
            }
            _ => false,
        }
    }

    /// All registered ids in registration order, regardless of state.
    pub fn all(&self) -> Vec<InstanceId> {
        self.entries.keys().copied().collect()
    }

    /// Ids eligible for broadcast delivery: registered, enabled, and still
    /// alive, in registration order.
    pub fn enabled_instances(&self) -> Vec<InstanceId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.enabled && e.sink.strong_count() > 0)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Drop entries whose sink is gone. Returns how many were removed.
    pub fn sweep_dead(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, e| {
            let live = e.sink.strong_count() > 0;
            if !live {
                debug!(instance = %id, "sweeping dead instance entry");
            }
            live
        });
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSink;
    impl EventSink for NullSink {}

    fn sink() -> Arc<dyn EventSink> {
        Arc::new(NullSink)
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut registry = InstanceRegistry::new();
        let a = sink();
        let b = sink();

        let id0 = registry.register(&a);
        let id1 = registry.register(&b);
        assert_eq!(id0, InstanceId(0));
        assert_eq!(id1, InstanceId(1));

        registry.unregister(id0);
        let c = sink();
        let id2 = registry.register(&c);
        assert_eq!(id2, InstanceId(2));
    }

    #[test]
    fn lookup_tracks_register_unregister_history() {
        let mut registry = InstanceRegistry::new();
        let a = sink();

        let id = registry.register(&a);
        assert!(registry.sink(id).is_some());

        registry.unregister(id);
        assert!(registry.sink(id).is_none());

        // Unregistering twice, or an unknown id, is a no-op.
        registry.unregister(id);
        registry.unregister(InstanceId(999));
    }

    #[test]
    fn dead_sink_is_invisible() {
        let mut registry = InstanceRegistry::new();
        let a = sink();
        let id = registry.register(&a);

        drop(a);
        assert!(registry.sink(id).is_none());
        assert!(registry.enabled_instances().is_empty());

        assert_eq!(registry.sweep_dead(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn instances_start_enabled() {
        let mut registry = InstanceRegistry::new();
        let a = sink();
        let id = registry.register(&a);
        assert!(registry.is_enabled(id));
        assert!(registry.button_events_enabled(id));
    }

    #[test]
    fn set_enabled_reports_changes_and_rejects_unknown_ids() {
        let mut registry = InstanceRegistry::new();
        let a = sink();
        let id = registry.register(&a);

        assert!(registry.set_enabled(id, false).expect("known id"));
        assert!(!registry.set_enabled(id, false).expect("no change"));

        let err = registry.set_enabled(InstanceId(42), true).unwrap_err();
        assert!(matches!(err, StellwerkError::InvalidInstance(InstanceId(42))));
    }

    #[test]
    fn correlation_lookup_skips_disabled_instances() {
        let mut registry = InstanceRegistry::new();
        let a = sink();
        let b = sink();
        let id_a = registry.register(&a);
        let id_b = registry.register(&b);

        let key = CorrelationKey::new("tag1", 5);
        registry.set_correlation_key(id_a, key.clone()).expect("claim a");
        registry.set_correlation_key(id_b, key.clone()).expect("claim b");

        // Earliest-registered claimant wins.
        assert_eq!(registry.lookup_by_correlation(&key), Some(id_a));

        // Disabled instances are invisible for dispatch purposes.
        registry.set_enabled(id_a, false).expect("disable");
        assert_eq!(registry.lookup_by_correlation(&key), Some(id_b));

        registry.set_enabled(id_b, false).expect("disable");
        assert_eq!(registry.lookup_by_correlation(&key), None);
    }

    #[test]
    fn broadcast_order_is_registration_order() {
        let mut registry = InstanceRegistry::new();
        let sinks: Vec<_> = (0..3).map(|_| sink()).collect();
        let ids: Vec<_> = sinks.iter().map(|s| registry.register(s)).collect();

        assert_eq!(registry.enabled_instances(), ids);
        assert_eq!(registry.all(), ids);
    }
}
