// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Events that arrived before anyone could receive them.
//
// Notification taps can reach the process before the application has
// reconstructed the corresponding UI object (cold start), and a deep-link
// launch URL arrives before any instance has claimed main-controller
// status. Both are held here and replayed once a qualifying receiver
// exists — correctness over freshness.

use std::collections::VecDeque;

use tracing::debug;

use stellwerk_core::types::{CorrelationKey, PendingLaunch, PendingNotification};

/// FIFO store for undeliverable events awaiting a receiver.
pub struct PendingQueue {
    notifications: VecDeque<PendingNotification>,
    launches: VecDeque<PendingLaunch>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
            launches: VecDeque::new(),
        }
    }

    /// Append a notification in arrival order.
    pub fn push_notification(&mut self, pending: PendingNotification) {
        debug!(key = %pending.key, manager = %pending.manager_name, "notification queued, no claimant yet");
        self.notifications.push_back(pending);
    }

    /// Remove and return every queued notification matching `key`, in
    /// arrival order. Each entry is consumed exactly once; a second drain
    /// for the same key returns nothing new.
    pub fn drain_matching(&mut self, key: &CorrelationKey) -> Vec<PendingNotification> {
        let mut matched = Vec::new();
        self.notifications.retain(|pending| {
            if pending.key == *key {
                matched.push(pending.clone());
                false
            } else {
                true
            }
        });
        if !matched.is_empty() {
            debug!(key = %key, count = matched.len(), "pending notifications drained");
        }
        matched
    }

    /// Append a launch event awaiting a main controller.
    pub fn push_launch(&mut self, launch: PendingLaunch) {
        debug!(url = ?launch.url, "launch event queued, no main controller yet");
        self.launches.push_back(launch);
    }

    /// Remove and return all queued launch events in arrival order.
    pub fn drain_launches(&mut self) -> Vec<PendingLaunch> {
        self.launches.drain(..).collect()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    pub fn launch_count(&self) -> usize {
        self.launches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.launches.is_empty()
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_only_matching_entries_in_arrival_order() {
        let mut queue = PendingQueue::new();
        let key_a = CorrelationKey::new("tag1", 5);
        let key_b = CorrelationKey::new("tag2", 7);

        queue.push_notification(PendingNotification::new(key_a.clone(), "fcm"));
        queue.push_notification(PendingNotification::new(key_b.clone(), "fcm"));
        queue.push_notification(PendingNotification::new(key_a.clone(), "local"));

        let drained = queue.drain_matching(&key_a);
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].manager_name, "fcm");
        assert_eq!(drained[1].manager_name, "local");

        // Consumed exactly once.
        assert!(queue.drain_matching(&key_a).is_empty());
        assert_eq!(queue.notification_count(), 1);
    }

    #[test]
    fn launches_replay_fifo() {
        let mut queue = PendingQueue::new();
        queue.push_launch(PendingLaunch::new(Some("app://a".into())));
        queue.push_launch(PendingLaunch::new(None));

        let drained = queue.drain_launches();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].url.as_deref(), Some("app://a"));
        assert_eq!(drained[1].url, None);
        assert!(queue.is_empty());
    }
}
