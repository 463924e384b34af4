// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Receiving side of the router: one inbound method per native event kind.

use stellwerk_core::types::{ButtonKind, CorrelationKey};

/// Implemented by UI-bound bridge objects that want native events.
///
/// Every method has a no-op default so a sink implements only the kinds it
/// consumes. All calls arrive on the framework's main context via
/// [`crate::EventPump`] — never directly from a native callback thread —
/// and are fire-and-forget: no return values, and the router lock is not
/// held while a method runs, so sinks may freely call back into the
/// router.
///
/// The UI owns the sink (`Arc`); the registry keeps only a `Weak` handle
/// and never extends the sink's lifetime.
pub trait EventSink: Send + Sync {
    /// Back or menu hardware button. Main-controller-only, and further
    /// gated by the instance's `button_events_enabled` flag.
    fn button_pressed(&self, button: ButtonKind) {
        let _ = button;
    }

    /// Alert dialog resolved: positive 1, neutral 0, negative -1, or the
    /// item index for item-list dialogs.
    fn alert_dialog_clicked(&self, button_index: i32) {
        let _ = button_index;
    }

    fn action_sheet_clicked(&self, button_index: i32) {
        let _ = button_index;
    }

    fn date_picked(&self, year: i32, month: u32, day: u32) {
        let _ = (year, month, day);
    }

    fn date_picker_cancelled(&self) {}

    fn time_picked(&self, hour: u32, minute: u32) {
        let _ = (hour, minute);
    }

    fn time_picker_cancelled(&self) {}

    fn camera_captured(&self, capture_path: &str) {
        let _ = capture_path;
    }

    fn camera_capture_cancelled(&self) {}

    fn file_selected(&self, file_path: &str) {
        let _ = file_path;
    }

    fn file_selection_cancelled(&self) {}

    fn keyboard_height_changed(&self, height: i32) {
        let _ = height;
    }

    /// App opened through a deep-link URL. Main-controller-only; queued
    /// while no main controller is elected.
    fn opened_with_url(&self, url: &str) {
        let _ = url;
    }

    /// Complementary launch event without a URL.
    fn opened_without_url(&self) {}

    /// A system notification matching this instance's claimed correlation
    /// key was tapped.
    fn notification_received(&self, key: &CorrelationKey, manager_name: &str) {
        let _ = (key, manager_name);
    }

    /// The instance's `enabled` flag changed. Delivered even when the new
    /// state is disabled — it is a state notice to the instance itself,
    /// not a routed native event.
    fn enabled_changed(&self, enabled: bool) {
        let _ = enabled;
    }

    /// The instance gained or lost main-controller status.
    fn main_controller_changed(&self, is_main: bool) {
        let _ = is_main;
    }
}
