// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native callback glue: the surface the per-OS modules call when the OS
// reports a result.
//
// The native runtime cannot hold an `EventRouter` of its own, so exactly
// one router is installed here at app startup and every raw callback
// forwards into it. This is the only process-global state in the
// workspace, and it is explicitly installed — the router itself stays an
// injectable object.

use std::sync::Mutex;

use once_cell::sync::Lazy;
use tracing::warn;

use stellwerk_core::types::{ButtonKind, CorrelationKey, NativeEvent};
use stellwerk_router::EventRouter;

static ROUTER: Lazy<Mutex<Option<EventRouter>>> = Lazy::new(|| Mutex::new(None));

/// Install the router that receives all native callbacks. Replaces any
/// previously installed router.
pub fn install_router(router: EventRouter) {
    *ROUTER.lock().expect("router slot poisoned") = Some(router);
}

/// Remove the installed router. Callbacks arriving afterwards are dropped
/// with a warning.
pub fn uninstall_router() {
    *ROUTER.lock().expect("router slot poisoned") = None;
}

fn dispatch(event: NativeEvent) {
    let guard = ROUTER.lock().expect("router slot poisoned");
    match &*guard {
        Some(router) => router.dispatch(event),
        None => warn!(kind = event.kind(), "native event arrived with no router installed, dropped"),
    }
}

// ---------------------------------------------------------------------------
// One entry point per native callback kind. The per-OS glue (JNI exports,
// Objective-C presenter) calls these with already-converted arguments.
// ---------------------------------------------------------------------------

pub fn back_button_pressed() {
    dispatch(NativeEvent::ButtonPressed {
        button: ButtonKind::Back,
    });
}

pub fn menu_button_pressed() {
    dispatch(NativeEvent::ButtonPressed {
        button: ButtonKind::Menu,
    });
}

pub fn alert_dialog_clicked(button_index: i32) {
    dispatch(NativeEvent::AlertDialogClicked { button_index });
}

pub fn action_sheet_clicked(button_index: i32) {
    dispatch(NativeEvent::ActionSheetClicked { button_index });
}

pub fn date_picked(year: i32, month: u32, day: u32) {
    dispatch(NativeEvent::DatePicked { year, month, day });
}

pub fn date_picker_cancelled() {
    dispatch(NativeEvent::DatePickerCancelled);
}

pub fn time_picked(hour: u32, minute: u32) {
    dispatch(NativeEvent::TimePicked { hour, minute });
}

pub fn time_picker_cancelled() {
    dispatch(NativeEvent::TimePickerCancelled);
}

pub fn camera_captured(capture_path: &str) {
    dispatch(NativeEvent::CameraCaptured {
        capture_path: capture_path.to_owned(),
    });
}

pub fn camera_capture_cancelled() {
    dispatch(NativeEvent::CameraCaptureCancelled);
}

pub fn file_selected(file_path: &str) {
    dispatch(NativeEvent::FileSelected {
        file_path: file_path.to_owned(),
    });
}

pub fn file_selection_cancelled() {
    dispatch(NativeEvent::FileSelectionCancelled);
}

pub fn keyboard_height_changed(height: i32) {
    dispatch(NativeEvent::KeyboardHeightChanged { height });
}

pub fn opened_with_url(url: &str) {
    dispatch(NativeEvent::OpenedWithUrl {
        url: url.to_owned(),
    });
}

pub fn opened_without_url() {
    dispatch(NativeEvent::OpenedWithoutUrl);
}

pub fn notification_received(tag: &str, id: i32, manager_name: &str) {
    dispatch(NativeEvent::NotificationReceived {
        key: CorrelationKey::new(tag, id),
        manager_name: manager_name.to_owned(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use stellwerk_router::EventSink;

    #[derive(Default)]
    struct RecordingSink {
        calls: StdMutex<Vec<String>>,
    }

    impl RecordingSink {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("sink lock").clone()
        }
    }

    impl EventSink for RecordingSink {
        fn alert_dialog_clicked(&self, button_index: i32) {
            self.calls
                .lock()
                .expect("sink lock")
                .push(format!("alert:{button_index}"));
        }
        fn notification_received(&self, key: &CorrelationKey, manager_name: &str) {
            self.calls
                .lock()
                .expect("sink lock")
                .push(format!("notif:{key}:{manager_name}"));
        }
        fn opened_with_url(&self, url: &str) {
            self.calls
                .lock()
                .expect("sink lock")
                .push(format!("url:{url}"));
        }
    }

    // The installed-router slot is process-global, so everything runs in
    // one test to keep it deterministic under the parallel test runner.
    #[test]
    fn callbacks_forward_into_installed_router() {
        // Before installation, callbacks are dropped without panicking.
        alert_dialog_clicked(1);

        let (router, mut pump) = EventRouter::new();
        install_router(router.clone());

        let sink = Arc::new(RecordingSink::default());
        let as_dyn: Arc<dyn EventSink> = sink.clone();
        let handle = router.register(&as_dyn);
        handle
            .claim_notifications(CorrelationKey::new("tag1", 5))
            .expect("claim");
        handle.set_main_controller(false).expect("elect");

        alert_dialog_clicked(-1);
        notification_received("tag1", 5, "fcm");
        opened_with_url("app://from-native");
        pump.drain();

        assert_eq!(
            sink.calls(),
            vec!["alert:-1", "notif:tag1#5:fcm", "url:app://from-native"]
        );

        // After uninstall, events are dropped again.
        uninstall_router();
        alert_dialog_clicked(0);
        pump.drain();
        assert_eq!(sink.calls().len(), 3);
    }
}
