// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Stellwerk event router.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a registered bridge instance.
///
/// Assigned by the registry as a monotonic sequence starting at 0 and never
/// reused within the process lifetime, so a stale id can never alias a
/// newer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Domain key that routes a notification event to a specific instance
/// independent of registration order (notification tag + id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationKey {
    pub tag: String,
    pub id: i32,
}

impl CorrelationKey {
    pub fn new(tag: impl Into<String>, id: i32) -> Self {
        Self { tag: tag.into(), id }
    }
}

impl std::fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.tag, self.id)
    }
}

/// A notification event that arrived before any instance claimed its key.
///
/// Held by the pending queue and consumed exactly once by the first
/// instance that claims the matching [`CorrelationKey`]. Entries that are
/// never claimed live for the remainder of the process — acceptable, the
/// volume is capped by notification traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingNotification {
    pub key: CorrelationKey,
    /// Name of the native notification manager that produced the event.
    pub manager_name: String,
    pub received_at: DateTime<Utc>,
}

impl PendingNotification {
    pub fn new(key: CorrelationKey, manager_name: impl Into<String>) -> Self {
        Self {
            key,
            manager_name: manager_name.into(),
            received_at: Utc::now(),
        }
    }
}

/// An environment launch event (URL open or plain launch) retained until a
/// main controller exists to receive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingLaunch {
    /// `None` for a plain launch without a deep-link URL.
    pub url: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl PendingLaunch {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url,
            received_at: Utc::now(),
        }
    }
}

/// Hardware buttons reported by the native runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonKind {
    Back,
    Menu,
}

/// Raw event record arriving from the native execution context.
///
/// One variant per native callback. The payload carries exactly what the
/// OS callback reported; interpretation is left to the receiving sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NativeEvent {
    /// Back or menu hardware button pressed.
    ButtonPressed { button: ButtonKind },
    /// Alert dialog dismissed with a button (positive 1 / neutral 0 /
    /// negative -1) or, for item-list dialogs, the selected item index.
    AlertDialogClicked { button_index: i32 },
    /// Action sheet dismissed with the given button index.
    ActionSheetClicked { button_index: i32 },
    DatePicked { year: i32, month: u32, day: u32 },
    DatePickerCancelled,
    TimePicked { hour: u32, minute: u32 },
    TimePickerCancelled,
    CameraCaptured { capture_path: String },
    CameraCaptureCancelled,
    FileSelected { file_path: String },
    FileSelectionCancelled,
    KeyboardHeightChanged { height: i32 },
    /// App was brought up through a deep-link URL.
    OpenedWithUrl { url: String },
    /// Complementary launch event when no URL was involved.
    OpenedWithoutUrl,
    /// A system notification was tapped; routed by correlation key.
    NotificationReceived {
        key: CorrelationKey,
        manager_name: String,
    },
}

/// How an event kind is delivered. Fixed per kind — see
/// [`NativeEvent::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Deliver to the single instance matching the event's correlation
    /// key; queue as pending if none matches.
    Targeted,
    /// Deliver only to the elected main controller.
    MainControllerOnly,
    /// Deliver to every registered, enabled instance.
    Broadcast,
}

impl NativeEvent {
    /// The fixed delivery policy for this event kind.
    pub fn policy(&self) -> DeliveryPolicy {
        match self {
            Self::NotificationReceived { .. } => DeliveryPolicy::Targeted,
            Self::ButtonPressed { .. } | Self::OpenedWithUrl { .. } | Self::OpenedWithoutUrl => {
                DeliveryPolicy::MainControllerOnly
            }
            Self::AlertDialogClicked { .. }
            | Self::ActionSheetClicked { .. }
            | Self::DatePicked { .. }
            | Self::DatePickerCancelled
            | Self::TimePicked { .. }
            | Self::TimePickerCancelled
            | Self::CameraCaptured { .. }
            | Self::CameraCaptureCancelled
            | Self::FileSelected { .. }
            | Self::FileSelectionCancelled
            | Self::KeyboardHeightChanged { .. } => DeliveryPolicy::Broadcast,
        }
    }

    /// Short stable name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ButtonPressed { .. } => "button_pressed",
            Self::AlertDialogClicked { .. } => "alert_dialog_clicked",
            Self::ActionSheetClicked { .. } => "action_sheet_clicked",
            Self::DatePicked { .. } => "date_picked",
            Self::DatePickerCancelled => "date_picker_cancelled",
            Self::TimePicked { .. } => "time_picked",
            Self::TimePickerCancelled => "time_picker_cancelled",
            Self::CameraCaptured { .. } => "camera_captured",
            Self::CameraCaptureCancelled => "camera_capture_cancelled",
            Self::FileSelected { .. } => "file_selected",
            Self::FileSelectionCancelled => "file_selection_cancelled",
            Self::KeyboardHeightChanged { .. } => "keyboard_height_changed",
            Self::OpenedWithUrl { .. } => "opened_with_url",
            Self::OpenedWithoutUrl => "opened_without_url",
            Self::NotificationReceived { .. } => "notification_received",
        }
    }
}
