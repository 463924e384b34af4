// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native presentation.
//
// Every method here is fire-and-return: it asks the OS to put a widget on
// screen and reports only whether the request was presented. The user's
// eventual answer (button click, picked date, captured photo) comes back
// asynchronously through the native callback layer and the event router —
// never as a return value.

use stellwerk_core::config::DialogConfig;
use stellwerk_core::error::Result;

/// Unified bridge that groups all native presentation capabilities.
///
/// Platforms that lack a capability (e.g. no hardware menu button handling
/// on iOS, no icon badge on stock Android) return
/// `StellwerkError::PlatformUnavailable` rather than faking success.
pub trait PlatformBridge:
    NativeDialog
    + NativePickers
    + NativeCamera
    + NativeGallery
    + NativeToast
    + NativeStatusBar
    + NativeShare
    + NativeKeyboard
    + NativeAppShell
{
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;
}

/// Alert dialogs and action sheets.
pub trait NativeDialog {
    /// Present a native alert according to the given configuration.
    /// The clicked button surfaces later as an `AlertDialogClicked` event
    /// (positive 1 / neutral 0 / negative -1, or the item index).
    fn show_alert_dialog(&self, config: &DialogConfig) -> Result<()>;

    /// Present an action sheet with the given buttons. The selection
    /// surfaces as an `ActionSheetClicked` event.
    fn show_action_sheet(&self, title: &str, message: &str, buttons: &[String]) -> Result<()>;
}

/// Date and time pickers.
pub trait NativePickers {
    /// Show the system date picker; resolves to `DatePicked` or
    /// `DatePickerCancelled`.
    fn show_date_picker(&self) -> Result<()>;

    /// Show the system time picker; resolves to `TimePicked` or
    /// `TimePickerCancelled`.
    fn show_time_picker(&self) -> Result<()>;
}

/// Camera capture.
pub trait NativeCamera {
    /// Open the camera. `file_name` is the capture target the platform
    /// should write to; the final path surfaces as `CameraCaptured`.
    fn show_camera(&self, file_name: &str) -> Result<()>;
}

/// Gallery / document picking.
pub trait NativeGallery {
    /// Open the gallery for a pick-file operation; resolves to
    /// `FileSelected` or `FileSelectionCancelled`.
    fn open_gallery(&self) -> Result<()>;
}

/// Transient toast messages.
pub trait NativeToast {
    fn show_toast(&self, text: &str, long_duration: bool) -> Result<()>;
}

/// Status bar appearance.
pub trait NativeStatusBar {
    /// Set the status bar color from a hex string (e.g. "#336699").
    fn set_status_bar_color(&self, color: &str) -> Result<()>;

    /// Current status bar color as a hex string.
    fn status_bar_color(&self) -> Result<String>;

    fn set_status_bar_visible(&self, visible: bool) -> Result<()>;

    fn is_status_bar_visible(&self) -> Result<bool>;

    /// Status bar size in logical pixels (width, height).
    fn status_bar_size(&self) -> Result<(u32, u32)>;

    /// Hide both status and navigation bars (Android immersive mode).
    fn set_immersive_mode(&self, enabled: bool) -> Result<()>;
}

/// OS share sheet.
pub trait NativeShare {
    /// Share text with other apps. `dialog_title` is used on platforms
    /// that support a chooser title and ignored elsewhere.
    fn share_text(&self, dialog_title: &str, text: &str) -> Result<()>;
}

/// Soft keyboard control.
pub trait NativeKeyboard {
    fn dismiss_keyboard(&self) -> Result<()>;
}

/// Miscellaneous application-shell services.
pub trait NativeAppShell {
    /// Set the app icon badge number; 0 clears it.
    fn set_app_icon_badge(&self, count: u32) -> Result<()>;

    /// Open a URL in the platform's in-app or default browser.
    fn open_url_in_browser(&self, url: &str) -> Result<()>;

    /// Open this app's page in the system settings.
    fn open_app_settings(&self) -> Result<()>;

    /// Marketing device model (e.g. "Pixel 8", "iPhone15,3").
    fn device_model(&self) -> Result<String>;

    /// Whether the device is tablet-class.
    fn is_tablet(&self) -> Result<bool>;
}
