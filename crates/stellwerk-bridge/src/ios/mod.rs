// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS platform bridge via objc2.
//
// Requires compilation with the iOS SDK (Xcode). All UIKit interactions
// require the main thread; methods that present view controllers return
// `StellwerkError::Bridge` if called off-main.
//
// Widgets that answer through a delegate (alert controller, pickers,
// camera, gallery) are presented by the companion Objective-C class
// `StellwerkPresenter` shipped with the iOS integration. The presenter
// reports results through the `stellwerk_*` C exports at the bottom of
// this file, which forward into `crate::callbacks` and from there through
// the installed `EventRouter`. The app delegate is likewise expected to
// call `stellwerk_opened_with_url` / `stellwerk_opened_without_url` from
// its URL-handling hooks — see IOS-INTEGRATION.md.

#![cfg(target_os = "ios")]

use std::ffi::{CStr, c_char};

use objc2::rc::Retained;
use objc2::runtime::{AnyClass, AnyObject};
use objc2::{MainThreadMarker, msg_send};
use objc2_foundation::{NSArray, NSString, NSURL};
use objc2_ui_kit::{UIApplication, UIDevice, UIUserInterfaceIdiom, UIViewController};

use stellwerk_core::config::{DialogConfig, DialogPresentation};
use stellwerk_core::error::{Result, StellwerkError};

use crate::callbacks;
use crate::traits::*;

/// Objective-C presenter class name; linked in from the iOS integration.
const PRESENTER_CLASS: &str = "StellwerkPresenter";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assert that we are on the main thread and return the marker.
fn require_main_thread() -> Result<MainThreadMarker> {
    MainThreadMarker::new()
        .ok_or_else(|| StellwerkError::Bridge("must be called from the main thread".into()))
}

/// Obtain the root `UIViewController` from the key window.
///
/// Uses the deprecated `keyWindow` property for broad iOS-version compat.
fn root_view_controller(mtm: MainThreadMarker) -> Result<Retained<UIViewController>> {
    let app = UIApplication::sharedApplication(mtm);

    // SAFETY: msg_send! to well-known UIApplication selectors (keyWindow,
    // rootViewController). MainThreadMarker guarantees the main thread.
    let root: Option<Retained<UIViewController>> = unsafe {
        let window: Option<Retained<AnyObject>> = msg_send![&app, keyWindow];
        window.and_then(|w| msg_send![&w, rootViewController])
    };

    root.ok_or_else(|| StellwerkError::Bridge("no root view controller available".into()))
}

/// The shared `StellwerkPresenter` instance.
fn presenter() -> Result<Retained<AnyObject>> {
    let class = AnyClass::get(c"StellwerkPresenter").ok_or_else(|| {
        StellwerkError::Bridge(format!("{PRESENTER_CLASS} class not linked into the app"))
    })?;

    // SAFETY: sharedPresenter is the presenter's documented singleton
    // accessor and returns a retained instance.
    let shared: Option<Retained<AnyObject>> = unsafe { msg_send![class, sharedPresenter] };
    shared.ok_or_else(|| StellwerkError::Bridge(format!("{PRESENTER_CLASS} not initialised")))
}

fn ns_string_array(items: &[String]) -> Retained<NSArray<NSString>> {
    let strings: Vec<Retained<NSString>> =
        items.iter().map(|s| NSString::from_str(s)).collect();
    NSArray::from_retained_slice(&strings)
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// iOS implementation of the Stellwerk platform bridge.
pub struct IosBridge;

impl IosBridge {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformBridge for IosBridge {
    fn platform_name(&self) -> &str {
        "iOS"
    }
}

// ---------------------------------------------------------------------------
// NativeDialog — UIAlertController via StellwerkPresenter
// ---------------------------------------------------------------------------

impl NativeDialog for IosBridge {
    fn show_alert_dialog(&self, config: &DialogConfig) -> Result<()> {
        let mtm = require_main_thread()?;
        let presenter = presenter()?;
        let root = root_view_controller(mtm)?;

        let title = NSString::from_str(config.title.as_deref().unwrap_or_default());
        tracing::info!(title = ?config.title, "iOS: presenting alert");

        match config.presentation()? {
            DialogPresentation::Items(items) => {
                let items = ns_string_array(items);
                // SAFETY: presentItems:withTitle:from: is the presenter's
                // item-sheet entry point; selections come back through
                // stellwerk_alert_dialog_clicked with the item index.
                unsafe {
                    let _: () = msg_send![
                        &presenter,
                        presentItems: &*items,
                        withTitle: &*title,
                        from: &*root
                    ];
                }
            }
            DialogPresentation::Buttons {
                positive,
                negative,
                neutral,
            } => {
                let message = NSString::from_str(config.message.as_deref().unwrap_or_default());
                let positive = NSString::from_str(positive.unwrap_or_default());
                let negative = NSString::from_str(negative.unwrap_or_default());
                let neutral = NSString::from_str(neutral.unwrap_or_default());
                // SAFETY: presentAlertWithTitle:... maps empty labels to
                // omitted buttons; clicks come back through
                // stellwerk_alert_dialog_clicked (1 / 0 / -1).
                unsafe {
                    let _: () = msg_send![
                        &presenter,
                        presentAlertWithTitle: &*title,
                        message: &*message,
                        positive: &*positive,
                        negative: &*negative,
                        neutral: &*neutral,
                        from: &*root
                    ];
                }
            }
        }
        Ok(())
    }

    fn show_action_sheet(&self, title: &str, message: &str, buttons: &[String]) -> Result<()> {
        let mtm = require_main_thread()?;
        let presenter = presenter()?;
        let root = root_view_controller(mtm)?;

        let title = NSString::from_str(title);
        let message = NSString::from_str(message);
        let buttons = ns_string_array(buttons);
        // SAFETY: presentActionSheetWithTitle:... reports the selected
        // index through stellwerk_action_sheet_clicked.
        unsafe {
            let _: () = msg_send![
                &presenter,
                presentActionSheetWithTitle: &*title,
                message: &*message,
                buttons: &*buttons,
                from: &*root
            ];
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativePickers / NativeCamera / NativeGallery — StellwerkPresenter
// ---------------------------------------------------------------------------

impl NativePickers for IosBridge {
    fn show_date_picker(&self) -> Result<()> {
        let mtm = require_main_thread()?;
        let presenter = presenter()?;
        let root = root_view_controller(mtm)?;
        // SAFETY: results come back via stellwerk_date_picked /
        // stellwerk_date_picker_cancelled.
        unsafe {
            let _: () = msg_send![&presenter, presentDatePickerFrom: &*root];
        }
        Ok(())
    }

    fn show_time_picker(&self) -> Result<()> {
        let mtm = require_main_thread()?;
        let presenter = presenter()?;
        let root = root_view_controller(mtm)?;
        unsafe {
            let _: () = msg_send![&presenter, presentTimePickerFrom: &*root];
        }
        Ok(())
    }
}

impl NativeCamera for IosBridge {
    fn show_camera(&self, file_name: &str) -> Result<()> {
        let mtm = require_main_thread()?;
        let presenter = presenter()?;
        let root = root_view_controller(mtm)?;

        tracing::info!(file = file_name, "iOS: launching camera capture");
        let file_name = NSString::from_str(file_name);
        // SAFETY: the capture path comes back via stellwerk_camera_captured.
        unsafe {
            let _: () = msg_send![&presenter, presentCameraWithFileName: &*file_name, from: &*root];
        }
        Ok(())
    }
}

impl NativeGallery for IosBridge {
    fn open_gallery(&self) -> Result<()> {
        let mtm = require_main_thread()?;
        let presenter = presenter()?;
        let root = root_view_controller(mtm)?;
        unsafe {
            let _: () = msg_send![&presenter, presentGalleryFrom: &*root];
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeToast — no system toast on iOS; the presenter shows a transient
// label overlay.
// ---------------------------------------------------------------------------

impl NativeToast for IosBridge {
    fn show_toast(&self, text: &str, long_duration: bool) -> Result<()> {
        let mtm = require_main_thread()?;
        let presenter = presenter()?;
        let root = root_view_controller(mtm)?;

        let text = NSString::from_str(text);
        unsafe {
            let _: () = msg_send![
                &presenter,
                presentToast: &*text,
                longDuration: long_duration,
                from: &*root
            ];
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeStatusBar
// ---------------------------------------------------------------------------

impl NativeStatusBar for IosBridge {
    fn set_status_bar_color(&self, color: &str) -> Result<()> {
        let _ = require_main_thread()?;
        let presenter = presenter()?;

        let color = NSString::from_str(color);
        // SAFETY: the presenter owns the status-bar background view; iOS
        // has no direct status-bar color API since iOS 13.
        unsafe {
            let _: () = msg_send![&presenter, setStatusBarColor: &*color];
        }
        Ok(())
    }

    fn status_bar_color(&self) -> Result<String> {
        let _ = require_main_thread()?;
        let presenter = presenter()?;
        // SAFETY: statusBarColorHex returns an NSString like "#RRGGBB".
        let hex: Option<Retained<NSString>> = unsafe { msg_send![&presenter, statusBarColorHex] };
        hex.map(|s| s.to_string())
            .ok_or_else(|| StellwerkError::Bridge("status bar color unavailable".into()))
    }

    fn set_status_bar_visible(&self, visible: bool) -> Result<()> {
        let _ = require_main_thread()?;
        let presenter = presenter()?;
        unsafe {
            let _: () = msg_send![&presenter, setStatusBarHidden: !visible];
        }
        Ok(())
    }

    fn is_status_bar_visible(&self) -> Result<bool> {
        let mtm = require_main_thread()?;
        let app = UIApplication::sharedApplication(mtm);
        // SAFETY: isStatusBarHidden is a UIApplication property (deprecated
        // but present; the presenter keeps it in sync).
        let hidden: bool = unsafe { msg_send![&app, isStatusBarHidden] };
        Ok(!hidden)
    }

    fn status_bar_size(&self) -> Result<(u32, u32)> {
        let mtm = require_main_thread()?;
        let app = UIApplication::sharedApplication(mtm);
        // SAFETY: statusBarFrame is a CGRect-valued UIApplication property.
        let frame: objc2_foundation::CGRect = unsafe { msg_send![&app, statusBarFrame] };
        Ok((frame.size.width as u32, frame.size.height as u32))
    }

    fn set_immersive_mode(&self, _enabled: bool) -> Result<()> {
        // Android-only concept; the closest iOS analogue is hiding the
        // status bar, which callers do explicitly.
        Err(StellwerkError::PlatformUnavailable)
    }
}

// ---------------------------------------------------------------------------
// NativeShare — UIActivityViewController
// ---------------------------------------------------------------------------

impl NativeShare for IosBridge {
    fn share_text(&self, _dialog_title: &str, text: &str) -> Result<()> {
        let mtm = require_main_thread()?;
        let root = root_view_controller(mtm)?;

        tracing::info!(bytes = text.len(), "iOS: presenting share sheet");
        let text = NSString::from_str(text);
        let items = NSArray::from_retained_slice(&[text]);

        // SAFETY: standard UIActivityViewController presentation; there is
        // no chooser title on iOS, so dialog_title is ignored.
        unsafe {
            let class = objc2::class!(UIActivityViewController);
            let alloced: *mut AnyObject = msg_send![class, alloc];
            let controller: Option<Retained<AnyObject>> = msg_send![
                alloced,
                initWithActivityItems: &*items,
                applicationActivities: std::ptr::null::<AnyObject>()
            ];
            let controller = controller
                .ok_or_else(|| StellwerkError::Bridge("failed to create share sheet".into()))?;
            let _: () = msg_send![
                &root,
                presentViewController: &*controller,
                animated: true,
                completion: std::ptr::null::<std::ffi::c_void>()
            ];
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeKeyboard
// ---------------------------------------------------------------------------

impl NativeKeyboard for IosBridge {
    fn dismiss_keyboard(&self) -> Result<()> {
        let mtm = require_main_thread()?;
        let app = UIApplication::sharedApplication(mtm);
        let action = objc2::sel!(resignFirstResponder);
        // SAFETY: sending a nil-targeted action walks the responder chain
        // and resigns whatever currently owns the keyboard.
        unsafe {
            let _: bool = msg_send![
                &app,
                sendAction: action,
                to: std::ptr::null::<AnyObject>(),
                from: std::ptr::null::<AnyObject>(),
                forEvent: std::ptr::null::<AnyObject>()
            ];
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeAppShell
// ---------------------------------------------------------------------------

impl NativeAppShell for IosBridge {
    fn set_app_icon_badge(&self, count: u32) -> Result<()> {
        let mtm = require_main_thread()?;
        let app = UIApplication::sharedApplication(mtm);
        // SAFETY: setApplicationIconBadgeNumber: takes an NSInteger; 0
        // clears the badge.
        unsafe {
            let _: () = msg_send![&app, setApplicationIconBadgeNumber: count as isize];
        }
        Ok(())
    }

    fn open_url_in_browser(&self, url: &str) -> Result<()> {
        let mtm = require_main_thread()?;
        let app = UIApplication::sharedApplication(mtm);

        let url = unsafe { NSURL::URLWithString(&NSString::from_str(url)) }
            .ok_or_else(|| StellwerkError::Bridge("malformed URL".into()))?;
        // SAFETY: openURL: is the pre-iOS-10 entry point, kept for its
        // synchronous Bool result.
        let opened: bool = unsafe { msg_send![&app, openURL: &*url] };
        if opened {
            Ok(())
        } else {
            Err(StellwerkError::Bridge("no handler opened the URL".into()))
        }
    }

    fn open_app_settings(&self) -> Result<()> {
        // UIApplicationOpenSettingsURLString
        self.open_url_in_browser("app-settings:")
    }

    fn device_model(&self) -> Result<String> {
        let mtm = require_main_thread()?;
        let device = UIDevice::currentDevice(mtm);
        Ok(device.model().to_string())
    }

    fn is_tablet(&self) -> Result<bool> {
        let mtm = require_main_thread()?;
        let device = UIDevice::currentDevice(mtm);
        Ok(device.userInterfaceIdiom() == UIUserInterfaceIdiom::Pad)
    }
}

// ---------------------------------------------------------------------------
// C exports — StellwerkPresenter and the app delegate report results
// through these. Each converts its arguments and forwards into the
// callback layer, which dispatches through the installed router.
// ---------------------------------------------------------------------------

/// Read a C string argument from a presenter callback. Returns `None` (and
/// logs) on null or non-UTF-8 input.
fn c_str_arg(value: *const c_char, what: &str) -> Option<String> {
    if value.is_null() {
        tracing::warn!("null {what} in presenter callback");
        return None;
    }
    // SAFETY: the presenter passes NUL-terminated UTF-8 strings whose
    // lifetime covers the call.
    match unsafe { CStr::from_ptr(value) }.to_str() {
        Ok(s) => Some(s.to_owned()),
        Err(_) => {
            tracing::warn!("non-UTF-8 {what} in presenter callback");
            None
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_alert_dialog_clicked(button_index: i32) {
    callbacks::alert_dialog_clicked(button_index);
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_action_sheet_clicked(button_index: i32) {
    callbacks::action_sheet_clicked(button_index);
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_date_picked(year: i32, month: u32, day: u32) {
    callbacks::date_picked(year, month, day);
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_date_picker_cancelled() {
    callbacks::date_picker_cancelled();
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_time_picked(hour: u32, minute: u32) {
    callbacks::time_picked(hour, minute);
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_time_picker_cancelled() {
    callbacks::time_picker_cancelled();
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_camera_captured(capture_path: *const c_char) {
    if let Some(path) = c_str_arg(capture_path, "capture path") {
        callbacks::camera_captured(&path);
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_camera_capture_cancelled() {
    callbacks::camera_capture_cancelled();
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_file_selected(file_path: *const c_char) {
    if let Some(path) = c_str_arg(file_path, "file path") {
        callbacks::file_selected(&path);
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_file_selection_cancelled() {
    callbacks::file_selection_cancelled();
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_keyboard_height_changed(height: i32) {
    callbacks::keyboard_height_changed(height);
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_opened_with_url(url: *const c_char) {
    if let Some(url) = c_str_arg(url, "launch url") {
        callbacks::opened_with_url(&url);
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_opened_without_url() {
    callbacks::opened_without_url();
}

#[unsafe(no_mangle)]
pub extern "C" fn stellwerk_notification_received(
    tag: *const c_char,
    id: i32,
    manager_name: *const c_char,
) {
    let Some(tag) = c_str_arg(tag, "notification tag") else {
        return;
    };
    let Some(manager) = c_str_arg(manager_name, "notification manager name") else {
        return;
    };
    callbacks::notification_received(&tag, id, &manager);
}
