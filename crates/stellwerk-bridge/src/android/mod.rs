// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each trait method invokes the corresponding
// Android API through JNI calls into the ART runtime.
//
// ## Architecture notes
//
// Methods that complete synchronously via JNI (status bar, toast, intent
// launching, Build fields) are fully implemented here.
//
// Widgets that answer through a callback (alert dialog, pickers, camera,
// gallery) are presented by the companion Java class
// `org.hyperpolymath.stellwerk.BridgeHelper`, which reports results back
// through the `Java_org_hyperpolymath_stellwerk_BridgeHelper_native*`
// exports at the bottom of this file. Those exports forward into
// `crate::callbacks`, which routes them through the installed
// `EventRouter` — see ANDROID-INTEGRATION.md for the Java glue.

#![cfg(target_os = "android")]

use jni::JNIEnv;
use jni::objects::{JClass, JObject, JString, JValue};
use jni::sys::jint;

use stellwerk_core::config::DialogConfig;
use stellwerk_core::error::{Result, StellwerkError};

use crate::callbacks;
use crate::traits::*;

/// Fully qualified name of the companion helper class.
const HELPER_CLASS: &str = "org/hyperpolymath/stellwerk/BridgeHelper";

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Obtain a [`JNIEnv`] handle from the global Android context.
///
/// Calls `ndk_context::android_context()` to retrieve the `JavaVM*`
/// pointer set by the NDK glue code, then attaches the current thread if
/// it is not already attached.
fn jni_env() -> Result<JNIEnv<'static>> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| StellwerkError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    vm.attach_current_thread()
        .map_err(|e| StellwerkError::Bridge(format!("failed to attach JNI thread: {e}")))
}

/// Obtain the current Android `Activity` as a [`JObject`].
fn activity() -> Result<JObject<'static>> {
    let ctx = ndk_context::android_context();
    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(StellwerkError::Bridge(
            "Android context is null — native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject
    // for the hosting Activity.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Convenience: map any `jni::errors::Error` into `StellwerkError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> StellwerkError {
    StellwerkError::Bridge(format!("{context}: {e}"))
}

/// Invoke a static void method on the helper class with the given
/// signature and arguments.
fn call_helper(env: &mut JNIEnv<'_>, name: &str, sig: &str, args: &[JValue<'_, '_>]) -> Result<()> {
    env.call_static_method(HELPER_CLASS, name, sig, args)
        .map_err(|e| jni_err(name, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the Stellwerk platform bridge.
///
/// All methods go through JNI to call the Android SDK. The struct is
/// zero-sized; all state lives on the Java side. Callers are expected to
/// invoke presentation methods from the Android UI thread.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge. Does **not** touch JNI — the first
    /// JNI call happens lazily when a trait method is invoked.
    pub fn new() -> Self {
        Self
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// NativeDialog / NativePickers / NativeCamera / NativeGallery — delegated
// to BridgeHelper, which owns the dialog lifecycle on the Java side.
// ---------------------------------------------------------------------------

impl NativeDialog for AndroidBridge {
    fn show_alert_dialog(&self, config: &DialogConfig) -> Result<()> {
        // Validate before crossing into Java so a bad config fails here.
        config.presentation()?;
        let json = serde_json::to_string(config)?;

        let mut env = jni_env()?;
        tracing::info!(title = ?config.title, "Android: presenting alert dialog");
        let j_json: JString = env
            .new_string(&json)
            .map_err(|e| jni_err("new_string(config)", e))?;
        call_helper(
            &mut env,
            "showAlertDialog",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&j_json)],
        )
    }

    fn show_action_sheet(&self, title: &str, _message: &str, buttons: &[String]) -> Result<()> {
        // Android renders action sheets as an item-list alert.
        let config = DialogConfig {
            title: Some(title.to_owned()),
            items: buttons.to_vec(),
            ..Default::default()
        };
        self.show_alert_dialog(&config)
    }
}

impl NativePickers for AndroidBridge {
    fn show_date_picker(&self) -> Result<()> {
        let mut env = jni_env()?;
        call_helper(&mut env, "showDatePicker", "()V", &[])
    }

    fn show_time_picker(&self) -> Result<()> {
        let mut env = jni_env()?;
        call_helper(&mut env, "showTimePicker", "()V", &[])
    }
}

impl NativeCamera for AndroidBridge {
    fn show_camera(&self, file_name: &str) -> Result<()> {
        let mut env = jni_env()?;
        tracing::info!(file = file_name, "Android: launching camera capture");
        let j_name: JString = env
            .new_string(file_name)
            .map_err(|e| jni_err("new_string(file_name)", e))?;
        call_helper(
            &mut env,
            "showCamera",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&j_name)],
        )
    }
}

impl NativeGallery for AndroidBridge {
    fn open_gallery(&self) -> Result<()> {
        let mut env = jni_env()?;
        call_helper(&mut env, "openGallery", "()V", &[])
    }
}

// ---------------------------------------------------------------------------
// NativeToast — android.widget.Toast
// ---------------------------------------------------------------------------

impl NativeToast for AndroidBridge {
    fn show_toast(&self, text: &str, long_duration: bool) -> Result<()> {
        let mut env = jni_env()?;
        let activity = activity()?;

        let j_text: JString = env
            .new_string(text)
            .map_err(|e| jni_err("new_string(text)", e))?;
        // Toast.LENGTH_SHORT = 0, Toast.LENGTH_LONG = 1.
        let duration: jint = if long_duration { 1 } else { 0 };

        let toast = env
            .call_static_method(
                "android/widget/Toast",
                "makeText",
                "(Landroid/content/Context;Ljava/lang/CharSequence;I)Landroid/widget/Toast;",
                &[
                    JValue::Object(&activity),
                    JValue::Object(&j_text),
                    JValue::Int(duration),
                ],
            )
            .map_err(|e| jni_err("Toast.makeText", e))?
            .l()
            .map_err(|e| jni_err("Toast.makeText->l", e))?;

        env.call_method(&toast, "show", "()V", &[])
            .map_err(|e| jni_err("Toast.show", e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeStatusBar — android.view.Window
// ---------------------------------------------------------------------------

/// `View.SYSTEM_UI_FLAG_FULLSCREEN` — hides the status bar.
const SYSTEM_UI_FLAG_FULLSCREEN: jint = 0x0000_0004;
/// `View.SYSTEM_UI_FLAG_HIDE_NAVIGATION | IMMERSIVE_STICKY | FULLSCREEN`.
const IMMERSIVE_FLAGS: jint = 0x0000_0002 | 0x0000_1000 | 0x0000_0004;

impl NativeStatusBar for AndroidBridge {
    fn set_status_bar_color(&self, color: &str) -> Result<()> {
        let mut env = jni_env()?;
        let activity = activity()?;

        let j_color: JString = env
            .new_string(color)
            .map_err(|e| jni_err("new_string(color)", e))?;
        let parsed = env
            .call_static_method(
                "android/graphics/Color",
                "parseColor",
                "(Ljava/lang/String;)I",
                &[JValue::Object(&j_color)],
            )
            .map_err(|e| jni_err("Color.parseColor", e))?
            .i()
            .map_err(|e| jni_err("Color.parseColor->i", e))?;

        let window = env
            .call_method(&activity, "getWindow", "()Landroid/view/Window;", &[])
            .map_err(|e| jni_err("getWindow", e))?
            .l()
            .map_err(|e| jni_err("getWindow->l", e))?;
        env.call_method(&window, "setStatusBarColor", "(I)V", &[JValue::Int(parsed)])
            .map_err(|e| jni_err("setStatusBarColor", e))?;
        Ok(())
    }

    fn status_bar_color(&self) -> Result<String> {
        let mut env = jni_env()?;
        let activity = activity()?;

        let window = env
            .call_method(&activity, "getWindow", "()Landroid/view/Window;", &[])
            .map_err(|e| jni_err("getWindow", e))?
            .l()
            .map_err(|e| jni_err("getWindow->l", e))?;
        let argb = env
            .call_method(&window, "getStatusBarColor", "()I", &[])
            .map_err(|e| jni_err("getStatusBarColor", e))?
            .i()
            .map_err(|e| jni_err("getStatusBarColor->i", e))?;

        // Strip the alpha channel; UI code expects "#RRGGBB".
        Ok(format!("#{:06X}", (argb as u32) & 0x00FF_FFFF))
    }

    fn set_status_bar_visible(&self, visible: bool) -> Result<()> {
        self.set_system_ui_flags(if visible { 0 } else { SYSTEM_UI_FLAG_FULLSCREEN })
    }

    fn is_status_bar_visible(&self) -> Result<bool> {
        let mut env = jni_env()?;
        let decor = self.decor_view(&mut env)?;
        let flags = env
            .call_method(&decor, "getSystemUiVisibility", "()I", &[])
            .map_err(|e| jni_err("getSystemUiVisibility", e))?
            .i()
            .map_err(|e| jni_err("getSystemUiVisibility->i", e))?;
        Ok(flags & SYSTEM_UI_FLAG_FULLSCREEN == 0)
    }

    fn status_bar_size(&self) -> Result<(u32, u32)> {
        let mut env = jni_env()?;
        let activity = activity()?;

        // Resource lookup: android.R "status_bar_height" in the "dimen"
        // type of the "android" package.
        let resources = env
            .call_method(
                &activity,
                "getResources",
                "()Landroid/content/res/Resources;",
                &[],
            )
            .map_err(|e| jni_err("getResources", e))?
            .l()
            .map_err(|e| jni_err("getResources->l", e))?;

        let j_name: JString = env
            .new_string("status_bar_height")
            .map_err(|e| jni_err("new_string", e))?;
        let j_type: JString = env
            .new_string("dimen")
            .map_err(|e| jni_err("new_string", e))?;
        let j_pkg: JString = env
            .new_string("android")
            .map_err(|e| jni_err("new_string", e))?;

        let res_id = env
            .call_method(
                &resources,
                "getIdentifier",
                "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)I",
                &[
                    JValue::Object(&j_name),
                    JValue::Object(&j_type),
                    JValue::Object(&j_pkg),
                ],
            )
            .map_err(|e| jni_err("getIdentifier", e))?
            .i()
            .map_err(|e| jni_err("getIdentifier->i", e))?;

        if res_id == 0 {
            return Err(StellwerkError::Bridge(
                "status_bar_height resource not found".into(),
            ));
        }

        let height = env
            .call_method(
                &resources,
                "getDimensionPixelSize",
                "(I)I",
                &[JValue::Int(res_id)],
            )
            .map_err(|e| jni_err("getDimensionPixelSize", e))?
            .i()
            .map_err(|e| jni_err("getDimensionPixelSize->i", e))?;

        Ok((0, height.max(0) as u32))
    }

    fn set_immersive_mode(&self, enabled: bool) -> Result<()> {
        self.set_system_ui_flags(if enabled { IMMERSIVE_FLAGS } else { 0 })
    }
}

impl AndroidBridge {
    fn decor_view(&self, env: &mut JNIEnv<'_>) -> Result<JObject<'static>> {
        let activity = activity()?;
        let window = env
            .call_method(&activity, "getWindow", "()Landroid/view/Window;", &[])
            .map_err(|e| jni_err("getWindow", e))?
            .l()
            .map_err(|e| jni_err("getWindow->l", e))?;
        let decor = env
            .call_method(&window, "getDecorView", "()Landroid/view/View;", &[])
            .map_err(|e| jni_err("getDecorView", e))?
            .l()
            .map_err(|e| jni_err("getDecorView->l", e))?;
        // SAFETY: local ref promoted only for the duration of the calling
        // method; the decor view outlives any single bridge call.
        Ok(unsafe { JObject::from_raw(decor.into_raw()) })
    }

    fn set_system_ui_flags(&self, flags: jint) -> Result<()> {
        let mut env = jni_env()?;
        let decor = self.decor_view(&mut env)?;
        env.call_method(
            &decor,
            "setSystemUiVisibility",
            "(I)V",
            &[JValue::Int(flags)],
        )
        .map_err(|e| jni_err("setSystemUiVisibility", e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeShare — Intent.ACTION_SEND
// ---------------------------------------------------------------------------

impl NativeShare for AndroidBridge {
    fn share_text(&self, dialog_title: &str, text: &str) -> Result<()> {
        let mut env = jni_env()?;

        tracing::info!(bytes = text.len(), "Android: dispatching share intent");
        let j_title: JString = env
            .new_string(dialog_title)
            .map_err(|e| jni_err("new_string(title)", e))?;
        let j_text: JString = env
            .new_string(text)
            .map_err(|e| jni_err("new_string(text)", e))?;
        call_helper(
            &mut env,
            "shareText",
            "(Ljava/lang/String;Ljava/lang/String;)V",
            &[JValue::Object(&j_title), JValue::Object(&j_text)],
        )
    }
}

// ---------------------------------------------------------------------------
// NativeKeyboard — InputMethodManager
// ---------------------------------------------------------------------------

impl NativeKeyboard for AndroidBridge {
    fn dismiss_keyboard(&self) -> Result<()> {
        let mut env = jni_env()?;
        call_helper(&mut env, "dismissKeyboard", "()V", &[])
    }
}

// ---------------------------------------------------------------------------
// NativeAppShell
// ---------------------------------------------------------------------------

impl NativeAppShell for AndroidBridge {
    fn set_app_icon_badge(&self, _count: u32) -> Result<()> {
        // Stock Android has no icon badge API; launcher-specific hacks
        // are out of scope.
        Err(StellwerkError::PlatformUnavailable)
    }

    fn open_url_in_browser(&self, url: &str) -> Result<()> {
        let mut env = jni_env()?;
        let j_url: JString = env
            .new_string(url)
            .map_err(|e| jni_err("new_string(url)", e))?;
        call_helper(
            &mut env,
            "openUrl",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&j_url)],
        )
    }

    fn open_app_settings(&self) -> Result<()> {
        let mut env = jni_env()?;
        call_helper(&mut env, "openAppSettings", "()V", &[])
    }

    fn device_model(&self) -> Result<String> {
        let mut env = jni_env()?;
        let model = env
            .get_static_field("android/os/Build", "MODEL", "Ljava/lang/String;")
            .map_err(|e| jni_err("Build.MODEL", e))?
            .l()
            .map_err(|e| jni_err("Build.MODEL->l", e))?;
        let model: String = env
            .get_string(&JString::from(model))
            .map_err(|e| jni_err("Build.MODEL->string", e))?
            .into();
        Ok(model)
    }

    fn is_tablet(&self) -> Result<bool> {
        let mut env = jni_env()?;
        let activity = activity()?;

        let resources = env
            .call_method(
                &activity,
                "getResources",
                "()Landroid/content/res/Resources;",
                &[],
            )
            .map_err(|e| jni_err("getResources", e))?
            .l()
            .map_err(|e| jni_err("getResources->l", e))?;
        let configuration = env
            .call_method(
                &resources,
                "getConfiguration",
                "()Landroid/content/res/Configuration;",
                &[],
            )
            .map_err(|e| jni_err("getConfiguration", e))?
            .l()
            .map_err(|e| jni_err("getConfiguration->l", e))?;
        let smallest_width = env
            .get_field(&configuration, "smallestScreenWidthDp", "I")
            .map_err(|e| jni_err("smallestScreenWidthDp", e))?
            .i()
            .map_err(|e| jni_err("smallestScreenWidthDp->i", e))?;

        Ok(smallest_width >= 600)
    }
}

// ---------------------------------------------------------------------------
// JNI exports — BridgeHelper reports results through these. Each converts
// its arguments and forwards into the callback layer, which dispatches
// through the installed router.
// ---------------------------------------------------------------------------

fn jstring_arg(env: &mut JNIEnv<'_>, value: JString<'_>, what: &str) -> Option<String> {
    match env.get_string(&value) {
        Ok(s) => Some(s.into()),
        Err(e) => {
            tracing::warn!("failed to read {what} from JNI callback: {e}");
            None
        }
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeBackButtonPressed(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    callbacks::back_button_pressed();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeMenuButtonPressed(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    callbacks::menu_button_pressed();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeAlertDialogClicked(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    button_index: jint,
) {
    callbacks::alert_dialog_clicked(button_index);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeDatePicked(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    year: jint,
    month: jint,
    day: jint,
) {
    callbacks::date_picked(year, month.max(0) as u32, day.max(0) as u32);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeDatePickerCancelled(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    callbacks::date_picker_cancelled();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeTimePicked(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    hour: jint,
    minute: jint,
) {
    callbacks::time_picked(hour.max(0) as u32, minute.max(0) as u32);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeTimePickerCancelled(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    callbacks::time_picker_cancelled();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeCameraCaptured(
    mut env: JNIEnv<'_>,
    _class: JClass<'_>,
    capture_path: JString<'_>,
) {
    if let Some(path) = jstring_arg(&mut env, capture_path, "capture path") {
        callbacks::camera_captured(&path);
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeCameraCaptureCancelled(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    callbacks::camera_capture_cancelled();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeFileSelected(
    mut env: JNIEnv<'_>,
    _class: JClass<'_>,
    file_path: JString<'_>,
) {
    if let Some(path) = jstring_arg(&mut env, file_path, "file path") {
        callbacks::file_selected(&path);
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeFileSelectionCancelled(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    callbacks::file_selection_cancelled();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeKeyboardHeightChanged(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    height: jint,
) {
    callbacks::keyboard_height_changed(height);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeOpenedWithUrl(
    mut env: JNIEnv<'_>,
    _class: JClass<'_>,
    url: JString<'_>,
) {
    if let Some(url) = jstring_arg(&mut env, url, "launch url") {
        callbacks::opened_with_url(&url);
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeOpenedWithoutUrl(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    callbacks::opened_without_url();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_stellwerk_BridgeHelper_nativeNotificationReceived(
    mut env: JNIEnv<'_>,
    _class: JClass<'_>,
    tag: JString<'_>,
    id: jint,
    manager_name: JString<'_>,
) {
    let Some(tag) = jstring_arg(&mut env, tag, "notification tag") else {
        return;
    };
    let Some(manager) = jstring_arg(&mut env, manager_name, "notification manager name") else {
        return;
    };
    callbacks::notification_received(&tag, id, &manager);
}
