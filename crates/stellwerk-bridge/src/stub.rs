// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are
// unavailable.
//
// Every trait method returns `PlatformUnavailable` — real implementations
// live in the `ios` and `android` modules.

use stellwerk_core::config::DialogConfig;
use stellwerk_core::error::{Result, StellwerkError};

use crate::traits::*;

/// No-op bridge returned on non-mobile platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeDialog for StubBridge {
    fn show_alert_dialog(&self, config: &DialogConfig) -> Result<()> {
        tracing::warn!(title = ?config.title, "NativeDialog::show_alert_dialog called on stub bridge");
        Err(StellwerkError::PlatformUnavailable)
    }

    fn show_action_sheet(&self, _title: &str, _message: &str, _buttons: &[String]) -> Result<()> {
        tracing::warn!("NativeDialog::show_action_sheet called on stub bridge");
        Err(StellwerkError::PlatformUnavailable)
    }
}

impl NativePickers for StubBridge {
    fn show_date_picker(&self) -> Result<()> {
        tracing::warn!("NativePickers::show_date_picker called on stub bridge");
        Err(StellwerkError::PlatformUnavailable)
    }

    fn show_time_picker(&self) -> Result<()> {
        tracing::warn!("NativePickers::show_time_picker called on stub bridge");
        Err(StellwerkError::PlatformUnavailable)
    }
}

impl NativeCamera for StubBridge {
    fn show_camera(&self, _file_name: &str) -> Result<()> {
        tracing::warn!("NativeCamera::show_camera called on stub bridge");
        Err(StellwerkError::PlatformUnavailable)
    }
}

impl NativeGallery for StubBridge {
    fn open_gallery(&self) -> Result<()> {
        tracing::warn!("NativeGallery::open_gallery called on stub bridge");
        Err(StellwerkError::PlatformUnavailable)
    }
}

impl NativeToast for StubBridge {
    fn show_toast(&self, _text: &str, _long_duration: bool) -> Result<()> {
        Err(StellwerkError::PlatformUnavailable)
    }
}

impl NativeStatusBar for StubBridge {
    fn set_status_bar_color(&self, _color: &str) -> Result<()> {
        Err(StellwerkError::PlatformUnavailable)
    }

    fn status_bar_color(&self) -> Result<String> {
        Err(StellwerkError::PlatformUnavailable)
    }

    fn set_status_bar_visible(&self, _visible: bool) -> Result<()> {
        Err(StellwerkError::PlatformUnavailable)
    }

    fn is_status_bar_visible(&self) -> Result<bool> {
        Err(StellwerkError::PlatformUnavailable)
    }

    fn status_bar_size(&self) -> Result<(u32, u32)> {
        Err(StellwerkError::PlatformUnavailable)
    }

    fn set_immersive_mode(&self, _enabled: bool) -> Result<()> {
        Err(StellwerkError::PlatformUnavailable)
    }
}

impl NativeShare for StubBridge {
    fn share_text(&self, _dialog_title: &str, _text: &str) -> Result<()> {
        tracing::warn!("NativeShare::share_text called on stub bridge");
        Err(StellwerkError::PlatformUnavailable)
    }
}

impl NativeKeyboard for StubBridge {
    fn dismiss_keyboard(&self) -> Result<()> {
        Err(StellwerkError::PlatformUnavailable)
    }
}

impl NativeAppShell for StubBridge {
    fn set_app_icon_badge(&self, _count: u32) -> Result<()> {
        Err(StellwerkError::PlatformUnavailable)
    }

    fn open_url_in_browser(&self, _url: &str) -> Result<()> {
        tracing::warn!("NativeAppShell::open_url_in_browser called on stub bridge");
        Err(StellwerkError::PlatformUnavailable)
    }

    fn open_app_settings(&self) -> Result<()> {
        Err(StellwerkError::PlatformUnavailable)
    }

    fn device_model(&self) -> Result<String> {
        Err(StellwerkError::PlatformUnavailable)
    }

    fn is_tablet(&self) -> Result<bool> {
        Err(StellwerkError::PlatformUnavailable)
    }
}
