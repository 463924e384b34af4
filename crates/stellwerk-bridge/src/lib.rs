// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stellwerk — Native platform bridge abstractions.
//
// This crate defines the trait seams through which the UI layer asks the
// OS to present native widgets (alerts, pickers, camera, status bar), and
// the callback glue through which the OS reports results back into the
// event router. Presentation calls are synchronous "show it" requests
// that return immediately; every result arrives later as a routed event.

pub mod callbacks;
pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

/// Retrieves the bridge implementation for the target operating system.
pub fn platform_bridge() -> Box<dyn traits::PlatformBridge> {
    #[cfg(target_os = "ios")]
    {
        // iOS: `objc2` message passing into UIKit plus an Objective-C
        // presenter helper for widgets that need a delegate.
        Box::new(ios::IosBridge::new())
    }
    #[cfg(target_os = "android")]
    {
        // Android: `jni-rs` calls into the ART runtime and a Java helper
        // class for Activity-result flows.
        Box::new(android::AndroidBridge::new())
    }
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        // DESKTOP/CI: a mock implementation so non-native builds link.
        Box::new(stub::StubBridge)
    }
}
