// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Stellwerk.

use thiserror::Error;

use crate::types::InstanceId;

/// Top-level error type for all Stellwerk operations.
///
/// Nothing in here is fatal to the process. Registry and election
/// operations report failures synchronously to their caller; the event
/// dispatcher never surfaces an error to the native side because
/// fire-and-forget callbacks have no caller positioned to act on one.
#[derive(Debug, Error)]
pub enum StellwerkError {
    // -- Routing errors --
    #[error("no registered instance with id {0}")]
    InvalidInstance(InstanceId),

    // -- Dialog configuration --
    #[error("invalid dialog configuration: {0}")]
    InvalidDialogConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StellwerkError>;
