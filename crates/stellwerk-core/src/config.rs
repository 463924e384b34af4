// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dialog configuration consumed when presenting native alert dialogs.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StellwerkError};

/// Result code reported when the positive button is clicked.
pub const BUTTON_POSITIVE: i32 = 1;
/// Result code reported when the neutral button is clicked.
pub const BUTTON_NEUTRAL: i32 = 0;
/// Result code reported when the negative button is clicked.
pub const BUTTON_NEGATIVE: i32 = -1;

/// Key/value configuration for a native alert dialog.
///
/// The native side hands this over as a nested key/value map; recognized
/// keys are `title`, `message`, the three button labels, and `items`.
/// `items` is mutually exclusive with the button labels — see
/// [`DialogConfig::presentation`] for the precedence rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Positive button label (reported as [`BUTTON_POSITIVE`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<String>,
    /// Negative button label (reported as [`BUTTON_NEGATIVE`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,
    /// Neutral button label (reported as [`BUTTON_NEUTRAL`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<String>,
    /// Item list; selections are reported as the item index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

/// Resolved presentation mode for a dialog configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogPresentation<'a> {
    /// Button-based dialog. At least one label is present.
    Buttons {
        positive: Option<&'a str>,
        negative: Option<&'a str>,
        neutral: Option<&'a str>,
    },
    /// Item-list dialog; indexes are reported on selection.
    Items(&'a [String]),
}

impl DialogConfig {
    /// Parse a dialog configuration from a raw JSON map as received from
    /// the native side. Unknown keys are ignored.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value.clone())?;
        config.presentation()?;
        Ok(config)
    }

    /// Resolve which presentation this configuration asks for.
    ///
    /// Precedence: a `message` forces button presentation (`items` is
    /// ignored); otherwise a non-empty `items` list wins over any button
    /// labels. A configuration with neither buttons nor items is rejected.
    pub fn presentation(&self) -> Result<DialogPresentation<'_>> {
        if self.message.is_none() && !self.items.is_empty() {
            return Ok(DialogPresentation::Items(&self.items));
        }
        if self.has_buttons() {
            return Ok(DialogPresentation::Buttons {
                positive: self.positive.as_deref(),
                negative: self.negative.as_deref(),
                neutral: self.neutral.as_deref(),
            });
        }
        Err(StellwerkError::InvalidDialogConfig(
            "at least one button label or a non-empty items list is required".into(),
        ))
    }

    fn has_buttons(&self) -> bool {
        self.positive.is_some() || self.negative.is_some() || self.neutral.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn items_win_without_message() {
        let config = DialogConfig {
            title: Some("Select An Item".into()),
            positive: Some("Yes".into()),
            items: vec!["Item 1".into(), "Item 2".into()],
            ..Default::default()
        };

        match config.presentation().expect("valid config") {
            DialogPresentation::Items(items) => assert_eq!(items.len(), 2),
            other => panic!("expected items presentation, got {other:?}"),
        }
    }

    #[test]
    fn message_forces_buttons() {
        let config = DialogConfig {
            title: Some("Would you?".into()),
            message: Some("Would you not?".into()),
            positive: Some("Yes".into()),
            items: vec!["ignored".into()],
            ..Default::default()
        };

        match config.presentation().expect("valid config") {
            DialogPresentation::Buttons { positive, .. } => {
                assert_eq!(positive, Some("Yes"));
            }
            other => panic!("expected buttons presentation, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_is_rejected() {
        let config = DialogConfig {
            title: Some("Title only".into()),
            ..Default::default()
        };
        assert!(config.presentation().is_err());
    }

    #[test]
    fn parses_raw_json_map() {
        let value = json!({
            "title": "Would you?",
            "message": "Would you not?",
            "positive": "Yes",
            "negative": "No",
            "neutral": "Maybe",
            "android_style": 3
        });

        let config = DialogConfig::from_value(&value).expect("parse");
        assert_eq!(config.negative.as_deref(), Some("No"));
        // Unknown keys such as android_style are ignored.
        assert!(config.items.is_empty());
    }

    #[test]
    fn rejects_json_without_buttons_or_items() {
        let value = json!({ "title": "nothing else" });
        assert!(DialogConfig::from_value(&value).is_err());
    }
}
