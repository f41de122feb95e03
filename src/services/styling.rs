//! Style Editing
//!
//! The styling dialog never touches the owner's style directly. It works on
//! its own copy inside a [`StyleEditSession`] and reports every change as a
//! [`StyleEvent`]; the owner previews proposals, persists confirmations and
//! restores the original on cancellation.

use serde::{Deserialize, Serialize};

use desktop_notes_core::{is_hex_rgb, NoteStyle};

use crate::utils::error::{AppError, AppResult};

/// A single change made in the dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum StyleEdit {
    Transparency(f64),
    BackgroundColor(String),
    Margin(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleEvent {
    /// Preview only
    Proposed { style: NoteStyle },
    /// Persist this style
    Confirmed { style: NoteStyle },
    /// Discard all proposals and show `original` again
    Cancelled { original: NoteStyle },
}

#[derive(Debug, Clone)]
pub struct StyleEditSession {
    original: NoteStyle,
    working: NoteStyle,
}

impl StyleEditSession {
    pub fn begin(original: NoteStyle) -> Self {
        Self {
            working: original.clone(),
            original,
        }
    }

    pub fn original(&self) -> &NoteStyle {
        &self.original
    }

    pub fn working(&self) -> &NoteStyle {
        &self.working
    }

    /// Apply `edit` to the working copy.
    ///
    /// Transparency is clamped into `[0.0, 1.0]`. An invalid colour or a
    /// negative margin is rejected and leaves the working copy unchanged.
    pub fn propose(&mut self, edit: StyleEdit) -> AppResult<StyleEvent> {
        match edit {
            StyleEdit::Transparency(value) => {
                if value.is_nan() {
                    return Err(AppError::validation("transparency must be a number"));
                }
                self.working.transparency = value.clamp(0.0, 1.0);
            }
            StyleEdit::BackgroundColor(color) => {
                if !is_hex_rgb(&color) {
                    return Err(AppError::validation(format!(
                        "backgroundColor must be #RRGGBB, got '{}'",
                        color
                    )));
                }
                self.working.background_color = color;
            }
            StyleEdit::Margin(margin) => {
                if margin < 0 {
                    return Err(AppError::validation(format!(
                        "margin must be >= 0, got {}",
                        margin
                    )));
                }
                self.working.margin = margin;
            }
        }

        Ok(StyleEvent::Proposed {
            style: self.working.clone(),
        })
    }

    pub fn confirm(self) -> StyleEvent {
        StyleEvent::Confirmed {
            style: self.working,
        }
    }

    pub fn cancel(self) -> StyleEvent {
        StyleEvent::Cancelled {
            original: self.original,
        }
    }
}
