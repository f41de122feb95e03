//! Note Model
//!
//! The persisted unit shared by every widget instance: identity, status,
//! content source, geometry, and style.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::geometry::{Point, Rect, Size};

/// Store-assigned note identity.
pub type NoteId = i64;

/// Sentinel for a note the store has not assigned an id to yet.
pub const UNASSIGNED_NOTE_ID: NoteId = -1;

/// Lifecycle status of a note.
///
/// `Shown` and `Hidden` are user-controlled. `PendingPlacement` marks a record
/// created ahead of the widget instance that will adopt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    Shown,
    Hidden,
    PendingPlacement,
}

impl NoteStatus {
    /// The value stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Shown => "shown",
            NoteStatus::Hidden => "hidden",
            NoteStatus::PendingPlacement => "pending_placement",
        }
    }

    /// Parse a stored or user-supplied status value.
    ///
    /// Only the three enumerated values are accepted; anything else is an
    /// `InvalidStatus` error.
    pub fn parse(value: &str) -> CoreResult<Self> {
        match value {
            "shown" => Ok(NoteStatus::Shown),
            "hidden" => Ok(NoteStatus::Hidden),
            "pending_placement" => Ok(NoteStatus::PendingPlacement),
            other => Err(CoreError::invalid_status(other)),
        }
    }

    /// The status the management view flips to. Pending notes have no toggle.
    pub fn toggled(&self) -> Option<Self> {
        match self {
            NoteStatus::Shown => Some(NoteStatus::Hidden),
            NoteStatus::Hidden => Some(NoteStatus::Shown),
            NoteStatus::PendingPlacement => None,
        }
    }
}

impl Default for NoteStatus {
    fn default() -> Self {
        NoteStatus::Shown
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Visual style of a note, persisted as an opaque JSON blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteStyle {
    /// 0.0 (fully transparent) to 1.0 (opaque)
    pub transparency: f64,
    /// `#RRGGBB`
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    /// Inner margin in pixels
    pub margin: i32,
}

impl Default for NoteStyle {
    fn default() -> Self {
        Self {
            transparency: 1.0,
            background_color: "#FFFFE0".to_string(),
            margin: 10,
        }
    }
}

impl NoteStyle {
    /// Validate the style ranges
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.transparency) {
            return Err(CoreError::validation(format!(
                "transparency must be within [0.0, 1.0], got {}",
                self.transparency
            )));
        }
        if !is_hex_rgb(&self.background_color) {
            return Err(CoreError::validation(format!(
                "backgroundColor must be #RRGGBB, got '{}'",
                self.background_color
            )));
        }
        if self.margin < 0 {
            return Err(CoreError::validation(format!(
                "margin must be >= 0, got {}",
                self.margin
            )));
        }
        Ok(())
    }

    /// Serialize to the compact blob stored in the `style` column.
    pub fn to_blob(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored blob. Missing keys take their defaults; a missing or
    /// unreadable blob yields the default style.
    pub fn from_blob(blob: Option<&str>) -> Self {
        blob.and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

/// Returns true for `#RRGGBB` strings.
pub fn is_hex_rgb(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// A single note as stored in the `notes` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub status: NoteStatus,
    /// Absolute path of the content source, `None` until one is bound
    pub filepath: Option<String>,
    pub position: Point,
    pub size: Size,
    pub style: NoteStyle,
}

impl Default for NoteRecord {
    fn default() -> Self {
        Self {
            id: UNASSIGNED_NOTE_ID,
            status: NoteStatus::Shown,
            filepath: None,
            position: Point::new(50, 50),
            size: Size::new(200, 150),
            style: NoteStyle::default(),
        }
    }
}

impl NoteRecord {
    /// A default note awaiting adoption at the given position.
    pub fn pending_at(position: Point) -> Self {
        Self {
            status: NoteStatus::PendingPlacement,
            position,
            ..Self::default()
        }
    }

    /// Whether the store has assigned this record an id
    pub fn is_assigned(&self) -> bool {
        self.id != UNASSIGNED_NOTE_ID
    }

    /// Whether a content source is bound
    pub fn has_file(&self) -> bool {
        self.filepath.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.position = bounds.origin();
        self.size = bounds.size();
    }
}
