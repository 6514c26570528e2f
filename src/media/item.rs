//! Media item representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of media content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    /// Identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" => Ok(MediaKind::Video),
            "image" | "photo" => Ok(MediaKind::Image),
            _ => Err(format!("Unknown media type: {}", s)),
        }
    }
}

/// One downloadable unit discovered by parsing a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Ordinal id, unique within one parse result. Starts at 1.
    pub id: usize,

    /// Video or image.
    pub kind: MediaKind,

    /// Backend-addressable URL of this media unit (not the post URL).
    pub source_url: String,

    /// Preview image, when the backend provides one.
    pub thumbnail_url: Option<String>,

    /// Display duration, videos only.
    pub duration: Option<String>,

    /// Whether the item takes part in the next run. Items start selected.
    pub selected: bool,
}

impl MediaItem {
    /// Create a selected item with no thumbnail or duration.
    pub fn new(id: usize, kind: MediaKind, source_url: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            source_url: source_url.into(),
            thumbnail_url: None,
            duration: None,
            selected: true,
        }
    }

    /// Short label for console output, e.g. `#2 video (0:15)`.
    pub fn label(&self) -> String {
        match &self.duration {
            Some(duration) => format!("#{} {} ({})", self.id, self.kind, duration),
            None => format!("#{} {}", self.id, self.kind),
        }
    }
}
