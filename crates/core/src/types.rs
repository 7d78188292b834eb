use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Target screen orientation of a generated wallpaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Pixel dimensions requested from image providers.
    pub fn dimensions(self) -> Dimensions {
        match self {
            Orientation::Portrait => Dimensions {
                width: 1080,
                height: 1920,
            },
            Orientation::Landscape => Dimensions {
                width: 1920,
                height: 1080,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Orientation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(CoreError::Validation(format!(
                "Invalid orientation '{other}'. Must be one of: portrait, landscape"
            ))),
        }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// Media kind
// ---------------------------------------------------------------------------

/// Kind of media a generation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Host platform of the delivery surface.
///
/// Only Android exposes a share target that can apply a wallpaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Android,
    Ios,
    Desktop,
}

impl Platform {
    /// Whether the share sheet offers a "set as wallpaper" target.
    pub fn can_set_wallpaper(self) -> bool {
        matches!(self, Platform::Android)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn portrait_is_tall() {
        let d = Orientation::Portrait.dimensions();
        assert_eq!((d.width, d.height), (1080, 1920));
    }

    #[test]
    fn landscape_is_wide() {
        let d = Orientation::Landscape.dimensions();
        assert_eq!((d.width, d.height), (1920, 1080));
    }

    #[test]
    fn orientation_parses_case_insensitively() {
        assert_eq!("Portrait".parse::<Orientation>().unwrap(), Orientation::Portrait);
        assert_eq!(" landscape ".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert_matches!("square".parse::<Orientation>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn orientation_serializes_lowercase() {
        let json = serde_json::to_string(&Orientation::Landscape).unwrap();
        assert_eq!(json, "\"landscape\"");
    }

    #[test]
    fn only_android_can_set_wallpaper() {
        assert!(Platform::Android.can_set_wallpaper());
        assert!(!Platform::Ios.can_set_wallpaper());
        assert!(!Platform::Web.can_set_wallpaper());
        assert!(!Platform::Desktop.can_set_wallpaper());
    }
}
