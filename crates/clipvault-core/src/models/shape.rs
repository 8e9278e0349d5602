use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Shape of a video derived from its display aspect ratio.
///
/// Used as the first segment of every storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeClass {
    Landscape,
    Portrait,
    Other,
}

impl ShapeClass {
    /// Classify a probed ratio string. Matching is exact: `"16:9"` is
    /// landscape, `"9:16"` is portrait, and anything else is other.
    pub fn from_ratio(ratio: &str) -> Self {
        match ratio {
            "16:9" => ShapeClass::Landscape,
            "9:16" => ShapeClass::Portrait,
            _ => ShapeClass::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeClass::Landscape => "landscape",
            ShapeClass::Portrait => "portrait",
            ShapeClass::Other => "other",
        }
    }
}

impl Display for ShapeClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
