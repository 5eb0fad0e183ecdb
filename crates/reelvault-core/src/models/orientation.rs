use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Coarse aspect-ratio category; used only as a storage-key prefix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Storage-key namespace segment for this orientation.
    pub fn prefix(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape/",
            Orientation::Portrait => "portrait/",
            Orientation::Other => "other/",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Other => write!(f, "other"),
        }
    }
}
