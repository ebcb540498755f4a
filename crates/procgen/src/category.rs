use std::fmt;
use std::str::FromStr;

use scene_core::Node;

use crate::{building, character, prop, robot};

/// Closed set of asset families; each knows its directory and stand-in generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetCategory {
    Character,
    Robot,
    Building,
    Prop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown asset category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl AssetCategory {
    pub const ALL: [AssetCategory; 4] = [
        AssetCategory::Character,
        AssetCategory::Robot,
        AssetCategory::Building,
        AssetCategory::Prop,
    ];

    /// Singular lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::Character => "character",
            AssetCategory::Robot => "robot",
            AssetCategory::Building => "building",
            AssetCategory::Prop => "prop",
        }
    }

    /// Directory under `models/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetCategory::Character => "characters",
            AssetCategory::Robot => "robots",
            AssetCategory::Building => "buildings",
            AssetCategory::Prop => "props",
        }
    }

    pub fn generator(self) -> fn(&str) -> Node {
        match self {
            AssetCategory::Character => character::generate,
            AssetCategory::Robot => robot::generate,
            AssetCategory::Building => building::generate,
            AssetCategory::Prop => prop::generate,
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        AssetCategory::ALL
            .into_iter()
            .find(|c| t == c.as_str() || t == c.dir_name())
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
