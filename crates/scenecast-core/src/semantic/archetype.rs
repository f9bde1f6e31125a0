//! Diagram archetypes.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// The visual family a scene is drawn as.
///
/// The names match external configuration and output strings (snake_case).
/// Declaration order doubles as the deterministic tie-break order used by
/// classification.
///
/// # Variants
///
/// - `Flow` - Sequential process, left to right (default)
/// - `Tree` - Single-rooted hierarchy, top to bottom
/// - `Timeline` - Dated or ordinal chain along one axis
/// - `Matrix` - Options compared across criteria, laid out on a grid
/// - `Cycle` - Closed loop of recurring phases
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    #[default]
    Flow,
    Tree,
    Timeline,
    Matrix,
    Cycle,
}

impl Archetype {
    /// Every archetype in declaration order.
    pub const ALL: [Archetype; 5] = [
        Archetype::Flow,
        Archetype::Tree,
        Archetype::Timeline,
        Archetype::Matrix,
        Archetype::Cycle,
    ];
}

impl FromStr for Archetype {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flow" => Ok(Self::Flow),
            "tree" => Ok(Self::Tree),
            "timeline" => Ok(Self::Timeline),
            "matrix" => Ok(Self::Matrix),
            "cycle" => Ok(Self::Cycle),
            _ => Err("Unsupported diagram archetype"),
        }
    }
}

impl From<Archetype> for &'static str {
    fn from(val: Archetype) -> Self {
        match val {
            Archetype::Flow => "flow",
            Archetype::Tree => "tree",
            Archetype::Timeline => "timeline",
            Archetype::Matrix => "matrix",
            Archetype::Cycle => "cycle",
        }
    }
}

impl Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}
