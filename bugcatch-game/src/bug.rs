//! Bug entity and species model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ident::BugId;
use crate::numbers::position_to_pixel;

/// Species determine combat behavior, not just flavor: Gnats award an item
/// on capture, Glow Bugs hit softly, Stag Beetles never miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Gnat,
    GlowBug,
    Beetle,
    Ant,
    Mantis,
    Roach,
    Stag,
}

/// Ground species eligible for King and regular spawns.
pub const GROUND_SPECIES: [Species; 5] = [
    Species::Beetle,
    Species::Ant,
    Species::Mantis,
    Species::Roach,
    Species::Stag,
];

impl Species {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gnat => "gnat",
            Self::GlowBug => "glow_bug",
            Self::Beetle => "beetle",
            Self::Ant => "ant",
            Self::Mantis => "mantis",
            Self::Roach => "roach",
            Self::Stag => "stag",
        }
    }

    /// Player-facing species name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Gnat => "Gnat",
            Self::GlowBug => "Glow Bug",
            Self::Beetle => "Beetle",
            Self::Ant => "Ant",
            Self::Mantis => "Mantis",
            Self::Roach => "Roach",
            Self::Stag => "Stag Beetle",
        }
    }

    /// Gnats and Glow Bugs are never King.
    #[must_use]
    pub const fn can_be_king(self) -> bool {
        !matches!(self, Self::Gnat | Self::GlowBug)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gnat" => Ok(Self::Gnat),
            "glow_bug" => Ok(Self::GlowBug),
            "beetle" => Ok(Self::Beetle),
            "ant" => Ok(Self::Ant),
            "mantis" => Ok(Self::Mantis),
            "roach" => Ok(Self::Roach),
            "stag" => Ok(Self::Stag),
            _ => Err(()),
        }
    }
}

/// One bug, owned by whichever collection currently holds it — the roaming
/// map population or the caught list. Position and velocity are only
/// meaningful while roaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bug {
    pub id: BugId,
    pub species: Species,
    #[serde(default)]
    pub is_king: bool,
    pub name: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
    pub endurance: i32,
}

impl Bug {
    /// Construct a bug at rest at the origin; the spawner fills in motion.
    #[must_use]
    pub fn new(id: BugId, species: Species, is_king: bool, endurance: i32) -> Self {
        debug_assert!(!is_king || species.can_be_king());
        Self {
            id,
            species,
            is_king,
            name: compose_name(species, is_king),
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            endurance,
        }
    }

    #[must_use]
    pub const fn is_gnat(&self) -> bool {
        matches!(self.species, Species::Gnat)
    }

    #[must_use]
    pub const fn is_glow_bug(&self) -> bool {
        matches!(self.species, Species::GlowBug)
    }

    #[must_use]
    pub const fn is_stag(&self) -> bool {
        matches!(self.species, Species::Stag)
    }

    /// Current position on the integer pixel grid, for positioned rendering.
    #[must_use]
    pub fn pixel_pos(&self) -> (i32, i32) {
        (position_to_pixel(self.x), position_to_pixel(self.y))
    }
}

fn compose_name(species: Species, is_king: bool) -> String {
    if is_king {
        format!("King {}", species.display_name())
    } else {
        species.display_name().to_string()
    }
}
