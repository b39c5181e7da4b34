//! Player, inventory, and the persisted root aggregate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::bug::Bug;
use crate::constants::{
    DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, PLAYER_ENDURANCE_BASELINE, PLAYER_ENDURANCE_MAX,
    PLAYER_VICIOUSNESS_BASELINE, PLAYER_VICIOUSNESS_MAX, SESSION_LOG_CAP,
};
use crate::ident::BugId;
use crate::numbers::viewport_to_extent;

/// Map population, capped at 15 bugs and held inline.
pub type MapBugs = SmallVec<[Bug; 16]>;

/// Consumable battle items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    GnatWing,
    StagHorn,
}

impl Item {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GnatWing => "gnat wing",
            Self::StagHorn => "stag horn",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item `{0}`")]
pub struct ParseItemError(String);

impl FromStr for Item {
    type Err = ParseItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gnat wing" => Ok(Self::GnatWing),
            "stag horn" => Ok(Self::StagHorn),
            other => Err(ParseItemError(other.to_string())),
        }
    }
}

/// Item multiset. Insertion order is irrelevant to gameplay but preserved
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    /// Append one item.
    pub fn grant(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove one instance of `item`; false when none is held.
    pub fn remove_one(&mut self, item: Item) -> bool {
        if let Some(idx) = self.items.iter().position(|held| *held == item) {
            self.items.remove(idx);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn count(&self, item: Item) -> usize {
        self.items.iter().filter(|held| **held == item).count()
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Player stats and held items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub endurance: i32,
    pub viciousness: i32,
    #[serde(default)]
    pub inventory: Inventory,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            endurance: PLAYER_ENDURANCE_BASELINE,
            viciousness: PLAYER_VICIOUSNESS_BASELINE,
            inventory: Inventory::default(),
        }
    }
}

impl Player {
    /// Clamp stats to their valid ranges. Called after every mutation.
    pub fn clamp(&mut self) {
        self.endurance = self.endurance.clamp(0, PLAYER_ENDURANCE_MAX);
        self.viciousness = self.viciousness.clamp(0, PLAYER_VICIOUSNESS_MAX);
    }

    /// Post-battle regeneration to the map baseline; inventory is untouched.
    pub fn reset_for_map(&mut self) {
        self.endurance = PLAYER_ENDURANCE_BASELINE;
        self.viciousness = PLAYER_VICIOUSNESS_BASELINE;
    }
}

/// Map extent in position units, derived from the rendered container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    pub width: f32,
    pub height: f32,
}

impl Default for MapSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
        }
    }
}

impl MapSize {
    /// Build from raw viewport dimensions. A degenerate axis (non-finite,
    /// zero, negative) falls back to the default extent for that axis.
    #[must_use]
    pub fn from_viewport(width: f64, height: f64) -> Self {
        let width = viewport_to_extent(width);
        let height = viewport_to_extent(height);
        Self {
            width: if width >= 1.0 { width } else { DEFAULT_MAP_WIDTH },
            height: if height >= 1.0 {
                height
            } else {
                DEFAULT_MAP_HEIGHT
            },
        }
    }
}

/// Root aggregate, persisted as a whole under [`crate::SAVE_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameState {
    #[serde(default)]
    pub caught_bugs: Vec<Bug>,
    #[serde(default)]
    pub map_bugs: MapBugs,
    #[serde(default)]
    pub player: Player,
    #[serde(default)]
    pub map_size: MapSize,
    /// Next id-mint sequence; persisted so loads never re-issue live ids.
    #[serde(default)]
    pub next_bug_seq: u64,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl GameState {
    /// Append a log key, dropping the oldest entries past the cap.
    pub fn push_log(&mut self, key: impl Into<String>) {
        self.logs.push(key.into());
        if self.logs.len() > SESSION_LOG_CAP {
            let excess = self.logs.len() - SESSION_LOG_CAP;
            self.logs.drain(..excess);
        }
    }

    #[must_use]
    pub fn map_bug(&self, id: BugId) -> Option<&Bug> {
        self.map_bugs.iter().find(|bug| bug.id == id)
    }

    /// Remove a bug from the map population, returning it if present.
    pub fn take_map_bug(&mut self, id: BugId) -> Option<Bug> {
        let idx = self.map_bugs.iter().position(|bug| bug.id == id)?;
        Some(self.map_bugs.remove(idx))
    }
}
