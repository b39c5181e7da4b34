//! Procedural bug-population generation and replenishment.

use rand::Rng;

use crate::bug::{Bug, GROUND_SPECIES, Species};
use crate::constants::{
    GLOW_ENDURANCE_RANGE, GNAT_ENDURANCE, GUARANTEED_GNATS, KING_ENDURANCE_RANGE, POPULATION_MAX,
    POPULATION_MIN, REGULAR_ENDURANCE_RANGE, REPLENISH_THRESHOLD, SPAWN_GLOW_BAND_END,
    SPAWN_GNAT_BAND_END, SPAWN_KING_BAND_END, VELOCITY_LIMIT,
};
use crate::ident::BugIdMint;
use crate::state::{MapBugs, MapSize};

/// Spawn class resolved from one uniform draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpawnClass {
    Gnat,
    King,
    Glow,
    Regular,
}

/// Classify one uniform draw in [0, 1) into a spawn class. The bands are
/// disjoint and exhaustive.
fn classify(roll: f64) -> SpawnClass {
    if roll < SPAWN_GNAT_BAND_END {
        SpawnClass::Gnat
    } else if roll < SPAWN_KING_BAND_END {
        SpawnClass::King
    } else if roll < SPAWN_GLOW_BAND_END {
        SpawnClass::Glow
    } else {
        SpawnClass::Regular
    }
}

fn ground_species(rng: &mut impl Rng) -> Species {
    GROUND_SPECIES[rng.gen_range(0..GROUND_SPECIES.len())]
}

fn spawn_bug(class: SpawnClass, size: MapSize, mint: &mut BugIdMint, rng: &mut impl Rng) -> Bug {
    let (species, is_king, endurance) = match class {
        SpawnClass::Gnat => (Species::Gnat, false, GNAT_ENDURANCE),
        SpawnClass::King => {
            let (lo, hi) = KING_ENDURANCE_RANGE;
            (ground_species(rng), true, rng.gen_range(lo..=hi))
        }
        SpawnClass::Glow => {
            let (lo, hi) = GLOW_ENDURANCE_RANGE;
            (Species::GlowBug, false, rng.gen_range(lo..=hi))
        }
        SpawnClass::Regular => {
            let (lo, hi) = REGULAR_ENDURANCE_RANGE;
            (ground_species(rng), false, rng.gen_range(lo..=hi))
        }
    };

    let mut bug = Bug::new(mint.mint(rng), species, is_king, endurance);
    bug.x = rng.gen_range(0.0..size.width);
    bug.y = rng.gen_range(0.0..size.height);
    bug.dx = rng.gen_range(-VELOCITY_LIMIT..VELOCITY_LIMIT);
    bug.dy = rng.gen_range(-VELOCITY_LIMIT..VELOCITY_LIMIT);
    bug
}

/// Spawn one bug through the banded classification draw.
fn spawn_classified(size: MapSize, mint: &mut BugIdMint, rng: &mut impl Rng) -> Bug {
    let class = classify(rng.gen_range(0.0..1.0));
    spawn_bug(class, size, mint, rng)
}

/// Generate a fresh population for a map of the given size: 7 to 15 bugs,
/// the first two always Gnats, the rest classified independently.
#[must_use]
pub fn generate(size: MapSize, mint: &mut BugIdMint, rng: &mut impl Rng) -> MapBugs {
    let count = rng.gen_range(POPULATION_MIN..=POPULATION_MAX);
    let mut bugs = MapBugs::new();
    for _ in 0..GUARANTEED_GNATS {
        bugs.push(spawn_bug(SpawnClass::Gnat, size, mint, rng));
    }
    while bugs.len() < count {
        bugs.push(spawn_classified(size, mint, rng));
    }
    bugs
}

/// Replenish after a capture: a population at or under the spawn floor
/// gains exactly one fresh bug. Returns whether a bug was appended.
pub fn replenish(
    bugs: &mut MapBugs,
    size: MapSize,
    mint: &mut BugIdMint,
    rng: &mut impl Rng,
) -> bool {
    if bugs.len() >= REPLENISH_THRESHOLD {
        return false;
    }
    bugs.push(spawn_classified(size, mint, rng));
    true
}
