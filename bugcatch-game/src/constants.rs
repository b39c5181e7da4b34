//! Centralized balance and tuning constants for Bugcatch game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "BUGCATCH_DEBUG_LOGS";
pub(crate) const LOG_SESSION_FRESH: &str = "log.session.fresh";
pub(crate) const LOG_SESSION_RESUMED: &str = "log.session.resumed";
pub(crate) const LOG_NEW_GAME: &str = "log.session.new-game";
pub(crate) const LOG_BATTLE_STARTED: &str = "log.battle.started";
pub(crate) const LOG_BUG_CAPTURED: &str = "log.catch.captured";
pub(crate) const LOG_BUG_ESCAPED: &str = "log.catch.escaped";
pub(crate) const LOG_ITEM_GRANTED_GNAT_WING: &str = "log.item.granted.gnat-wing";
pub(crate) const LOG_ITEM_GRANTED_STAG_HORN: &str = "log.item.granted.stag-horn";
pub(crate) const LOG_MAP_REPLENISHED: &str = "log.map.replenished";
pub(crate) const LOG_MAP_REGENERATED: &str = "log.map.regenerated";

// Player tuning ------------------------------------------------------------
pub(crate) const PLAYER_ENDURANCE_BASELINE: i32 = 100;
pub(crate) const PLAYER_ENDURANCE_MAX: i32 = 150;
pub(crate) const PLAYER_VICIOUSNESS_BASELINE: i32 = 50;
pub(crate) const PLAYER_VICIOUSNESS_MAX: i32 = 50;

// Combat tuning ------------------------------------------------------------
pub(crate) const PUNCH_DAMAGE: i32 = 50;
pub(crate) const PUNCH_ENDURANCE_COST: i32 = 20;
pub(crate) const KICK_DAMAGE: i32 = 20;
pub(crate) const KICK_VICIOUSNESS_GAIN: i32 = 30;
pub(crate) const TAUNT_ENDURANCE_GAIN: i32 = 30;
pub(crate) const TAUNT_VICIOUSNESS_COST: i32 = 10;
pub(crate) const GNAT_WING_ENDURANCE: i32 = 150;
pub(crate) const STAG_HORN_VICIOUSNESS: i32 = 50;

pub(crate) const COUNTER_MISS_CHANCE: f64 = 0.20;
pub(crate) const STAG_STAGGER_CHANCE: f64 = 0.30;
pub(crate) const STAG_STAGGER_DAMAGE: i32 = 15;
pub(crate) const STAG_DAMAGE_RANGE: (i32, i32) = (50, 60);
pub(crate) const KING_DAMAGE_RANGE: (i32, i32) = (30, 70);
pub(crate) const GLOW_DAMAGE_RANGE: (i32, i32) = (10, 30);
pub(crate) const REGULAR_DAMAGE_RANGE: (i32, i32) = (10, 50);

/// Pacing delay between a committed player action and the counter-attack.
/// The shell owns the timer; the core only exports the cadence.
pub const COUNTER_DELAY_MS: u32 = 1_000;
/// Delay between a terminal battle event and orchestrator reconciliation,
/// so the final log entry is visible before the mode flips back.
pub const END_NOTIFY_DELAY_MS: u32 = 600;

// Population tuning --------------------------------------------------------
pub(crate) const POPULATION_MIN: usize = 7;
pub(crate) const POPULATION_MAX: usize = 15;
pub(crate) const GUARANTEED_GNATS: usize = 2;
/// A capture that leaves the map at or under the spawn floor appends one
/// fresh bug, so a full map never thins out permanently.
pub(crate) const REPLENISH_THRESHOLD: usize = POPULATION_MIN + 1;

// Disjoint, exhaustive spawn bands over one uniform draw in [0, 1).
pub(crate) const SPAWN_GNAT_BAND_END: f64 = 0.10;
pub(crate) const SPAWN_KING_BAND_END: f64 = 0.25;
pub(crate) const SPAWN_GLOW_BAND_END: f64 = 0.40;

pub(crate) const GNAT_ENDURANCE: i32 = 100;
pub(crate) const KING_ENDURANCE_RANGE: (i32, i32) = (100, 200);
pub(crate) const GLOW_ENDURANCE_RANGE: (i32, i32) = (75, 200);
pub(crate) const REGULAR_ENDURANCE_RANGE: (i32, i32) = (0, 100);

/// Spawn velocity magnitude per axis, in position units per tick.
pub(crate) const VELOCITY_LIMIT: f32 = 1.0;

// Movement tuning ----------------------------------------------------------
/// Nominal wall-clock interval of one movement tick, driven by the shell.
pub const TICK_MS: u32 = 50;

// Map defaults -------------------------------------------------------------
pub(crate) const DEFAULT_MAP_WIDTH: f32 = 800.0;
pub(crate) const DEFAULT_MAP_HEIGHT: f32 = 384.0;

// Persistence --------------------------------------------------------------
/// Fixed storage key for the single persisted aggregate.
pub const SAVE_KEY: &str = "bugcatch.save.v1";
/// Quiet window for coalescing rapid state changes into one write.
pub const SAVE_DEBOUNCE_MS: u64 = 1_000;
pub(crate) const SESSION_LOG_CAP: usize = 100;
