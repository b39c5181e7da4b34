//! Bugcatch Game Engine
//!
//! Platform-agnostic core game logic for the Bugcatch casual game.
//! This crate provides all game mechanics without UI or platform-specific
//! dependencies: the bug-population generator, the movement simulator, the
//! battle state machine, and the session orchestrator that ties them to a
//! persistence collaborator.

pub mod bug;
pub mod combat;
pub mod constants;
pub mod ident;
pub mod movement;
pub mod numbers;
pub mod population;
pub mod rng;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use bug::{Bug, GROUND_SPECIES, Species};
pub use combat::{
    Battle, BattleEvent, BattleOutcome, ParseActionError, PlayerAction, TurnPhase,
};
pub use constants::{COUNTER_DELAY_MS, END_NOTIFY_DELAY_MS, SAVE_DEBOUNCE_MS, SAVE_KEY, TICK_MS};
pub use ident::{BugId, BugIdMint, ParseBugIdError};
pub use movement::{advance_tick, clamp_into};
pub use population::{generate, replenish};
pub use rng::{CountingRng, RngBundle};
pub use session::{GameSession, Mode, SaveDebouncer, SaveRequest};
pub use state::{GameState, Inventory, Item, MapSize, ParseItemError, Player};

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this, keyed under
/// [`SAVE_KEY`] in whatever store the platform offers.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the aggregate game state.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load the persisted aggregate, `None` when no save exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the save exists but cannot be read or parsed.
    fn load_game(&self) -> Result<Option<GameState>, Self::Error>;

    /// Delete the persisted aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self) -> Result<(), Self::Error>;
}

/// Main game engine binding sessions to a storage collaborator.
pub struct GameEngine<S>
where
    S: GameStorage,
{
    storage: S,
}

impl<S> GameEngine<S>
where
    S: GameStorage,
{
    /// Create a new game engine with the provided storage.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Start a brand-new session for the given seed and viewport.
    #[must_use]
    pub fn create_session(&self, seed: u64, map_size: MapSize) -> GameSession {
        GameSession::new(seed, map_size)
    }

    /// Load the persisted session, surfacing storage failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage collaborator fails to read or parse
    /// the save.
    pub fn load_session(&self, seed: u64) -> Result<Option<GameSession>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let state = self.storage.load_game().map_err(Into::into)?;
        Ok(state.map(|state| GameSession::from_state(seed, state)))
    }

    /// Startup path: resume the persisted session, or fall back to a fresh
    /// game when the save is absent, unreadable, or unparsable. Corruption
    /// is never surfaced to the player.
    pub fn resume_or_new(&self, seed: u64, map_size: MapSize) -> GameSession
    where
        S::Error: Into<anyhow::Error>,
    {
        match self.load_session(seed) {
            Ok(Some(session)) => session,
            Ok(None) | Err(_) => self.create_session(seed, map_size),
        }
    }

    /// Write the session's aggregate state.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save(&self, session: &GameSession) -> Result<(), S::Error> {
        self.storage.save_game(session.state())
    }

    /// Explicit new-game: clear the persisted save, reset the session, and
    /// persist the fresh aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted or rewritten.
    pub fn reset(&self, session: &mut GameSession) -> Result<(), S::Error> {
        self.storage.delete_save()?;
        session.new_game();
        let _ = session.take_save_request();
        self.storage.save_game(session.state())
    }
}
