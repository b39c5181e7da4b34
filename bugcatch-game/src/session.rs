//! Session orchestration: the single owner of authoritative game state.
//!
//! The session routes a selected map bug into the combat machine,
//! reconciles terminal outcomes back into the persistent collections, and
//! signals the shell when (and how urgently) to persist.

use serde::{Deserialize, Serialize};

use crate::combat::{Battle, BattleOutcome, PlayerAction};
use crate::constants::{
    DEBUG_ENV_VAR, LOG_BATTLE_STARTED, LOG_BUG_CAPTURED, LOG_BUG_ESCAPED,
    LOG_ITEM_GRANTED_GNAT_WING, LOG_ITEM_GRANTED_STAG_HORN, LOG_MAP_REGENERATED,
    LOG_MAP_REPLENISHED, LOG_NEW_GAME, LOG_SESSION_FRESH, LOG_SESSION_RESUMED,
};
use crate::ident::{BugId, BugIdMint};
use crate::movement;
use crate::population;
use crate::rng::RngBundle;
use crate::state::{GameState, Item, MapSize};

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Top-level mode the shell renders against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Exploring,
    Battling,
}

/// How urgently a state change needs to reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SaveRequest {
    /// Coalesce behind the quiet window.
    Debounced,
    /// Write now, bypassing the debounce (battle end, new game).
    Immediate,
}

/// Trailing-edge coalescing of save requests. The core never reads a wall
/// clock; the shell feeds its own monotonic milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDebouncer {
    quiet_ms: u64,
    deadline: Option<u64>,
}

impl SaveDebouncer {
    #[must_use]
    pub const fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            deadline: None,
        }
    }

    /// Feed one save request at `now_ms`. Returns true when the write must
    /// happen right now; a debounced request (re)arms the quiet window.
    pub fn note(&mut self, request: SaveRequest, now_ms: u64) -> bool {
        match request {
            SaveRequest::Immediate => {
                self.deadline = None;
                true
            }
            SaveRequest::Debounced => {
                self.deadline = Some(now_ms.saturating_add(self.quiet_ms));
                false
            }
        }
    }

    /// Poll at `now_ms`; fires true exactly once when the window elapses.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub const fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// One running game: authoritative state plus the transient battle.
#[derive(Debug)]
pub struct GameSession {
    state: GameState,
    battle: Option<Battle>,
    rng: RngBundle,
    mint: BugIdMint,
    pending_save: Option<SaveRequest>,
}

impl GameSession {
    /// Fresh session: empty caught list, generated map population.
    #[must_use]
    pub fn new(seed: u64, map_size: MapSize) -> Self {
        let rng = RngBundle::from_session_seed(seed);
        let mut mint = BugIdMint::new(0);
        let mut state = GameState {
            map_size,
            ..GameState::default()
        };
        state.map_bugs = population::generate(map_size, &mut mint, &mut *rng.spawn());
        state.next_bug_seq = mint.next_seq();
        state.push_log(LOG_SESSION_FRESH);
        Self {
            state,
            battle: None,
            rng,
            mint,
            pending_save: Some(SaveRequest::Immediate),
        }
    }

    /// Resume from a persisted aggregate. The id mint picks up where the
    /// save left off so live ids are never re-issued.
    #[must_use]
    pub fn from_state(seed: u64, mut state: GameState) -> Self {
        let mint = BugIdMint::new(state.next_bug_seq);
        state.push_log(LOG_SESSION_RESUMED);
        Self {
            state,
            battle: None,
            rng: RngBundle::from_session_seed(seed),
            mint,
            pending_save: None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.battle.is_some() {
            Mode::Battling
        } else {
            Mode::Exploring
        }
    }

    /// Borrow the underlying immutable game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Apply a closure to the mutable game state.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.state)
    }

    #[must_use]
    pub const fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    /// Advance the roaming population one tick. A no-op while battling, so
    /// a selected or caught bug is never advanced by a stale timer.
    pub fn tick_movement(&mut self) -> bool {
        if self.battle.is_some() {
            return false;
        }
        movement::advance_tick(&mut self.state.map_bugs, self.state.map_size);
        self.request_save(SaveRequest::Debounced);
        true
    }

    /// Adopt new viewport dimensions and pull strays back inside.
    pub fn resize_map(&mut self, width: f64, height: f64) {
        self.state.map_size = MapSize::from_viewport(width, height);
        movement::clamp_into(&mut self.state.map_bugs, self.state.map_size);
        self.request_save(SaveRequest::Debounced);
    }

    /// Open a battle against a bug currently on the map. The bug stays in
    /// the map population until the battle is won. Unknown ids and repeated
    /// selection while battling are no-ops.
    pub fn select_bug(&mut self, id: BugId) -> bool {
        if self.battle.is_some() {
            return false;
        }
        let Some(bug) = self.state.map_bug(id) else {
            return false;
        };
        self.battle = Some(Battle::new(bug.clone()));
        self.state.push_log(LOG_BATTLE_STARTED);
        true
    }

    /// Forward a player action into the live battle.
    pub fn player_action(&mut self, action: PlayerAction) -> bool {
        let Some(battle) = self.battle.as_mut() else {
            return false;
        };
        battle.player_action(action, &mut self.state.player)
    }

    /// Resolve the pending counter-attack; the shell calls this after the
    /// pacing delay.
    pub fn resolve_counter(&mut self) -> bool {
        let Some(battle) = self.battle.as_mut() else {
            return false;
        };
        battle.resolve_counter(&mut self.state.player, &mut *self.rng.combat())
    }

    /// Reconcile a finished battle into the persistent collections. Runs
    /// exactly once per battle (one-shot outcome handoff); calling again, or
    /// with no finished battle, is a no-op returning `None`.
    pub fn reconcile_battle(&mut self) -> Option<BattleOutcome> {
        let outcome = self.battle.as_mut()?.take_outcome()?;
        let battle = self.battle.take()?;
        let bug = battle.bug().clone();

        if debug_log_enabled() {
            println!("Battle over | {} outcome:{outcome:?}", bug.name);
        }

        if outcome.won() {
            if let Some(caught) = self.state.take_map_bug(bug.id) {
                self.state.caught_bugs.push(caught);
            }
            if bug.is_gnat() {
                self.state.player.inventory.grant(Item::GnatWing);
                self.state.push_log(LOG_ITEM_GRANTED_GNAT_WING);
            }
            if bug.is_stag() {
                self.state.player.inventory.grant(Item::StagHorn);
                self.state.push_log(LOG_ITEM_GRANTED_STAG_HORN);
            }
            if population::replenish(
                &mut self.state.map_bugs,
                self.state.map_size,
                &mut self.mint,
                &mut *self.rng.spawn(),
            ) {
                self.state.push_log(LOG_MAP_REPLENISHED);
            }
            self.state.push_log(LOG_BUG_CAPTURED);
        } else {
            self.state.map_bugs =
                population::generate(self.state.map_size, &mut self.mint, &mut *self.rng.spawn());
            self.state.push_log(LOG_BUG_ESCAPED);
            self.state.push_log(LOG_MAP_REGENERATED);
        }

        self.state.player.reset_for_map();
        self.state.next_bug_seq = self.mint.next_seq();
        self.request_save(SaveRequest::Immediate);
        Some(outcome)
    }

    /// Full reset: caught list and inventory emptied, player re-baselined,
    /// population regenerated for the current viewport. The id mint keeps
    /// counting forward.
    pub fn new_game(&mut self) {
        self.battle = None;
        let map_size = self.state.map_size;
        let mut state = GameState {
            map_size,
            ..GameState::default()
        };
        state.map_bugs = population::generate(map_size, &mut self.mint, &mut *self.rng.spawn());
        state.next_bug_seq = self.mint.next_seq();
        state.push_log(LOG_NEW_GAME);
        self.state = state;
        self.request_save(SaveRequest::Immediate);
    }

    /// Drain the most urgent save request since the last drain.
    pub fn take_save_request(&mut self) -> Option<SaveRequest> {
        self.pending_save.take()
    }

    fn request_save(&mut self, request: SaveRequest) {
        self.pending_save = Some(self.pending_save.map_or(request, |held| held.max(request)));
    }
}
