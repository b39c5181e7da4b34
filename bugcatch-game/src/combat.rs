//! Battle resolution state machine.
//!
//! A battle is a transient machine fought over a snapshot of the selected
//! bug: the player commits an action, the bug counter-attacks, and the loop
//! repeats until one side's endurance reaches zero. Pacing delays (counter
//! attack, end notification) are modeled as explicit phases so ordering and
//! the one-shot terminal guard live in the machine instead of in callback
//! scheduling.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bug::Bug;
use crate::constants::{
    COUNTER_MISS_CHANCE, GLOW_DAMAGE_RANGE, GNAT_WING_ENDURANCE, KICK_DAMAGE,
    KICK_VICIOUSNESS_GAIN, KING_DAMAGE_RANGE, PUNCH_DAMAGE, PUNCH_ENDURANCE_COST,
    REGULAR_DAMAGE_RANGE, STAG_DAMAGE_RANGE, STAG_HORN_VICIOUSNESS, STAG_STAGGER_CHANCE,
    STAG_STAGGER_DAMAGE, TAUNT_ENDURANCE_GAIN, TAUNT_VICIOUSNESS_COST,
};
use crate::state::{Item, Player};

/// Fixed action vocabulary exposed to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Punch,
    Kick,
    Taunt,
    Block,
    Skip,
    Retreat,
    /// Toggle the inventory view. Part of the vocabulary but purely a
    /// presentation concern; never consumes the turn.
    UseItem,
    Use(Item),
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Punch => f.write_str("punch"),
            Self::Kick => f.write_str("kick"),
            Self::Taunt => f.write_str("taunt"),
            Self::Block => f.write_str("block"),
            Self::Skip => f.write_str("skip"),
            Self::Retreat => f.write_str("retreat"),
            Self::UseItem => f.write_str("useItem"),
            Self::Use(item) => write!(f, "use:{item}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown battle action `{0}`")]
pub struct ParseActionError(String);

impl FromStr for PlayerAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(item) = s.strip_prefix("use:") {
            return item
                .parse()
                .map(Self::Use)
                .map_err(|_| ParseActionError(s.to_string()));
        }
        match s {
            "punch" => Ok(Self::Punch),
            "kick" => Ok(Self::Kick),
            "taunt" => Ok(Self::Taunt),
            "block" => Ok(Self::Block),
            "skip" => Ok(Self::Skip),
            "retreat" => Ok(Self::Retreat),
            "useItem" => Ok(Self::UseItem),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

/// Whose move the machine is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingPlayer,
    AwaitingCounter,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Won,
    Lost,
}

impl BattleOutcome {
    #[must_use]
    pub const fn won(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// One entry of the battle log, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    Punched { damage: i32 },
    Kicked { damage: i32 },
    Taunted,
    Blocked,
    Skipped,
    Retreated,
    ItemUsed { item: Item },
    CounterMissed,
    CounterHit { damage: i32, shielded: bool },
    Won,
    Lost,
}

impl BattleEvent {
    /// i18n key the shell renders this entry under.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Punched { .. } => "log.battle.punch",
            Self::Kicked { .. } => "log.battle.kick",
            Self::Taunted => "log.battle.taunt",
            Self::Blocked => "log.battle.block",
            Self::Skipped => "log.battle.skip",
            Self::Retreated => "log.battle.retreat",
            Self::ItemUsed { .. } => "log.battle.item",
            Self::CounterMissed => "log.battle.counter.miss",
            Self::CounterHit { .. } => "log.battle.counter.hit",
            Self::Won => "log.battle.won",
            Self::Lost => "log.battle.lost",
        }
    }
}

/// Counter-attack behavior keyed by species class.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CounterProfile {
    miss_chance: f64,
    damage: DamageRoll,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DamageRoll {
    Uniform(i32, i32),
    /// Mostly heavy hits, with a chance of a light stagger instead.
    Stagger {
        chance: f64,
        light: i32,
        heavy: (i32, i32),
    },
}

impl CounterProfile {
    fn for_bug(bug: &Bug) -> Self {
        if bug.is_stag() {
            // Stags never miss.
            Self {
                miss_chance: 0.0,
                damage: DamageRoll::Stagger {
                    chance: STAG_STAGGER_CHANCE,
                    light: STAG_STAGGER_DAMAGE,
                    heavy: STAG_DAMAGE_RANGE,
                },
            }
        } else if bug.is_king {
            Self {
                miss_chance: COUNTER_MISS_CHANCE,
                damage: DamageRoll::Uniform(KING_DAMAGE_RANGE.0, KING_DAMAGE_RANGE.1),
            }
        } else if bug.is_glow_bug() {
            Self {
                miss_chance: COUNTER_MISS_CHANCE,
                damage: DamageRoll::Uniform(GLOW_DAMAGE_RANGE.0, GLOW_DAMAGE_RANGE.1),
            }
        } else {
            Self {
                miss_chance: COUNTER_MISS_CHANCE,
                damage: DamageRoll::Uniform(REGULAR_DAMAGE_RANGE.0, REGULAR_DAMAGE_RANGE.1),
            }
        }
    }

    /// None is a miss.
    fn roll(&self, rng: &mut impl Rng) -> Option<i32> {
        if self.miss_chance > 0.0 && rng.gen_bool(self.miss_chance) {
            return None;
        }
        Some(match self.damage {
            DamageRoll::Uniform(lo, hi) => rng.gen_range(lo..=hi),
            DamageRoll::Stagger {
                chance,
                light,
                heavy: (lo, hi),
            } => {
                if rng.gen_bool(chance) {
                    light
                } else {
                    rng.gen_range(lo..=hi)
                }
            }
        })
    }
}

/// Per-battle state machine.
#[derive(Debug, Clone)]
pub struct Battle {
    bug: Bug,
    bug_endurance: i32,
    is_blocking: bool,
    phase: TurnPhase,
    outcome: Option<BattleOutcome>,
    pending_notify: Option<BattleOutcome>,
    events: VecDeque<BattleEvent>,
}

impl Battle {
    /// Open a battle against a snapshot of the selected bug.
    #[must_use]
    pub fn new(bug: Bug) -> Self {
        let bug_endurance = bug.endurance.max(0);
        Self {
            bug,
            bug_endurance,
            is_blocking: false,
            phase: TurnPhase::AwaitingPlayer,
            outcome: None,
            pending_notify: None,
            events: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn bug(&self) -> &Bug {
        &self.bug
    }

    #[must_use]
    pub const fn bug_endurance(&self) -> i32 {
        self.bug_endurance
    }

    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, TurnPhase::Over)
    }

    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.is_blocking
    }

    /// Terminal outcome, once reached. Stays readable after `take_outcome`.
    #[must_use]
    pub const fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    /// Battle log, most recent entry first.
    #[must_use]
    pub const fn events(&self) -> &VecDeque<BattleEvent> {
        &self.events
    }

    /// Commit a player action. Returns false for a no-op: an action outside
    /// the player's turn, after the battle ended, or an item the player does
    /// not hold (none of those yield the turn).
    pub fn player_action(&mut self, action: PlayerAction, player: &mut Player) -> bool {
        if self.phase != TurnPhase::AwaitingPlayer {
            return false;
        }
        match action {
            PlayerAction::Punch => {
                self.damage_bug(PUNCH_DAMAGE);
                player.endurance -= PUNCH_ENDURANCE_COST;
                player.clamp();
                self.push_event(BattleEvent::Punched {
                    damage: PUNCH_DAMAGE,
                });
            }
            PlayerAction::Kick => {
                self.damage_bug(KICK_DAMAGE);
                player.viciousness += KICK_VICIOUSNESS_GAIN;
                player.clamp();
                self.push_event(BattleEvent::Kicked { damage: KICK_DAMAGE });
            }
            PlayerAction::Taunt => {
                player.endurance += TAUNT_ENDURANCE_GAIN;
                player.viciousness -= TAUNT_VICIOUSNESS_COST;
                player.clamp();
                self.push_event(BattleEvent::Taunted);
            }
            PlayerAction::Block => {
                self.is_blocking = true;
                self.push_event(BattleEvent::Blocked);
            }
            PlayerAction::Skip => {
                self.push_event(BattleEvent::Skipped);
            }
            PlayerAction::Retreat => {
                self.push_event(BattleEvent::Retreated);
                self.finish(BattleOutcome::Lost);
                return true;
            }
            // The inventory toggle is rendered by the shell and never
            // consumes the turn.
            PlayerAction::UseItem => return false,
            PlayerAction::Use(item) => {
                if !player.inventory.remove_one(item) {
                    return false;
                }
                match item {
                    Item::GnatWing => player.endurance = GNAT_WING_ENDURANCE,
                    Item::StagHorn => player.viciousness = STAG_HORN_VICIOUSNESS,
                }
                player.clamp();
                self.push_event(BattleEvent::ItemUsed { item });
            }
        }

        self.check_terminal(player);
        if !self.is_over() {
            self.phase = TurnPhase::AwaitingCounter;
        }
        true
    }

    /// Resolve the bug's counter-attack. Returns false when no counter is
    /// pending (wrong phase or battle already over).
    pub fn resolve_counter(&mut self, player: &mut Player, rng: &mut impl Rng) -> bool {
        if self.phase != TurnPhase::AwaitingCounter {
            return false;
        }
        let rolled = CounterProfile::for_bug(&self.bug).roll(rng);
        self.apply_counter(player, rolled);
        true
    }

    /// Scripted counter resolution for tests and replays: `rolled` is the
    /// raw damage before shield halving, `None` a miss.
    pub fn resolve_counter_for_testing(&mut self, player: &mut Player, rolled: Option<i32>) -> bool {
        if self.phase != TurnPhase::AwaitingCounter {
            return false;
        }
        self.apply_counter(player, rolled);
        true
    }

    fn apply_counter(&mut self, player: &mut Player, rolled: Option<i32>) {
        match rolled {
            None => {
                // A miss still spends the shield.
                self.is_blocking = false;
                self.push_event(BattleEvent::CounterMissed);
            }
            Some(raw) => {
                let shielded = self.is_blocking;
                let damage = if shielded { raw / 2 } else { raw };
                self.is_blocking = false;
                player.endurance -= damage;
                player.clamp();
                self.push_event(BattleEvent::CounterHit { damage, shielded });
            }
        }

        self.check_terminal(player);
        if !self.is_over() {
            self.phase = TurnPhase::AwaitingPlayer;
        }
    }

    /// One-shot handoff of the terminal outcome to the orchestrator.
    pub fn take_outcome(&mut self) -> Option<BattleOutcome> {
        self.pending_notify.take()
    }

    fn damage_bug(&mut self, amount: i32) {
        self.bug_endurance = (self.bug_endurance - amount).max(0);
    }

    /// Evaluated after every endurance change on either side. The bug
    /// crossing zero takes precedence when both cross in one action.
    fn check_terminal(&mut self, player: &Player) {
        if self.outcome.is_some() {
            return;
        }
        if self.bug_endurance <= 0 {
            self.finish(BattleOutcome::Won);
        } else if player.endurance <= 0 {
            self.finish(BattleOutcome::Lost);
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.pending_notify = Some(outcome);
        self.phase = TurnPhase::Over;
        self.push_event(match outcome {
            BattleOutcome::Won => BattleEvent::Won,
            BattleOutcome::Lost => BattleEvent::Lost,
        });
    }

    fn push_event(&mut self, event: BattleEvent) {
        self.events.push_front(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bug::Species;
    use crate::ident::BugId;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn bug(species: Species, is_king: bool, endurance: i32) -> Bug {
        let id: BugId = "bug-00000000000f0001".parse().unwrap();
        Bug::new(id, species, is_king, endurance)
    }

    #[test]
    fn punch_trades_endurance_for_damage() {
        let mut battle = Battle::new(bug(Species::Beetle, false, 80));
        let mut player = Player::default();

        assert!(battle.player_action(PlayerAction::Punch, &mut player));
        assert_eq!(battle.bug_endurance(), 30);
        assert_eq!(player.endurance, 80);
        assert_eq!(battle.phase(), TurnPhase::AwaitingCounter);
        assert_eq!(
            battle.events().front(),
            Some(&BattleEvent::Punched { damage: 50 })
        );
        assert_eq!(battle.events()[0].key(), "log.battle.punch");
    }

    #[test]
    fn kick_and_taunt_respect_stat_caps() {
        let mut battle = Battle::new(bug(Species::Ant, false, 300));
        let mut player = Player::default();

        assert!(battle.player_action(PlayerAction::Kick, &mut player));
        assert_eq!(player.viciousness, 50, "kick capped at 50");
        battle.resolve_counter_for_testing(&mut player, None);

        assert!(battle.player_action(PlayerAction::Taunt, &mut player));
        assert_eq!(player.endurance, 130);
        assert_eq!(player.viciousness, 40);
        battle.resolve_counter_for_testing(&mut player, None);

        assert!(battle.player_action(PlayerAction::Taunt, &mut player));
        assert_eq!(player.endurance, 150, "taunt capped at 150");
    }

    #[test]
    fn player_cannot_act_while_counter_is_pending() {
        let mut battle = Battle::new(bug(Species::Ant, false, 300));
        let mut player = Player::default();

        assert!(battle.player_action(PlayerAction::Skip, &mut player));
        assert!(!battle.player_action(PlayerAction::Punch, &mut player));
        assert!(battle.resolve_counter_for_testing(&mut player, None));
        assert!(battle.player_action(PlayerAction::Punch, &mut player));
    }

    #[test]
    fn block_halves_next_hit_with_integer_floor() {
        let mut battle = Battle::new(bug(Species::Beetle, false, 300));
        let mut player = Player::default();

        battle.player_action(PlayerAction::Block, &mut player);
        assert!(battle.is_blocking());
        battle.resolve_counter_for_testing(&mut player, Some(40));
        assert_eq!(player.endurance, 80, "40 damage halved to 20");
        assert!(!battle.is_blocking(), "shield cleared by the hit");

        // Odd damage floors.
        battle.player_action(PlayerAction::Block, &mut player);
        battle.resolve_counter_for_testing(&mut player, Some(33));
        assert_eq!(player.endurance, 64);
    }

    #[test]
    fn miss_clears_shield_without_damage() {
        let mut battle = Battle::new(bug(Species::Beetle, false, 300));
        let mut player = Player::default();

        battle.player_action(PlayerAction::Block, &mut player);
        battle.resolve_counter_for_testing(&mut player, None);
        assert_eq!(player.endurance, 100);
        assert!(!battle.is_blocking());
        assert_eq!(battle.events().front(), Some(&BattleEvent::CounterMissed));
    }

    #[test]
    fn two_punches_end_a_hundred_endurance_bug() {
        let mut battle = Battle::new(bug(Species::Roach, false, 100));
        let mut player = Player::default();

        battle.player_action(PlayerAction::Punch, &mut player);
        battle.resolve_counter_for_testing(&mut player, None);
        battle.player_action(PlayerAction::Punch, &mut player);

        assert!(battle.is_over());
        assert_eq!(battle.outcome(), Some(BattleOutcome::Won));
        // A third action is not processed.
        assert!(!battle.player_action(PlayerAction::Punch, &mut player));
        assert_eq!(battle.bug_endurance(), 0);
    }

    #[test]
    fn terminal_handoff_is_one_shot() {
        let mut battle = Battle::new(bug(Species::Roach, false, 40));
        let mut player = Player::default();

        battle.player_action(PlayerAction::Punch, &mut player);
        assert!(battle.is_over());
        assert_eq!(battle.take_outcome(), Some(BattleOutcome::Won));
        assert_eq!(battle.take_outcome(), None, "second take yields nothing");
        assert_eq!(battle.outcome(), Some(BattleOutcome::Won));
    }

    #[test]
    fn bug_zero_takes_precedence_over_player_zero() {
        let mut battle = Battle::new(bug(Species::Roach, false, 50));
        let mut player = Player {
            endurance: 20,
            ..Player::default()
        };

        // Punch floors the player at 0 and the bug at 0 in the same action.
        battle.player_action(PlayerAction::Punch, &mut player);
        assert_eq!(battle.outcome(), Some(BattleOutcome::Won));
        assert_eq!(player.endurance, 0);
    }

    #[test]
    fn counter_can_end_the_battle() {
        let mut battle = Battle::new(bug(Species::Beetle, false, 300));
        let mut player = Player {
            endurance: 10,
            ..Player::default()
        };

        battle.player_action(PlayerAction::Skip, &mut player);
        battle.resolve_counter_for_testing(&mut player, Some(25));
        assert_eq!(player.endurance, 0);
        assert_eq!(battle.outcome(), Some(BattleOutcome::Lost));
    }

    #[test]
    fn retreat_ends_as_loss_without_counter() {
        let mut battle = Battle::new(bug(Species::Beetle, false, 300));
        let mut player = Player::default();

        assert!(battle.player_action(PlayerAction::Retreat, &mut player));
        assert_eq!(battle.outcome(), Some(BattleOutcome::Lost));
        assert!(!battle.resolve_counter_for_testing(&mut player, Some(50)));
        assert_eq!(player.endurance, 100, "no counter after retreat");
    }

    #[test]
    fn items_apply_exact_values_and_consume_one() {
        let mut battle = Battle::new(bug(Species::Beetle, false, 300));
        let mut player = Player {
            endurance: 12,
            viciousness: 3,
            ..Player::default()
        };
        player.inventory.grant(Item::GnatWing);
        player.inventory.grant(Item::StagHorn);

        assert!(battle.player_action(PlayerAction::Use(Item::GnatWing), &mut player));
        assert_eq!(player.endurance, 150);
        assert_eq!(player.inventory.count(Item::GnatWing), 0);
        assert_eq!(battle.phase(), TurnPhase::AwaitingCounter, "item use yields the turn");
        battle.resolve_counter_for_testing(&mut player, None);

        assert!(battle.player_action(PlayerAction::Use(Item::StagHorn), &mut player));
        assert_eq!(player.viciousness, 50);
    }

    #[test]
    fn using_an_absent_item_is_a_no_op() {
        let mut battle = Battle::new(bug(Species::Beetle, false, 300));
        let mut player = Player::default();

        assert!(!battle.player_action(PlayerAction::Use(Item::StagHorn), &mut player));
        assert_eq!(battle.phase(), TurnPhase::AwaitingPlayer, "turn not yielded");
    }

    #[test]
    fn stag_counters_never_miss() {
        let mut rng = SmallRng::seed_from_u64(0x57A6);
        let profile = CounterProfile::for_bug(&bug(Species::Stag, false, 90));
        for _ in 0..2_000 {
            let rolled = profile.roll(&mut rng).expect("stags never miss");
            assert!(rolled == STAG_STAGGER_DAMAGE || (50..=60).contains(&rolled));
        }
    }

    #[test]
    fn king_stag_uses_the_stag_profile() {
        let king_stag = bug(Species::Stag, true, 150);
        assert_eq!(
            CounterProfile::for_bug(&king_stag),
            CounterProfile::for_bug(&bug(Species::Stag, false, 90))
        );
    }

    #[test]
    fn damage_ranges_follow_species() {
        let mut rng = SmallRng::seed_from_u64(0xDA3A);
        let cases = [
            (bug(Species::Beetle, true, 150), 30, 70),
            (bug(Species::GlowBug, false, 80), 10, 30),
            (bug(Species::Gnat, false, 100), 10, 50),
            (bug(Species::Mantis, false, 60), 10, 50),
        ];
        for (target, lo, hi) in cases {
            let profile = CounterProfile::for_bug(&target);
            for _ in 0..500 {
                if let Some(rolled) = profile.roll(&mut rng) {
                    assert!(
                        (lo..=hi).contains(&rolled),
                        "{} rolled {rolled} outside [{lo}, {hi}]",
                        target.name
                    );
                }
            }
        }
    }

    #[test]
    fn action_vocabulary_parses() {
        assert_eq!("punch".parse::<PlayerAction>(), Ok(PlayerAction::Punch));
        assert_eq!("retreat".parse::<PlayerAction>(), Ok(PlayerAction::Retreat));
        assert_eq!(
            "use:gnat wing".parse::<PlayerAction>(),
            Ok(PlayerAction::Use(Item::GnatWing))
        );
        assert_eq!(
            PlayerAction::Use(Item::StagHorn).to_string(),
            "use:stag horn"
        );
        assert_eq!("useItem".parse::<PlayerAction>(), Ok(PlayerAction::UseItem));
        assert!("use:bee sting".parse::<PlayerAction>().is_err());
        assert!("dance".parse::<PlayerAction>().is_err());
    }

    #[test]
    fn inventory_toggle_never_consumes_the_turn() {
        let mut battle = Battle::new(bug(Species::Beetle, false, 300));
        let mut player = Player::default();

        assert!(!battle.player_action(PlayerAction::UseItem, &mut player));
        assert_eq!(battle.phase(), TurnPhase::AwaitingPlayer);
        assert!(battle.events().is_empty());
    }
}
