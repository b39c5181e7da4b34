//! Bug identity minting.
//!
//! Ids must stay unique for the whole session even across full population
//! regenerations, because catch/removal logic keys on them. Each id packs a
//! monotonically increasing sequence number above a random 16-bit suffix;
//! the sequence is persisted with the game state so a reloaded save can
//! never re-issue an id that is still alive in a collection.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

const SUFFIX_BITS: u32 = 16;
const SUFFIX_MASK: u64 = (1 << SUFFIX_BITS) - 1;
const ID_PREFIX: &str = "bug-";

/// Opaque unique identifier for one bug, stable for the bug's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BugId(u64);

impl BugId {
    /// Raw packed value; exposed for diagnostics only.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Sequence number this id was minted at.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0 >> SUFFIX_BITS
    }
}

impl fmt::Display for BugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{:016x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed bug id `{0}`")]
pub struct ParseBugIdError(String);

impl FromStr for BugId {
    type Err = ParseBugIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix(ID_PREFIX)
            .ok_or_else(|| ParseBugIdError(s.to_string()))?;
        if hex.len() != 16 {
            return Err(ParseBugIdError(s.to_string()));
        }
        u64::from_str_radix(hex, 16)
            .map(BugId)
            .map_err(|_| ParseBugIdError(s.to_string()))
    }
}

impl From<BugId> for String {
    fn from(value: BugId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for BugId {
    type Error = ParseBugIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Session-owned mint handing out unique [`BugId`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugIdMint {
    next_seq: u64,
}

impl BugIdMint {
    /// Resume minting from a persisted sequence position.
    #[must_use]
    pub const fn new(next_seq: u64) -> Self {
        Self { next_seq }
    }

    /// Mint the next id: monotonic sequence plus a random suffix.
    pub fn mint(&mut self, rng: &mut impl RngCore) -> BugId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let suffix = u64::from(rng.next_u32()) & SUFFIX_MASK;
        BugId((seq << SUFFIX_BITS) | suffix)
    }

    /// Sequence position to persist alongside the game state.
    #[must_use]
    pub const fn next_seq(&self) -> u64 {
        self.next_seq
    }
}
