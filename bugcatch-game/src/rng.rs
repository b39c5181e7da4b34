//! Deterministic RNG streams segregated by simulation domain.
//!
//! Spawning, combat, and id minting each draw from their own stream so that
//! one subsystem consuming extra randomness cannot shift the outcomes of
//! another. Stream seeds are derived from the one session seed with
//! HMAC-SHA256 domain separation.

use std::cell::{RefCell, RefMut};

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

/// Bundle of per-domain RNG streams for one game session.
#[derive(Debug)]
pub struct RngBundle {
    spawn: RefCell<CountingRng<SmallRng>>,
    combat: RefCell<CountingRng<SmallRng>>,
    ident: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from the user-visible session seed.
    #[must_use]
    pub fn from_session_seed(seed: u64) -> Self {
        Self {
            spawn: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"spawn"))),
            combat: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"combat"))),
            ident: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"ident"))),
        }
    }

    /// Access the population-spawn RNG stream.
    #[must_use]
    pub fn spawn(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.spawn.borrow_mut()
    }

    /// Access the combat RNG stream.
    #[must_use]
    pub fn combat(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.combat.borrow_mut()
    }

    /// Access the id-minting RNG stream.
    #[must_use]
    pub fn ident(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.ident.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(session_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&session_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
