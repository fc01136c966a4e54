//! Keyed, order-independent random draws.
//!
//! # Determinism strategy
//!
//! No module holds RNG state that advances as it is consumed.  Every random
//! value is a pure function of the run seed and a [`DrawKey`]:
//!
//!   value = f(seed, tick, stream, purpose, uid, sub)
//!
//! `stream` identifies the module (derived from its name), `purpose` the kind
//! of decision (transmission, duration, coverage, …) and `sub` disambiguates
//! several draws an agent needs for the same purpose in one tick (e.g. one
//! per infectious contact).  Consequences:
//!
//! - Iteration order never changes a result: agents can be processed in any
//!   order, or in parallel, and still see the same values.
//! - Adding a module, or agents at the end of the population, does not
//!   disturb the draws of existing agents.
//! - Replicates are independent by construction: a replicate owns nothing
//!   but a seed.
//!
//! Keys are folded with the splitmix64 finaliser, using the 64-bit
//! fractional part of the golden ratio to spread consecutive integers across
//! the seed space.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{Sampler, Tick, Uid};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// 2^-53, maps the top 53 bits of a hash onto `[0, 1)`.
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

#[inline]
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(MIXING_CONSTANT);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

// ── StreamId ──────────────────────────────────────────────────────────────────

/// Identifies the module a draw belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct StreamId(pub u64);

impl StreamId {
    /// Derive a stream id from a module name (64-bit FNV-1a).
    ///
    /// Name-based ids keep a module's draws stable when other modules are
    /// added or registered in a different order.
    ///
    /// The id is part of every draw key, so this hash is frozen: changing
    /// it changes every trajectory for a given seed. `std`'s `DefaultHasher`
    /// and `FxHasher` make no stability promise across releases or
    /// platforms, hence the fixed algorithm here.
    pub fn from_name(name: &str) -> Self {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in name.bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        }
        StreamId(h)
    }
}

// ── Purpose ───────────────────────────────────────────────────────────────────

/// What a draw decides.  Distinct purposes never share values.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Purpose {
    InitPrev,
    Transmission,
    SourcePick,
    DurExposed,
    DurInfection,
    Death,
    Coverage,
    Efficacy,
    Diagnosis,
    Age,
    BackgroundDeath,
    Contacts,
    Formation,
    EdgeDuration,
}

impl Purpose {
    #[inline]
    fn code(self) -> u64 {
        self as u64 + 1
    }
}

// ── DrawKey ───────────────────────────────────────────────────────────────────

/// Full address of one random value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct DrawKey {
    pub tick:    Tick,
    pub stream:  StreamId,
    pub purpose: Purpose,
    pub uid:     Uid,
    pub sub:     u64,
}

impl DrawKey {
    #[inline]
    pub fn new(tick: Tick, stream: StreamId, purpose: Purpose, uid: Uid) -> Self {
        Self { tick, stream, purpose, uid, sub: 0 }
    }

    /// Same key with a different sub-index.
    #[inline]
    pub fn with_sub(self, sub: u64) -> Self {
        Self { sub, ..self }
    }
}

// ── DrawStream ────────────────────────────────────────────────────────────────

/// Seeded source of keyed random values.  Cheap to copy; holds no state
/// beyond the seed, so `&DrawStream` can be shared freely.
#[derive(Copy, Clone, Debug)]
pub struct DrawStream {
    seed: u64,
}

impl DrawStream {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 64 well-mixed bits for `key`.
    pub fn bits(&self, key: DrawKey) -> u64 {
        let parts = [
            key.tick.0,
            key.stream.0,
            key.purpose.code(),
            key.uid.0 as u64,
            key.sub,
        ];
        let mut h = mix64(self.seed ^ MIXING_CONSTANT);
        for part in parts {
            h = mix64(h ^ part.wrapping_mul(MIXING_CONSTANT));
        }
        h
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn uniform(&self, key: DrawKey) -> f64 {
        (self.bits(key) >> 11) as f64 * UNIT_SCALE
    }

    /// `true` with probability `p`.  `p <= 0` (or NaN) is never true,
    /// `p >= 1` always is.
    #[inline]
    pub fn bernoulli(&self, key: DrawKey, p: f64) -> bool {
        if p >= 1.0 {
            return true;
        }
        self.uniform(key) < p
    }

    /// Uniform index in `0..len`.  `len` must be non-zero.
    #[inline]
    pub fn index(&self, key: DrawKey, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.uniform(key) * len as f64) as usize).min(len - 1)
    }

    /// Sample a validated distribution.
    pub fn sample(&self, key: DrawKey, sampler: &Sampler) -> f64 {
        sampler.sample(self.rng(key).inner())
    }

    /// A sequential RNG seeded from `key`, for operations that need an
    /// unbounded number of draws under one key (e.g. random pairing).
    pub fn rng(&self, key: DrawKey) -> StreamRng {
        StreamRng(SmallRng::seed_from_u64(self.bits(key)))
    }
}

// ── StreamRng ─────────────────────────────────────────────────────────────────

/// Sequential RNG derived from one [`DrawKey`].
///
/// Only used inside a single operation; never stored across ticks.
pub struct StreamRng(SmallRng);

impl StreamRng {
    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]; NaN is never true).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        if !(p > 0.0) {
            return false;
        }
        self.0.gen_bool(p.min(1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}
