//! Deterministic animation simulation
//!
//! All sequence logic lives here. This module must be pure and deterministic:
//! - Time advances only by the `dt` injected into `tick` (no wall clocks)
//! - Seeded RNG only
//! - Fixed-capacity pools, stable iteration order by index
//! - No rendering or platform dependencies

pub mod clock;
pub mod coins;
pub mod orchestrator;
pub mod phase;
pub mod sparkles;

pub use clock::AnimationClock;
pub use coins::{Coin, CoinSim, CoinState};
pub use orchestrator::{Orchestrator, SequenceEvent, Snapshot};
pub use phase::{Phase, PhaseController, RigPose};
pub use sparkles::{Sparkle, SparklePool};

use rand::Rng;
use rand_pcg::Pcg32;

/// Uniform draw over `[-extent, extent)`, safe for zero extent
#[inline]
pub(crate) fn rand_symmetric(rng: &mut Pcg32, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.random_range(-extent..extent)
    } else {
        0.0
    }
}

/// Uniform draw over `[lo, hi)`, safe for degenerate ranges
#[inline]
pub(crate) fn rand_range(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}
