//! Reward Burst - deterministic reward-unlock animation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (phase machine, coin physics, sparkle pool)
//! - `tuning`: Data-driven animation balance
//!
//! The crate has no rendering, network, or storage surface. A host render loop
//! drives [`sim::Orchestrator::tick`] once per frame and reads back a
//! [`sim::Snapshot`] of every entity's transform, opacity, and color.

pub mod sim;
pub mod tuning;

pub use sim::{Orchestrator, Phase, SequenceEvent, Snapshot};
pub use tuning::Tuning;

/// Structural constants shared across tuning defaults
pub mod consts {
    /// Maximum timestep fed into any integration step (seconds).
    /// Larger host frames (backgrounded tab, debugger pause) are clamped
    /// so physics never takes an implausible jump. The animation clock
    /// still advances by the full frame time.
    pub const MAX_SIM_DT: f32 = 0.033;

    /// Coins released per burst
    pub const COIN_COUNT: usize = 40;
    /// Sparkle particles in the pool
    pub const SPARKLE_COUNT: usize = 150;

    /// Floor plane height (scene units, y-up)
    pub const FLOOR_HEIGHT: f32 = 0.0;
}

/// Elastic ease-out: overshoots the target before settling.
///
/// Returns 0 at `p = 0` and 1 at `p >= 1`, with damped oscillation around 1
/// in between. Used for the lid "snap open" motion.
#[inline]
pub fn elastic_ease_out(p: f32) -> f32 {
    use std::f32::consts::TAU;
    if p <= 0.0 {
        0.0
    } else if p >= 1.0 {
        1.0
    } else {
        const PERIOD: f32 = TAU / 3.0;
        2f32.powf(-10.0 * p) * ((10.0 * p - 0.75) * PERIOD).sin() + 1.0
    }
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elastic_ease_out_endpoints() {
        assert_eq!(elastic_ease_out(0.0), 0.0);
        assert_eq!(elastic_ease_out(1.0), 1.0);
        assert_eq!(elastic_ease_out(-0.5), 0.0);
        assert_eq!(elastic_ease_out(2.0), 1.0);
    }

    #[test]
    fn test_elastic_ease_out_overshoots() {
        // The curve must exceed 1.0 somewhere in (0, 1) - that's the snap
        let overshoot = (1..100)
            .map(|i| elastic_ease_out(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(overshoot > 1.0);
    }

    #[test]
    fn test_elastic_ease_out_settles_near_target() {
        // Late in the curve the oscillation has decayed to a few percent
        for i in 80..100 {
            let v = elastic_ease_out(i as f32 / 100.0);
            assert!((v - 1.0).abs() < 0.05, "p={} v={}", i, v);
        }
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }
}
