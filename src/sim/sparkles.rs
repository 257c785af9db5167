//! Sparkle particle pool
//!
//! Fixed-capacity pool of point particles. Allocation happens once at
//! construction; a burst re-seeds every particle simultaneously, and each
//! one then decays independently. No per-particle heap allocation.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{rand_range, rand_symmetric};
use crate::tuning::SparkleTuning;

/// One point particle. `life <= 0` means inactive: it neither moves nor
/// renders, and `life` never increases outside a burst.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sparkle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub life: f32,
    pub max_life: f32,
    /// Assigned once at pool construction, immutable thereafter
    pub color: [f32; 3],
}

impl Sparkle {
    fn dormant(color: [f32; 3]) -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            life: 0.0,
            max_life: 1.0,
            color,
        }
    }

    pub fn alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining life as a 0..1 fraction, for renderer alpha
    pub fn life_fraction(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Fixed pool of sparkles with burst activation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparklePool {
    particles: Vec<Sparkle>,
}

impl SparklePool {
    /// Allocate the whole pool inactive, drawing each particle's color from
    /// the weighted palette exactly once.
    pub fn new(tuning: &SparkleTuning, rng: &mut Pcg32) -> Self {
        let particles = (0..tuning.count)
            .map(|_| Sparkle::dormant(pick_color(tuning, rng)))
            .collect();
        Self { particles }
    }

    /// Activate every particle at once. Calling while particles are still
    /// alive overwrites them - restart semantics, intended for re-triggers.
    pub fn burst(&mut self, origin: Vec3, tuning: &SparkleTuning, rng: &mut Pcg32) {
        for p in &mut self.particles {
            let spread = tuning.spawn_spread;
            p.pos = origin
                + Vec3::new(
                    rand_symmetric(rng, spread.x),
                    rand_symmetric(rng, spread.y),
                    rand_symmetric(rng, spread.z),
                );

            let theta = rand_symmetric(rng, tuning.emit_arc / 2.0);
            let speed = rand_range(rng, tuning.speed_min, tuning.speed_max);
            p.vel = Vec3::new(theta.sin() * speed, tuning.upward_bias, theta.cos() * speed);

            p.max_life = rand_range(rng, tuning.life_min, tuning.life_max);
            p.life = p.max_life;
        }
    }

    /// Integrate all active particles by one clamped timestep.
    /// A particle whose life crosses zero this tick still moves this tick;
    /// it is frozen from the next tick onward.
    pub fn tick(&mut self, dt: f32, tuning: &SparkleTuning) {
        for p in &mut self.particles {
            if !p.alive() {
                continue;
            }
            p.life -= dt;
            p.pos += p.vel * dt;
            p.vel.y += tuning.gravity * dt;
            p.vel.x *= tuning.drag;
            p.vel.z *= tuning.drag;
        }
    }

    /// True while at least one particle is alive; lets the host fade the
    /// whole effect out once everything has died.
    pub fn any_alive(&self) -> bool {
        self.particles.iter().any(Sparkle::alive)
    }

    /// Deactivate everything. Colors are construction-time state and keep.
    pub fn reset(&mut self) {
        for p in &mut self.particles {
            p.pos = Vec3::ZERO;
            p.vel = Vec3::ZERO;
            p.life = 0.0;
            p.max_life = 1.0;
        }
    }

    pub fn particles(&self) -> &[Sparkle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Weighted discrete palette pick
fn pick_color(tuning: &SparkleTuning, rng: &mut Pcg32) -> [f32; 3] {
    let roll = rand_range(rng, 0.0, 1.0);
    let mut acc = 0.0;
    for (color, weight) in tuning.palette.iter().zip(tuning.palette_weights) {
        acc += weight;
        if roll < acc {
            return *color;
        }
    }
    tuning.palette[tuning.palette.len() - 1]
}
