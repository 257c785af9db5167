//! Coin body simulator
//!
//! Semi-implicit Euler integration over a fixed pool of coin bodies with
//! floor collision, restitution, friction, and a distance-based despawn
//! fade. Restitution and friction constants are tuned for look, not
//! physical accuracy.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{rand_range, rand_symmetric};
use crate::tuning::CoinTuning;

/// Coin lifecycle within one burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoinState {
    /// Waiting out its cascade delay
    #[default]
    Idle,
    /// Airborne
    Falling,
    /// On the floor, sliding to rest
    Settled,
    /// Past the despawn radius, fading out
    Despawning,
}

/// One coin body. Stays allocated for the life of the pool; `opacity == 0`
/// after activation means it is inert and skipped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Euler angles, integrated from `angular_vel` for visual tumble
    pub rotation: Vec3,
    pub angular_vel: Vec3,
    pub grounded: bool,
    /// Render opacity. Only ever decreases once despawning begins.
    pub opacity: f32,
    /// Seconds after burst activation before this coin starts falling
    pub activation_delay: f32,
    pub state: CoinState,
}

impl Coin {
    fn inert() -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            rotation: Vec3::ZERO,
            angular_vel: Vec3::ZERO,
            grounded: false,
            opacity: 0.0,
            activation_delay: 0.0,
            state: CoinState::Idle,
        }
    }
}

/// Fixed pool of coins with staggered burst activation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSim {
    coins: Vec<Coin>,
    origin: Vec3,
    /// Seconds since `activate`, used against each coin's cascade delay
    elapsed: f32,
    active: bool,
}

impl CoinSim {
    pub fn new(tuning: &CoinTuning) -> Self {
        Self {
            coins: vec![Coin::inert(); tuning.count],
            origin: Vec3::ZERO,
            elapsed: 0.0,
            active: false,
        }
    }

    /// Reset every coin to a randomized rest pose near `origin` and arm the
    /// cascade: coin `i` starts falling at `i * cascade_step + jitter`, so
    /// the group reads as sequential rather than simultaneous.
    pub fn activate(&mut self, origin: Vec3, tuning: &CoinTuning, rng: &mut Pcg32) {
        use std::f32::consts::TAU;

        self.active = true;
        self.elapsed = 0.0;
        self.origin = origin;

        for (i, coin) in self.coins.iter_mut().enumerate() {
            coin.pos = origin
                + Vec3::new(
                    rand_symmetric(rng, tuning.spawn_jitter),
                    rand_range(rng, 0.0, tuning.spawn_jitter),
                    rand_symmetric(rng, tuning.spawn_jitter),
                );
            coin.rotation = Vec3::new(
                rand_range(rng, 0.0, TAU),
                rand_range(rng, 0.0, TAU),
                rand_range(rng, 0.0, TAU),
            );

            let theta = rand_symmetric(rng, tuning.emit_arc / 2.0);
            let horizontal = rand_range(rng, tuning.horizontal_speed_min, tuning.horizontal_speed_max);
            let vertical = rand_range(rng, tuning.vertical_speed_min, tuning.vertical_speed_max);
            coin.vel = Vec3::new(
                theta.sin() * horizontal,
                vertical,
                theta.cos() * horizontal + tuning.forward_bias,
            );

            coin.angular_vel = Vec3::new(
                rand_symmetric(rng, tuning.spin_max),
                rand_symmetric(rng, tuning.spin_max),
                rand_symmetric(rng, tuning.spin_max),
            );

            coin.activation_delay =
                i as f32 * tuning.cascade_step + rand_range(rng, 0.0, tuning.cascade_jitter);
            coin.grounded = false;
            coin.opacity = 1.0;
            coin.state = CoinState::Idle;
        }
    }

    /// Advance all released coins by one clamped timestep
    pub fn tick(&mut self, dt: f32, tuning: &CoinTuning) {
        if !self.active {
            return;
        }
        self.elapsed += dt;

        for coin in &mut self.coins {
            if coin.state == CoinState::Idle {
                if self.elapsed < coin.activation_delay {
                    continue;
                }
                coin.state = CoinState::Falling;
            }
            if coin.opacity <= 0.0 {
                continue;
            }

            // Semi-implicit Euler: velocity first, then position
            coin.vel.y += tuning.gravity * dt;
            coin.pos += coin.vel * dt;
            coin.rotation += coin.angular_vel * dt;

            if coin.pos.y < tuning.floor_height {
                coin.pos.y = tuning.floor_height;
                if coin.vel.y.abs() > tuning.bounce_threshold {
                    coin.vel.y = -coin.vel.y * tuning.restitution;
                    coin.vel.x *= tuning.impact_friction;
                    coin.vel.z *= tuning.impact_friction;
                    coin.angular_vel.x *= tuning.impact_friction;
                    coin.angular_vel.z *= tuning.impact_friction;
                } else {
                    coin.vel.y = 0.0;
                    coin.grounded = true;
                    coin.angular_vel.x *= tuning.settle_spin_damping;
                    coin.angular_vel.z *= tuning.settle_spin_damping;
                    if coin.state == CoinState::Falling {
                        coin.state = CoinState::Settled;
                    }
                }
            }

            if coin.grounded {
                coin.vel.x *= tuning.ground_drag;
                coin.vel.z *= tuning.ground_drag;
                coin.angular_vel.y *= tuning.ground_spin_drag;
            }

            // Cull by distance: fade rather than remove, the pool is fixed
            let dx = coin.pos.x - self.origin.x;
            let dz = coin.pos.z - self.origin.z;
            if coin.state != CoinState::Despawning && dx.hypot(dz) > tuning.despawn_radius {
                coin.state = CoinState::Despawning;
            }
            if coin.state == CoinState::Despawning {
                coin.opacity = (coin.opacity - tuning.fade_rate * dt).max(0.0);
            }
        }
    }

    /// Return to the pre-activation state
    pub fn reset(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
        self.origin = Vec3::ZERO;
        for coin in &mut self.coins {
            *coin = Coin::inert();
        }
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Coins released from the cascade and still visible
    pub fn visible_count(&self) -> usize {
        self.coins
            .iter()
            .filter(|c| c.state != CoinState::Idle && c.opacity > 0.0)
            .count()
    }

    /// Coins that have come to rest on the floor
    pub fn settled_count(&self) -> usize {
        self.coins.iter().filter(|c| c.grounded).count()
    }
}
