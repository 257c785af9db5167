//! Data-driven animation tuning
//!
//! Every duration, speed, count, color, and threshold the sequence uses lives
//! here as a named field with a serde default, so a JSON override file can
//! retune the show without touching code. The physics constants are tuned for
//! look, not derived from real units.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Sparkle particle pool tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkleTuning {
    /// Pool capacity (all particles allocated up front)
    pub count: usize,
    /// Three-tone RGB palette, assigned once at pool construction
    pub palette: [[f32; 3]; 3],
    /// Discrete pick probabilities per palette tone (should sum to 1)
    pub palette_weights: [f32; 3],
    /// Spawn position jitter around the burst origin, per axis
    pub spawn_spread: Vec3,
    /// Horizontal emission arc (radians, centered on +z)
    pub emit_arc: f32,
    /// Outward speed range (units/s)
    pub speed_min: f32,
    pub speed_max: f32,
    /// Fixed upward velocity added to every particle
    pub upward_bias: f32,
    /// Lifetime range (seconds)
    pub life_min: f32,
    pub life_max: f32,
    /// Vertical acceleration (units/s^2, negative = down)
    pub gravity: f32,
    /// Horizontal velocity multiplier applied each tick (drag)
    pub drag: f32,
}

impl Default for SparkleTuning {
    fn default() -> Self {
        Self {
            count: SPARKLE_COUNT,
            // warm gold / amber / pale highlight
            palette: [[1.0, 0.84, 0.25], [1.0, 0.62, 0.12], [1.0, 0.95, 0.72]],
            palette_weights: [0.5, 0.3, 0.2],
            spawn_spread: Vec3::new(0.3, 0.15, 0.3),
            emit_arc: 4.2,
            speed_min: 0.6,
            speed_max: 2.4,
            upward_bias: 1.8,
            life_min: 0.6,
            life_max: 1.6,
            gravity: -3.0,
            drag: 0.99,
        }
    }
}

/// Coin body simulator tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinTuning {
    /// Coins per burst (fixed pool)
    pub count: usize,
    /// Rest pose position jitter around the burst origin
    pub spawn_jitter: f32,
    /// Horizontal emission arc (radians). Full circle so the group reads as
    /// a dump rather than a fountain - wider than the sparkle arc.
    pub emit_arc: f32,
    /// Horizontal launch speed range (units/s)
    pub horizontal_speed_min: f32,
    pub horizontal_speed_max: f32,
    /// Vertical launch speed range (units/s) - higher than horizontal
    pub vertical_speed_min: f32,
    pub vertical_speed_max: f32,
    /// Small +z bias so the pile drifts toward the camera side
    pub forward_bias: f32,
    /// Max tumble rate per axis (radians/s, sampled symmetric)
    pub spin_max: f32,
    /// Cascade: coin i starts at `i * cascade_step + jitter`
    pub cascade_step: f32,
    /// Upper bound of the per-coin random stagger jitter (seconds)
    pub cascade_jitter: f32,
    /// Vertical acceleration (units/s^2)
    pub gravity: f32,
    /// Floor plane height
    pub floor_height: f32,
    /// |vertical velocity| above which a floor hit bounces instead of settling
    pub bounce_threshold: f32,
    /// Fraction of vertical speed kept per bounce
    pub restitution: f32,
    /// Horizontal/tumble velocity multiplier applied on each impact
    pub impact_friction: f32,
    /// Tumble damping applied on the settling impact
    pub settle_spin_damping: f32,
    /// Per-tick horizontal drag while grounded
    pub ground_drag: f32,
    /// Per-tick damping of the remaining spin axis while grounded
    pub ground_spin_drag: f32,
    /// Horizontal distance from origin past which a coin fades out
    pub despawn_radius: f32,
    /// Opacity lost per second once despawning
    pub fade_rate: f32,
}

impl Default for CoinTuning {
    fn default() -> Self {
        Self {
            count: COIN_COUNT,
            spawn_jitter: 0.15,
            emit_arc: std::f32::consts::TAU,
            horizontal_speed_min: 0.8,
            horizontal_speed_max: 2.4,
            vertical_speed_min: 3.0,
            vertical_speed_max: 5.5,
            forward_bias: 0.4,
            spin_max: 12.0,
            cascade_step: 0.025,
            cascade_jitter: 0.015,
            gravity: -12.0,
            floor_height: FLOOR_HEIGHT,
            bounce_threshold: 1.0,
            restitution: 0.4,
            impact_friction: 0.7,
            settle_spin_damping: 0.5,
            ground_drag: 0.92,
            ground_spin_drag: 0.9,
            despawn_radius: 6.0,
            fade_rate: 1.5,
        }
    }
}

/// Phase timeline and rig motion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTuning {
    /// Shake phase duration (seconds from trigger)
    pub shake_duration: f32,
    /// Open phase duration
    pub open_duration: f32,
    /// Total elapsed time at which the sequence completes
    pub complete_at: f32,
    /// Delay between the sparkle burst and the coin release.
    /// An absolute beat, not scaled by phase durations.
    pub coin_release_delay: f32,

    /// Peak positional shake amplitude (units)
    pub shake_max_intensity: f32,
    /// Shake oscillation frequency at phase start (Hz)
    pub shake_base_frequency: f32,
    /// Additional frequency gained across the phase (Hz)
    pub shake_frequency_ramp: f32,
    /// Rotational jitter per unit of positional amplitude (radians/unit)
    pub shake_rotation_scale: f32,

    /// Lid target angle (radians)
    pub lid_open_angle: f32,
    /// Fraction of the open phase over which the light spikes decay
    pub open_flash_window: f32,
    /// Interior beam peak intensity at open start
    pub beam_peak: f32,
    /// Rim flash peak intensity at open start
    pub flash_peak: f32,

    /// Ambient (pre-trigger) bob amplitude
    pub ambient_bob_amplitude: f32,
    /// Ambient bob angular speed (radians/s)
    pub ambient_bob_speed: f32,
    /// Ambient yaw sway amplitude (radians)
    pub ambient_sway: f32,
    /// Ambient glow baseline and pulse depth
    pub ambient_glow_base: f32,
    pub ambient_glow_pulse: f32,
}

impl Default for PhaseTuning {
    fn default() -> Self {
        Self {
            shake_duration: 1.2,
            open_duration: 0.6,
            complete_at: 3.5,
            coin_release_delay: 0.2,

            shake_max_intensity: 0.05,
            shake_base_frequency: 8.0,
            shake_frequency_ramp: 16.0,
            shake_rotation_scale: 2.0,

            lid_open_angle: 110f32.to_radians(),
            open_flash_window: 0.3,
            beam_peak: 8.0,
            flash_peak: 5.0,

            ambient_bob_amplitude: 0.05,
            ambient_bob_speed: 1.2,
            ambient_sway: 0.08,
            ambient_glow_base: 0.35,
            ambient_glow_pulse: 0.25,
        }
    }
}

/// Complete tuning set for one sequence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub timing: TimingTuning,
    pub burst: BurstTuning,
    pub sparkles: SparkleTuning,
    pub coins: CoinTuning,
    pub phases: PhaseTuning,
}

/// Frame timing guards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    /// Max dt fed into integration per tick (seconds)
    pub max_sim_dt: f32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            max_sim_dt: MAX_SIM_DT,
        }
    }
}

/// Where the burst originates (lid mouth of the rig)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstTuning {
    pub origin: Vec3,
}

impl Default for BurstTuning {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 0.6, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let t = Tuning::default();
        assert!(t.phases.shake_duration > 0.0);
        assert!(t.phases.open_duration > 0.0);
        assert!(
            t.phases.complete_at > t.phases.shake_duration + t.phases.open_duration,
            "burst phase must have positive duration"
        );
        assert!(t.coins.restitution < 1.0);
        assert!(t.coins.impact_friction < 1.0);
        assert!(t.sparkles.speed_max >= t.sparkles.speed_min);
        assert!(t.sparkles.life_max >= t.sparkles.life_min);
        assert!(t.coins.emit_arc > t.sparkles.emit_arc, "coins dump wider than sparkles fountain");
        let weight_sum: f32 = t.sparkles.palette_weights.iter().sum();
        assert!((weight_sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_override() {
        let json = r#"{ "coins": { "count": 12 }, "phases": { "complete_at": 5.0 } }"#;
        let t: Tuning = serde_json::from_str(json).unwrap();
        assert_eq!(t.coins.count, 12);
        assert_eq!(t.phases.complete_at, 5.0);
        // Untouched fields keep their defaults
        assert_eq!(t.coins.restitution, CoinTuning::default().restitution);
        assert_eq!(t.sparkles.count, SPARKLE_COUNT);
    }

    #[test]
    fn test_roundtrip() {
        let t = Tuning::default();
        let json = serde_json::to_string(&t).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back.coins.count, t.coins.count);
        assert_eq!(back.phases.lid_open_angle, t.phases.lid_open_angle);
    }
}
