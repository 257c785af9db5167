//! Animation phase machine and rig pose derivation
//!
//! Transitions are pure functions of elapsed time since trigger. The
//! controller reports entered-phase edges so the orchestrator can fire
//! activation exactly once per phase even when a large frame crosses
//! several thresholds at once.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::elastic_ease_out;
use crate::tuning::PhaseTuning;

/// Sequence phases, in playback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Shake,
    Open,
    Burst,
    Complete,
}

impl Phase {
    fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::Shake),
            Phase::Shake => Some(Phase::Open),
            Phase::Open => Some(Phase::Burst),
            Phase::Burst => Some(Phase::Complete),
            Phase::Complete => None,
        }
    }
}

/// Continuous rig parameters for the current frame, consumed by the
/// renderer as offsets from the rig's rest transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RigPose {
    /// Positional jitter (shake) or bob (ambient idle)
    pub position_offset: Vec3,
    /// Small Euler-angle jitter/sway
    pub rotation_offset: Vec3,
    /// Lid hinge angle, 0 = closed
    pub lid_angle: f32,
    /// Main glow intensity signal
    pub glow: f32,
    /// Interior beam light, spiked at open
    pub beam_intensity: f32,
    /// Rim flash light, spiked at open
    pub flash_intensity: f32,
}

/// Maps elapsed time to a discrete phase and derives the rig pose
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PhaseController {
    phase: Phase,
}

impl PhaseController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    fn phase_at(elapsed: f32, t: &PhaseTuning) -> Phase {
        if elapsed < t.shake_duration {
            Phase::Shake
        } else if elapsed < t.shake_duration + t.open_duration {
            Phase::Open
        } else if elapsed < t.complete_at {
            Phase::Burst
        } else {
            Phase::Complete
        }
    }

    /// Advance to the phase `elapsed` demands, pushing every phase entered
    /// along the way (in order) so no entry action is skipped by a large dt.
    /// Only call while the clock is running; phases never move backward.
    pub fn advance(&mut self, elapsed: f32, t: &PhaseTuning, entered: &mut Vec<Phase>) {
        let target = Self::phase_at(elapsed, t);
        while self.phase < target {
            let Some(next) = self.phase.next() else {
                break;
            };
            self.phase = next;
            entered.push(next);
            log::debug!("phase -> {:?} at {:.3}s", next, elapsed);
        }
    }

    /// Derive the continuous rig parameters for the current frame.
    ///
    /// `elapsed` is time since trigger; `ambient_elapsed` is the separate
    /// pre-trigger time that drives the cosmetic idle animation and stops
    /// the instant the shake begins.
    pub fn pose(&self, elapsed: f32, ambient_elapsed: f32, t: &PhaseTuning) -> RigPose {
        match self.phase {
            Phase::Idle => Self::ambient_pose(ambient_elapsed, t),
            Phase::Shake => Self::shake_pose(elapsed, t),
            Phase::Open => Self::open_pose(elapsed, t),
            Phase::Burst | Phase::Complete => RigPose {
                lid_angle: t.lid_open_angle,
                glow: 1.0,
                ..RigPose::default()
            },
        }
    }

    /// Slow bob, sway, and pulsing glow while waiting for a trigger
    fn ambient_pose(ambient_elapsed: f32, t: &PhaseTuning) -> RigPose {
        let s = ambient_elapsed * t.ambient_bob_speed;
        RigPose {
            position_offset: Vec3::new(0.0, s.sin() * t.ambient_bob_amplitude, 0.0),
            rotation_offset: Vec3::new(0.0, (s * 0.5).sin() * t.ambient_sway, 0.0),
            lid_angle: 0.0,
            glow: t.ambient_glow_base + t.ambient_glow_pulse * (0.5 + 0.5 * (s * 0.8).sin()),
            beam_intensity: 0.0,
            flash_intensity: 0.0,
        }
    }

    /// Jitter envelope rises then falls across the phase while the
    /// oscillation frequency ramps up; glow ramps toward full.
    fn shake_pose(elapsed: f32, t: &PhaseTuning) -> RigPose {
        let progress = (elapsed / t.shake_duration).clamp(0.0, 1.0);
        let intensity = (PI * progress).sin() * t.shake_max_intensity;
        let frequency = t.shake_base_frequency + t.shake_frequency_ramp * progress;
        let w = TAU * frequency * elapsed;
        RigPose {
            position_offset: Vec3::new(
                w.sin() * intensity,
                0.0,
                (w * 0.83).cos() * intensity * 0.6,
            ),
            rotation_offset: Vec3::new(
                0.0,
                0.0,
                (w * 1.31).sin() * intensity * t.shake_rotation_scale,
            ),
            lid_angle: 0.0,
            glow: progress,
            beam_intensity: 0.0,
            flash_intensity: 0.0,
        }
    }

    /// Lid snaps open along an elastic curve; two light signals spike at the
    /// start of the phase and decay linearly over the flash window.
    fn open_pose(elapsed: f32, t: &PhaseTuning) -> RigPose {
        let progress = ((elapsed - t.shake_duration) / t.open_duration).clamp(0.0, 1.0);
        let spike = if t.open_flash_window > 0.0 {
            (1.0 - progress / t.open_flash_window).max(0.0)
        } else {
            0.0
        };
        RigPose {
            position_offset: Vec3::ZERO,
            rotation_offset: Vec3::ZERO,
            lid_angle: t.lid_open_angle * elastic_ease_out(progress),
            glow: 1.0,
            beam_intensity: t.beam_peak * spike,
            flash_intensity: t.flash_peak * spike,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> PhaseTuning {
        PhaseTuning::default()
    }

    #[test]
    fn test_phase_thresholds() {
        let t = t();
        assert_eq!(PhaseController::phase_at(0.0, &t), Phase::Shake);
        assert_eq!(PhaseController::phase_at(1.19, &t), Phase::Shake);
        assert_eq!(PhaseController::phase_at(1.2, &t), Phase::Open);
        assert_eq!(PhaseController::phase_at(1.79, &t), Phase::Open);
        assert_eq!(PhaseController::phase_at(1.8, &t), Phase::Burst);
        assert_eq!(PhaseController::phase_at(3.49, &t), Phase::Burst);
        assert_eq!(PhaseController::phase_at(3.5, &t), Phase::Complete);
        assert_eq!(PhaseController::phase_at(100.0, &t), Phase::Complete);
    }

    #[test]
    fn test_advance_emits_every_entered_phase_in_order() {
        let t = t();
        let mut ctl = PhaseController::new();
        let mut entered = Vec::new();
        // One giant leap straight past every threshold
        ctl.advance(10.0, &t, &mut entered);
        assert_eq!(
            entered,
            vec![Phase::Shake, Phase::Open, Phase::Burst, Phase::Complete]
        );
        assert_eq!(ctl.phase(), Phase::Complete);

        // Further advances are edge-free
        entered.clear();
        ctl.advance(20.0, &t, &mut entered);
        assert!(entered.is_empty());
    }

    #[test]
    fn test_advance_never_regresses() {
        let t = t();
        let mut ctl = PhaseController::new();
        let mut entered = Vec::new();
        ctl.advance(2.0, &t, &mut entered);
        assert_eq!(ctl.phase(), Phase::Burst);
        entered.clear();
        // Elapsed going backward must not move the phase back
        ctl.advance(0.5, &t, &mut entered);
        assert_eq!(ctl.phase(), Phase::Burst);
        assert!(entered.is_empty());
    }

    #[test]
    fn test_lid_angle_boundaries() {
        let t = t();
        let mut ctl = PhaseController::new();
        let mut entered = Vec::new();

        ctl.advance(t.shake_duration, &t, &mut entered);
        assert_eq!(ctl.phase(), Phase::Open);
        // Start of Open: lid still closed
        let pose = ctl.pose(t.shake_duration, 0.0, &t);
        assert!(pose.lid_angle.abs() < 1e-4, "lid angle {}", pose.lid_angle);

        // End of Open: lid exactly at target
        let end = t.shake_duration + t.open_duration;
        let pose = ctl.pose(end, 0.0, &t);
        assert!((pose.lid_angle - t.lid_open_angle).abs() < 1e-4);
    }

    #[test]
    fn test_shake_envelope_rises_then_falls() {
        let t = t();
        let ctl = PhaseController {
            phase: Phase::Shake,
        };
        let amp = |elapsed: f32| ctl.pose(elapsed, 0.0, &t).position_offset.length();
        // The sin(pi * progress) envelope is zero at both ends of the phase
        assert!(amp(0.0) < 1e-4);
        assert!(amp(t.shake_duration) < 1e-3);
        // Sample the middle half: some point there must actually shake
        let peak = (25..75)
            .map(|i| amp(t.shake_duration * i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > t.shake_max_intensity * 0.2);
    }

    #[test]
    fn test_shake_zeroed_in_open() {
        let t = t();
        let ctl = PhaseController { phase: Phase::Open };
        let pose = ctl.pose(t.shake_duration + 0.1, 0.0, &t);
        assert_eq!(pose.position_offset, Vec3::ZERO);
        assert_eq!(pose.rotation_offset, Vec3::ZERO);
    }

    #[test]
    fn test_open_light_spike_decays_linearly() {
        let t = t();
        let ctl = PhaseController { phase: Phase::Open };
        let at = |p: f32| ctl.pose(t.shake_duration + t.open_duration * p, 0.0, &t);

        let start = at(0.0);
        assert!((start.beam_intensity - t.beam_peak).abs() < 1e-3);
        assert!((start.flash_intensity - t.flash_peak).abs() < 1e-3);

        let mid = at(t.open_flash_window / 2.0);
        assert!((mid.beam_intensity - t.beam_peak / 2.0).abs() < 1e-2);

        // Past the flash window both signals are fully decayed
        let after = at(t.open_flash_window + 0.05);
        assert_eq!(after.beam_intensity, 0.0);
        assert_eq!(after.flash_intensity, 0.0);
    }

    #[test]
    fn test_ambient_pose_is_cosmetic_only() {
        let t = t();
        let ctl = PhaseController::new();
        let pose = ctl.pose(0.0, 3.7, &t);
        assert_eq!(pose.lid_angle, 0.0);
        assert_eq!(pose.beam_intensity, 0.0);
        assert!(pose.glow >= t.ambient_glow_base);
        assert!(pose.glow <= t.ambient_glow_base + t.ambient_glow_pulse);
        // Bob amplitude stays within its configured bound
        assert!(pose.position_offset.y.abs() <= t.ambient_bob_amplitude + 1e-6);
    }

    #[test]
    fn test_burst_pose_holds_lid_open() {
        let t = t();
        let ctl = PhaseController {
            phase: Phase::Burst,
        };
        let pose = ctl.pose(2.5, 0.0, &t);
        assert_eq!(pose.lid_angle, t.lid_open_angle);
        assert_eq!(pose.position_offset, Vec3::ZERO);
        assert_eq!(pose.glow, 1.0);
    }
}
