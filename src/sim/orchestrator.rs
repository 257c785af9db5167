//! Sequence orchestrator
//!
//! Single owner of the clock, phase machine, and both simulators. The host
//! render loop calls `tick(dt)` once per frame and reads the snapshot; the
//! orchestrator turns phase edges into activation calls and fires the
//! completion callback exactly once per trigger.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::AnimationClock;
use super::coins::{Coin, CoinSim};
use super::phase::{Phase, PhaseController, RigPose};
use super::sparkles::{Sparkle, SparklePool};
use crate::tuning::Tuning;

/// Edge events produced by one tick, in occurrence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEvent {
    PhaseEntered(Phase),
    /// The sparkle pool just burst (Burst phase entry)
    SparklesBurst,
    /// The coin cascade just started (a fixed beat after the sparkles)
    CoinsReleased,
    /// The sequence finished; fired at most once per trigger
    Completed,
}

/// Read-only per-frame view for the renderer
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    /// Seconds since trigger (0 while idle)
    pub elapsed: f32,
    pub rig: RigPose,
    pub coins: &'a [Coin],
    pub sparkles: &'a [Sparkle],
    /// False once every sparkle has died; lets the host fade the effect
    pub sparkles_alive: bool,
}

type CompletionCallback = Box<dyn FnMut()>;

/// Owns and coordinates every component of one reward sequence
pub struct Orchestrator {
    seed: u64,
    tuning: Tuning,
    rng: Pcg32,
    clock: AnimationClock,
    phases: PhaseController,
    coins: CoinSim,
    sparkles: SparklePool,
    /// Pre-trigger time driving the cosmetic idle animation
    ambient_elapsed: f32,
    /// Absolute elapsed time at which the coin cascade starts
    coin_release_at: Option<f32>,
    completed: bool,
    /// Events raised outside `tick` (trigger edge), drained on the next tick
    pending: Vec<SequenceEvent>,
    on_complete: Option<CompletionCallback>,
}

impl Orchestrator {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let sparkles = SparklePool::new(&tuning.sparkles, &mut rng);
        let coins = CoinSim::new(&tuning.coins);
        Self {
            seed,
            tuning,
            rng,
            clock: AnimationClock::new(),
            phases: PhaseController::new(),
            coins,
            sparkles,
            ambient_elapsed: 0.0,
            coin_release_at: None,
            completed: false,
            pending: Vec::new(),
            on_complete: None,
        }
    }

    /// Register the host's completion callback, invoked at most once per
    /// trigger when the sequence reaches `Complete`.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Start the sequence. Ignored mid-sequence (no overlapping timers);
    /// from `Complete` the whole show resets and replays.
    pub fn trigger(&mut self) {
        match self.phases.phase() {
            Phase::Idle => self.start(),
            Phase::Complete => {
                log::debug!("re-trigger after completion, restarting");
                self.reset();
                self.start();
            }
            phase => {
                log::debug!("trigger ignored mid-sequence (phase {:?})", phase);
            }
        }
    }

    fn start(&mut self) {
        log::info!("reward sequence triggered (seed {})", self.seed);
        self.clock.start();
        let mut entered = Vec::new();
        self.phases.advance(0.0, &self.tuning.phases, &mut entered);
        for phase in entered {
            self.pending.push(SequenceEvent::PhaseEntered(phase));
        }
    }

    /// Advance the whole sequence by one frame and return the edge events.
    ///
    /// The clock absorbs the full frame time so phase timing tracks real
    /// elapsed time, but integration steps are clamped to `max_sim_dt` so a
    /// backgrounded-tab frame cannot cause an implausible physics jump.
    pub fn tick(&mut self, dt: f32) -> Vec<SequenceEvent> {
        let dt = dt.max(0.0);
        let sim_dt = dt.min(self.tuning.timing.max_sim_dt);
        let mut events = std::mem::take(&mut self.pending);

        if self.clock.running() {
            self.clock.advance(dt);
            let elapsed = self.clock.elapsed();

            let mut entered = Vec::new();
            self.phases.advance(elapsed, &self.tuning.phases, &mut entered);
            for phase in entered {
                events.push(SequenceEvent::PhaseEntered(phase));
                match phase {
                    Phase::Burst => {
                        // Sparkles lead, coins follow after a fixed beat
                        self.sparkles.burst(
                            self.tuning.burst.origin,
                            &self.tuning.sparkles,
                            &mut self.rng,
                        );
                        events.push(SequenceEvent::SparklesBurst);
                        let phases = &self.tuning.phases;
                        self.coin_release_at = Some(
                            phases.shake_duration + phases.open_duration + phases.coin_release_delay,
                        );
                    }
                    Phase::Complete => {
                        if !self.completed {
                            self.completed = true;
                            log::info!("reward sequence complete at {:.3}s", elapsed);
                            if let Some(callback) = self.on_complete.as_mut() {
                                callback();
                            }
                            events.push(SequenceEvent::Completed);
                        }
                    }
                    _ => {}
                }
            }

            if let Some(release_at) = self.coin_release_at {
                if elapsed >= release_at {
                    self.coin_release_at = None;
                    self.coins
                        .activate(self.tuning.burst.origin, &self.tuning.coins, &mut self.rng);
                    events.push(SequenceEvent::CoinsReleased);
                }
            }
        } else if self.phases.phase() == Phase::Idle {
            self.ambient_elapsed += dt;
        }

        self.sparkles.tick(sim_dt, &self.tuning.sparkles);
        self.coins.tick(sim_dt, &self.tuning.coins);

        events
    }

    /// Return every component to its allocation-time state. Idempotent;
    /// safe to call before any trigger or repeatedly on teardown.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.phases.reset();
        self.coins.reset();
        self.sparkles.reset();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.ambient_elapsed = 0.0;
        self.coin_release_at = None;
        self.completed = false;
        self.pending.clear();
        log::debug!("sequence reset");
    }

    /// Read-only view of this frame's render state
    pub fn snapshot(&self) -> Snapshot<'_> {
        let elapsed = self.clock.elapsed();
        Snapshot {
            phase: self.phases.phase(),
            elapsed,
            rig: self
                .phases
                .pose(elapsed, self.ambient_elapsed, &self.tuning.phases),
            coins: self.coins.coins(),
            sparkles: self.sparkles.particles(),
            sparkles_alive: self.sparkles.any_alive(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phases.phase()
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Where the burst originates, for hosts that position the effect
    pub fn burst_origin(&self) -> Vec3 {
        self.tuning.burst.origin
    }

    /// Coins released and still visible (diagnostics)
    pub fn visible_coins(&self) -> usize {
        self.coins.visible_count()
    }

    /// Coins at rest on the floor (diagnostics)
    pub fn settled_coins(&self) -> usize {
        self.coins.settled_count()
    }
}
