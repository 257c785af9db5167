//! Headless demo driver
//!
//! Runs one full reward sequence against a synthetic 60 Hz frame clock and
//! logs every edge event, proving the core needs no presentation layer.
//!
//! Usage: reward-burst [seed] [tuning.json]

use reward_burst::{Orchestrator, SequenceEvent, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut seed: u64 = 0xC0FFEE;
    let mut tuning = Tuning::default();
    for arg in std::env::args().skip(1) {
        match arg.parse::<u64>() {
            Ok(parsed) => seed = parsed,
            Err(_) => tuning = load_tuning(&arg),
        }
    }

    let mut orch = Orchestrator::new(seed, tuning);
    orch.on_complete(|| log::info!("host notified: reward claimable"));

    // A moment of ambient idle before the user "clicks"
    for _ in 0..30 {
        orch.tick(FRAME_DT);
    }
    orch.trigger();

    let mut frames = 0u32;
    loop {
        for event in orch.tick(FRAME_DT) {
            let snap = orch.snapshot();
            match event {
                SequenceEvent::PhaseEntered(phase) => {
                    log::info!("[{:>7.3}s] phase {:?}", snap.elapsed, phase)
                }
                SequenceEvent::SparklesBurst => {
                    log::info!("[{:>7.3}s] sparkles burst ({})", snap.elapsed, snap.sparkles.len())
                }
                SequenceEvent::CoinsReleased => {
                    log::info!("[{:>7.3}s] coins released ({})", snap.elapsed, snap.coins.len())
                }
                SequenceEvent::Completed => {
                    log::info!("[{:>7.3}s] sequence complete", snap.elapsed)
                }
            }
        }
        frames += 1;

        // Let the after-show wind down: everything settled or faded, no
        // sparkle alive. Hard cap in case tuning makes that unreachable.
        let snap = orch.snapshot();
        let coins_done =
            orch.settled_coins() + snap.coins.iter().filter(|c| c.opacity == 0.0).count()
                >= snap.coins.len();
        if (snap.elapsed > 3.5 && !snap.sparkles_alive && coins_done) || frames > 60 * 30 {
            break;
        }
    }

    let snap = orch.snapshot();
    log::info!(
        "done after {} frames: {} coins settled, {} faded out, lid at {:.1} deg",
        frames,
        orch.settled_coins(),
        snap.coins.iter().filter(|c| c.opacity == 0.0).count(),
        snap.rig.lid_angle.to_degrees()
    );
}

fn load_tuning(path: &str) -> Tuning {
    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(tuning) => {
                log::info!("loaded tuning overrides from {path}");
                tuning
            }
            Err(err) => {
                log::warn!("ignoring malformed tuning file {path}: {err}");
                Tuning::default()
            }
        },
        Err(err) => {
            log::warn!("cannot read tuning file {path}: {err}");
            Tuning::default()
        }
    }
}
