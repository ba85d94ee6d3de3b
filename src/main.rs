//! Platformer Simulation Runner
//!
//! Headless demo: plays a scripted run through the default level at an
//! uneven frame rate, then replays the recorded input and checks that
//! both runs end in the same state.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use platformer_core::{
    SimConfig, VERSION,
    game::{
        host::{run, ScriptedHost},
        input::InputSnapshot,
        session::{replay, RenderSnapshot, Session},
    },
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SimConfig::from_env().context("loading configuration")?;

    info!("Platformer Core v{}", VERSION);
    info!("Tick: {:.5}s ({:.0} Hz)", config.scheduler.fixed_tick, 1.0 / config.scheduler.fixed_tick);
    match config.scheduler.max_ticks_per_frame {
        Some(cap) => info!("Catch-up cap: {} ticks per frame", cap),
        None => info!("Catch-up cap: none"),
    }

    demo_run(&config);
    Ok(())
}

/// Scripted input: wait, run right, hop the ledge wall, boost to the goal.
fn demo_script() -> Vec<(InputSnapshot, f32)> {
    let phases = [
        (InputSnapshot::new(), 60),
        (InputSnapshot::new().with_right(), 150),
        (InputSnapshot::new().with_right().with_jump(), 10),
        (InputSnapshot::new().with_right().with_boost(), 40),
        (InputSnapshot::new().with_right(), 120),
        (InputSnapshot::new().with_toggle_debug(), 2),
        (InputSnapshot::new().with_left().with_jump(), 60),
    ];

    let mut frames = Vec::new();
    for (input, count) in phases {
        for i in 0..count {
            // Jittery frame pacing around 60 fps
            let delta = match i % 4 {
                0 => 0.0121,
                1 => 0.0213,
                2 => 0.0167,
                _ => 0.0166,
            };
            frames.push((input, delta));
        }
    }
    frames
}

/// Demo function to exercise the simulation.
fn demo_run(config: &SimConfig) {
    info!("=== Starting Demo Run ===");

    let mut session = Session::new(config.clone());
    session.start_recording();

    let mut host = ScriptedHost::with_observer(demo_script(), |frame, snapshot: &RenderSnapshot| {
        // Report twice a second
        if frame % 30 == 0 {
            let r = snapshot.actor_pixels;
            info!(
                "Frame {}: actor at ({}, {}) grounded={} boost={:.1}/{:.0} goal={}",
                frame, r.x, r.y, snapshot.grounded, snapshot.boost_charge, snapshot.max_boost, snapshot.goal_reached
            );
        }
    });

    let summary = run(&mut session, &mut host);
    info!("Ran {} frames, {} ticks", summary.frames, summary.ticks);

    // Print final results
    info!("=== Run Results ===");
    let actor = session.actor();
    info!("Final position: {}", actor.rect().position());
    info!("Goal reached: {}", session.signals().goal_reached);
    let hash = session.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let Some(recording) = session.take_recording() else {
        warn!("No recording captured, skipping replay");
        return;
    };
    info!(
        "Recording: {} ticks in {} input changes (hash {})",
        recording.tick_count,
        recording.delta_count(),
        hex::encode(&recording.compute_hash()[..8])
    );

    let replayed = replay(config, &recording);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }
}
