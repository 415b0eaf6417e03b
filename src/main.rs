//! Dragon Fury headless demo
//!
//! Drives the gameplay core from a synthetic clock, a synthetic tilt signal
//! and periodic taps against a recording presentation layer, then prints a
//! JSON summary. Set `RUST_LOG=debug` (or `trace`) to follow the commands.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dragon_fury::consts::MOTION_SAMPLE_HZ;
use dragon_fury::sim::{Contact, EntityKind, GameController, GameState, Inbound, InboundQueue};
use dragon_fury::{GameError, RecordingPresentation, Settings};

/// Lateral distance at which a shot counts as touching an ice ball
const HIT_RADIUS: f32 = 1.5;

#[derive(Debug, Parser)]
#[command(name = "dragon-fury", about = "Run the dragon shooter core headlessly")]
struct Args {
    /// RNG seed for obstacle placement
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Rendered frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Seconds between synthetic taps (0 disables firing)
    #[arg(long, default_value_t = 0.4)]
    tap_every: f64,

    /// Unprojected viewport half width
    #[arg(long, default_value_t = 12.0)]
    half_width: f32,

    /// Lateral distance at which a shot touches an ice ball
    #[arg(long, default_value_t = HIT_RADIUS)]
    hit_radius: f32,

    /// Settings JSON file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), GameError> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    log::info!("Dragon Fury starting (seed {})...", args.seed);

    let mut game = GameController::with_seed(
        RecordingPresentation::with_default_scene(),
        settings,
        args.seed,
    )?;
    game.set_viewport(args.half_width)?;

    let queue = InboundQueue::new();
    let motion = queue.sender();

    let frame_dt = 1.0 / args.fps.max(1.0);
    let sample_dt = 1.0 / MOTION_SAMPLE_HZ as f64;
    let frames = (args.seconds * args.fps).ceil() as u64;

    let mut next_sample = 0.0;
    let mut next_tap = args.tap_every;
    let mut spawned = 0u32;
    let mut expired = 0usize;

    for frame in 0..=frames {
        let time = frame as f64 * frame_dt;

        // Motion runs on its own cadence, independent of the frame rate
        while next_sample <= time {
            let roll = (next_sample * 0.8).sin() as f32 * 0.6;
            let pitch = 0.75 + (next_sample * 0.3).cos() as f32 * 0.1;
            // Receiver outlives this loop
            let _ = motion.send(Inbound::Motion { roll, pitch });
            next_sample += sample_dt;
        }

        if args.tap_every > 0.0 && time >= next_tap {
            queue.push(Inbound::Tap);
            next_tap += args.tap_every;
        }

        let summary = game.run_frame(time, &queue)?;
        spawned += summary.spawned.is_some() as u32;
        expired += summary.expired.len();

        // Stand-in for the physics engine: reported on the next frame
        for (a, b) in overlapping_shots(game.state(), args.hit_radius) {
            queue.push(Inbound::Contact(a, b));
        }
    }

    let state = game.state();
    let report = serde_json::json!({
        "seed": args.seed,
        "frames": state.frame_count,
        "hits": state.hits.count(),
        "label": state.hits.label(),
        "obstacles_spawned": spawned,
        "entities_expired": expired,
        "obstacles_live": state.obstacles.len(),
        "projectiles_live": state.projectiles.len(),
        "player_x": state.steering.position,
        "bounds": state.bounds,
        "commands": game.presentation().commands().len(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Pair each shot with the oldest ice ball it has flown past laterally close to
fn overlapping_shots(state: &GameState, radius: f32) -> Vec<(Contact, Contact)> {
    let mut claimed = Vec::new();
    let mut contacts = Vec::new();
    for shot in &state.projectiles {
        let Some(shot_at) = state.actions.position_of(shot.handle) else {
            continue;
        };
        let target = state.obstacles.iter().find(|ice| {
            !claimed.contains(&ice.handle)
                && state.actions.position_of(ice.handle).is_some_and(|ice_at| {
                    (ice_at.x - shot_at.x).abs() <= radius && shot_at.z <= ice_at.z
                })
        });
        if let Some(ice) = target {
            claimed.push(ice.handle);
            contacts.push((
                Contact::new(shot.handle, EntityKind::Projectile),
                Contact::new(ice.handle, EntityKind::Obstacle),
            ));
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_shot_reported_once_crossed() {
        let mut game = GameController::with_seed(
            RecordingPresentation::with_default_scene(),
            Settings::default(),
            3,
        )
        .unwrap();
        game.set_viewport(12.0).unwrap();
        game.frame_update(0.0).unwrap();
        let ice = game.frame_update(1.0).unwrap().spawned.unwrap();
        let shot = game.fire().unwrap();

        // Shot at z -40, ice ball at z -110: not crossed yet
        game.frame_update(1.6).unwrap();
        assert!(overlapping_shots(game.state(), 100.0).is_empty());

        // Shot at z -100, ice ball at z -70
        game.frame_update(2.2).unwrap();
        let contacts = overlapping_shots(game.state(), 100.0);
        assert_eq!(
            contacts,
            vec![(
                Contact::new(shot, EntityKind::Projectile),
                Contact::new(ice, EntityKind::Obstacle),
            )]
        );

        let queue = InboundQueue::new();
        for (a, b) in contacts {
            queue.push(Inbound::Contact(a, b));
        }
        game.run_frame(2.21, &queue).unwrap();
        assert_eq!(game.hits(), 1);
        assert_eq!(game.state().hits.label(), "1 HITS");
    }
}
