//! Martian Lander headless driver
//!
//! Flies one session without a window: the autopilot (or nobody, with
//! `--manual`) provides input, HUD lines go to the log.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use martian_lander::autopilot::{Autopilot, Coast, Pilot};
use martian_lander::config::TerrainPolicy;
use martian_lander::hud::{LogPresenter, status_text};
use martian_lander::sim::{MissionController, MissionState};
use martian_lander::{FixedStepRunner, LanderConfig};

/// Land a spacecraft on a procedurally generated Mars surface.
#[derive(Parser, Debug)]
#[command(name = "martian-lander", about = "Martian Lander headless driver")]
struct Cli {
    /// Seed for terrain generation (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Give up after this much simulated time.
    #[arg(long, default_value_t = 120.0)]
    max_seconds: f32,

    /// Leave the controls alone instead of using the autopilot.
    #[arg(long)]
    manual: bool,

    /// Roll a new terrain on every reset.
    #[arg(long)]
    regenerate_terrain: bool,

    /// Number of sessions to fly back to back.
    #[arg(long, default_value_t = 1)]
    sessions: u32,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

fn load_config(cli: &Cli) -> Result<LanderConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => LanderConfig::load(path)?,
        None => LanderConfig::default(),
    };
    if cli.seed.is_some() {
        config.mission.seed = cli.seed;
    }
    if cli.regenerate_terrain {
        config.mission.terrain_policy = TerrainPolicy::Regenerate;
    }
    config.validate()?;
    Ok(config)
}

/// Fly one session to its end or the time limit
fn fly(
    mission: &mut MissionController,
    runner: &mut FixedStepRunner,
    pilot: &mut dyn Pilot,
    presenter: &mut LogPresenter,
    max_seconds: f32,
) -> MissionState {
    let frame_dt = runner.dt();
    let max_frames = (max_seconds / frame_dt).ceil() as u64;

    mission.start();
    runner.flush(mission, presenter);

    for _ in 0..max_frames {
        let input = pilot.control(&mission.snapshot(), mission.terrain());
        runner.frame(mission, &input, frame_dt, presenter);
        if mission.state().is_terminal() {
            break;
        }
    }
    mission.state()
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    if cli.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut mission = MissionController::new(config.clone())?;
    let mut runner = FixedStepRunner::new(&config);
    let mut presenter = LogPresenter::new();
    let mut pilot: Box<dyn Pilot> = if cli.manual {
        Box::new(Coast)
    } else {
        Box::new(Autopilot::new(&config))
    };

    let pads: Vec<_> = mission.terrain().pads.iter().map(|p| p.segment_index).collect();
    log::info!("Martian Lander starting, pads on segments {pads:?}");

    let mut landed = 0;
    for session in 1..=cli.sessions.max(1) {
        let state = fly(
            &mut mission,
            &mut runner,
            pilot.as_mut(),
            &mut presenter,
            cli.max_seconds,
        );
        let summary = status_text(state, presenter.last_outcome()).unwrap_or("Out of time");
        log::info!(
            "Session {session}: {state:?} after {} ticks, {} kg fuel left. {}",
            mission.tick_count(),
            mission.snapshot().fuel_kg,
            summary.replace('\n', "")
        );
        if state == MissionState::Landed {
            landed += 1;
        }

        mission.reset();
        runner.clear();
        runner.flush(&mut mission, &mut presenter);
    }

    log::info!("Landed {landed} of {} sessions", cli.sessions.max(1));
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
