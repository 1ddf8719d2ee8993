//! # Headless Night Runner
//!
//! Plays the saved night without a window.
//!
//! ```text
//! lonepeak-night --autopilot --seed 1987
//! RUST_LOG=debug lonepeak-night --realtime --max-frames 600
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lonepeak::{
    Autopilot, GameConfig, GameLoop, HeadlessDeck, InputSource, NoInput, Session, SessionResult,
};
use lonepeak_night::{NightTable, SaveManager};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command line of the runner.
#[derive(Parser)]
#[command(version, about = "Plays one Lone Peak night headless", long_about = None)]
struct Cli {
    /// Game configuration file
    #[arg(long, default_value = "data/game.toml")]
    config: PathBuf,

    /// Night table, overrides the config
    #[arg(long)]
    nights: Option<PathBuf>,

    /// Save file, overrides the config
    #[arg(long)]
    save: Option<PathBuf>,

    /// RNG seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Real time of one in-game hour, overrides the config
    #[arg(long)]
    hour_ms: Option<u64>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Pace frames to the wall clock
    #[arg(long)]
    realtime: bool,

    /// Let the built-in player defend the office
    #[arg(long)]
    autopilot: bool,
}

impl Cli {
    fn apply(&self, config: &mut GameConfig) {
        if let Some(nights) = &self.nights {
            config.nights_path.clone_from(nights);
        }
        if let Some(save) = &self.save {
            config.save_path.clone_from(save);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(hour_ms) = self.hour_ms {
            config.hour_duration_ms = hour_ms;
        }
    }
}

fn run(cli: &Cli, mut config: GameConfig) -> SessionResult<()> {
    cli.apply(&mut config);
    config.validate()?;

    let nights = NightTable::load(&config.nights_path)?;
    let saves = SaveManager::new(&config.save_path);
    let mut session = Session::new(&config, nights, saves, Box::new(HeadlessDeck::standard()))?;
    session.start()?;

    let mut input: Box<dyn InputSource> = if cli.autopilot {
        Box::new(Autopilot::default())
    } else {
        Box::new(NoInput)
    };

    let outcome = GameLoop::new(config.frame_rate)
        .realtime(cli.realtime)
        .max_frames(cli.max_frames)
        .run(&mut session, input.as_mut());

    let snapshot = session.snapshot();
    info!(
        "Night {} over after {} frames ({} ms): {:?} at {}, power {}%, next {:?}",
        snapshot.night,
        outcome.frames,
        outcome.simulated_ms,
        outcome.status,
        snapshot.clock_label,
        snapshot.power_percent,
        outcome.end_target
    );
    if let Some(agent) = snapshot.jumpscare {
        info!("Killed by {}", agent);
    }
    info!(
        "Frame time: avg {} us, max {} us, {} late",
        outcome.stats.average_us(),
        outcome.stats.slowest_us,
        outcome.stats.late_frames
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = GameConfig::load_or_default(&cli.config);

    let default_filter = config
        .as_ref()
        .map_or("info", |c| c.log_filter.as_str())
        .to_owned();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match config.and_then(|config| run(&cli, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
