//! Replays a recorded pointer trace against a magnifier configuration and
//! prints the render state after every step as one JSON object per line.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use magnify::{AppConfig, Dimension, MagnifyError, PointerCapability, load_trace, replay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Modality {
    Mouse,
    Touch,
}

#[derive(Parser, Debug)]
#[command(
    name = "magnify-replay",
    about = "Replay a pointer trace through the zoomable image engine"
)]
struct Args {
    /// Magnifier configuration (JSON)
    #[arg(long)]
    config: PathBuf,

    /// Pointer trace (JSON array of steps)
    #[arg(long)]
    trace: PathBuf,

    /// Primary pointer reported by the platform at mount
    #[arg(long, value_enum, default_value_t = Modality::Mouse)]
    modality: Modality,

    /// Measured small-image width for fluid images
    #[arg(long, default_value_t = 0.0)]
    measured_width: f32,

    /// Measured small-image height for fluid images
    #[arg(long, default_value_t = 0.0)]
    measured_height: f32,
}

fn run(args: Args) -> Result<(), MagnifyError> {
    let config = AppConfig::load(&args.config)?;

    let mut logger = env_logger::Builder::new();
    logger.filter_level(config.log_level.to_level_filter());
    logger.parse_default_env();
    logger.init();

    let steps = load_trace(&args.trace)?;
    log::info!("Replaying {} steps from {:?}", steps.len(), args.trace);

    let capability = match args.modality {
        Modality::Mouse => PointerCapability::mouse(),
        Modality::Touch => PointerCapability::touch(),
    };
    let layout = Dimension::new(args.measured_width, args.measured_height);

    for frame in replay(&config.magnifier, capability, layout, &steps)? {
        println!("{}", serde_json::to_string(&frame)?);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Replay error: {}", e);
        std::process::exit(1);
    }
}
