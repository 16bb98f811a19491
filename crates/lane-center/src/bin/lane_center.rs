//! lane-center CLI: estimate the lane center of a binary mask.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lane_center::core::{BoundaryStrategy, EvidenceSource, LaneParams, LaneReport};
use lane_center::detect::{self, CannyParams, PreprocessConfig};
use lane_center::io;
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "lane-center")]
#[command(about = "Estimate the lane center column of a top-down binary lane mask")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the lane in a mask file and print the report as JSON.
    Detect(DetectArgs),

    /// Generate the two-band test frame and print its report.
    Synthetic(SyntheticArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// `.txt` files are text grids, everything else is decoded as an image.
    Auto,
    Image,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Regions,
    Peaks,
    FixedSplit,
}

impl From<StrategyArg> for BoundaryStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Regions => BoundaryStrategy::Regions,
            StrategyArg::Peaks => BoundaryStrategy::Peaks,
            StrategyArg::FixedSplit => BoundaryStrategy::FixedSplit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EvidenceArg {
    Mask,
    Edges,
}

impl From<EvidenceArg> for EvidenceSource {
    fn from(value: EvidenceArg) -> Self {
        match value {
            EvidenceArg::Mask => EvidenceSource::Mask,
            EvidenceArg::Edges => EvidenceSource::Edges,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the mask (image file or text grid).
    path: PathBuf,

    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,

    /// JSON file with `LaneParams` overrides.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Boundary strategy (overrides `--params`).
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Profile source for boundary candidates (overrides `--params`).
    #[arg(long, value_enum)]
    evidence: Option<EvidenceArg>,

    /// Binarize image input at this gray level instead of treating any
    /// non-zero pixel as foreground.
    #[arg(long)]
    threshold: Option<u8>,

    /// With --threshold, treat dark pixels as foreground.
    #[arg(long, requires = "threshold")]
    invert: bool,

    /// Skip the morphological open/close stage.
    #[arg(long)]
    no_denoise: bool,

    /// Fixed Canny low threshold (adaptive when omitted).
    #[arg(long)]
    canny_low: Option<f32>,

    /// Fixed Canny high threshold (adaptive when omitted).
    #[arg(long)]
    canny_high: Option<f32>,

    /// Print the full analysis (profile, regions, boundaries) instead of the report.
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Args)]
struct SyntheticArgs {
    #[arg(long, default_value_t = 320)]
    width: usize,

    #[arg(long, default_value_t = 240)]
    height: usize,

    /// Write the frame to this path (`.txt` for a text grid, otherwise an image).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Synthetic(args) => run_synthetic(&args),
    }
}

fn init_logging(verbosity: u8) {
    #[cfg(feature = "tracing")]
    {
        let _ = verbosity;
        let _ = LogTracer::init();
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = lane_center::core::init_with_verbosity(verbosity);
    }
}

// ── detect ─────────────────────────────────────────────────────────────

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let params = load_params(args)?;
    let preprocess = PreprocessConfig {
        denoise: !args.no_denoise,
        canny: CannyParams {
            low_threshold: args.canny_low,
            high_threshold: args.canny_high,
        },
    };

    let img = load_mask_image(args)?;
    log::info!(
        "loaded {}x{} mask from {}",
        img.width(),
        img.height(),
        args.path.display()
    );

    if args.debug {
        let analysis = detect::analyze_lane(&img, params, &preprocess)?;
        print_json(&analysis)
    } else {
        let detection = detect::detect_lane(&img, params, &preprocess)?;
        print_json(&LaneReport::from(detection))
    }
}

fn load_params(args: &DetectArgs) -> CliResult<LaneParams> {
    let mut params = match &args.params {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read params {}: {e}", path.display()))?;
            serde_json::from_str::<LaneParams>(&text)
                .map_err(|e| format!("invalid params {}: {e}", path.display()))?
        }
        None => LaneParams::default(),
    };
    if let Some(strategy) = args.strategy {
        params.strategy = strategy.into();
    }
    if let Some(evidence) = args.evidence {
        params.evidence = evidence.into();
    }
    Ok(params)
}

fn load_mask_image(args: &DetectArgs) -> CliResult<image::GrayImage> {
    let text = match args.format {
        InputFormat::Auto => io::is_text_path(&args.path),
        InputFormat::Image => false,
        InputFormat::Text => true,
    };
    if text {
        let mask = io::load_text_mask(&args.path)?;
        return Ok(detect::mask_image(&mask.view()));
    }

    let img = io::load_image(&args.path)?;
    Ok(match args.threshold {
        Some(threshold) => io::binarize(&img, threshold, args.invert),
        None => img,
    })
}

// ── synthetic ──────────────────────────────────────────────────────────

fn run_synthetic(args: &SyntheticArgs) -> CliResult<()> {
    let mask = io::synthetic_two_band(args.width, args.height)?;
    if let Some(out) = &args.out {
        io::save_mask(&mask.view(), out)?;
        log::info!("wrote synthetic frame to {}", out.display());
    }

    let img = detect::mask_image(&mask.view());
    let detection = detect::detect_lane_default(&img)?;
    print_json(&LaneReport::from(detection))
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
