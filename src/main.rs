//! Screentone CLI - apply a manga-style screentone filter to an image.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use screentone::{node, Config, Mode, Screentone};

/// Apply a manga-style screentone filter to an image.
#[derive(Parser, Debug)]
#[command(name = "screentone")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path.
    #[arg(value_name = "INPUT", required_unless_present = "describe")]
    input: Option<PathBuf>,

    /// Output image path.
    #[arg(value_name = "OUTPUT", required_unless_present = "describe")]
    output: Option<PathBuf>,

    /// Distance between dot centres in pixels.
    #[arg(long, default_value = "10", value_name = "INT")]
    dot_spacing: u32,

    /// Dot diameter in pixels.
    #[arg(long, default_value = "4", value_name = "INT")]
    dot_size: u32,

    /// Number of grey levels (1-256).
    #[arg(long, default_value = "4", value_name = "INT")]
    quantization: u16,

    /// Brightness (0.0-1.0) at and above which no dots are drawn.
    #[arg(long, default_value = "0.95", value_name = "FLOAT")]
    white_threshold: f32,

    /// Fraction of darkest pixels (0.0-1.0) forced to black.
    #[arg(long, default_value = "0.1", value_name = "FLOAT")]
    black_threshold: f32,

    /// Erode the dot mask with a square of this side (0-10).
    #[arg(long, default_value = "5", value_name = "INT")]
    mask_shrink: u32,

    /// Dot overlay opacity (0.0-1.0).
    #[arg(long, default_value = "1.0", value_name = "FLOAT")]
    overlay_opacity: f32,

    /// Compositing mode.
    #[arg(long, value_enum, default_value_t = ModeArg::Multiply)]
    mode: ModeArg,

    /// Output JPEG quality (1-100).
    #[arg(short, long, default_value = "95", value_name = "INT")]
    quality: u8,

    /// Print the node registration schema and exit.
    #[arg(long)]
    describe: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Multiply,
    ScreentoneOnly,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Multiply => Self::Multiply,
            ModeArg::ScreentoneOnly => Self::ScreentoneOnly,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("screentone={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    if args.describe {
        println!("{}", node::NODE);
        return Ok(());
    }

    let (Some(input), Some(output)) = (&args.input, &args.output) else {
        anyhow::bail!("INPUT and OUTPUT are required");
    };

    // Validate input file exists
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    if !(1..=100).contains(&args.quality) {
        anyhow::bail!("Quality must be between 1 and 100, got {}", args.quality);
    }

    // Build configuration
    let config = Config {
        dot_spacing: args.dot_spacing,
        dot_size: args.dot_size,
        quantization: args.quantization,
        white_threshold: args.white_threshold,
        black_threshold: args.black_threshold,
        mask_shrink: args.mask_shrink,
        overlay_opacity: args.overlay_opacity,
        mode: args.mode.into(),
    };

    let pipeline = Screentone::new(config).context("Invalid filter parameters")?;

    pipeline
        .process(input, output, args.quality)
        .context("Failed to process image")?;

    println!(
        "Successfully processed {} -> {}",
        input.display(),
        output.display()
    );

    Ok(())
}
