//! Boxcull: pair-check and visually cull object detection datasets.
//!
//! A dataset is a directory of images and a directory of YOLO-style label
//! files that share basenames. Boxcull first moves every unpaired file into
//! a quarantine directory, then lets an operator page through the remaining
//! samples with their boxes drawn on top and reject bad ones.
//!
//! # Modules
//!
//! - [`label`]: label file parsing
//! - [`geometry`]: normalized box to pixel corner projection
//! - [`filter`]: image/label consistency filter
//! - [`quarantine`]: moving files into the quarantine directory
//! - [`render`]: box overlay drawing
//! - [`session`]: the review state machine and loop
//! - [`display`]: the review window
//! - [`config`]: run configuration
//! - [`error`]: error types

pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod label;
pub mod quarantine;
pub mod render;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

pub use config::Config;
pub use error::CullError;

/// The boxcull CLI application.
#[derive(Parser)]
#[command(name = "boxcull")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    dataset: DatasetArgs,

    /// Log debug output (RUST_LOG overrides this).
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Quarantine images without labels and labels without images.
    Filter(FilterArgs),
    /// Filter, then review the remaining samples in a window.
    Review,
}

/// Dataset location and policy options shared by all subcommands.
#[derive(clap::Args)]
struct DatasetArgs {
    /// Directory containing the images.
    #[arg(short = 'i', long, alias = "imagespath", global = true)]
    #[arg(default_value = config::DEFAULT_IMAGES_DIR)]
    images_path: PathBuf,

    /// Directory containing the label files.
    #[arg(short = 'l', long, alias = "labelspath", global = true)]
    #[arg(default_value = config::DEFAULT_LABELS_DIR)]
    labels_path: PathBuf,

    /// Directory that receives unpaired and rejected files.
    #[arg(short = 'q', long, alias = "incorrectpath", global = true)]
    #[arg(default_value = config::DEFAULT_QUARANTINE_DIR)]
    quarantine_path: PathBuf,

    /// Image extension ('.png', '.jpg', '.jpeg', '.bmp' or '.webp').
    #[arg(short = 'e', long, global = true)]
    #[arg(default_value = config::DEFAULT_IMAGE_EXTENSION)]
    image_extension: String,

    /// What to do when a file of the same name is already quarantined
    /// ('fail', 'overwrite' or 'rename').
    #[arg(long, global = true, default_value = "fail")]
    on_collision: String,

    /// Seed for box colors.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl DatasetArgs {
    fn into_config(self) -> Result<Config, CullError> {
        let config = Config {
            images_dir: self.images_path,
            labels_dir: self.labels_path,
            quarantine_dir: self.quarantine_path,
            image_extension: config::ImageExtension::parse(&self.image_extension)?,
            on_collision: config::CollisionPolicy::parse(&self.on_collision)?,
            seed: self.seed,
        };
        config.prepare()?;
        Ok(config)
    }
}

/// Arguments for the filter subcommand.
#[derive(clap::Args)]
struct FilterArgs {
    /// Report what would be quarantined without moving anything.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the boxcull CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), CullError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Filter(args)) => {
            let output = ReportOutput::parse(&args.output)?;
            let config = cli.dataset.into_config()?;
            run_filter(&config, &args, output)
        }
        Some(Commands::Review) => {
            let config = cli.dataset.into_config()?;
            run_review(&config)
        }
        None => {
            println!("boxcull {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Pair-check and visually cull object detection datasets.");
            println!();
            println!("Run 'boxcull --help' for usage information.");
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    // A logger may already be installed when embedded; keep that one.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReportOutput {
    Text,
    Json,
}

impl ReportOutput {
    fn parse(raw: &str) -> Result<Self, CullError> {
        match raw {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(CullError::InvalidOption(format!(
                "unknown output format '{}' (supported: text, json)",
                other
            ))),
        }
    }
}

/// Execute the filter subcommand.
fn run_filter(config: &Config, args: &FilterArgs, output: ReportOutput) -> Result<(), CullError> {
    let opts = filter::FilterOptions {
        dry_run: args.dry_run,
    };
    let report = filter::filter_dataset(config, &opts)?;

    match output {
        ReportOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportOutput::Text => print!("{}", report),
    }
    Ok(())
}

/// Execute the review subcommand: filter first, then browse what is left.
fn run_review(config: &Config) -> Result<(), CullError> {
    let report = filter::filter_dataset(config, &filter::FilterOptions::default())?;
    print!("{}", report);

    let samples = filter::pair_basenames(config)?;
    let mut session = session::ReviewSession::new(samples);
    if session.is_empty() {
        println!("Nothing to review");
        return Ok(());
    }
    info!("reviewing {} sample(s)", session.len());

    let summary = {
        let mut frontend = display::WindowFrontend::open("boxcull")?;
        let mut colors = render::RandomColors::new(config.seed);
        let mut store = config.quarantine();
        session::run_session(&mut session, &mut frontend, &mut colors, &mut store)?
    };

    print!("{}", summary);
    Ok(())
}
