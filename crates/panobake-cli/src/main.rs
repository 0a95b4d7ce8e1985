//! `panobake` - bake camera orientation into equirectangular panoramas.
//!
//! Exit codes: 0 on success, 1 when any cone of a `full` batch failed, 2 when
//! the input manifest is missing or malformed, 3 when a `yaw` batch hit a
//! non-JPEG source. Images skipped by a `yaw` batch are logged but do not
//! change the exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, Args, Parser, Subcommand};
use panobake_core::batch::{
    bake_cone_manifest, bake_navigation_manifest, BakeConfig, BakeError, BatchReport,
    DEFAULT_OUTPUT_SUFFIX,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bake camera orientation into equirectangular panoramas")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply full yaw/pitch/roll from a cone export's direction vectors
    Full {
        /// Cone manifest to read
        #[arg(short, long, default_value = "cone_data.json")]
        input: PathBuf,

        /// Processed manifest to write
        #[arg(short, long, default_value = "cone_data_processed.json")]
        output: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Apply the rotationCorrection of a navigation manifest as a horizontal shift
    Yaw {
        /// Navigation manifest to read
        #[arg(short, long, default_value = "360-navigation-data.json")]
        manifest: PathBuf,

        /// Appended to the manifest file stem for the output manifest
        #[arg(long, default_value = DEFAULT_OUTPUT_SUFFIX, allow_hyphen_values = true)]
        suffix: String,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// JPEG quality for baked images, 1-100 (full: 85, yaw: 80)
    #[arg(short, long, value_parser = value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Show planned actions without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Only process the first N entries
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Directory that manifest image paths are relative to
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,
}

impl CommonArgs {
    fn apply(&self, defaults: BakeConfig) -> BakeConfig {
        let config = defaults
            .with_dry_run(self.dry_run)
            .with_limit(self.limit)
            .with_base_dir(&self.base_dir);
        match self.quality {
            Some(quality) => config.with_quality(quality),
            None => config,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    ExitCode::from(run(Cli::parse()))
}

fn run(cli: Cli) -> u8 {
    let (result, strict) = match cli.command {
        Command::Full {
            input,
            output,
            common,
        } => {
            let config = common.apply(BakeConfig::default());
            (bake_cone_manifest(&input, &output, &config), true)
        }
        Command::Yaw {
            manifest,
            suffix,
            common,
        } => {
            let config = common.apply(BakeConfig::navigation()).with_output_suffix(suffix);
            (bake_navigation_manifest(&manifest, &config), false)
        }
    };

    match result {
        Ok(report) => {
            summarize(&report);
            exit_code_for_report(&report, strict)
        }
        Err(err) => {
            error!(error = %err, "Batch failed");
            exit_code_for(&err)
        }
    }
}

/// Full batches fail on any skipped entry; yaw batches only on a fatal error.
fn exit_code_for_report(report: &BatchReport, strict: bool) -> u8 {
    if strict && !report.is_success() {
        1
    } else {
        0
    }
}

fn exit_code_for(err: &BakeError) -> u8 {
    match err {
        BakeError::ManifestNotFound(_) | BakeError::Manifest(_) => 2,
        BakeError::UnsupportedSourceFormat(_) => 3,
        _ => 1,
    }
}

fn summarize(report: &BatchReport) {
    for failure in &report.failures {
        warn!(entry = %failure.entry, reason = %failure.reason, "Failed");
    }
    info!(
        succeeded = report.succeeded,
        failed = report.failed(),
        output = ?report.output_manifest,
        backup = ?report.backup,
        dry_run = report.dry_run,
        "Summary"
    );
}
