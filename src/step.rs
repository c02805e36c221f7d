use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{builder::BoolishValueParser, builder::NonEmptyStringValueParser, ArgAction, Parser};

use crate::convert::convert_xcresult_json_to_junit_xml;
use crate::envman::{OutputExporter, OUTPUT_PATH_ENV_KEY};
use crate::xcrun::ResultsTool;

/// Every option can also be provided through the CI step input of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    version = std::env!("CARGO_PKG_VERSION"),
    name = "xcresult-to-junit",
    about = "Convert an Xcode .xcresult bundle into a JUnit XML report"
)]
pub struct StepConfig {
    /// `.xcresult` bundle to convert
    #[arg(long, env = "xcresult_path")]
    pub xcresult_path: PathBuf,
    /// Directory to write the report to, created when missing
    #[arg(long, env = "output_dir")]
    pub output_dir: PathBuf,
    /// File name of the report inside the output directory
    #[arg(long, env = "junit_filename", value_parser = NonEmptyStringValueParser::new())]
    pub junit_filename: String,
    /// Show debug log messages (yes/no)
    #[arg(
        long,
        env = "verbose",
        default_value = "no",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub verbose: bool,
}

impl StepConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.junit_filename)
    }
}

/// Converts the configured bundle and returns the path of the written report.
///
/// Nothing is written when fetching or converting the results fails.
pub fn run_step<R: ResultsTool, E: OutputExporter>(
    config: &StepConfig,
    results_tool: &R,
    exporter: &E,
) -> anyhow::Result<PathBuf> {
    log_config(config);

    let xcresult_path = existing_xcresult_path(&config.xcresult_path)?;
    ensure_output_dir(&config.output_dir)?;

    tracing::info!("Converting XCResult to JSON...");
    let json = results_tool
        .fetch_test_results(&xcresult_path)
        .context("failed to convert XCResult to JSON")?;

    tracing::info!("Converting JSON to JUnit XML...");
    let junit_xml =
        convert_xcresult_json_to_junit_xml(&json).context("failed to convert JSON to JUnit XML")?;

    let output_path = config.output_path();
    tracing::info!("Writing JUnit XML to file: {}", output_path.display());
    fs::write(&output_path, junit_xml).with_context(|| {
        format!(
            "failed to write JUnit XML to file: {}",
            output_path.display()
        )
    })?;

    exporter
        .export_output(OUTPUT_PATH_ENV_KEY, &output_path.to_string_lossy())
        .context("failed to export output")?;

    tracing::info!("XCResult successfully converted to JUnit XML");
    Ok(output_path)
}

fn log_config(config: &StepConfig) {
    tracing::info!("Config:");
    tracing::info!("- xcresult_path: {}", config.xcresult_path.display());
    tracing::info!("- output_dir: {}", config.output_dir.display());
    tracing::info!("- junit_filename: {}", config.junit_filename);
    tracing::info!("- verbose: {}", if config.verbose { "yes" } else { "no" });
}

fn existing_xcresult_path(path: &Path) -> anyhow::Result<PathBuf> {
    let exists = path.try_exists().with_context(|| {
        format!(
            "failed to check if XCResult path exists: {}",
            path.display()
        )
    })?;
    if !exists {
        return Err(anyhow::anyhow!(
            "XCResult path does not exist: {}",
            path.display()
        ));
    }
    fs::canonicalize(path)
        .with_context(|| format!("failed to get absolute path for {}", path.display()))
}

fn ensure_output_dir(output_dir: &Path) -> anyhow::Result<()> {
    let exists = output_dir.try_exists().with_context(|| {
        format!(
            "failed to check if output directory exists: {}",
            output_dir.display()
        )
    })?;
    if !exists {
        tracing::debug!("creating output directory: {}", output_dir.display());
        fs::create_dir_all(output_dir).with_context(|| {
            format!(
                "failed to create output directory: {}",
                output_dir.display()
            )
        })?;
    }
    Ok(())
}
