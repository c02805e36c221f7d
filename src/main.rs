use clap::Parser;
use tracing::metadata::LevelFilter;
use tracing_subscriber::prelude::*;
use xcresult_to_junit::{
    envman::Envman,
    step::{run_step, StepConfig},
    xcrun::Xcresulttool,
};

fn main() {
    let config = StepConfig::parse();
    let level = if config.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(level)
        .init();

    if let Err(e) = run_step(&config, &Xcresulttool, &Envman) {
        tracing::error!("{:#}", e);
        std::process::exit(exitcode::SOFTWARE);
    }
}
