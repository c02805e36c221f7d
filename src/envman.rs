use std::{io, process::Command};

/// Key under which the written report path is exported for later CI steps.
pub const OUTPUT_PATH_ENV_KEY: &str = "XCRESULT_TO_JUNIT_OUTPUT_PATH";

pub trait OutputExporter {
    fn export_output(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Exports outputs through `envman add`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Envman;

impl OutputExporter for Envman {
    fn export_output(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let status = match Command::new("envman")
            .args(["add", "--key", key, "--value", value])
            .status()
        {
            Ok(status) => status,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("envman is not installed, skipping export of {}", key);
                return Ok(());
            }
            Err(e) => return Err(anyhow::anyhow!("failed to run envman: {}", e)),
        };
        if !status.success() {
            return Err(anyhow::anyhow!(
                "envman failed to export {} with {}",
                key,
                status
            ));
        }
        tracing::debug!("exported {}={}", key, value);
        Ok(())
    }
}
