use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::PowerOptions;
use crate::error::PowerError;
use crate::events::PowerAction;

/// Carries out the device power actions requested over the control surface.
#[derive(Debug, Clone)]
pub struct PowerController {
    options: PowerOptions,
    cancel: CancellationToken,
}

impl PowerController {
    pub fn new(options: PowerOptions, cancel: CancellationToken) -> Self {
        Self { options, cancel }
    }

    pub async fn perform(&self, action: PowerAction) -> Result<(), PowerError> {
        info!(action = action.as_str(), "power action requested");
        let argv = match action {
            PowerAction::Stop => {
                self.cancel.cancel();
                return Ok(());
            }
            PowerAction::Restart => &self.options.restart_command,
            PowerAction::Shutdown => &self.options.shutdown_command,
        };
        run_command(action.as_str(), argv).await
    }
}

async fn run_command(action: &'static str, argv: &[String]) -> Result<(), PowerError> {
    let (program, args) = argv
        .split_first()
        .ok_or(PowerError::NotConfigured(action))?;
    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| PowerError::Launch { action, source })?;
    if !status.success() {
        warn!(action, %status, "power command failed");
        return Err(PowerError::Failed { action, status });
    }
    Ok(())
}
