use crate::error::{other_error, AssistantResult};
use tracing::info;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c, CtrlBreak, CtrlC};

/// Termination signals, registered as soon as the value is created
#[cfg(unix)]
pub struct ShutdownSignal {
    sigterm: Signal,
    sigint: Signal,
}

#[cfg(unix)]
impl ShutdownSignal {
    pub fn register() -> AssistantResult<Self> {
        // Handle SIGTERM
        let sigterm = signal(SignalKind::terminate()).map_err(|e| {
            other_error(&format!("Failed to create SIGTERM signal handler: {}", e))
        })?;
        // Handle SIGINT (Ctrl+C)
        let sigint = signal(SignalKind::interrupt()).map_err(|e| {
            other_error(&format!("Failed to create SIGINT signal handler: {}", e))
        })?;

        Ok(Self { sigterm, sigint })
    }

    /// Resolve once a termination signal arrives
    pub async fn recv(&mut self) {
        tokio::select! {
            _ = self.sigterm.recv() => {
                info!("Received SIGTERM signal, initiating graceful shutdown");
            }
            _ = self.sigint.recv() => {
                info!("Received SIGINT signal, initiating graceful shutdown");
            }
        }
    }
}

/// Termination signals, registered as soon as the value is created
#[cfg(windows)]
pub struct ShutdownSignal {
    ctrlc: CtrlC,
    ctrlbreak: CtrlBreak,
}

#[cfg(windows)]
impl ShutdownSignal {
    pub fn register() -> AssistantResult<Self> {
        // Handle Ctrl+C
        let ctrlc = ctrl_c().map_err(|e| {
            other_error(&format!("Failed to create Ctrl+C signal handler: {}", e))
        })?;
        // Handle Ctrl+Break
        let ctrlbreak = ctrl_break().map_err(|e| {
            other_error(&format!("Failed to create Ctrl+Break signal handler: {}", e))
        })?;

        Ok(Self { ctrlc, ctrlbreak })
    }

    /// Resolve once a termination signal arrives
    pub async fn recv(&mut self) {
        tokio::select! {
            _ = self.ctrlc.recv() => {
                info!("Received Ctrl+C signal, initiating graceful shutdown");
            }
            _ = self.ctrlbreak.recv() => {
                info!("Received Ctrl+Break signal, initiating graceful shutdown");
            }
        }
    }
}
