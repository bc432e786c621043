//! Comms subsystem — the interactive surface.
//!
//! A single console channel drives the session: it parses input lines into
//! [`commands::ConsoleCommand`]s, forwards free text to the assistant and
//! prints replies. One interaction is awaited to completion before the next
//! line is read.

pub mod commands;
pub mod pty;

pub use commands::{ConsoleCommand, DEMO_PROMPTS};
pub use pty::PtyChannel;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::subsystems::agents::Assistant;

/// Run the console channel until shutdown, EOF or `/quit`.
pub async fn start(
    config: &Config,
    assistant: Assistant,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    info!("loading pty channel");
    PtyChannel::new("pty0", config.assistant_name.clone(), assistant)
        .run(shutdown)
        .await
}
