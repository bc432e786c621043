//! PTY (console) channel — reads lines from stdin, hands them to the
//! assistant, prints the reply to stdout.
//!
//! Owns the one [`SessionContext`] for the process. Runs until the
//! `shutdown` token is cancelled (Ctrl-C), stdin is closed, or `/quit`.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::commands::{ConsoleCommand, DEMO_PROMPTS};
use crate::error::AppError;
use crate::subsystems::agents::Assistant;
use crate::subsystems::memory::{SessionContext, Transcript};

pub struct PtyChannel {
    channel_id: String,
    title: String,
    assistant: Assistant,
    session: SessionContext,
}

impl PtyChannel {
    pub fn new(channel_id: impl Into<String>, title: impl Into<String>, assistant: Assistant) -> Self {
        Self {
            channel_id: channel_id.into(),
            title: title.into(),
            assistant,
            session: SessionContext::new(),
        }
    }

    pub async fn run(mut self, shutdown: CancellationToken) -> Result<(), AppError> {
        info!(channel_id = %self.channel_id, session_id = %self.session.session_id(), "pty channel started");
        println!("─────────────────────────────────");
        println!(" {}  (/help for commands, Ctrl-C to quit)", self.title);
        println!("─────────────────────────────────");
        println!("{}", render_demo_list());

        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        loop {
            print!("> ");
            use std::io::Write as _;
            let _ = std::io::stdout().flush();

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    println!("\n[console] shutdown signal received, goodbye");
                    info!("pty channel shutting down");
                    break;
                }

                line = lines.next_line() => {
                    let input = match line {
                        Err(e) => {
                            warn!("pty read error: {e}");
                            break;
                        }
                        Ok(None) => {
                            info!("pty stdin closed");
                            break;
                        }
                        Ok(Some(input)) => input,
                    };

                    let Some(command) = ConsoleCommand::parse(&input) else { continue };
                    debug!(?command, "pty received line");
                    if !self.execute(command).await {
                        break;
                    }
                }
            }
        }

        info!(channel_id = %self.channel_id, turns = self.session.transcript.len(), "pty channel stopped");
        Ok(())
    }

    /// Returns `false` when the console should close.
    async fn execute(&mut self, command: ConsoleCommand) -> bool {
        match command {
            ConsoleCommand::Say(text) => self.submit(&text).await,
            ConsoleCommand::Demo(i) => {
                let prompt = DEMO_PROMPTS[i].1;
                println!("{prompt}");
                self.submit(prompt).await;
            }
            ConsoleCommand::ListDemos => println!("{}", render_demo_list()),
            ConsoleCommand::History => println!("{}", render_history(&self.session.transcript)),
            ConsoleCommand::Reset => {
                self.session.reset();
                println!("Chat history cleared.");
            }
            ConsoleCommand::About => println!("{ABOUT}"),
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => return false,
            ConsoleCommand::Unknown(raw) => println!("Unknown command: {raw}  (try /help)"),
        }
        true
    }

    async fn submit(&mut self, text: &str) {
        println!("Thinking...");
        match self.assistant.respond(&mut self.session, text).await {
            Ok(reply) => println!("\n{reply}\n"),
            Err(e) => {
                error!(session_id = %self.session.session_id(), error = %e, "interaction aborted");
                println!("\n[error] {e}\n");
            }
        }
    }
}

pub const HELP: &str = "\
Commands:
  /demo          list demo prompts
  /demo N, /N    send demo prompt N
  /history       show the conversation so far
  /reset         clear chat history
  /about         features and integrations
  /quit          exit
Anything else is sent to the assistant.";

pub const ABOUT: &str = "\
Features:
  - Answer questions about AvePoint
  - Summarize text (\"summarize this: ...\")
  - Check weather at the Jersey City office
  - Recommend AvePoint products
  - View upcoming Calendly meetings
  - Schedule meetings
  - Cancel meetings (\"cancel meeting N\")

Integrations:
  - OpenAI-compatible chat completions
  - Calendly API
  - Open-Meteo weather API";

pub fn render_demo_list() -> String {
    let mut out = String::from("Try asking:");
    for (i, (icon, prompt)) in DEMO_PROMPTS.iter().enumerate() {
        out.push_str(&format!("\n  /{} {icon} {prompt}", i + 1));
    }
    out
}

pub fn render_history(transcript: &Transcript) -> String {
    if transcript.is_empty() {
        return "(no messages yet)".to_string();
    }
    transcript
        .turns()
        .iter()
        .map(|t| format!("[{}]\n{}", t.role, t.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
