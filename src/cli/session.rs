use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{error, info, instrument, warn};

use crate::{
    activity::{aggregate, ActivityReport},
    github::{cache::FetchCache, EventFetcher, FetchOutcome},
    utils::time::DisplayZone,
};

use super::{command::Command, style::Painter};

pub const PROMPT: &str = "cli> ";
const EXIT_CONFIRMATION: &str = "Are you sure you want to exit? (y/n): ";
const NO_ACTIVITY_FOUND: &str = "No recent activity found for this user.";

const HELP: [(&str, &str); 4] = [
    (
        "github-activity <username> [event-type]",
        "Fetch GitHub activity, optionally only events whose type contains event-type",
    ),
    ("clear-cache", "Forget previously fetched users"),
    ("help", "Show this list"),
    ("exit", "Exit CLI"),
];

enum Flow {
    Continue,
    Exit,
}

/// State of one interactive run: the response cache and how things are displayed. Lives for
/// the whole process and handles one command at a time.
pub struct Session<F> {
    cache: FetchCache<F>,
    zone: DisplayZone,
    painter: Painter,
}

impl<F: EventFetcher> Session<F> {
    pub fn new(cache: FetchCache<F>, zone: DisplayZone, painter: Painter) -> Self {
        Self {
            cache,
            zone,
            painter,
        }
    }

    /// Runs the prompt loop until the operator confirms `exit` or input ends. Command failures
    /// are printed and the loop goes on; only I/O errors on `input`/`output` escape.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.print_banner(output)?;
        let mut lines = input.lines();

        loop {
            prompt(output, PROMPT)?;
            let Some(line) = lines.next_line().await? else {
                writeln!(output)?;
                break;
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Rejected input {e:?}");
                    writeln!(output, "{}", self.painter.error(&e.to_string()))?;
                    continue;
                }
            };

            if let Flow::Exit = self.dispatch(command, &mut lines, output).await? {
                break;
            }
        }

        info!("Session finished");
        Ok(())
    }

    async fn dispatch<R, W>(
        &mut self,
        command: Command,
        lines: &mut Lines<R>,
        output: &mut W,
    ) -> Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        match command {
            Command::Help => self.print_help(output)?,
            Command::Exit => {
                prompt(output, EXIT_CONFIRMATION)?;
                let answer = lines.next_line().await?;
                match answer {
                    Some(answer) if !answer.trim().eq_ignore_ascii_case("y") => {}
                    Some(_) | None => return Ok(Flow::Exit),
                }
            }
            Command::ClearCache => {
                let cleared = self.cache.clear();
                info!("Cleared {cleared} cache entries");
                writeln!(
                    output,
                    "{}",
                    self.painter
                        .success(&format!("🧹 Cache cleared ({cleared} entries removed)."))
                )?;
            }
            Command::Activity { username, filter } => {
                self.show_activity(&username, filter.as_deref(), output)
                    .await?
            }
        }
        Ok(Flow::Continue)
    }

    #[instrument(skip(self, output))]
    async fn show_activity<W: Write>(
        &mut self,
        username: &str,
        filter: Option<&str>,
        output: &mut W,
    ) -> Result<()> {
        writeln!(
            output,
            "{}",
            self.painter.info(&format!(
                "🔍 Fetching activity for GitHub user: {username}..."
            ))
        )?;
        output.flush()?;

        match self.cache.get(username).await {
            Ok(FetchOutcome::Events(events)) => {
                let report = aggregate(&events, filter, &self.zone);
                self.print_report(&report, output)?;
            }
            Ok(FetchOutcome::NoActivity) => {
                writeln!(output, "{}", self.painter.warning(NO_ACTIVITY_FOUND))?;
            }
            Err(e) => {
                error!("Failed to fetch activity {e:?}");
                writeln!(output, "{}", self.painter.error(&e.to_string()))?;
            }
        }
        Ok(())
    }

    fn print_report<W: Write>(&self, report: &ActivityReport, output: &mut W) -> Result<()> {
        if let Some(last_active) = &report.last_active {
            writeln!(
                output,
                "{}",
                self.painter
                    .heading(&format!("🕒 Last active: {last_active}"))
            )?;
        }
        for message in &report.messages {
            let line = if message.starts_with("⚠️") {
                self.painter.warning(message)
            } else {
                message.clone()
            };
            writeln!(output, "  {line}")?;
        }
        Ok(())
    }

    fn print_banner<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(
            output,
            "{}",
            self.painter.heading("🔹 Welcome to GitHub User Activity CLI")
        )?;
        writeln!(output, "🔹 Usage: github-activity <username> [event-type]")?;
        writeln!(output, "🔹 Type 'help' for commands, 'exit' to quit\n")?;
        Ok(())
    }

    fn print_help<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output, "\n{}", self.painter.heading("Available Commands:"))?;
        let width = HELP.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
        for (usage, description) in HELP {
            writeln!(
                output,
                " {usage:width$}  ->  {}",
                self.painter.dimmed(description)
            )?;
        }
        Ok(())
    }
}

fn prompt<W: Write>(output: &mut W, text: &str) -> Result<()> {
    write!(output, "{text}")?;
    output.flush()?;
    Ok(())
}
