use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static ACTIVITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^github-activity\s+(\S+)(?:\s+(\S+))?$").expect("pattern is valid")
});

/// Commands understood by the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    ClearCache,
    Activity {
        username: String,
        /// Keeps only events whose kind contains this, ignoring case.
        filter: Option<String>,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("❌ Invalid command. Use 'help' for list of commands.")]
    Invalid(String),
}

impl Command {
    /// Parses a line typed at the prompt. Blank lines give `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let command = match line.to_lowercase().as_str() {
            "help" => Command::Help,
            "exit" => Command::Exit,
            "clear-cache" => Command::ClearCache,
            _ => {
                let captures = ACTIVITY_PATTERN
                    .captures(line)
                    .ok_or_else(|| CommandError::Invalid(line.to_owned()))?;
                Command::Activity {
                    username: captures[1].to_owned(),
                    filter: captures.get(2).map(|v| v.as_str().to_owned()),
                }
            }
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, CommandError};

    fn activity(username: &str, filter: Option<&str>) -> Option<Command> {
        Some(Command::Activity {
            username: username.into(),
            filter: filter.map(Into::into),
        })
    }

    #[test]
    fn parses_fixed_commands() {
        assert_eq!(Command::parse("help"), Ok(Some(Command::Help)));
        assert_eq!(Command::parse("  EXIT "), Ok(Some(Command::Exit)));
        assert_eq!(Command::parse("clear-cache"), Ok(Some(Command::ClearCache)));
    }

    #[test]
    fn parses_activity() {
        assert_eq!(
            Command::parse("github-activity octocat"),
            Ok(activity("octocat", None))
        );
        assert_eq!(
            Command::parse("GitHub-Activity  OctoCat\tPush"),
            Ok(activity("OctoCat", Some("Push")))
        );
    }

    #[test]
    fn blank_input_is_ignored() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   \t"), Ok(None));
    }

    #[test]
    fn rejects_everything_else() {
        for line in [
            "github-activity",
            "github-activity a b c",
            "github-activityoctocat",
            "activity octocat",
            "help me",
        ] {
            assert_eq!(
                Command::parse(line),
                Err(CommandError::Invalid(line.to_string())),
                "{line}"
            );
        }
    }
}
