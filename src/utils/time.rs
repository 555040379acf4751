use std::fmt::Display;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

/// This is the standard way of showing a moment to the user in github-activity.
pub const DISPLAY_FORMAT: &str = "%-d %B %Y, %H:%M %Z";

/// Zone in which timestamps are shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayZone {
    /// Whatever the machine is configured with.
    Local,
    Named(Tz),
}

impl DisplayZone {
    pub fn resolve(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(DisplayZone::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(DisplayZone::Named)
                .with_context(|| format!("invalid timezone '{name}'")),
        }
    }

    pub fn localize(&self, moment: DateTime<Utc>) -> LocalizedTime {
        let display = match self {
            DisplayZone::Local => moment.with_timezone(&Local).format(DISPLAY_FORMAT),
            DisplayZone::Named(tz) => moment.with_timezone(tz).format(DISPLAY_FORMAT),
        }
        .to_string();
        LocalizedTime { moment, display }
    }
}

/// A UTC moment together with its rendering in the display zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedTime {
    pub moment: DateTime<Utc>,
    display: String,
}

impl Display for LocalizedTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

/// Parses a GitHub style `2024-03-05T14:07:00Z` timestamp.
pub fn parse_utc(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|v| v.with_timezone(&Utc))
}
