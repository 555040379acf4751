//! Turns the raw events feed into the lines shown to the operator.
//!
//! Stars, forks and new repositories are announced one line per event, in feed order. All
//! other events are counted per repository and kind, and rendered as one line per group
//! after the announcements. Repositories keep the order in which they were first seen, and
//! so do kinds within a repository.

pub mod entities;
pub mod render;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::utils::time::{parse_utc, DisplayZone, LocalizedTime};

use entities::{EventEntity, EventKind};

pub const NO_ACTIVITY: &str = "No recent activity to display.";

/// Problems found while reading the feed. None of them abort a report; each becomes a line.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("Event #{index} has no {field}")]
    MissingEventField { index: usize, field: &'static str },
    #[error("Skipped event #{index}: {source}")]
    MalformedEvent {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Couldn't read last activity time '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Failed to process events: expected a list but got {found}")]
    EventProcessing { found: &'static str },
}

impl ActivityError {
    fn to_line(&self) -> String {
        format!("⚠️ {self}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityReport {
    /// Moment of the newest event, in the display zone.
    pub last_active: Option<LocalizedTime>,
    pub messages: Vec<String>,
}

impl ActivityReport {
    fn single(message: String) -> Self {
        Self {
            last_active: None,
            messages: vec![message],
        }
    }
}

/// Event counts keyed by repository, then kind.
type Groups = IndexMap<String, IndexMap<String, u64>>;

/// Builds the report for a fetched feed. `filter` keeps only events whose kind contains it,
/// ignoring case. The last active time always comes from the unfiltered feed.
#[instrument(skip(events, zone))]
pub fn aggregate(events: &Value, filter: Option<&str>, zone: &DisplayZone) -> ActivityReport {
    let Value::Array(events) = events else {
        let error = ActivityError::EventProcessing {
            found: json_kind(events),
        };
        warn!("{error}");
        return ActivityReport::single(error.to_line());
    };

    let Some(first) = events.first() else {
        return ActivityReport::single(NO_ACTIVITY.into());
    };

    // Stars, forks, repository creations and diagnostics, in the order they came up.
    let mut notices = vec![];
    let mut announced = 0usize;

    let last_active = last_active(first, zone)
        .inspect_err(|e| {
            warn!("{e}");
            notices.push(e.to_line());
        })
        .ok();

    let filter = filter.map(str::trim).filter(|v| !v.is_empty());
    let needle = filter.map(str::to_lowercase);

    let mut groups = Groups::new();

    for (index, raw) in events.iter().enumerate() {
        let event = match EventEntity::deserialize(raw) {
            Ok(event) => event,
            Err(source) => {
                let error = ActivityError::MalformedEvent {
                    index: index + 1,
                    source,
                };
                warn!("{error}");
                notices.push(error.to_line());
                continue;
            }
        };

        if let Some(needle) = &needle {
            if !event.kind().to_lowercase().contains(needle.as_str()) {
                continue;
            }
        }

        let repo = event.repo_name();
        let announcement = match EventKind::from_name(event.kind()) {
            Some(EventKind::Watch) => Some(render::starred(repo)),
            Some(EventKind::Fork) => Some(render::forked(repo)),
            Some(EventKind::Create) if event.ref_type() == Some("repository") => {
                Some(render::created_repository(repo))
            }
            _ => None,
        };

        match announcement {
            Some(line) => {
                announced += 1;
                notices.push(line);
            }
            None => count_event(&mut groups, &event),
        }
    }

    let grouped = render_groups(&groups);
    debug!(
        "{} events gave {announced} announcements and {} grouped lines",
        events.len(),
        grouped.len()
    );

    let nothing_to_show = announced == 0 && grouped.is_empty();
    let mut messages = notices;
    messages.extend(grouped);
    if nothing_to_show {
        messages.push(match filter {
            Some(filter) => format!("No '{filter}' events in recent activity."),
            None => NO_ACTIVITY.into(),
        });
    }

    ActivityReport {
        last_active,
        messages,
    }
}

fn count_event(groups: &mut Groups, event: &EventEntity) {
    let amount = match EventKind::from_name(event.kind()) {
        Some(EventKind::Push) => event.pushed_commits(),
        _ => 1,
    };
    // Push sizes are unbounded; the count stops at u64::MAX.
    let count = groups
        .entry(event.repo_name().to_owned())
        .or_default()
        .entry(event.kind().to_owned())
        .or_default();
    *count = count.saturating_add(amount);
}

fn render_groups(groups: &Groups) -> Vec<String> {
    groups
        .iter()
        .flat_map(|(repo, kinds)| {
            kinds
                .iter()
                .filter_map(move |(kind, count)| render::render(repo, kind, *count))
        })
        .collect()
}

/// The feed is newest first, so the first event tells when the user was last active.
fn last_active(first: &Value, zone: &DisplayZone) -> Result<LocalizedTime, ActivityError> {
    let value = first
        .get("created_at")
        .and_then(Value::as_str)
        .ok_or(ActivityError::MissingEventField {
            index: 1,
            field: "created_at",
        })?;
    let moment = parse_utc(value).map_err(|source| ActivityError::InvalidTimestamp {
        value: value.to_owned(),
        source,
    })?;
    Ok(zone.localize(moment))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use super::{aggregate, ActivityReport, NO_ACTIVITY};
    use crate::utils::{logging::TEST_LOGGING, time::DisplayZone};

    const UTC: DisplayZone = DisplayZone::Named(chrono_tz::UTC);

    fn messages(events: Value, filter: Option<&str>) -> Vec<String> {
        aggregate(&events, filter, &UTC).messages
    }

    fn mixed_feed() -> Value {
        json!([
            {"type": "PushEvent", "repo": {"name": "a/b"}, "created_at": "2024-03-05T14:07:00Z", "payload": {"size": 2}},
            {"type": "WatchEvent", "repo": {"name": "x/y"}, "created_at": "2024-03-05T13:00:00Z"},
            {"type": "IssuesEvent", "repo": {"name": "c/d"}, "created_at": "2024-03-05T12:00:00Z", "payload": {"action": "opened"}},
            {"type": "PushEvent", "repo": {"name": "a/b"}, "created_at": "2024-03-05T11:00:00Z", "payload": {"size": 1}},
            {"type": "ForkEvent", "repo": {"name": "f/g"}, "created_at": "2024-03-05T10:00:00Z"},
            {"type": "DeleteEvent", "repo": {"name": "a/b"}, "created_at": "2024-03-05T09:00:00Z"},
            {"type": "DeleteEvent", "repo": {"name": "a/b"}, "created_at": "2024-03-05T08:00:00Z"},
            {"type": "CreateEvent", "repo": {"name": "n/r"}, "created_at": "2024-03-05T07:00:00Z", "payload": {"ref_type": "repository"}},
        ])
    }

    #[test]
    fn push_example() {
        let report = aggregate(
            &json!([{"type": "PushEvent", "repo": {"name": "a/b"}, "payload": {"size": 3}}]),
            None,
            &UTC,
        );
        assert!(report
            .messages
            .contains(&"⬆️ Pushed 3 commits to a/b".to_string()));
    }

    #[test]
    fn star_example() {
        let lines = messages(json!([{"type": "WatchEvent", "repo": {"name": "x/y"}}]), None);
        assert_eq!(lines.iter().filter(|v| v.as_str() == "⭐ Starred x/y").count(), 1);
        let star = lines.iter().position(|v| v == "⭐ Starred x/y").unwrap();
        assert!(lines[..star].iter().all(|v| v.starts_with("⚠️")));
    }

    #[test]
    fn announcements_precede_groups() {
        *TEST_LOGGING;
        let report = aggregate(&mixed_feed(), None, &UTC);
        assert_eq!(
            report,
            ActivityReport {
                last_active: Some(UTC.localize(Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap())),
                messages: vec![
                    "⭐ Starred x/y".to_string(),
                    "🍴 Forked f/g".to_string(),
                    "📁 Created a repository n/r".to_string(),
                    "⬆️ Pushed 3 commits to a/b".to_string(),
                    "🗑️ Deleted 2 branches in a/b".to_string(),
                    "❗ Opened 1 issue in c/d".to_string(),
                ],
            }
        );
    }

    #[test]
    fn kinds_keep_first_seen_order_within_repository() {
        let lines = messages(
            json!([
                {"type": "IssueCommentEvent", "repo": {"name": "r/one"}, "created_at": "2024-03-05T14:07:00Z"},
                {"type": "PushEvent", "repo": {"name": "r/two"}, "payload": {"size": 1}},
                {"type": "PushEvent", "repo": {"name": "r/one"}, "payload": {"size": 1}},
                {"type": "IssueCommentEvent", "repo": {"name": "r/one"}},
            ]),
            None,
        );
        assert_eq!(
            lines,
            vec![
                "💬 Commented on 2 issues in r/one",
                "⬆️ Pushed 1 commit to r/one",
                "⬆️ Pushed 1 commit to r/two",
            ]
        );
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let lines = messages(mixed_feed(), Some("push"));
        assert_eq!(lines, vec!["⬆️ Pushed 3 commits to a/b"]);

        let lines = messages(mixed_feed(), Some("EVENT"));
        assert_eq!(lines.len(), 6);

        let lines = messages(mixed_feed(), Some("Watch"));
        assert_eq!(lines, vec!["⭐ Starred x/y"]);
    }

    #[test]
    fn filter_without_matches_is_not_an_error() {
        let report = aggregate(&mixed_feed(), Some("zzz"), &UTC);
        assert!(report.last_active.is_some());
        assert_eq!(report.messages, vec!["No 'zzz' events in recent activity."]);
    }

    #[test]
    fn huge_push_sizes_saturate() {
        let lines = messages(
            json!([
                {"type": "PushEvent", "repo": {"name": "a/b"}, "created_at": "2024-03-05T14:07:00Z", "payload": {"size": u64::MAX}},
                {"type": "PushEvent", "repo": {"name": "a/b"}, "payload": {"size": 1}},
            ]),
            None,
        );
        assert_eq!(lines, vec![format!("⬆️ Pushed {} commits to a/b", u64::MAX)]);
    }

    #[test]
    fn empty_push_counts_as_zero_commits() {
        let lines = messages(
            json!([
                {"type": "PushEvent", "repo": {"name": "a/b"}, "created_at": "2024-03-05T14:07:00Z", "payload": {"size": 0}},
            ]),
            None,
        );
        assert_eq!(lines, vec!["⬆️ Pushed 0 commits to a/b"]);
    }

    #[test]
    fn empty_feed() {
        let report = aggregate(&json!([]), None, &UTC);
        assert_eq!(report.last_active, None);
        assert_eq!(report.messages, vec![NO_ACTIVITY]);
    }

    #[test]
    fn unrecognized_kinds_are_dropped() {
        let lines = messages(
            json!([
                {"type": "GollumEvent", "repo": {"name": "w/iki"}, "created_at": "2024-03-05T14:07:00Z"},
                {"type": "CreateEvent", "repo": {"name": "b/r"}, "payload": {"ref_type": "branch"}},
                {"type": "PushEvent", "repo": {"name": "a/b"}, "payload": {"size": 1}},
            ]),
            None,
        );
        assert_eq!(lines, vec!["⬆️ Pushed 1 commit to a/b"]);

        let lines = messages(
            json!([{"type": "GollumEvent", "repo": {"name": "w/iki"}, "created_at": "2024-03-05T14:07:00Z"}]),
            None,
        );
        assert_eq!(lines, vec![NO_ACTIVITY]);
    }

    #[test]
    fn missing_fields_use_placeholders() {
        let lines = messages(
            json!([
                {"created_at": "2024-03-05T14:07:00Z", "repo": {"name": "a/b"}},
                {"type": "ForkEvent"},
                {"type": "PushEvent", "repo": {"name": "a/b"}, "payload": {"size": 2}},
            ]),
            None,
        );
        assert_eq!(
            lines,
            vec!["🍴 Forked UnknownRepo", "⬆️ Pushed 2 commits to a/b"]
        );
    }

    #[test]
    fn malformed_event_does_not_hide_others() {
        let lines = messages(
            json!([
                {"type": "PushEvent", "repo": {"name": "a/b"}, "created_at": "2024-03-05T14:07:00Z", "payload": {"size": 1}},
                "garbage",
                {"type": ["PushEvent"], "repo": {"name": "a/b"}},
                {"type": "WatchEvent", "repo": {"name": "x/y"}},
            ]),
            None,
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("⚠️ Skipped event #2"));
        assert!(lines[1].starts_with("⚠️ Skipped event #3"));
        assert_eq!(lines[2], "⭐ Starred x/y");
        assert_eq!(lines[3], "⬆️ Pushed 1 commit to a/b");
    }

    #[test]
    fn bad_timestamp_is_reported_and_skipped() {
        let report = aggregate(
            &json!([
                {"type": "PushEvent", "repo": {"name": "a/b"}, "created_at": "last tuesday", "payload": {"size": 1}},
            ]),
            None,
            &UTC,
        );
        assert_eq!(report.last_active, None);
        assert_eq!(report.messages.len(), 2);
        assert!(report.messages[0].starts_with("⚠️ Couldn't read last activity time 'last tuesday'"));
        assert_eq!(report.messages[1], "⬆️ Pushed 1 commit to a/b");

        let report = aggregate(
            &json!([{"type": "WatchEvent", "repo": {"name": "x/y"}}]),
            None,
            &UTC,
        );
        assert_eq!(report.messages[0], "⚠️ Event #1 has no created_at");
        assert_eq!(report.messages[1], "⭐ Starred x/y");
    }

    #[test]
    fn non_list_body_is_a_single_diagnostic() {
        let report = aggregate(&json!({"message": "Moved Permanently"}), None, &UTC);
        assert_eq!(report.last_active, None);
        assert_eq!(
            report.messages,
            vec!["⚠️ Failed to process events: expected a list but got an object"]
        );
    }
}
