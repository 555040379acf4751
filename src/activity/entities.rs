use serde::Deserialize;
use serde_json::Value;

pub const UNKNOWN_KIND: &str = "UnknownEvent";
pub const UNKNOWN_REPO: &str = "UnknownRepo";

/// One entry of the events feed as GitHub sends it. The feed is untrusted, so every field is
/// optional and read through accessors that fall back to placeholders.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EventEntity {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub repo: Option<RepoEntity>,
    pub created_at: Option<String>,
    pub payload: Option<PayloadEntity>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RepoEntity {
    pub name: Option<String>,
}

/// The handful of payload fields the summary cares about. Everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PayloadEntity {
    pub ref_type: Option<String>,
    pub size: Option<u64>,
    pub commits: Option<Vec<Value>>,
}

impl EventEntity {
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(UNKNOWN_KIND)
    }

    pub fn repo_name(&self) -> &str {
        self.repo
            .as_ref()
            .and_then(|v| v.name.as_deref())
            .unwrap_or(UNKNOWN_REPO)
    }

    pub fn ref_type(&self) -> Option<&str> {
        self.payload.as_ref().and_then(|v| v.ref_type.as_deref())
    }

    /// Number of commits carried by a push. Older feeds report `size`, some only list
    /// `commits`, and recent ones have neither, in which case the push counts as one.
    pub fn pushed_commits(&self) -> u64 {
        let Some(payload) = &self.payload else {
            return 1;
        };
        payload
            .size
            .or_else(|| payload.commits.as_ref().map(|v| v.len() as u64))
            .unwrap_or(1)
    }
}

/// Kinds of events the summary knows something about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    CommitComment,
    Create,
    Delete,
    Fork,
    IssueComment,
    Issues,
    Member,
    PullRequest,
    PullRequestReview,
    PullRequestReviewComment,
    PullRequestReviewThread,
    Push,
    Watch,
}

impl EventKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "CommitCommentEvent" => EventKind::CommitComment,
            "CreateEvent" => EventKind::Create,
            "DeleteEvent" => EventKind::Delete,
            "ForkEvent" => EventKind::Fork,
            "IssueCommentEvent" => EventKind::IssueComment,
            "IssuesEvent" => EventKind::Issues,
            "MemberEvent" => EventKind::Member,
            "PullRequestEvent" => EventKind::PullRequest,
            "PullRequestReviewEvent" => EventKind::PullRequestReview,
            "PullRequestReviewCommentEvent" => EventKind::PullRequestReviewComment,
            "PullRequestReviewThreadEvent" => EventKind::PullRequestReviewThread,
            "PushEvent" => EventKind::Push,
            "WatchEvent" => EventKind::Watch,
            _ => return None,
        };
        Some(kind)
    }
}
