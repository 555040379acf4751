use super::entities::EventKind;

/// How a group of same-kind events in one repository is phrased.
struct Template {
    icon: &'static str,
    verb: &'static str,
    noun: &'static str,
    plural_suffix: &'static str,
    preposition: &'static str,
}

const fn phrase(
    icon: &'static str,
    verb: &'static str,
    noun: &'static str,
    preposition: &'static str,
) -> Template {
    Template {
        icon,
        verb,
        noun,
        plural_suffix: "s",
        preposition,
    }
}

fn grouped_template(kind: EventKind) -> Option<Template> {
    let template = match kind {
        EventKind::CommitComment => phrase("💬", "Commented on", "commit", "in"),
        EventKind::Delete => Template {
            plural_suffix: "es",
            ..phrase("🗑️", "Deleted", "branch", "in")
        },
        EventKind::IssueComment => phrase("💬", "Commented on", "issue", "in"),
        EventKind::Issues => phrase("❗", "Opened", "issue", "in"),
        EventKind::Member => phrase("👥", "Added", "member", "to"),
        EventKind::PullRequest => phrase("🔀", "Opened", "pull request", "in"),
        EventKind::PullRequestReview => phrase("👀", "Reviewed", "pull request", "in"),
        EventKind::PullRequestReviewComment => {
            phrase("💬", "Commented on", "pull request review", "in")
        }
        EventKind::PullRequestReviewThread => {
            phrase("🧵", "Started", "review thread", "in")
        }
        EventKind::Push => phrase("⬆️", "Pushed", "commit", "to"),
        EventKind::Create | EventKind::Fork | EventKind::Watch => return None,
    };
    Some(template)
}

/// Renders the summary line for `count` events of `kind` in `repo`. Kinds without a template
/// produce nothing. Only a count of exactly one reads as singular.
pub fn render(repo: &str, kind: &str, count: u64) -> Option<String> {
    let template = grouped_template(EventKind::from_name(kind)?)?;
    let suffix = if count != 1 { template.plural_suffix } else { "" };
    Some(format!(
        "{} {} {count} {}{suffix} {} {repo}",
        template.icon, template.verb, template.noun, template.preposition
    ))
}

pub fn starred(repo: &str) -> String {
    format!("⭐ Starred {repo}")
}

pub fn forked(repo: &str) -> String {
    format!("🍴 Forked {repo}")
}

pub fn created_repository(repo: &str) -> String {
    format!("📁 Created a repository {repo}")
}
