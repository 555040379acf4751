use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";
const DEFAULT_LEVEL: &str = "debug";
const MAX_LOG_FILES: usize = 5;

/// Where and how much the CLI logs.
#[derive(Debug, Clone, Copy)]
pub struct LogSettings<'a> {
    pub prefix: &'a str,
    pub dir: &'a Path,
    /// Overrides `RUST_LOG` when present.
    pub level: Option<LevelFilter>,
    /// Also print log lines to stdout. They interleave with the prompt, so this is for debugging.
    pub mirror_to_console: bool,
}

/// Installs the global subscriber: a daily rolling file in `settings.dir`, optionally mirrored
/// into stdout.
pub fn enable_logging(settings: LogSettings<'_>) -> Result<()> {
    let file = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(settings.prefix)
        .build(settings.dir)?;

    let mirror = settings.mirror_to_console;
    let console = std::io::stdout.with_filter(move |_| mirror);

    let level = resolve_level(settings.level, std::env::var("RUST_LOG").ok());

    tracing_subscriber::fmt()
        .with_env_filter(crate_filter(&level))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(console.and(file))
        .with_ansi(mirror)
        .pretty()
        .init();
    Ok(())
}

/// The explicit level wins, then `RUST_LOG`, then [DEFAULT_LEVEL].
fn resolve_level(flag: Option<LevelFilter>, env: Option<String>) -> String {
    flag.map(|v| v.to_string())
        .or(env.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_LEVEL.into())
}

/// Scopes `level` to this crate so reqwest and hyper internals stay quiet.
fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::builder().parse_lossy(log_directive(level))
}

fn log_directive(level: &str) -> String {
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

/// Dereference at the start of a test to see the crate's trace output in the test log.
pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(crate_filter("trace"))
        .with_test_writer()
        .compact()
        .try_init();
});
