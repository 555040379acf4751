pub mod command;
pub mod session;
pub mod style;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use session::Session;
use style::Painter;
use tokio::io::BufReader;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    github::{
        cache::FetchCache,
        client::{ClientConfig, GithubClient, DEFAULT_API_URL, DEFAULT_TIMEOUT},
    },
    utils::{
        dir::{create_application_default_path, logs_dir},
        logging::{enable_logging, LogSettings, CLI_PREFIX},
        time::DisplayZone,
    },
};

#[derive(Parser, Debug)]
#[command(name = "github-activity", version, long_about = None)]
#[command(about = "Interactive prompt for browsing recent public GitHub activity", long_about = None)]
pub struct Args {
    #[arg(long, help = "Enable trace logging and mirror logs into the console")]
    log: bool,
    #[arg(long = "log-filter", help = "Log level written into the log file")]
    log_filter: Option<LevelFilter>,
    #[arg(long, default_value = DEFAULT_API_URL, help = "Base url of the GitHub REST API")]
    api_url: String,
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Request timeout in seconds"
    )]
    timeout: u64,
    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "Token used to authenticate requests. Raises the rate limit"
    )]
    token: Option<String>,
    #[arg(
        long,
        env = "GITHUB_ACTIVITY_TZ",
        help = "IANA timezone used for timestamps, e.g. Europe/Kyiv. Defaults to the system timezone"
    )]
    timezone: Option<String>,
    #[arg(long, help = "Disable colored output")]
    no_color: bool,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout),
            token: self.token.clone(),
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        args.log_filter
    };
    let log_dir = logs_dir(&create_application_default_path()?)?;
    enable_logging(LogSettings {
        prefix: CLI_PREFIX,
        dir: &log_dir,
        level: logging_level,
        mirror_to_console: args.log,
    })?;

    let zone = DisplayZone::resolve(args.timezone.as_deref())?;
    let client = GithubClient::new(args.client_config())?;
    info!("Starting session against {} in {zone:?}", args.api_url);

    let mut session = Session::new(FetchCache::new(client), zone, Painter::new(!args.no_color));
    session
        .run(BufReader::new(tokio::io::stdin()), &mut std::io::stdout())
        .await
}
