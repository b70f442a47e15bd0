mod platform;

use std::path::PathBuf;

use clap::Parser;

use platform::config::{CliOverrides, LogTarget};

/// Crawl a website, then chat about it.
#[derive(Debug, Parser)]
#[command(name = "crawlchat", version)]
struct Cli {
    /// RON config file. Defaults to ./crawlchat.ron when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the crawl/chat service.
    #[arg(long, env = "CRAWLCHAT_BASE_URL")]
    base_url: Option<String>,

    /// Maximum link depth for crawls.
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of pages per crawl.
    #[arg(long)]
    max_pages: Option<u32>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    log: Option<LogTarget>,

    /// Directory for the saved session.
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = platform::config::load(cli.config.as_deref())?;
    config.apply(CliOverrides {
        base_url: cli.base_url,
        max_depth: cli.max_depth,
        max_pages: cli.max_pages,
        log: cli.log,
        state_dir: cli.state_dir,
    });

    platform::run_app(config)
}
