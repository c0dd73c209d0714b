use std::path::PathBuf;
use std::process;

use clap::Parser;
use streamwatch::census::CensusLog;
use streamwatch::config::{AppConfig, DEFAULT_CONFIG_FILE};
use streamwatch::monitor::{Monitor, MonitorSession};
use streamwatch::startup::{self, Connection};
use streamwatch::watchlist::WatchlistFiles;
use streamwatch::{Result, logging};
use tracing::{debug, error, info};

/// Watch a Twitch category for watchlisted streams and log every broadcaster
/// seen in it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, env = "STREAMWATCH_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Debug output
    #[arg(short, long)]
    verbose: bool,

    /// Errors only
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    logging::init(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = AppConfig::load(&args.config)?;
    debug!(?config, "loaded configuration");

    let census = CensusLog::new(&config.census_file);
    let logged = census.load_logged_names()?;
    info!(
        path = %census.path().display(),
        broadcasters = logged.len(),
        "loaded census log"
    );

    let Connection { helix, category_id } = startup::connect(&config).await?;

    let mut monitor = Monitor::new(
        helix,
        category_id,
        WatchlistFiles::new(&config.searches_file, &config.usernames_file),
        census,
        MonitorSession::with_logged_names(logged),
        config.cooldown(),
    );

    tokio::select! {
        _ = monitor.run() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    info!(
        titles_alerted = monitor.session().seen_titles(),
        broadcasters_logged = monitor.session().logged_names(),
        "interrupted, shutting down"
    );
    Ok(())
}
