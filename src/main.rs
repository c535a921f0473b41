// Merchant log search CLI
//
// Searches every configured log server for a query string in one merchant's
// session logs and prints the numbered results per server.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use merchant_logsearch::{SearchConfig, SessionSetManager, SessionStatus};

#[derive(Parser)]
#[command(name = "merchant-logsearch", version, about)]
struct Cli {
    /// Merchant whose session logs are searched
    #[arg(long)]
    merchant: String,

    /// Literal, case-sensitive text to count in each log file
    #[arg(long)]
    query: String,

    /// Log server listing URL; repeat for several servers
    #[arg(long = "server")]
    servers: Vec<String>,

    #[arg(long, env = "LOGSEARCH_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Search workers per server (1-64)
    #[arg(long)]
    workers: Option<usize>,

    /// JSON config file; command line flags override its values
    #[arg(long, env = "LOGSEARCH_CONFIG")]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<SearchConfig> {
    let base = match &cli.config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };

    let servers = if cli.servers.is_empty() {
        base.servers().to_vec()
    } else {
        cli.servers.clone()
    };
    let cache_root = cli
        .cache_dir
        .clone()
        .unwrap_or_else(|| base.cache_root().clone());

    SearchConfig::builder()
        .servers(servers)
        .cache_root(cache_root)
        .worker_count(cli.workers.unwrap_or(base.worker_count()))
        .user_agent(base.user_agent())
        .event_capacity(base.event_capacity())
        .build()
        .context("Invalid search configuration")
}

fn print_report(manager: &SessionSetManager) {
    for session in manager.sessions() {
        let counters = session.counters();
        println!(
            "[{}] {} | {} | results: {} | cache: {} | web: {}",
            session.id(),
            session.server_label(),
            session.status(),
            counters.results_found,
            counters.cache_hits,
            counters.network_fetches
        );
        if let SessionStatus::Failed(failure) = session.status() {
            println!("    {failure}");
        }
        for hit in session.results() {
            println!("    {}", hit.display_line());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.query.is_empty() {
        bail!("--query must not be empty");
    }

    let config = load_config(&cli)?;
    let manager =
        SessionSetManager::from_config(&config).context("Failed to build HTTP client")?;

    manager.start_all(&cli.merchant, &cli.query).await;

    tokio::select! {
        () = manager.wait_all_idle() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for ctrl-c")?;
            log::info!(target: "logsearch::cli", "Interrupted, stopping sessions");
            manager.shutdown().await;
        }
    }

    print_report(&manager);
    Ok(())
}
