mod app;
mod config;
mod data;
mod format;
mod tui;
mod ui;

use app::App;
use clap::Parser;
use std::io;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "TradeDash: terminal dashboard for paper trading snapshots",
    after_help = "EXAMPLES:
    # Read the default pipeline output (data/dashboard.json)
    cargo run --release

    # Point at another snapshot file
    cargo run --release -- --data out/dashboard.json

    # Fetch the snapshot over HTTP
    cargo run --release -- --data http://localhost:8000/dashboard.json"
)]
struct Args {
    /// Snapshot path or http(s) URL. Falls back to TRADEDASH_DATA,
    /// then to data/dashboard.json.
    #[arg(long)]
    data: Option<String>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tradedash_tui=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    let source = config::resolve_snapshot_source(args.data.as_deref());
    info!("Reading dashboard snapshot from {}", source);

    // Load before entering the alternate screen so startup logs stay
    // visible in the scrollback.
    let mut app = App::new(source);
    app.load().await;

    let mut terminal = tui::init()?;
    let res = app.run(&mut terminal).await;

    tui::restore()?;

    if let Err(e) = res {
        error!("Error: {:?}", e);
    }

    Ok(())
}
