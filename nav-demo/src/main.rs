//! Terminal preview of the hash router: renders the in-memory page and lets
//! you click through the navigation bar.

mod app;
mod site;
mod views;

use anyhow::Context as _;
use clap::Parser;
use nav_nexus::OverlapPolicy;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::site::SiteConfig;

#[derive(Debug, Parser)]
#[command(name = "nav-demo", version, about = "Preview a hash-routed site in the terminal")]
struct Args {
    /// Site layout (TOML). Uses the built-in layout when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial location fragment, e.g. `#/about`.
    #[arg(short, long)]
    route: Option<String>,

    /// Discard navigations that were overtaken by a newer one.
    #[arg(long)]
    latest_wins: bool,
}

/// Logging stays off unless `NAV_DEMO_LOG` names a file, so the terminal UI is
/// never written over.
fn init_tracing() {
    let Ok(log_path) = std::env::var("NAV_DEMO_LOG") else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match std::fs::File::create(&log_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: failed to create log file {log_path}: {err}");
            return;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut site = SiteConfig::load(args.config.as_deref())?;
    if args.latest_wins {
        site.router.overlap = OverlapPolicy::LatestWins;
    }

    let rt = Runtime::new().context("Failed to start tokio")?;
    rt.block_on(async move {
        let app = App::new(site, args.route.as_deref())?;
        app.run().await
    })
}
