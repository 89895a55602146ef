//! Application entrypoint and state wiring.

mod chain;
mod cli;
mod clock;
mod crypto;
mod error;
mod ledger;
mod logging;
mod model;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use clock::SystemClock;
use ledger::Ledger;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    logging::init_logging(&args.log_level, args.log_format);

    // 1) ledger with genesis
    let ledger = Ledger::new(Arc::new(SystemClock)).context("bootstrap genesis block")?;
    let genesis = ledger.tail();
    let data = serde_json::to_string(&genesis.data)?;
    debug!(
        prev_hash = %genesis.prev_hash,
        %data,
        hash = %genesis.hash,
        "genesis block"
    );

    // 2) shared state
    let state = AppState {
        ledger: Arc::new(ledger),
    };

    // 3) serve
    let addr: SocketAddr = args
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", args.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("listening on http://{addr}");
    axum::serve(listener, routes::router(state))
        .await
        .context("server error")?;

    Ok(())
}
