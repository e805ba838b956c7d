//! USD-BRL quote server.
//!
//! Listens on `0.0.0.0:8080` and serves `GET /cotacao`. The database file
//! `cotacao.db` is opened and its schema created once, before the listener
//! starts. Ctrl+C stops the listener gracefully.
//!
//! Every budget, address, and path is a fixed constant; logging verbosity is
//! the only knob, through `RUST_LOG`.
use std::sync::Arc;

use log::info;
use quote_common::Result;
use quote_common::net::{DATABASE_PATH, SERVER_PORT, addr};
use quote_server::{AppState, QuoteFetcher, QuotePersister, QuoteServer, QuoteStore};

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let store = QuoteStore::open(DATABASE_PATH)?;
    info!("Database ready at {}", DATABASE_PATH);

    let state = Arc::new(AppState::new(
        QuoteFetcher::pricing_api()?,
        QuotePersister::with_store_budget(store),
    ));
    let server = QuoteServer::start(&addr("0.0.0.0", SERVER_PORT), state).await?;

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received. Shutting down server...");
    server.stop().await
}

fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
