//! Quote Client — asks the local quote server for the current USD-BRL quote
//! and saves the bid to `cotacao.txt` as `Dólar:{bid}`.
//!
//! The whole exchange with the server must finish within 300ms; past that the
//! client gives up with a timeout error and writes nothing. A non-200 reply is
//! printed to stdout (status line and body) and nothing is written either.
//!
//! Usage example:
//! ```bash
//! quote_client
//! ```
use log::error;
use quote_client::fetch_and_save;
use quote_common::Result;
use quote_common::net::{SERVER_PORT, quote_url};

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    fetch_and_save(&quote_url("localhost", SERVER_PORT))
        .await
        .inspect_err(|e| error!("Quote request failed ({}): {}", e.kind(), e))
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
