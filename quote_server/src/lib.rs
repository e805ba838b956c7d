//! Quote server library.
//!
//! Serves `GET /cotacao`: each request fetches the USD-BRL quote from the
//! external pricing API, stores it in SQLite, and returns it as JSON. The
//! building blocks are:
//!
//! - `fetcher` — `QuoteFetcher`, the bounded call to the pricing API (200ms).
//! - `store` — `QuoteStore`, the SQLite handle opened once at startup.
//! - `persister` — `QuotePersister`, the bounded insert (10ms).
//! - `endpoint` — the axum handler chaining the two stages.
//! - `server` — `QuoteServer`, the listener with `start`/`stop`.
#![warn(missing_docs)]
pub mod endpoint;
pub mod fetcher;
pub mod persister;
pub mod server;
pub mod store;

pub use endpoint::{AppState, fetch_and_store, quote_router};
pub use fetcher::QuoteFetcher;
pub use persister::QuotePersister;
pub use server::QuoteServer;
pub use store::QuoteStore;
