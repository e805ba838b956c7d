//! Quote client library.
//!
//! - `model` — the bid-only projection of the server's reply.
//! - `requester` — `Requester`, the bounded call to the quote server and the
//!   `cotacao.txt` artifact it writes.
#![warn(missing_docs)]
pub mod model;
pub mod requester;

pub use model::quote::BidOnly;
pub use requester::{Requester, fetch_and_save};
