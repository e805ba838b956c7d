//! Data model types exchanged with the quote server.
//!
//! - `quote` — the bid-only projection of the server's reply.
pub mod quote;
