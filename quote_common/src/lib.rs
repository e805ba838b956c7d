//!
//! Common types and utilities shared by the quote server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` and its closed `ErrorKind`.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `quote` — the `Quote` record and the external API envelope.
//! - `deadline` — explicit cascading deadlines and the fixed stage budgets.
//! - `net` — fixed port, route, URL, and file name constants.
#![warn(missing_docs)]
pub mod deadline;
pub mod error;
pub mod net;
pub mod quote;
pub mod result;

pub use deadline::{Deadline, Stage};
pub use error::{ErrorKind, QuoteError};
pub use quote::{Quote, QuoteEnvelope};
pub use result::Result;
