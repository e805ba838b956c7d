//! Quote Persister: deadline-bounded insert of one quote.
//!
//! The 10ms store budget is far below typical commit latency on a busy disk,
//! so a storage timeout is an ordinary outcome of this stage. The insert runs
//! on the blocking pool inside its own transaction, and the result of that task
//! is the only verdict: a timeout is reported only when the transaction was
//! rolled back. The deadline bounds the lock wait on the database file
//! (`busy_timeout`) and is checked again before `COMMIT`; a commit already under
//! way when the budget runs out is allowed to finish and counts as a success.
use std::time::Duration;

use log::debug;
use quote_common::deadline::STORE_BUDGET;
use quote_common::{Deadline, Quote, QuoteError, Result, Stage};

use crate::store::{InsertError, QuoteStore};

/// Writes quotes to a shared [`QuoteStore`] under a fixed budget.
#[derive(Clone)]
pub struct QuotePersister {
    store: QuoteStore,
    budget: Duration,
}

impl QuotePersister {
    /// Persister over `store` with a per-call `budget`.
    pub fn new(store: QuoteStore, budget: Duration) -> Self {
        Self { store, budget }
    }

    /// Persister with the standard 10ms budget.
    pub fn with_store_budget(store: QuoteStore) -> Self {
        Self::new(store, STORE_BUDGET)
    }

    /// The underlying storage handle.
    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    /// Inserts `quote`, giving up when `parent` or the store budget expires.
    pub async fn save(&self, parent: Deadline, quote: &Quote) -> Result<()> {
        let deadline = parent.child(self.budget);
        let Some(expires_at) = deadline.expires_at() else {
            return Err(QuoteError::storage("store deadline must be bounded"));
        };
        let expires_at = expires_at.into_std();

        let store = self.store.clone();
        let quote = quote.clone();
        let insert = tokio::task::spawn_blocking(move || store.insert_before(&quote, expires_at));

        match insert.await {
            Ok(Ok(())) => {
                debug!("Quote stored");
                Ok(())
            }
            Ok(Err(InsertError::Expired)) => Err(deadline.exceeded(Stage::Store)),
            Ok(Err(InsertError::Failed(e))) => Err(e),
            Err(e) => Err(QuoteError::storage(e)),
        }
    }
}
