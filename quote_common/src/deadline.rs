//! Explicit, cascading deadlines.
//!
//! Every stage of the pipeline receives the deadline of its caller as a plain
//! value and derives its own with [`Deadline::child`], which never expires later
//! than the parent. [`Deadline::run`] bounds a future by the deadline: when the
//! deadline passes first, the future is dropped (abandoning whatever I/O it had
//! in flight) and a [`QuoteError::Timeout`] tagged with the stage is returned.
//!
//! Time is measured with `tokio::time::Instant`, which is monotonic and can be
//! paused in tests.
use std::future::Future;
use std::time::Duration;

use strum_macros::Display;
use tokio::time::Instant;

use crate::error::QuoteError;
use crate::result::Result;

/// Budget the requester grants the whole round trip to the server.
pub const CLIENT_BUDGET: Duration = Duration::from_millis(300);
/// Budget the server grants the call to the external pricing API.
pub const FETCH_BUDGET: Duration = Duration::from_millis(200);
/// Budget the server grants the storage write.
pub const STORE_BUDGET: Duration = Duration::from_millis(10);

/// Pipeline stage a deadline belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    /// Requester waiting on the local server.
    Request,
    /// Server calling the external pricing API.
    Fetch,
    /// Server writing the quote to storage.
    Store,
}

/// Point in time after which a stage must be abandoned.
///
/// An unbounded deadline never expires; it models an inbound request whose
/// caller did not communicate a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Option<Instant>,
    budget: Option<Duration>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self {
            expires_at: None,
            budget: None,
        }
    }

    /// A root deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + budget),
            budget: Some(budget),
        }
    }

    /// Derives a stage deadline: `min(self, now + budget)`.
    pub fn child(&self, budget: Duration) -> Self {
        let local = Instant::now() + budget;
        let expires_at = match self.expires_at {
            Some(parent) => parent.min(local),
            None => local,
        };
        Self {
            expires_at: Some(expires_at),
            budget: Some(budget),
        }
    }

    /// Instant at which this deadline expires, if bounded.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Local budget this deadline was created with, if bounded.
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Time left before expiry; zero once expired, `None` if unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// `true` once the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// The timeout error reported when `stage` runs past this deadline.
    pub fn exceeded(&self, stage: Stage) -> QuoteError {
        QuoteError::Timeout {
            stage,
            budget: self.budget.unwrap_or_default(),
        }
    }

    /// Drives `fut` to completion or until the deadline, whichever comes first.
    pub async fn run<F, T>(&self, stage: Stage, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.expires_at {
            None => fut.await,
            Some(at) => match tokio::time::timeout_at(at, fut).await {
                Ok(result) => result,
                Err(_) => Err(self.exceeded(stage)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test(start_paused = true)]
    async fn child_is_capped_by_parent() {
        let parent = Deadline::after(Duration::from_millis(50));
        let child = parent.child(Duration::from_millis(200));
        assert_eq!(child.expires_at(), parent.expires_at());
        assert_eq!(child.budget(), Some(Duration::from_millis(200)));
    }

    #[tokio::test(start_paused = true)]
    async fn child_keeps_its_own_shorter_budget() {
        let parent = Deadline::after(Duration::from_millis(300));
        let child = parent.child(Duration::from_millis(10));
        assert!(child.expires_at() < parent.expires_at());
        assert_eq!(child.remaining(), Some(Duration::from_millis(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn siblings_share_the_parent_clock() {
        let parent = Deadline::unbounded();
        let fetch = parent.child(FETCH_BUDGET);
        tokio::time::advance(Duration::from_millis(150)).await;
        let store = parent.child(STORE_BUDGET);
        assert!(store.expires_at() < fetch.expires_at());
        assert_eq!(fetch.remaining(), Some(Duration::from_millis(50)));
        assert_eq!(store.remaining(), Some(STORE_BUDGET));
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_never_expires() {
        let deadline = Deadline::unbounded();
        tokio::time::advance(Duration::from_secs(3600)).await;
        assert!(!deadline.is_expired());
        assert_eq!(deadline.remaining(), None);
        let value = deadline.run(Stage::Request, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn run_abandons_slow_future() {
        let deadline = Deadline::after(Duration::from_millis(10));
        let err = deadline
            .run(Stage::Store, async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(matches!(
            err,
            QuoteError::Timeout { stage: Stage::Store, .. }
        ));
        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn run_passes_through_inner_errors() {
        let deadline = Deadline::after(Duration::from_millis(10));
        let err = deadline
            .run::<_, ()>(Stage::Fetch, async {
                Err(QuoteError::Decode("missing field".into()))
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
