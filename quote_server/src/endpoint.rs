//! `GET /cotacao`: fetch, persist, reply.
//!
//! The handler runs the two stages in order under sibling deadlines derived
//! from the inbound request deadline. The inbound deadline is unbounded: the
//! requester's own budget never reaches this process. When the requester hangs
//! up, the framework drops this future and the stage in flight is abandoned
//! with it; otherwise the server finishes its work even if nobody is waiting.
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info, warn};
use quote_common::net::QUOTE_ROUTE;
use quote_common::{Deadline, ErrorKind, Quote, QuoteError, Result};

use crate::fetcher::QuoteFetcher;
use crate::persister::QuotePersister;

/// Collaborators shared by every request.
pub struct AppState {
    /// Client for the external pricing API.
    pub fetcher: QuoteFetcher,
    /// Writer for the quote table.
    pub persister: QuotePersister,
}

impl AppState {
    /// Bundles the two stages.
    pub fn new(fetcher: QuoteFetcher, persister: QuotePersister) -> Self {
        Self { fetcher, persister }
    }
}

/// Router exposing the single quote route.
pub fn quote_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(QUOTE_ROUTE, get(get_quote))
        .with_state(state)
}

/// Runs fetch then store; the first failure aborts the chain.
pub async fn fetch_and_store(state: &AppState, inbound: Deadline) -> Result<Quote> {
    let quote = state.fetcher.fetch(inbound).await.inspect_err(|e| {
        log_failure("Failed to fetch the quote", e);
    })?;
    state
        .persister
        .save(inbound, &quote)
        .await
        .inspect_err(|e| log_failure("Failed to store the quote", e))?;
    info!("Quote served: bid={}", quote.bid);
    Ok(quote)
}

async fn get_quote(State(state): State<Arc<AppState>>) -> std::result::Result<Json<Quote>, ApiError> {
    let quote = fetch_and_store(&state, Deadline::unbounded()).await?;
    Ok(Json(quote))
}

fn log_failure(context: &str, err: &QuoteError) {
    match err.kind() {
        ErrorKind::Timeout => warn!("{}: {}", context, err),
        _ => error!("{}: {}", context, err),
    }
}

/// Error reply: status 500 with the error text as a plain-text body.
#[derive(Debug)]
pub struct ApiError(pub QuoteError);

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", self.0)).into_response()
    }
}
