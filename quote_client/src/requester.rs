//! Requester: one bounded GET to the quote server, then the local artifact.
//!
//! The 300ms budget starts when [`Requester::fetch_and_save`] is called and
//! covers sending the request and reading the whole reply. A non-200 reply is
//! echoed to the console verbatim and nothing is written; a 200 reply has its
//! `bid` decoded and written to the artifact file, replacing any previous
//! content. The write is a plain overwrite, not an atomic rename.
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use quote_common::deadline::CLIENT_BUDGET;
use quote_common::net::ARTIFACT_PATH;
use quote_common::{Deadline, QuoteError, Result, Stage};
use reqwest::{Client, StatusCode};

use crate::model::quote::BidOnly;

/// Client for the local quote server.
#[derive(Debug, Clone)]
pub struct Requester {
    http: Client,
    server_url: String,
    artifact_path: PathBuf,
    budget: Duration,
}

impl Requester {
    /// Requester for `server_url`, writing to `artifact_path` under `budget`.
    pub fn new(
        server_url: impl Into<String>,
        artifact_path: impl Into<PathBuf>,
        budget: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(QuoteError::transport)?;
        Ok(Self {
            http,
            server_url: server_url.into(),
            artifact_path: artifact_path.into(),
            budget,
        })
    }

    /// Requester for `server_url` with the standard artifact path and 300ms budget.
    pub fn for_server(server_url: impl Into<String>) -> Result<Self> {
        Self::new(server_url, ARTIFACT_PATH, CLIENT_BUDGET)
    }

    /// Path of the artifact this requester writes.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Asks the server for a quote and records its bid.
    ///
    /// Status lines, server error bodies, and the saved line are written to
    /// `console`.
    pub async fn fetch_and_save<W: Write>(&self, console: &mut W) -> Result<()> {
        let deadline = Deadline::after(self.budget);
        let (status, body) = deadline
            .run(Stage::Request, async {
                let response = self
                    .http
                    .get(&self.server_url)
                    .send()
                    .await
                    .map_err(QuoteError::transport)?;
                let status = response.status();
                let body = response.bytes().await.map_err(QuoteError::transport)?;
                Ok((status, body))
            })
            .await?;
        debug!("Server answered {} with {} bytes", status, body.len());

        if status != StatusCode::OK {
            info!("Server refused the quote: {}", status);
            writeln!(console, "Status:{}", status)?;
            console.write_all(&body)?;
            return Ok(());
        }

        let bid = BidOnly::from_json_bytes(&body)?;
        let line = bid.artifact_line();
        std::fs::write(&self.artifact_path, line.as_bytes())?;
        info!("Saved {} to {}", line, self.artifact_path.display());
        writeln!(console, "{}", line)?;
        Ok(())
    }
}

/// Fetches from `server_url`, saves to `cotacao.txt`, and echoes to stdout.
pub async fn fetch_and_save(server_url: &str) -> Result<()> {
    let requester = Requester::for_server(server_url)?;
    let mut stdout = std::io::stdout().lock();
    requester.fetch_and_save(&mut stdout).await
}
