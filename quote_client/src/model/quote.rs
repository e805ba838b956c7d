//! Bid-only projection of the server's quote reply.
//!
//! The server replies with the full quote record; the client decodes just the
//! `bid` field and ignores everything else. A reply without `bid` decodes as an
//! empty bid.
use quote_common::Result;
use serde::Deserialize;

/// Prefix of the artifact line.
pub const ARTIFACT_PREFIX: &str = "Dólar:";

/// The only field the client reads from the server's JSON reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BidOnly {
    /// Current bid, verbatim.
    pub bid: String,
}

impl BidOnly {
    /// Decodes the `bid` field from a JSON body; other fields are ignored.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Artifact text: `Dólar:{bid}`, no trailing newline.
    pub fn artifact_line(&self) -> String {
        format!("{}{}", ARTIFACT_PREFIX, self.bid)
    }
}
