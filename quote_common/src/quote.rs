//! USD-BRL quote as published by the external pricing API.
//!
//! Every field is kept as the text the API sent. Numeric-looking values such
//! as `bid` are never parsed, so precision and formatting survive the trip to
//! storage and back to the requester unchanged.
use serde::{Deserialize, Serialize};

/// Exchange-rate quote for one currency pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    /// Base currency code (e.g., `USD`).
    pub code: String,
    /// Counter currency code (e.g., `BRL`).
    #[serde(rename = "codein")]
    pub counter_code: String,
    /// Human-readable pair name.
    pub name: String,
    /// Session high.
    pub high: String,
    /// Session low.
    pub low: String,
    /// Absolute change of the bid.
    #[serde(rename = "varBid")]
    pub variation_bid: String,
    /// Percent change of the bid.
    #[serde(rename = "pctChange")]
    pub percent_change: String,
    /// Current bid.
    pub bid: String,
    /// Current ask.
    pub ask: String,
    /// Source timestamp, Unix seconds as text.
    pub timestamp: String,
    /// Source creation date as text.
    pub create_date: String,
}

/// Document returned by the external API: `{"USDBRL": {...}}`.
///
/// The `USDBRL` key is mandatory; fields missing inside it decode as empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteEnvelope {
    /// The dollar to real quote.
    #[serde(rename = "USDBRL")]
    pub usd_brl: Quote,
}

impl QuoteEnvelope {
    /// Decodes an envelope from raw JSON bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Quote {
    /// Encode the quote to JSON bytes using the wire field names.
    pub fn to_json_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const API_BODY: &str = r#"{"USDBRL":{"code":"USD","codein":"BRL","name":"Dólar Americano/Real Brasileiro","high":"5.4712","low":"5.4123","varBid":"0.0121","pctChange":"0.22","bid":"5.4301","ask":"5.4311","timestamp":"1729260000","create_date":"2024-10-18 11:00:00"}}"#;

    #[test]
    fn decodes_every_field_verbatim() {
        let envelope = QuoteEnvelope::from_json_bytes(API_BODY.as_bytes()).unwrap();
        let quote = envelope.usd_brl;
        assert_eq!(quote.code, "USD");
        assert_eq!(quote.counter_code, "BRL");
        assert_eq!(quote.name, "Dólar Americano/Real Brasileiro");
        assert_eq!(quote.high, "5.4712");
        assert_eq!(quote.low, "5.4123");
        assert_eq!(quote.variation_bid, "0.0121");
        assert_eq!(quote.percent_change, "0.22");
        assert_eq!(quote.bid, "5.4301");
        assert_eq!(quote.ask, "5.4311");
        assert_eq!(quote.timestamp, "1729260000");
        assert_eq!(quote.create_date, "2024-10-18 11:00:00");
    }

    #[test]
    fn serializes_with_wire_names() {
        let envelope = QuoteEnvelope::from_json_bytes(API_BODY.as_bytes()).unwrap();
        let value: serde_json::Value =
            serde_json::from_slice(&envelope.usd_brl.to_json_bytes().unwrap()).unwrap();
        assert_eq!(value["codein"], "BRL");
        assert_eq!(value["varBid"], "0.0121");
        assert_eq!(value["pctChange"], "0.22");
        assert!(value.get("counter_code").is_none());
    }

    #[test]
    fn trailing_zeros_survive() {
        let body = r#"{"USDBRL":{"bid":"5.4300"}}"#;
        let quote = QuoteEnvelope::from_json_bytes(body.as_bytes()).unwrap().usd_brl;
        assert_eq!(quote.bid, "5.4300");
        assert_eq!(quote.ask, "");
    }

    #[test]
    fn missing_envelope_key_is_a_decode_error() {
        let body = r#"{"EURBRL":{"bid":"6.01"}}"#;
        let err = QuoteEnvelope::from_json_bytes(body.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = QuoteEnvelope::from_json_bytes(b"<html>503</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn non_text_field_is_a_decode_error() {
        let body = r#"{"USDBRL":{"bid":5.43}}"#;
        let err = QuoteEnvelope::from_json_bytes(body.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
