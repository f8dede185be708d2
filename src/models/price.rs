//! Price series models

use serde::Deserialize;

/// One candle of a coin's price series
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OhlcvRow {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Traded value in KRW
    pub value: f64,
}

/// Response body of `GET /coins/{name}`
#[derive(Debug, Clone, Deserialize)]
pub struct OhlcvResponse {
    pub items: Vec<OhlcvRow>,
}
