//! Account balance history models

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

/// A point-in-time record of the account's holdings, in KRW
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceSnapshot {
    pub id: i64,
    /// Cash balance
    pub amount: f64,
    /// Coin holdings valued in KRW
    pub coin_amount: f64,
    pub total_amount: f64,
    pub created_at: String,
}

impl BalanceSnapshot {
    pub fn created_at_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }
}

/// Parse the backend's `YYYY-MM-DD HH:MM:SS` timestamps, falling back to ISO 8601
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}
