//! Trade log models

use serde::Deserialize;
use std::fmt;

/// Normalized agent action shown next to each trade log row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    /// Parse a raw action tag. Only the exact lower-case tags are accepted.
    pub fn from_tag(tag: &str) -> Option<Action> {
        match tag {
            "buy" => Some(Action::Buy),
            "sell" => Some(Action::Sell),
            "hold" => Some(Action::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "buy",
            Action::Sell => "sell",
            Action::Hold => "hold",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Pending,
    Success,
    PartialSuccess,
    Failed,
    NoAction,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Unknown => "-",
        }
    }
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Pending => "pending",
            TradeStatus::Success => "success",
            TradeStatus::PartialSuccess => "partial",
            TradeStatus::Failed => "failed",
            TradeStatus::NoAction => "no action",
            TradeStatus::Unknown => "-",
        }
    }
}

/// One row of the append-only trade log
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(default)]
    pub coin_id: Option<i64>,
    #[serde(default)]
    pub coin_name: Option<String>,
    /// Raw action tag; may be absent or hold a value we don't know
    #[serde(rename = "type", default)]
    pub trade_type: Option<String>,
    pub price: f64,
    pub amount: f64,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub status: TradeStatus,
    /// `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    /// Agent analysis text
    #[serde(rename = "ai_reason", default)]
    pub primary_reason: Option<String>,
    /// Execution detail (balance, price, fees, failure cause)
    #[serde(rename = "execution_reason", default)]
    pub fallback_reason: Option<String>,
}

impl Transaction {
    pub fn action_tag(&self) -> Option<Action> {
        self.trade_type.as_deref().and_then(Action::from_tag)
    }

    /// Trade value. Always price × amount, never read from the wire.
    pub fn total_value(&self) -> f64 {
        self.price * self.amount
    }

    /// Date part of the timestamp
    pub fn date(&self) -> &str {
        self.timestamp.split(' ').next().unwrap_or(&self.timestamp)
    }
}
