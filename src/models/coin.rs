//! Tracked coin models

use serde::{Deserialize, Serialize};

/// A coin the trading agent is allowed to trade
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Coin {
    pub id: i64,
    pub name: String,
}

/// Response body of `GET /my/coins`
#[derive(Debug, Clone, Deserialize)]
pub struct CoinListResponse {
    pub items: Vec<Coin>,
}

/// Request body of `POST /my/coins`
#[derive(Debug, Clone, Serialize)]
pub struct CreateCoinRequest {
    pub name: String,
}
