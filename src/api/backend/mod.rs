//! Backend contract and its HTTP implementation.

pub mod client;
pub mod models;

pub use client::HttpBackend;
pub use models::ApiError;

use async_trait::async_trait;

use crate::models::{BalanceSnapshot, Coin, Cursor, OhlcvRow, Page, Transaction};

/// Everything the dashboard needs from the trading backend.
///
/// The trading agent itself is opaque: `execute_trade_cycle` only triggers
/// it, and its decisions show up later as rows in `get_transactions`.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_tracked_coins(&self) -> Result<Vec<Coin>, ApiError>;

    async fn add_tracked_coin(&self, name: &str) -> Result<(), ApiError>;

    async fn remove_tracked_coin(&self, coin_id: i64) -> Result<(), ApiError>;

    /// Price candles for one coin, oldest first. Not paginated.
    async fn get_price_series(&self, coin_name: &str) -> Result<Vec<OhlcvRow>, ApiError>;

    async fn execute_trade_cycle(&self) -> Result<(), ApiError>;

    /// Trade log, newest first
    async fn get_transactions(
        &self,
        cursor: Option<&Cursor>,
        limit: u32,
    ) -> Result<Page<Transaction>, ApiError>;

    /// Balance history, newest first
    async fn get_balance_history(
        &self,
        cursor: Option<&Cursor>,
        limit: u32,
    ) -> Result<Page<BalanceSnapshot>, ApiError>;
}
