//! Data models shared by the backend client, the services and the terminal
//!
//! Wire types deserialize straight from the backend's JSON; derived values
//! (trade totals, sorted chart points) are computed, never read from the wire.

pub mod balance;
pub mod coin;
pub mod notification;
pub mod page;
pub mod price;
pub mod transaction;

// Re-export commonly used types for convenience
pub use balance::BalanceSnapshot;
pub use coin::{Coin, CoinListResponse, CreateCoinRequest};
pub use notification::{NewNotification, Notification, Severity};
pub use page::{Cursor, Page};
pub use price::{OhlcvResponse, OhlcvRow};
pub use transaction::{Action, RiskLevel, TradeStatus, Transaction};
