use tracing::{info, warn};

use crate::api::Backend;
use crate::coins;
use crate::models::{Coin, NewNotification};
use crate::services::notifications::NotificationBus;
use crate::utils::{DashboardError, ValidationError};

/// Check a coin can be added to the tracked list. Returns the trimmed name.
pub fn validate_new_coin(tracked: &[Coin], name: &str) -> Result<String, ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::MissingSelection);
    }

    if tracked.iter().any(|coin| coin.name == name) {
        return Err(ValidationError::AlreadyTracked(name.to_string()));
    }

    if !coins::is_available(name) {
        return Err(ValidationError::UnsupportedCoin(name.to_string()));
    }

    Ok(name.to_string())
}

/// Report a rejected action and hand the error back
pub fn reject(bus: &NotificationBus, error: ValidationError) -> DashboardError {
    warn!("rejected: {}", error);
    bus.emit(NewNotification::destructive("Error").with_body(error.to_string()));
    DashboardError::Validation(error)
}

/// Fetch the tracked coin list. On failure the caller keeps its current list.
pub async fn fetch_tracked_coins(backend: &dyn Backend, bus: &NotificationBus) -> Option<Vec<Coin>> {
    match backend.list_tracked_coins().await {
        Ok(coins) => Some(coins),
        Err(e) => {
            warn!("failed to load tracked coins: {}", e);
            bus.emit(
                NewNotification::destructive("Error")
                    .with_body(format!("Failed to load coin list: {}", e.user_message())),
            );
            None
        }
    }
}

/// Add a coin to the tracked list.
///
/// Duplicates and unknown tickers are rejected before any request is made.
/// `tracked` is the list as currently displayed; it is not modified here,
/// the caller refetches once the server has confirmed.
pub async fn add_coin(
    backend: &dyn Backend,
    bus: &NotificationBus,
    tracked: &[Coin],
    name: &str,
) -> Result<(), DashboardError> {
    let name = validate_new_coin(tracked, name).map_err(|e| reject(bus, e))?;

    if let Err(e) = backend.add_tracked_coin(&name).await {
        warn!("failed to add coin {}: {}", name, e);
        bus.emit(
            NewNotification::destructive("Error")
                .with_body(format!("Failed to add coin: {}", e.user_message())),
        );
        return Err(e.into());
    }

    info!("added tracked coin {}", name);
    bus.emit(NewNotification::info("Success").with_body(format!("{} was added.", name)));
    Ok(())
}

/// Remove a tracked coin by id. Returns the removed coin.
pub async fn remove_coin(
    backend: &dyn Backend,
    bus: &NotificationBus,
    tracked: &[Coin],
    coin_id: i64,
) -> Result<Coin, DashboardError> {
    let coin = tracked
        .iter()
        .find(|coin| coin.id == coin_id)
        .cloned()
        .ok_or_else(|| reject(bus, ValidationError::UnknownCoin(coin_id)))?;

    if let Err(e) = backend.remove_tracked_coin(coin.id).await {
        warn!("failed to remove coin {}: {}", coin.name, e);
        bus.emit(
            NewNotification::destructive("Error")
                .with_body(format!("Failed to remove coin: {}", e.user_message())),
        );
        return Err(e.into());
    }

    info!("removed tracked coin {}", coin.name);
    bus.emit(NewNotification::info("Success").with_body(format!("{} was removed.", coin.name)));
    Ok(coin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked() -> Vec<Coin> {
        vec![
            Coin {
                id: 1,
                name: "BTC".to_string(),
            },
            Coin {
                id: 2,
                name: "ETH".to_string(),
            },
        ]
    }

    #[test]
    fn test_validate_new_coin() {
        assert_eq!(validate_new_coin(&tracked(), " XRP "), Ok("XRP".to_string()));
        assert_eq!(
            validate_new_coin(&tracked(), "BTC"),
            Err(ValidationError::AlreadyTracked("BTC".to_string()))
        );
        assert_eq!(
            validate_new_coin(&tracked(), ""),
            Err(ValidationError::MissingSelection)
        );
        assert_eq!(
            validate_new_coin(&tracked(), "NOPE"),
            Err(ValidationError::UnsupportedCoin("NOPE".to_string()))
        );
    }
}
