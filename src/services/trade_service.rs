use tracing::{info, warn};

use crate::api::{ApiError, Backend};
use crate::models::NewNotification;
use crate::services::notifications::NotificationBus;

/// Ask the backend to run one trading cycle.
///
/// Success only means the cycle was triggered; any resulting trade shows up
/// in the trade log on a later reload.
pub async fn execute_trade_cycle(backend: &dyn Backend, bus: &NotificationBus) -> Result<(), ApiError> {
    match backend.execute_trade_cycle().await {
        Ok(()) => {
            info!("trade cycle triggered");
            bus.emit(NewNotification::info("Success").with_body("Trade cycle executed."));
            Ok(())
        }
        Err(e) => {
            warn!("trade cycle failed: {}", e);
            bus.emit(
                NewNotification::destructive("Error")
                    .with_body(format!("Failed to execute trade: {}", e.user_message())),
            );
            Err(e)
        }
    }
}
