use thiserror::Error;

use crate::events::PaymentReceivedEvent;

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Could not deliver notification: {0}")]
    DeliveryFailed(String),
}

/// Best-effort delivery of settlement notifications to the wallet owner.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn ln_payment_received(&self, event: PaymentReceivedEvent) -> Result<(), NotificationError>;
}
