pub mod lnd;

use ln_payment_engine::events::EventHooks;
use log::*;

/// The hooks that the server registers for settlement events.
pub fn create_event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_payment_received(|ev| {
        Box::pin(async move {
            info!("🪝️ Wallet {} received {} for invoice {}", ev.wallet_id, ev.amount, ev.payment_hash);
        })
    });
    hooks
}
