use std::time::Duration;

use actix_web::web;
use log::*;
use tokio::task::JoinHandle;

use crate::settlement::SettlementHandle;

/// Starts the background scan worker, which reconciles the pending invoices of every wallet on each tick. This is the
/// safety net for settlement signals that never arrive.
///
/// Returns `None` if `interval` is zero, i.e. the worker is disabled. Do not await the returned JoinHandle, as it will
/// run indefinitely.
pub fn start_scan_worker<T>(api: web::Data<T>, interval: Duration, concurrency: usize) -> Option<JoinHandle<()>>
where T: SettlementHandle + 'static {
    if interval.is_zero() {
        warn!("🕰️ The pending invoice scan worker is disabled");
        return None;
    }
    let handle = actix_web::rt::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info!("🕰️ Pending invoice scan worker started. Running every {}s", interval.as_secs_f64());
        loop {
            timer.tick().await;
            debug!("🕰️ Running pending invoice scan");
            match api.scan_all(concurrency).await {
                Ok(summary) if summary.total() > 0 => info!("🕰️ Pending invoice scan complete. {summary}"),
                Ok(_) => debug!("🕰️ No pending invoices"),
                Err(e) => error!("🕰️ Error running pending invoice scan: {e}"),
            }
        }
    });
    Some(handle)
}
