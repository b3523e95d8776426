mod helpers;
pub(crate) mod mocks;

mod exchange_rates;
mod misc;
mod settlement;
