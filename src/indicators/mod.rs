//! Stateless indicator kernels.
//!
//! Every function here takes an ordered slice of closes ending at
//! "now" and returns `None` when the slice is too short, rather than
//! panicking or producing NaN. Degenerate numeric cases (e.g. zero
//! average loss in RSI) are resolved by an explicit fallback, never by
//! propagating a NaN or infinity.

mod bollinger;
mod ema;
mod macd;
mod rsi;
mod sma;

pub use bollinger::{bollinger_bands, BollingerBands};
pub use ema::ema_series;
pub use macd::{macd, Macd};
pub use rsi::rsi;
pub use sma::sma;

#[cfg(debug_assertions)]
pub(crate) fn assert_finite(value: f64, ctx: &str) {
    debug_assert!(value.is_finite(), "indicator kernel produced non-finite value in {ctx}: {value}");
}

#[cfg(not(debug_assertions))]
pub(crate) fn assert_finite(_value: f64, _ctx: &str) {}
