//! Stateful strategy objects mapping `(bar, history)` to a decision.

mod macd_bb;
mod ma_cross;
mod multi_timeframe;
pub mod overlays;
mod rsi_bb;
mod rsi_macd_bb;
mod traits;

pub use macd_bb::MacdBbAgent;
pub use ma_cross::MaCrossAgent;
pub use multi_timeframe::MultiTimeframeAgent;
pub use overlays::{StopLossOverlay, TrailingStopOverlay};
pub use rsi_bb::RsiBbAgent;
pub use rsi_macd_bb::RsiMacdBbAgent;
pub use traits::{Agent, MultiTimeframeDecider};
