//! Overlay wrappers adding forced-exit behavior around a base agent.
//!
//! Each overlay owns its wrapped agent and an overlay-local
//! [`super::Agent`] implementation, so a chain is built by ordinary
//! composition: `TrailingStopOverlay::new(StopLossOverlay::new(base,
//! ...), ...)`.

mod stop_loss;
mod trailing_stop;

pub use stop_loss::StopLossOverlay;
pub use trailing_stop::TrailingStopOverlay;
