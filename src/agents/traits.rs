use crate::domain::{Bar, TradingDecision};

/// The single-timeframe agent contract. `decide` must never read any
/// bar at or after `current`'s timestamp other than `current` itself.
///
/// Agents are modelled as stateful (`&mut self`) because overlays
/// (stop-loss, trailing-stop) carry state across bars. Plain
/// indicator-combination agents simply never mutate anything in
/// `decide`.
pub trait Agent: Send {
    fn decide(&mut self, current: &Bar, history: &[Bar]) -> TradingDecision;

    /// Called by the simulator between bars with the authoritative
    /// position state it just computed, so overlay bookkeeping can
    /// never drift from the fill model's own accounting. Default is a
    /// no-op for agents with no overlay state.
    fn update_position(&mut self, _entry_price: Option<f64>, _holdings: f64, _current_price: Option<f64>) {}

    fn name(&self) -> &str;
}

/// The multi-timeframe variant: fed a fast-series history and an
/// independently-windowed slow-series history.
pub trait MultiTimeframeDecider: Send {
    fn decide(&mut self, current: &Bar, fast_history: &[Bar], slow_history: &[Bar]) -> TradingDecision;

    fn name(&self) -> &str;
}
