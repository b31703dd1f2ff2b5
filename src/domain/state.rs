//! Centralised cash/position accounting for a single backtest run.
//!
//! The size-weighted entry-price update used to appear independently
//! in every simulator variant and inside each stop-loss overlay. It
//! lives here once; overlays read it back through the
//! [`crate::agents::Agent::update_position`] hook instead of keeping
//! a derived copy that could drift from the fill model's own math.

use crate::domain::types::{Order, TradingDecision};

#[derive(Debug, Clone)]
pub struct SimulatorState {
    pub initial_balance: f64,
    pub balance: f64,
    pub holdings: f64,
    pub entry_price: Option<f64>,
    pub decisions: Vec<TradingDecision>,
    pub orders: Vec<Order>,
}

impl SimulatorState {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            initial_balance,
            balance: initial_balance,
            holdings: 0.0,
            entry_price: None,
            decisions: Vec::new(),
            orders: Vec::new(),
        }
    }

    /// Rolls a BUY fill into holdings, updating the size-weighted
    /// entry price per the invariant in the data model: `entry' =
    /// (old_holdings*old_entry + new_amount*fill_price) /
    /// (old_holdings + new_amount)`.
    pub fn apply_buy(&mut self, amount: f64, fill_price: f64) {
        let old_holdings = self.holdings;
        let new_holdings = old_holdings + amount;
        self.entry_price = Some(match self.entry_price {
            Some(old_entry) if old_holdings > 0.0 => {
                (old_holdings * old_entry + amount * fill_price) / new_holdings
            }
            _ => fill_price,
        });
        self.holdings = new_holdings;
    }

    /// Rolls a SELL fill out of holdings. Clears the entry price iff
    /// holdings reach (or cross below, which should not happen) zero.
    pub fn apply_sell(&mut self, amount: f64) {
        self.holdings -= amount;
        if self.holdings <= 0.0 {
            self.holdings = 0.0;
            self.entry_price = None;
        }
    }

    pub fn mark_to_market(&self, final_price: f64) -> f64 {
        self.balance + self.holdings * final_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_updates_weighted_entry_price() {
        let mut state = SimulatorState::new(1000.0);
        state.apply_buy(1.0, 100.0);
        assert_eq!(state.entry_price, Some(100.0));
        state.apply_buy(1.0, 200.0);
        assert_eq!(state.entry_price, Some(150.0));
        assert_eq!(state.holdings, 2.0);
    }

    #[test]
    fn sell_to_zero_clears_entry_price() {
        let mut state = SimulatorState::new(1000.0);
        state.apply_buy(2.0, 100.0);
        state.apply_sell(2.0);
        assert_eq!(state.holdings, 0.0);
        assert_eq!(state.entry_price, None);
    }
}
