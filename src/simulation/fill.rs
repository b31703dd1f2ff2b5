use crate::domain::{Action, Order, SimulatorState, TradingDecision};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Legacy default: each BUY spends 10% of balance, each SELL
    /// liquidates 10% of holdings.
    Fractional,
    /// Used by grid-search and production: each BUY spends the whole
    /// balance, each SELL liquidates the whole position.
    FullPosition,
}

/// Applies a decision's fill to `state`, returning the resulting
/// order, or `None` if the decision was HOLD or the fill model's
/// preconditions were not met (insufficient funds / no holdings —
/// suppressed silently per the failure semantics of the fill model;
/// the decision itself is still logged by the caller regardless).
pub fn apply_fill(
    state: &mut SimulatorState,
    decision: &TradingDecision,
    fill_price: f64,
    fee_rate: f64,
    mode: FillMode,
    order_id: impl Into<String>,
) -> Option<Order> {
    match decision.action {
        Action::Hold => None,
        Action::Buy => apply_buy(state, decision, fill_price, fee_rate, mode, order_id),
        Action::Sell => apply_sell(state, decision, fill_price, fee_rate, mode, order_id),
    }
}

fn apply_buy(
    state: &mut SimulatorState,
    decision: &TradingDecision,
    fill_price: f64,
    fee_rate: f64,
    mode: FillMode,
    order_id: impl Into<String>,
) -> Option<Order> {
    let quote_spent = match mode {
        FillMode::Fractional => {
            let quote_spent = 0.10 * state.balance;
            if quote_spent * (1.0 + fee_rate) > state.balance {
                return None;
            }
            quote_spent
        }
        FillMode::FullPosition => {
            if state.balance <= 0.0 {
                return None;
            }
            state.balance / (1.0 + fee_rate)
        }
    };

    let base_bought = quote_spent / fill_price;
    state.balance -= quote_spent * (1.0 + fee_rate);
    if matches!(mode, FillMode::FullPosition) {
        state.balance = 0.0;
    }
    state.apply_buy(base_bought, fill_price);

    Some(Order::executed(order_id, &decision.agent_id, Action::Buy, base_bought, fill_price, decision.timestamp))
}

fn apply_sell(
    state: &mut SimulatorState,
    decision: &TradingDecision,
    fill_price: f64,
    fee_rate: f64,
    mode: FillMode,
    order_id: impl Into<String>,
) -> Option<Order> {
    if state.holdings <= 0.0 {
        return None;
    }

    let base_sold = match mode {
        FillMode::Fractional => 0.10 * state.holdings,
        FillMode::FullPosition => state.holdings,
    };

    let quote_in = base_sold * fill_price;
    state.balance += quote_in * (1.0 - fee_rate);
    state.apply_sell(base_sold);

    Some(Order::executed(order_id, &decision.agent_id, Action::Sell, base_sold, fill_price, decision.timestamp))
}
