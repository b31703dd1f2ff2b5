use serde::{Deserialize, Serialize};

use crate::agents::Agent;
use crate::domain::{Action, Bar, BacktestError, Order, SimulatorState, TradingDecision};

use super::fill::{apply_fill, FillMode};

/// Metrics and logs from a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub initial_balance: f64,
    pub final_balance: f64,
    pub final_holdings: f64,
    pub final_price: f64,
    pub final_value: f64,
    pub total_profit: f64,
    pub profit_percentage: f64,
    pub total_trades: usize,
    pub buy_trades: usize,
    pub sell_trades: usize,
    pub stop_loss_trades: usize,
    pub decisions: Vec<TradingDecision>,
    pub orders: Vec<Order>,
}

/// Replays `bars` against `agent`, starting decisions at index
/// `lookback`. When `stop_loss_pct` is set, a simulator-level forced
/// exit is checked before the agent is ever consulted for that bar —
/// this is a distinct, simulator-owned stop, independent of any
/// stop-loss overlay the agent itself might be wrapped in.
pub fn run_single_timeframe(
    agent: &mut dyn Agent,
    bars: &[Bar],
    lookback: usize,
    stop_loss_pct: Option<f64>,
    fee_rate: f64,
    initial_balance: f64,
    mode: FillMode,
) -> Result<SimulationResult, BacktestError> {
    if bars.len() < lookback + 1 {
        return Err(BacktestError::InsufficientData { have: bars.len(), need: lookback + 1 });
    }

    let mut state = SimulatorState::new(initial_balance);
    let mut order_seq: u64 = 0;
    let mut next_order_id = |prefix: &str| {
        order_seq += 1;
        format!("{prefix}-{order_seq}")
    };

    for i in lookback..bars.len() {
        let bar = &bars[i];
        let history = &bars[i - lookback..i];

        if let Some(stop_loss_pct) = stop_loss_pct {
            if let Some(entry) = state.entry_price {
                if state.holdings > 0.0 {
                    let loss_pct = (bar.price - entry) / entry;
                    if loss_pct <= -stop_loss_pct {
                        let reason = format!(
                            "Stop Loss triggered: {:.2}% loss (entry: ${entry:.2}, current: ${:.2})",
                            loss_pct * 100.0,
                            bar.price
                        );
                        let decision = TradingDecision {
                            agent_id: agent.name().to_string(),
                            timestamp: bar.timestamp,
                            action: Action::Sell,
                            confidence: 1.0,
                            price: bar.price,
                            reason,
                            predicted_price: None,
                        };
                        let holdings = state.holdings;
                        let quote_in = holdings * bar.price * (1.0 - fee_rate);
                        state.balance += quote_in;
                        state.holdings = 0.0;
                        state.entry_price = None;
                        let order = Order::executed(
                            next_order_id("sl"),
                            &decision.agent_id,
                            Action::Sell,
                            holdings,
                            bar.price,
                            bar.timestamp,
                        );
                        state.orders.push(order);
                        state.decisions.push(decision);
                        continue;
                    }
                }
            }
        }

        agent.update_position(state.entry_price, state.holdings, Some(bar.price));
        let decision = agent.decide(bar, history);
        let order = apply_fill(&mut state, &decision, bar.price, fee_rate, mode, next_order_id("ord"));
        state.decisions.push(decision);
        if let Some(order) = order {
            state.orders.push(order);
        }
    }

    let final_price = bars.last().unwrap().price;
    let final_value = state.mark_to_market(final_price);
    let total_profit = final_value - initial_balance;
    let stop_loss_trades = state
        .decisions
        .iter()
        .filter(|d| d.reason.contains("Stop Loss triggered"))
        .count();

    Ok(SimulationResult {
        initial_balance,
        final_balance: state.balance,
        final_holdings: state.holdings,
        final_price,
        final_value,
        total_profit,
        profit_percentage: total_profit / initial_balance * 100.0,
        total_trades: state.orders.len(),
        buy_trades: state.orders.iter().filter(|o| o.action == Action::Buy).count(),
        sell_trades: state.orders.iter().filter(|o| o.action == Action::Sell).count(),
        stop_loss_trades,
        decisions: state.decisions,
        orders: state.orders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::MaCrossAgent;
    use chrono::{TimeZone, Utc};

    fn bar(minute: i64, price: f64) -> Bar {
        Bar::new(Utc.timestamp_opt(0, 0).unwrap() + chrono::Duration::minutes(minute), price)
    }

    #[test]
    fn scenario_one_full_position_no_fees() {
        let prices = [100.0, 100.0, 100.0, 100.0, 100.0, 102.0, 104.0, 106.0, 108.0, 110.0];
        let bars: Vec<Bar> = prices.iter().enumerate().map(|(i, &p)| bar(i as i64, p)).collect();
        let mut agent = MaCrossAgent::new("ma", 2, 4);
        let result = run_single_timeframe(&mut agent, &bars, 4, None, 0.0, 1000.0, FillMode::FullPosition).unwrap();
        assert_eq!(result.buy_trades, 1);
        assert_eq!(result.sell_trades, 0);
        assert!((result.final_holdings - 9.8039).abs() < 1e-3);
        assert!((result.profit_percentage - 7.84).abs() < 0.1);
    }

    #[test]
    fn insufficient_data_is_a_typed_error() {
        let bars: Vec<Bar> = (0..3).map(|i| bar(i, 100.0)).collect();
        let mut agent = MaCrossAgent::new("ma", 2, 4);
        let err = run_single_timeframe(&mut agent, &bars, 4, None, 0.0, 1000.0, FillMode::FullPosition).unwrap_err();
        assert!(matches!(err, BacktestError::InsufficientData { .. }));
    }

    #[test]
    fn scenario_two_forced_stop_loss() {
        // Flat run, then a golden cross buy at 102, then a crash to 90
        // that trips the 5% simulator-level stop loss before the agent
        // is ever consulted for that bar.
        let prices = [100.0, 100.0, 100.0, 100.0, 102.0, 90.0];
        let bars: Vec<Bar> = prices.iter().enumerate().map(|(i, &p)| bar(i as i64, p)).collect();
        let mut agent = MaCrossAgent::new("ma", 2, 3);
        let result = run_single_timeframe(&mut agent, &bars, 3, Some(0.05), 0.001, 1000.0, FillMode::FullPosition).unwrap();
        assert_eq!(result.final_holdings, 0.0);
        assert_eq!(result.stop_loss_trades, 1);
        assert!(result.orders.iter().any(|o| o.id.starts_with("sl-")));
    }

    #[test]
    fn hold_never_mutates_state() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 100.0)).collect();
        let mut agent = MaCrossAgent::new("ma", 2, 4);
        let result = run_single_timeframe(&mut agent, &bars, 4, None, 0.001, 1000.0, FillMode::FullPosition).unwrap();
        assert_eq!(result.final_balance, 1000.0);
        assert_eq!(result.total_trades, 0);
    }
}
