use crate::agents::traits::MultiTimeframeDecider;
use crate::domain::{Action, BacktestError, Bar, Order, SimulatorState};

use super::alignment::align;
use super::simulator::SimulationResult;

/// Replays a fast series against an independently-sampled slow series,
/// aligning each fast bar to the latest slow bar not newer than it.
/// Fill mode is always full-position — this variant is only used by
/// the grid-search and production paths, which never run fractional
/// fills.
///
/// `slow_lookback` bounds the slow-series window handed to the agent
/// at each step to its last `slow_lookback` causally-available bars
/// (or fewer, near the start of the run) rather than the full, ever-
/// growing causal prefix — the MACD kernel seeds its EMA from the
/// first element it is given, so the window's length determines its
/// output, not just its tail.
pub fn run_multi_timeframe(
    agent: &mut dyn MultiTimeframeDecider,
    fast_bars: &[Bar],
    slow_bars: &[Bar],
    fast_lookback: usize,
    slow_lookback: usize,
    fee_rate: f64,
    initial_balance: f64,
) -> Result<SimulationResult, BacktestError> {
    let rows = align(fast_bars, slow_bars);
    if rows.len() < fast_lookback + 1 {
        return Err(BacktestError::InsufficientData { have: rows.len(), need: fast_lookback + 1 });
    }

    // `rows[i].fast_bar` is `fast_bars[offset + i]` where `offset` is
    // the number of leading fast bars dropped for having no slow
    // context. Recover each row's position in `fast_bars` so the fast
    // history window can be sliced directly from the original series.
    let offset = fast_bars.len() - rows.len();

    let mut state = SimulatorState::new(initial_balance);
    let mut order_seq: u64 = 0;

    for i in fast_lookback..rows.len() {
        let row = &rows[i];
        let fast_pos = offset + i;
        let fast_history = &fast_bars[fast_pos - fast_lookback..fast_pos];
        let slow_history = &slow_bars[row.k.saturating_sub(slow_lookback)..row.k];

        let decision = agent.decide(&row.fast_bar, fast_history, slow_history);
        let fill_price = row.fast_bar.price;

        match decision.action {
            Action::Hold => {}
            Action::Buy if state.balance > 0.0 => {
                let quote_spent = state.balance / (1.0 + fee_rate);
                let base_bought = quote_spent / fill_price;
                state.balance = 0.0;
                state.apply_buy(base_bought, fill_price);
                order_seq += 1;
                state.orders.push(Order::executed(
                    format!("mtf-{order_seq}"),
                    &decision.agent_id,
                    Action::Buy,
                    base_bought,
                    fill_price,
                    decision.timestamp,
                ));
            }
            Action::Sell if state.holdings > 0.0 => {
                let base_sold = state.holdings;
                let quote_in = base_sold * fill_price;
                state.balance += quote_in * (1.0 - fee_rate);
                state.apply_sell(base_sold);
                order_seq += 1;
                state.orders.push(Order::executed(
                    format!("mtf-{order_seq}"),
                    &decision.agent_id,
                    Action::Sell,
                    base_sold,
                    fill_price,
                    decision.timestamp,
                ));
            }
            Action::Buy | Action::Sell => {}
        }
        state.decisions.push(decision);
    }

    let final_price = rows.last().map(|r| r.fast_bar.price).unwrap_or(initial_balance);
    let final_value = state.mark_to_market(final_price);
    let total_profit = final_value - initial_balance;

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
        stop_loss_trades: 0,
        decisions: state.decisions,
        orders: state.orders,
    })
}
