use chrono::{TimeZone, Utc};

use btc_gridtrader::agents::{Agent, MaCrossAgent, RsiBbAgent};
use btc_gridtrader::domain::{Action, Bar};
use btc_gridtrader::simulation::{run_single_timeframe, FillMode};

fn bar(minute: i64, price: f64) -> Bar {
    Bar::new(Utc.timestamp_opt(0, 0).unwrap() + chrono::Duration::minutes(minute), price)
}

/// Scenario 1 — deterministic MA cross, full-position, no fees.
#[test]
fn scenario_one_deterministic_ma_cross() {
    let prices = [100.0, 100.0, 100.0, 100.0, 100.0, 102.0, 104.0, 106.0, 108.0, 110.0];
    let bars: Vec<Bar> = prices.iter().enumerate().map(|(i, &p)| bar(i as i64, p)).collect();
    let mut agent = MaCrossAgent::new("scenario1", 2, 4);
    let result = run_single_timeframe(&mut agent, &bars, 4, None, 0.0, 1000.0, FillMode::FullPosition).unwrap();

    assert_eq!(result.buy_trades, 1);
    assert_eq!(result.sell_trades, 0);
    assert!((result.final_holdings - 9.8039).abs() < 1e-3);
    assert!((result.final_value - 1078.43).abs() < 0.1);
    assert!((result.profit_percentage - 7.843).abs() < 0.1);
}

/// Scenario 2 — forced stop-loss fires at the simulator level before
/// the agent is consulted for the crash bar.
#[test]
fn scenario_two_forced_stop_loss() {
    let prices = [100.0, 100.0, 100.0, 100.0, 102.0, 90.0];
    let bars: Vec<Bar> = prices.iter().enumerate().map(|(i, &p)| bar(i as i64, p)).collect();
    let mut agent = MaCrossAgent::new("scenario2", 2, 3);
    let result = run_single_timeframe(&mut agent, &bars, 3, Some(0.05), 0.001, 1000.0, FillMode::FullPosition).unwrap();

    assert_eq!(result.final_holdings, 0.0);
    assert_eq!(result.stop_loss_trades, 1);
    assert_eq!(
        result.stop_loss_trades,
        result.decisions.iter().filter(|d| d.reason.contains("Stop Loss triggered")).count()
    );
}

/// Scenario 3 — RSI+BB conjunction fires BUY when oversold and below
/// the lower band, and SELL when the mirror-image condition holds.
///
/// Twenty flat bars followed by a single-bar move is enough to trip
/// both legs at once: a lone outlier against an otherwise flat window
/// pulls the seed-window RSI to its 0/100 extreme (every other delta
/// is zero) while simultaneously pulling the Bollinger mean towards it
/// faster than it inflates the band's own standard deviation.
#[test]
fn scenario_three_rsi_bb_conjunction_buy() {
    let mut prices = vec![100.0; 20];
    prices.push(99.0);
    let bars: Vec<Bar> = prices.iter().enumerate().map(|(i, &p)| bar(i as i64, p)).collect();
    let mut agent = RsiBbAgent {
        id: "scenario3-buy".into(),
        rsi_period: 14,
        oversold: 35.0,
        overbought: 65.0,
        bb_period: 20,
        bb_std_dev: 2.0,
    };
    let n = bars.len();
    let decision = agent.decide(&bars[n - 1], &bars[..n - 1]);
    assert_eq!(decision.action, Action::Buy);
    assert_eq!(decision.confidence, 0.9);
}

#[test]
fn scenario_three_rsi_bb_conjunction_sell() {
    let mut prices = vec![100.0; 20];
    prices.push(101.0);
    let bars: Vec<Bar> = prices.iter().enumerate().map(|(i, &p)| bar(i as i64, p)).collect();
    let mut agent = RsiBbAgent {
        id: "scenario3-sell".into(),
        rsi_period: 14,
        oversold: 35.0,
        overbought: 65.0,
        bb_period: 20,
        bb_std_dev: 2.0,
    };
    let n = bars.len();
    let decision = agent.decide(&bars[n - 1], &bars[..n - 1]);
    assert_eq!(decision.action, Action::Sell);
    assert_eq!(decision.confidence, 0.9);
}

#[test]
fn hold_decisions_never_mutate_balance_or_holdings() {
    let bars: Vec<Bar> = (0..10).map(|i| bar(i, 100.0)).collect();
    let mut agent = MaCrossAgent::new("flat", 2, 4);
    let result = run_single_timeframe(&mut agent, &bars, 4, None, 0.001, 1000.0, FillMode::FullPosition).unwrap();
    assert_eq!(result.final_balance, 1000.0);
    assert_eq!(result.final_holdings, 0.0);
    assert_eq!(result.total_trades, 0);
}

#[test]
fn lookback_equal_to_len_minus_one_produces_one_decision() {
    let bars: Vec<Bar> = (0..5).map(|i| bar(i, 100.0)).collect();
    let mut agent = MaCrossAgent::new("boundary", 2, 4);
    let result = run_single_timeframe(&mut agent, &bars, 4, None, 0.0, 1000.0, FillMode::FullPosition).unwrap();
    assert_eq!(result.decisions.len(), 1);
}
