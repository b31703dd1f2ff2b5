use crate::domain::{Action, Bar, TradingDecision};
use crate::indicators::{bollinger_bands, macd, rsi};

use super::traits::MultiTimeframeDecider;

/// RSI and Bollinger Bands on the fast (15-min) series, MACD on the
/// slow (1-h) series. Trades only when all three directional
/// predicates agree.
///
/// The slow-series price list fed to the MACD kernel duplicates the
/// last slow-history close before computing MACD. This is a known
/// quirk, kept deliberately for numeric parity rather than corrected.
pub struct MultiTimeframeAgent {
    pub id: String,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl MultiTimeframeAgent {
    fn fast_required_min(&self) -> usize {
        (self.rsi_period + 1).max(self.bb_period)
    }

    fn slow_required_min(&self) -> usize {
        self.macd_slow + self.macd_signal
    }
}

impl MultiTimeframeDecider for MultiTimeframeAgent {
    fn decide(&mut self, current: &Bar, fast_history: &[Bar], slow_history: &[Bar]) -> TradingDecision {
        if fast_history.len() < self.fast_required_min() {
            return TradingDecision::hold(&self.id, current.timestamp, current.price, "Insufficient 15-minute historical data");
        }
        if slow_history.is_empty() {
            return TradingDecision::hold(&self.id, current.timestamp, current.price, "No 1-hour historical data provided");
        }
        if slow_history.len() < self.slow_required_min() {
            return TradingDecision::hold(&self.id, current.timestamp, current.price, "Insufficient 1-hour historical data");
        }

        let mut fast_closes: Vec<f64> = fast_history.iter().map(|b| b.price).collect();
        fast_closes.push(current.price);

        let mut slow_closes: Vec<f64> = slow_history.iter().map(|b| b.price).collect();
        slow_closes.push(slow_history.last().unwrap().price);

        let rsi_value = rsi(&fast_closes, self.rsi_period);
        let bands = bollinger_bands(&fast_closes, self.bb_period, self.bb_std_dev);
        let macd_result = macd(&slow_closes, self.macd_fast, self.macd_slow, self.macd_signal);

        let (Some(rsi_value), Some(bands), Some(macd_result)) = (rsi_value, bands, macd_result) else {
            return TradingDecision::hold(&self.id, current.timestamp, current.price, "RSI, Bollinger Bands, or MACD calculation failed");
        };

        let price = current.price;
        let rsi_buy = rsi_value < self.rsi_oversold;
        let rsi_sell = rsi_value > self.rsi_overbought;
        let bb_buy = price <= bands.lower;
        let bb_sell = price >= bands.upper;
        let macd_buy = macd_result.histogram > 0.0 && macd_result.macd > macd_result.signal;
        let macd_sell = macd_result.histogram < 0.0 && macd_result.macd < macd_result.signal;

        let buy_count = [rsi_buy, bb_buy, macd_buy].into_iter().filter(|&v| v).count();
        let sell_count = [rsi_sell, bb_sell, macd_sell].into_iter().filter(|&v| v).count();

        let (action, confidence, reason) = if buy_count == 3 {
            (Action::Buy, 0.9, format!(
                "RSI oversold [15m] AND BB buy [15m] AND MACD bullish [1h] (rsi={rsi_value:.2}, price={price:.2}, lower={:.2}, macd={:.4}, signal={:.4})",
                bands.lower, macd_result.macd, macd_result.signal
            ))
        } else if sell_count == 3 {
            (Action::Sell, 0.9, format!(
                "RSI overbought [15m] AND BB sell [15m] AND MACD bearish [1h] (rsi={rsi_value:.2}, price={price:.2}, upper={:.2}, macd={:.4}, signal={:.4})",
                bands.upper, macd_result.macd, macd_result.signal
            ))
        } else {
            (Action::Hold, 0.5, "Not all 3 signals align".to_string())
        };

        TradingDecision {
            agent_id: self.id.clone(),
            timestamp: current.timestamp,
            action,
            confidence,
            price,
            reason,
            predicted_price: None,
        }
    }

    fn name(&self) -> &str {
        "MultiTimeframe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(minute: i64, price: f64) -> Bar {
        Bar::new(Utc.timestamp_opt(0, 0).unwrap() + chrono::Duration::minutes(minute), price)
    }

    fn agent() -> MultiTimeframeAgent {
        MultiTimeframeAgent {
            id: "mtf".into(),
            rsi_period: 10,
            rsi_oversold: 35.0,
            rsi_overbought: 80.0,
            bb_period: 22,
            bb_std_dev: 2.5,
            macd_fast: 12,
            macd_slow: 20,
            macd_signal: 11,
        }
    }

    #[test]
    fn holds_without_no_slow_history() {
        let fast: Vec<Bar> = (0..25).map(|i| bar(i, 100.0)).collect();
        let current = bar(25, 100.0);
        let mut a = agent();
        let decision = a.decide(&current, &fast, &[]);
        assert_eq!(decision.action, Action::Hold);
        assert_eq!(decision.reason, "No 1-hour historical data provided");
    }

    #[test]
    fn holds_on_flat_series_with_full_data() {
        let fast: Vec<Bar> = (0..25).map(|i| bar(i, 100.0)).collect();
        let slow: Vec<Bar> = (0..35).map(|i| bar(i * 60, 100.0)).collect();
        let current = bar(25, 100.0);
        let mut a = agent();
        let decision = a.decide(&current, &fast, &slow);
        assert_eq!(decision.action, Action::Hold);
    }
}
