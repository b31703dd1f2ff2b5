use crate::domain::{Action, Bar, TradingDecision};
use crate::indicators::{bollinger_bands, macd, rsi};

use super::traits::Agent;

/// Three-way conjunction of RSI, MACD, and Bollinger Bands. The
/// richest single-timeframe agent and the dominant grid-search
/// target.
pub struct RsiMacdBbAgent {
    pub id: String,
    pub rsi_period: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
}

impl RsiMacdBbAgent {
    fn required_min(&self) -> usize {
        (self.rsi_period + 1)
            .max(self.macd_slow + self.macd_signal)
            .max(self.bb_period)
    }
}

impl Agent for RsiMacdBbAgent {
    fn decide(&mut self, current: &Bar, history: &[Bar]) -> TradingDecision {
        if history.len() < self.required_min() {
            return TradingDecision::insufficient_history(&self.id, current.timestamp, current.price);
        }

        let mut closes: Vec<f64> = history.iter().map(|b| b.price).collect();
        closes.push(current.price);

        let rsi_value = rsi(&closes, self.rsi_period);
        let macd_result = macd(&closes, self.macd_fast, self.macd_slow, self.macd_signal);
        let bands = bollinger_bands(&closes, self.bb_period, self.bb_std_dev);

        let (Some(rsi_value), Some(macd_result), Some(bands)) = (rsi_value, macd_result, bands) else {
            return TradingDecision::insufficient_history(&self.id, current.timestamp, current.price);
        };

        let price = current.price;
        let rsi_buy = rsi_value < self.oversold;
        let rsi_sell = rsi_value > self.overbought;
        let bb_buy = price <= bands.lower;
        let bb_sell = price >= bands.upper;
        let macd_buy = macd_result.histogram > 0.0 && macd_result.macd > macd_result.signal;
        let macd_sell = macd_result.histogram < 0.0 && macd_result.macd < macd_result.signal;

        let (action, confidence, reason) = if rsi_buy && bb_buy && macd_buy {
            (Action::Buy, 0.9, format!(
                "RSI oversold ({rsi_value:.2}) AND BB buy (price {price:.2} <= {:.2}) AND MACD bullish ({:.4} > {:.4})",
                bands.lower, macd_result.macd, macd_result.signal
            ))
        } else if rsi_sell && bb_sell && macd_sell {
            (Action::Sell, 0.9, format!(
                "RSI overbought ({rsi_value:.2}) AND BB sell (price {price:.2} >= {:.2}) AND MACD bearish ({:.4} < {:.4})",
                bands.upper, macd_result.macd, macd_result.signal
            ))
        } else {
            (Action::Hold, 0.5, "Not all three signals align".to_string())
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
        "RsiMacdBb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(minute: i64, price: f64) -> Bar {
        Bar::new(Utc.timestamp_opt(0, 0).unwrap() + chrono::Duration::minutes(minute), price)
    }

    #[test]
    fn holds_when_signals_disagree() {
        let bars: Vec<Bar> = (0..40).map(|i| bar(i, 100.0)).collect();
        let mut agent = RsiMacdBbAgent {
            id: "triple".into(),
            rsi_period: 14,
            oversold: 35.0,
            overbought: 80.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std_dev: 2.0,
        };
        let n = bars.len();
        let decision = agent.decide(&bars[n - 1], &bars[..n - 1]);
        assert_eq!(decision.action, Action::Hold);
    }
}
