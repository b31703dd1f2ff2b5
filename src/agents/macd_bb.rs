use crate::domain::{Action, Bar, TradingDecision};
use crate::indicators::{bollinger_bands, macd};

use super::traits::Agent;

/// MACD direction combined with a Bollinger Band price extreme.
pub struct MacdBbAgent {
    pub id: String,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
}

impl MacdBbAgent {
    fn required_min(&self) -> usize {
        (self.macd_slow + self.macd_signal).max(self.bb_period)
    }
}

impl Agent for MacdBbAgent {
    fn decide(&mut self, current: &Bar, history: &[Bar]) -> TradingDecision {
        if history.len() < self.required_min() {
            return TradingDecision::insufficient_history(&self.id, current.timestamp, current.price);
        }

        let mut closes: Vec<f64> = history.iter().map(|b| b.price).collect();
        closes.push(current.price);

        let (Some(macd_result), Some(bands)) = (
            macd(&closes, self.macd_fast, self.macd_slow, self.macd_signal),
            bollinger_bands(&closes, self.bb_period, self.bb_std_dev),
        ) else {
            return TradingDecision::insufficient_history(&self.id, current.timestamp, current.price);
        };

        let price = current.price;
        let macd_buy = macd_result.histogram > 0.0 && macd_result.macd > macd_result.signal;
        let macd_sell = macd_result.histogram < 0.0 && macd_result.macd < macd_result.signal;

        let (action, confidence, reason) = if macd_buy && price <= bands.lower {
            (Action::Buy, 0.9, format!(
                "MACD bullish (macd={:.4} > signal={:.4}) and price {price:.2} <= lower band {:.2}",
                macd_result.macd, macd_result.signal, bands.lower
            ))
        } else if macd_sell && price >= bands.upper {
            (Action::Sell, 0.9, format!(
                "MACD bearish (macd={:.4} < signal={:.4}) and price {price:.2} >= upper band {:.2}",
                macd_result.macd, macd_result.signal, bands.upper
            ))
        } else {
            (Action::Hold, 0.5, "MACD/Bollinger signals did not align".to_string())
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
        "MacdBb"
    }
}
