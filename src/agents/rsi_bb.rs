use crate::domain::{Action, Bar, TradingDecision};
use crate::indicators::{bollinger_bands, rsi};

use super::traits::Agent;

/// RSI and Bollinger Bands must agree before a signal is taken.
pub struct RsiBbAgent {
    pub id: String,
    pub rsi_period: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub bb_period: usize,
    pub bb_std_dev: f64,
}

impl RsiBbAgent {
    fn required_min(&self) -> usize {
        (self.rsi_period + 1).max(self.bb_period)
    }
}

impl Agent for RsiBbAgent {
    fn decide(&mut self, current: &Bar, history: &[Bar]) -> TradingDecision {
        if history.len() < self.required_min() {
            return TradingDecision::insufficient_history(&self.id, current.timestamp, current.price);
        }

        let mut closes: Vec<f64> = history.iter().map(|b| b.price).collect();
        closes.push(current.price);

        let (Some(rsi_value), Some(bands)) = (
            rsi(&closes, self.rsi_period),
            bollinger_bands(&closes, self.bb_period, self.bb_std_dev),
        ) else {
            return TradingDecision::insufficient_history(&self.id, current.timestamp, current.price);
        };

        let price = current.price;
        let (action, confidence, reason) = if rsi_value < self.oversold && price <= bands.lower {
            (
                Action::Buy,
                0.9,
                format!("RSI oversold ({rsi_value:.2} < {}) and price {price:.2} <= lower band {:.2}", self.oversold, bands.lower),
            )
        } else if rsi_value > self.overbought && price >= bands.upper {
            (
                Action::Sell,
                0.9,
                format!("RSI overbought ({rsi_value:.2} > {}) and price {price:.2} >= upper band {:.2}", self.overbought, bands.upper),
            )
        } else {
            (Action::Hold, 0.5, format!("RSI={rsi_value:.2}, price={price:.2} within bands [{:.2}, {:.2}]", bands.lower, bands.upper))
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
        "RsiBb"
    }
}
