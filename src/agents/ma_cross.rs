use crate::domain::{Action, Bar, TradingDecision};
use crate::indicators::sma;

use super::traits::Agent;

/// Dual simple-moving-average crossover.
pub struct MaCrossAgent {
    pub id: String,
    pub short: usize,
    pub long: usize,
}

impl MaCrossAgent {
    pub fn new(id: impl Into<String>, short: usize, long: usize) -> Self {
        Self { id: id.into(), short, long }
    }
}

impl Agent for MaCrossAgent {
    fn decide(&mut self, current: &Bar, history: &[Bar]) -> TradingDecision {
        if history.len() < self.long {
            return TradingDecision::insufficient_history(&self.id, current.timestamp, current.price);
        }

        let mut closes: Vec<f64> = history.iter().map(|b| b.price).collect();
        closes.push(current.price);

        let short_ma = sma(&closes, self.short).expect("checked above");
        let long_ma = sma(&closes, self.long).expect("checked above");

        let (action, reason) = match short_ma.partial_cmp(&long_ma) {
            Some(std::cmp::Ordering::Greater) => (
                Action::Buy,
                format!("Golden cross (short={short_ma:.4} > long={long_ma:.4})"),
            ),
            Some(std::cmp::Ordering::Less) => (
                Action::Sell,
                format!("Death cross (short={short_ma:.4} < long={long_ma:.4})"),
            ),
            _ => (Action::Hold, format!("short_ma == long_ma ({short_ma:.4})")),
        };

        let confidence = if action == Action::Hold {
            0.5
        } else {
            (0.5 + (short_ma - long_ma).abs() / long_ma).min(0.9)
        };

        TradingDecision {
            agent_id: self.id.clone(),
            timestamp: current.timestamp,
            action,
            confidence,
            price: current.price,
            reason,
            predicted_price: None,
        }
    }

    fn name(&self) -> &str {
        "MaCross"
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
    fn scenario_one_buys_on_golden_cross() {
        // prices [100,100,100,100,100,102,104,106,108,110], short=2, long=4, lookback=4
        let prices = [100.0, 100.0, 100.0, 100.0, 100.0, 102.0, 104.0, 106.0, 108.0, 110.0];
        let bars: Vec<Bar> = prices.iter().enumerate().map(|(i, &p)| bar(i as i64, p)).collect();
        let mut agent = MaCrossAgent::new("ma", 2, 4);
        let history = &bars[1..5]; // i-lookback..i-1 for i=5, lookback=4 -> bars[1..5]
        let decision = agent.decide(&bars[5], history);
        assert_eq!(decision.action, Action::Buy);
    }

    #[test]
    fn holds_on_exact_equality() {
        let bars: Vec<Bar> = (0..5).map(|i| bar(i, 100.0)).collect();
        let mut agent = MaCrossAgent::new("ma", 2, 4);
        let decision = agent.decide(&bars[4], &bars[0..4]);
        assert_eq!(decision.action, Action::Hold);
    }

    #[test]
    fn insufficient_history_holds() {
        let bars: Vec<Bar> = (0..2).map(|i| bar(i, 100.0)).collect();
        let mut agent = MaCrossAgent::new("ma", 2, 4);
        let decision = agent.decide(&bars[1], &bars[0..1]);
        assert_eq!(decision.action, Action::Hold);
        assert_eq!(decision.reason, "Insufficient historical data");
    }
}
