use crate::agents::traits::Agent;
use crate::domain::{Action, Bar, TradingDecision};

/// Wraps any agent with a fixed-percentage stop loss checked before
/// delegating. Position state is supplied exclusively by the
/// simulator via [`Agent::update_position`] — the overlay never
/// derives its own copy from the decisions it emits, so full-position
/// accounting in the simulator and the overlay's view of the position
/// cannot drift apart.
pub struct StopLossOverlay<A: Agent> {
    id: String,
    inner: A,
    stop_loss_pct: f64,
    entry_price: Option<f64>,
    position_size: f64,
}

impl<A: Agent> StopLossOverlay<A> {
    pub fn new(id: impl Into<String>, inner: A, stop_loss_pct: f64) -> Self {
        Self {
            id: id.into(),
            inner,
            stop_loss_pct,
            entry_price: None,
            position_size: 0.0,
        }
    }
}

impl<A: Agent> Agent for StopLossOverlay<A> {
    fn decide(&mut self, current: &Bar, history: &[Bar]) -> TradingDecision {
        if self.position_size > 0.0 {
            if let Some(entry) = self.entry_price {
                let loss_pct = (current.price - entry) / entry;
                if loss_pct <= -self.stop_loss_pct {
                    let reason = format!(
                        "Stop Loss triggered: {:.2}% loss (entry: ${entry:.2}, current: ${:.2})",
                        loss_pct * 100.0,
                        current.price
                    );
                    self.entry_price = None;
                    return TradingDecision {
                        agent_id: self.id.clone(),
                        timestamp: current.timestamp,
                        action: Action::Sell,
                        confidence: 1.0,
                        price: current.price,
                        reason,
                        predicted_price: None,
                    };
                }
            }
        }
        self.inner.decide(current, history)
    }

    fn update_position(&mut self, entry_price: Option<f64>, holdings: f64, current_price: Option<f64>) {
        self.entry_price = entry_price;
        self.position_size = holdings;
        self.inner.update_position(entry_price, holdings, current_price);
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
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
    fn forces_sell_below_threshold() {
        let mut overlay = StopLossOverlay::new("ma_sl", MaCrossAgent::new("ma", 2, 4), 0.05);
        overlay.update_position(Some(100.0), 1.0, Some(90.0));
        let decision = overlay.decide(&bar(0, 90.0), &[]);
        assert_eq!(decision.action, Action::Sell);
        assert_eq!(decision.confidence, 1.0);
        assert!(decision.reason.contains("Stop Loss triggered"));
    }

    #[test]
    fn delegates_when_flat() {
        let mut overlay = StopLossOverlay::new("ma_sl", MaCrossAgent::new("ma", 2, 4), 0.05);
        let history: Vec<Bar> = (0..4).map(|i| bar(i, 100.0)).collect();
        let decision = overlay.decide(&bar(4, 100.0), &history);
        assert_eq!(decision.action, Action::Hold);
    }
}
