use crate::agents::traits::Agent;
use crate::domain::{Action, Bar, TradingDecision};

/// Extends the stop-loss behavior with a trailing exit from the
/// highest price seen since entry. Stop-loss is checked first; the
/// trailing check only fires if the stop loss did not.
pub struct TrailingStopOverlay<A: Agent> {
    id: String,
    inner: A,
    stop_loss_pct: f64,
    trailing_pct: f64,
    entry_price: Option<f64>,
    position_size: f64,
    highest_price: Option<f64>,
}

impl<A: Agent> TrailingStopOverlay<A> {
    pub fn new(id: impl Into<String>, inner: A, stop_loss_pct: f64, trailing_pct: f64) -> Self {
        Self {
            id: id.into(),
            inner,
            stop_loss_pct,
            trailing_pct,
            entry_price: None,
            position_size: 0.0,
            highest_price: None,
        }
    }

    fn forced_sell(&mut self, current: &Bar, reason: String) -> TradingDecision {
        self.entry_price = None;
        self.highest_price = None;
        TradingDecision {
            agent_id: self.id.clone(),
            timestamp: current.timestamp,
            action: Action::Sell,
            confidence: 1.0,
            price: current.price,
            reason,
            predicted_price: None,
        }
    }
}

impl<A: Agent> Agent for TrailingStopOverlay<A> {
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
                    return self.forced_sell(current, reason);
                }
            }

            self.highest_price = Some(match self.highest_price {
                Some(high) => high.max(current.price),
                None => current.price,
            });

            if let (Some(entry), Some(high)) = (self.entry_price, self.highest_price) {
                let decline_pct = (current.price - high) / high;
                if decline_pct <= -self.trailing_pct {
                    let realized_pct = (current.price - entry) / entry * 100.0;
                    let reason = format!(
                        "Trailing Stop triggered: {:.4}% decline from high ${high:.2} (entry: ${entry:.2}, current: ${:.2}, realized: {realized_pct:.2}%)",
                        decline_pct * 100.0,
                        current.price
                    );
                    return self.forced_sell(current, reason);
                }
            }
        }

        let decision = self.inner.decide(current, history);
        match decision.action {
            Action::Buy if self.highest_price.is_none() => {
                self.highest_price = Some(current.price);
            }
            Action::Sell => {
                self.entry_price = None;
                self.highest_price = None;
            }
            _ => {}
        }
        decision
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
    fn scenario_six_trailing_stop_fires() {
        // Enter at 100, high reaches 120, price drops to 113.99 with trailing_pct=0.05.
        let mut overlay = TrailingStopOverlay::new("ma_ts", MaCrossAgent::new("ma", 2, 4), 1.0, 0.05);
        overlay.update_position(Some(100.0), 1.0, Some(100.0));
        // Walk the high up first.
        for (i, price) in [105.0, 110.0, 115.0, 120.0].into_iter().enumerate() {
            let decision = overlay.decide(&bar(i as i64, price), &[]);
            assert_eq!(decision.action, Action::Hold);
            overlay.update_position(Some(100.0), 1.0, Some(price));
        }
        let decision = overlay.decide(&bar(5, 113.99), &[]);
        assert_eq!(decision.action, Action::Sell);
        assert!(decision.reason.contains("Trailing Stop triggered"));
        assert!(decision.reason.contains("120"));
    }
}
