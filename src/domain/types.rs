//! Immutable value types for bars, decisions, and simulated orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single time-indexed price observation.
///
/// Ordering and equality are by timestamp only, matching the replay
/// contract: two bars at the same instant are interchangeable for
/// sequencing purposes even if OHLCV fields differ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub volume: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub open: Option<f64>,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self {
            timestamp,
            price,
            volume: None,
            high: None,
            low: None,
            open: None,
        }
    }
}

impl Eq for Bar {}

impl PartialOrd for Bar {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bar {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.timestamp.cmp(&other.timestamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Executed,
    Failed,
    Cancelled,
}

/// A decision produced by an agent for a single bar. Always produced,
/// even for HOLD — agents are total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingDecision {
    pub agent_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: Action,
    pub confidence: f64,
    pub price: f64,
    pub reason: String,
    pub predicted_price: Option<f64>,
}

impl TradingDecision {
    pub fn hold(agent_id: impl Into<String>, timestamp: DateTime<Utc>, price: f64, reason: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            timestamp,
            action: Action::Hold,
            confidence: 0.5,
            price,
            reason: reason.into(),
            predicted_price: None,
        }
    }

    pub fn insufficient_history(agent_id: impl Into<String>, timestamp: DateTime<Utc>, price: f64) -> Self {
        Self::hold(agent_id, timestamp, price, "Insufficient historical data")
    }
}

/// A simulated fill. Produced by the simulator on every non-HOLD
/// decision that clears the fill-model preconditions; a decision
/// whose preconditions fail (insufficient funds/holdings) produces no
/// order at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub agent_id: String,
    pub action: Action,
    pub amount: f64,
    pub decision_price: f64,
    pub decision_timestamp: DateTime<Utc>,
    pub status: OrderStatus,
    pub trader_id: String,
    pub execution_price: Option<f64>,
    pub execution_timestamp: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl Order {
    pub fn executed(
        id: impl Into<String>,
        agent_id: impl Into<String>,
        action: Action,
        amount: f64,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            agent_id: agent_id.into(),
            action,
            amount,
            decision_price: price,
            decision_timestamp: timestamp,
            status: OrderStatus::Executed,
            trader_id: "simulator".to_string(),
            execution_price: Some(price),
            execution_timestamp: Some(timestamp),
            error_message: None,
        }
    }
}
