use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Buy,
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Step function of the absolute 5-minute change: below 1.2 is low,
    /// below 2.5 is medium, anything else is high.
    pub fn from_change(change_pct: f64) -> Self {
        let magnitude = change_pct.abs();
        if magnitude < 1.2 {
            Self::Low
        } else if magnitude < 2.5 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "🟢 Low",
            Self::Medium => "🟡 Medium",
            Self::High => "🔴 High",
        }
    }
}

/// Half-open wall-clock window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} — {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub base_symbol: String,
    pub quote_symbol: String,
    pub exchange: String,
    pub chain: String,
    pub price: f64,
    pub target_price: f64,
    pub profit_pct: f64,
    pub risk: RiskLevel,
    pub url: String,
    pub buy_window: TimeWindow,
    pub sell_window: TimeWindow,
}
