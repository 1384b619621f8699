// In crates/events/src/lib.rs

// --- Session Event Structures ---

use chrono::{DateTime, Utc};
use core_types::{HistoryPoint, MarginStatus, MarketScenario, PnlBreakdown};
use rust_decimal::Decimal;
use serde::Serialize;

/// A user-facing notice, e.g. a rejected action.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: String,
}

impl Notice {
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: "WARN".to_string(),
            message: message.into(),
        }
    }
}

/// Emitted after each simulated day.
#[derive(Debug, Clone, Serialize)]
pub struct DayUpdate {
    pub point: HistoryPoint,
    pub time_to_maturity: u32,
    pub pnl: PnlBreakdown,
    pub margin: MarginStatus,
}

/// Emitted when a hedged position is opened.
#[derive(Debug, Clone, Serialize)]
pub struct PositionOpened {
    pub quantity: Decimal,
    pub entry_spot_price: Decimal,
    pub entry_futures_price: Decimal,
    pub cash_after: Decimal,
}

/// Emitted when a position is closed and its value realized into cash.
#[derive(Debug, Clone, Serialize)]
pub struct PositionClosed {
    pub exit_spot_price: Decimal,
    pub exit_futures_price: Decimal,
    pub realized_pnl: Decimal,
    pub cash_after: Decimal,
}

/// Emitted when the margin monitor forces the position flat.
#[derive(Debug, Clone, Serialize)]
pub struct Liquidation {
    pub day: u32,
    pub required_margin: Decimal,
    pub equity: Decimal,
}

/// The top-level session event enum.
/// `tag` and `content` are used by serde for clean JSON representation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum SessionEvent {
    Notice(Notice),
    PositionOpened(PositionOpened),
    DayAdvanced(DayUpdate),
    Liquidated(Liquidation),
    PositionClosed(PositionClosed),
    Matured { day: u32 },
    RunningChanged { running: bool },
    Reset { scenario: MarketScenario },
}
