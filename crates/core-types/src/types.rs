// In crates/core-types/src/types.rs

use crate::{Error, MarketScenario, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INITIAL_CASH: Decimal = dec!(100_000);
pub const DEFAULT_INITIAL_SPOT_PRICE: Decimal = dec!(2000);
pub const DEFAULT_INITIAL_FUTURES_PRICE: Decimal = dec!(2050);
pub const DEFAULT_HORIZON_DAYS: u32 = 90;
pub const DEFAULT_MAINTENANCE_MARGIN_RATIO: Decimal = dec!(0.10);
pub const DEFAULT_LOT_SIZE: Decimal = dec!(25);
pub const DEFAULT_OPENING_BUFFER: Decimal = dec!(1.2);
pub const DEFAULT_MAX_SKIP_ITERATIONS: u32 = 365;

/// The fixed starting conditions of a session.
///
/// Every reset rebuilds the state from these values, so they are the single
/// source of truth for "documented initial values".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    /// The cash endowment at session start.
    pub initial_cash: Decimal,
    /// The spot price at session start.
    pub initial_spot_price: Decimal,
    /// The futures price at session start. The difference to the spot price
    /// is the initial basis the market model converges from.
    pub initial_futures_price: Decimal,
    /// Days until contract expiry at session start.
    pub horizon_days: u32,
    /// Maintenance margin as a fraction of futures notional.
    pub maintenance_margin_ratio: Decimal,
    /// The fixed lot traded by `open_positions`.
    pub lot_size: Decimal,
    /// Multiplier on the spot cost that cash must cover before opening.
    pub opening_buffer: Decimal,
    /// Ceiling on the number of days `skip_to_maturity` may simulate.
    pub max_skip_iterations: u32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            initial_cash: DEFAULT_INITIAL_CASH,
            initial_spot_price: DEFAULT_INITIAL_SPOT_PRICE,
            initial_futures_price: DEFAULT_INITIAL_FUTURES_PRICE,
            horizon_days: DEFAULT_HORIZON_DAYS,
            maintenance_margin_ratio: DEFAULT_MAINTENANCE_MARGIN_RATIO,
            lot_size: DEFAULT_LOT_SIZE,
            opening_buffer: DEFAULT_OPENING_BUFFER,
            max_skip_iterations: DEFAULT_MAX_SKIP_ITERATIONS,
        }
    }
}

impl SessionParams {
    /// The basis at session start.
    pub fn initial_basis(&self) -> Decimal {
        self.initial_futures_price - self.initial_spot_price
    }

    /// Rejects parameter sets the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.initial_cash < Decimal::ZERO {
            return Err(Error::InvalidParameters("initial_cash must not be negative".into()));
        }
        if self.initial_spot_price <= Decimal::ZERO || self.initial_futures_price <= Decimal::ZERO {
            return Err(Error::InvalidParameters("initial prices must be positive".into()));
        }
        if self.horizon_days == 0 {
            return Err(Error::InvalidParameters("horizon_days must be at least 1".into()));
        }
        if self.maintenance_margin_ratio < Decimal::ZERO {
            return Err(Error::InvalidParameters(
                "maintenance_margin_ratio must not be negative".into(),
            ));
        }
        if self.lot_size <= Decimal::ZERO {
            return Err(Error::InvalidParameters("lot_size must be positive".into()));
        }
        if self.opening_buffer < Decimal::ONE {
            return Err(Error::InvalidParameters("opening_buffer must be at least 1".into()));
        }
        Ok(())
    }
}

/// One point on the session's price/PnL curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Days elapsed since session start.
    pub day: u32,
    pub spot: Decimal,
    pub futures: Decimal,
    /// Unrealized PnL of the hedged position; 0 while flat.
    pub pnl: Decimal,
    pub basis: Decimal,
}

/// A pair of marked prices produced by the market model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub spot: Decimal,
    pub futures: Decimal,
}

impl Quote {
    pub fn basis(&self) -> Decimal {
        self.futures - self.spot
    }
}

/// Mark-to-market breakdown of the two legs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PnlBreakdown {
    pub spot_pnl: Decimal,
    pub futures_pnl: Decimal,
    pub total_pnl: Decimal,
}

/// Result of a maintenance margin check on the futures account.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarginStatus {
    pub required_margin: Decimal,
    pub equity: Decimal,
    pub is_call: bool,
}

/// The complete portfolio and market state of one simulator session.
///
/// A state is never edited in place by the engine: every transition builds a
/// new value and swaps it in, so a snapshot handed to a reader is always
/// internally consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub cash: Decimal,
    /// Ounces held long; 0 or the lot size.
    pub spot_position: Decimal,
    /// Signed contract count; negative for the short hedge.
    pub futures_position: Decimal,
    pub entry_spot_price: Decimal,
    pub entry_futures_price: Decimal,
    pub current_spot_price: Decimal,
    pub current_futures_price: Decimal,
    /// Days until expiry.
    pub time_to_maturity: u32,
    pub maintenance_margin_ratio: Decimal,
    pub is_liquidated: bool,
    pub scenario: MarketScenario,
    pub history: Vec<HistoryPoint>,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::initial(&SessionParams::default(), MarketScenario::default())
    }
}

impl SimulationState {
    /// Builds a fresh, flat state from the session parameters.
    pub fn initial(params: &SessionParams, scenario: MarketScenario) -> Self {
        Self {
            cash: params.initial_cash,
            spot_position: Decimal::ZERO,
            futures_position: Decimal::ZERO,
            entry_spot_price: Decimal::ZERO,
            entry_futures_price: Decimal::ZERO,
            current_spot_price: params.initial_spot_price,
            current_futures_price: params.initial_futures_price,
            time_to_maturity: params.horizon_days,
            maintenance_margin_ratio: params.maintenance_margin_ratio,
            is_liquidated: false,
            scenario,
            history: Vec::new(),
        }
    }

    pub fn has_open_position(&self) -> bool {
        !self.spot_position.is_zero()
    }

    pub fn is_expired(&self) -> bool {
        self.time_to_maturity == 0
    }

    /// True once no further day may be simulated.
    pub fn is_terminal(&self) -> bool {
        self.is_expired() || self.is_liquidated
    }

    pub fn current_quote(&self) -> Quote {
        Quote {
            spot: self.current_spot_price,
            futures: self.current_futures_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_matches_session_defaults() {
        let state = SimulationState::default();

        assert_eq!(state.cash, dec!(100_000));
        assert_eq!(state.spot_position, Decimal::ZERO);
        assert_eq!(state.futures_position, Decimal::ZERO);
        assert_eq!(state.entry_spot_price, Decimal::ZERO);
        assert_eq!(state.entry_futures_price, Decimal::ZERO);
        assert_eq!(state.current_spot_price, dec!(2000));
        assert_eq!(state.current_futures_price, dec!(2050));
        assert_eq!(state.time_to_maturity, 90);
        assert_eq!(state.maintenance_margin_ratio, dec!(0.10));
        assert!(!state.is_liquidated);
        assert_eq!(state.scenario, MarketScenario::Normal);
        assert!(state.history.is_empty());
        assert!(!state.is_terminal());
    }

    #[test]
    fn initial_basis_is_futures_minus_spot() {
        assert_eq!(SessionParams::default().initial_basis(), dec!(50));
    }

    #[test]
    fn validate_rejects_zero_horizon_and_small_buffer() {
        let params = SessionParams {
            horizon_days: 0,
            ..SessionParams::default()
        };
        assert!(params.validate().is_err());

        let params = SessionParams {
            opening_buffer: dec!(0.9),
            ..SessionParams::default()
        };
        assert!(params.validate().is_err());

        assert!(SessionParams::default().validate().is_ok());
    }

    #[test]
    fn terminal_when_expired_or_liquidated() {
        let expired = SimulationState {
            time_to_maturity: 0,
            ..SimulationState::default()
        };
        let liquidated = SimulationState {
            is_liquidated: true,
            ..SimulationState::default()
        };

        assert!(expired.is_terminal());
        assert!(liquidated.is_terminal());
    }
}
