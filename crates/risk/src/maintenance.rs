// In crates/risk/src/maintenance.rs

use crate::types::MarginSettings;
use crate::{Error, MarginMonitor, Result};
use core_types::{MarginStatus, SimulationState};
use rust_decimal::Decimal;

/// A margin monitor with a flat maintenance ratio and a hard cutoff.
///
/// This monitor implements two rules:
/// 1. An open is vetoed unless cash covers the spot cost plus a fixed buffer.
/// 2. An open futures position is called the moment equity drops below
///    `|position| * futures price * maintenance ratio`. There is no grace
///    period and no partial liquidation.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceMarginMonitor {
    settings: MarginSettings,
}

impl MaintenanceMarginMonitor {
    pub fn new(settings: MarginSettings) -> Result<Self> {
        if settings.opening_buffer < Decimal::ONE {
            return Err(Error::InvalidParameters(format!(
                "opening_buffer ({}) must be at least 1",
                settings.opening_buffer
            )));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &MarginSettings {
        &self.settings
    }
}

impl MarginMonitor for MaintenanceMarginMonitor {
    fn name(&self) -> &'static str {
        "MaintenanceMarginMonitor"
    }

    fn check_margin(&self, state: &SimulationState, futures_pnl: Decimal) -> MarginStatus {
        let notional = state.futures_position.abs() * state.current_futures_price;
        let required_margin = notional * state.maintenance_margin_ratio;
        let equity = state.cash + futures_pnl;
        let is_call = !state.futures_position.is_zero() && equity < required_margin;

        if is_call {
            tracing::debug!(%required_margin, %equity, "Maintenance margin breached.");
        }

        MarginStatus {
            required_margin,
            equity,
            is_call,
        }
    }

    fn check_open(&self, cash: Decimal, spot_cost: Decimal) -> Result<()> {
        let required = spot_cost * self.settings.opening_buffer;
        if cash < required {
            return Err(Error::Vetoed {
                reason: format!(
                    "Insufficient funds to open a safe position: need {required:.2} including margin buffer, have {cash:.2}"
                ),
                required,
                available: cash,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn short_state(cash: Decimal) -> SimulationState {
        SimulationState {
            cash,
            spot_position: dec!(25),
            futures_position: dec!(-25),
            entry_spot_price: dec!(2000),
            entry_futures_price: dec!(2050),
            current_futures_price: dec!(2500),
            maintenance_margin_ratio: dec!(0.1),
            ..SimulationState::default()
        }
    }

    #[test]
    fn required_margin_is_ratio_of_futures_notional() {
        let monitor = MaintenanceMarginMonitor::default();
        let status = monitor.check_margin(&short_state(dec!(50_000)), dec!(-11_250));

        assert_eq!(status.required_margin, dec!(6250));
        assert_eq!(status.equity, dec!(38_750));
        assert!(!status.is_call);
    }

    #[test]
    fn equity_below_requirement_is_a_call() {
        let monitor = MaintenanceMarginMonitor::default();
        let status = monitor.check_margin(&short_state(dec!(17_000)), dec!(-11_250));

        assert_eq!(status.equity, dec!(5750));
        assert!(status.is_call);
    }

    #[test]
    fn equity_exactly_at_requirement_is_not_a_call() {
        let monitor = MaintenanceMarginMonitor::default();
        let status = monitor.check_margin(&short_state(dec!(17_500)), dec!(-11_250));

        assert_eq!(status.equity, status.required_margin);
        assert!(!status.is_call);
    }

    #[test]
    fn flat_account_is_never_called() {
        let monitor = MaintenanceMarginMonitor::default();
        let state = SimulationState {
            cash: Decimal::ZERO,
            ..SimulationState::default()
        };

        let status = monitor.check_margin(&state, Decimal::ZERO);

        assert_eq!(status.required_margin, Decimal::ZERO);
        assert!(!status.is_call);
    }

    #[test]
    fn open_requires_twenty_percent_buffer() {
        let monitor = MaintenanceMarginMonitor::default();

        assert!(monitor.check_open(dec!(60_000), dec!(50_000)).is_ok());

        let err = monitor.check_open(dec!(59_999.99), dec!(50_000)).unwrap_err();
        match err {
            Error::Vetoed {
                required,
                available,
                ..
            } => {
                assert_eq!(required, dec!(60_000));
                assert_eq!(available, dec!(59_999.99));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_buffer_below_one() {
        let settings = MarginSettings {
            opening_buffer: dec!(0.5),
        };

        assert!(MaintenanceMarginMonitor::new(settings).is_err());
    }
}
