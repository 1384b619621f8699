// In crates/accounting/src/summary.rs

use crate::mark::{current_basis, mark_to_market, total_equity};
use core_types::{MarketScenario, SessionParams, SimulationState};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// A report of how a session played out, built from its final state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub scenario: MarketScenario,
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub position_open: bool,
    pub is_liquidated: bool,
    pub final_spot_price: Decimal,
    pub final_futures_price: Decimal,
    pub final_basis: Decimal,
    pub cash: Decimal,
    pub equity: Decimal,
    /// Equity gained or lost against the starting endowment.
    pub net_pnl_absolute: Decimal,
    pub net_pnl_percentage: f64,
    /// Highest and lowest unrealized PnL recorded in history.
    pub best_pnl: Decimal,
    pub worst_pnl: Decimal,
    /// Largest peak-to-trough fall of the recorded PnL curve.
    pub max_drawdown: Decimal,
    pub history_len: usize,
}

impl SessionSummary {
    pub fn from_state(state: &SimulationState, params: &SessionParams) -> Self {
        let pnl = mark_to_market(state);
        let equity = total_equity(state, &pnl);
        let net_pnl_absolute = equity - params.initial_cash;

        let net_pnl_percentage = if params.initial_cash > dec!(0) {
            (net_pnl_absolute / params.initial_cash).to_f64().unwrap_or(0.0) * 100.0
        } else {
            0.0
        };

        // --- PnL curve statistics ---
        let mut best_pnl = Decimal::ZERO;
        let mut worst_pnl = Decimal::ZERO;
        let mut peak = Decimal::ZERO;
        let mut max_drawdown = Decimal::ZERO;
        for point in &state.history {
            best_pnl = best_pnl.max(point.pnl);
            worst_pnl = worst_pnl.min(point.pnl);
            peak = peak.max(point.pnl);
            max_drawdown = max_drawdown.max(peak - point.pnl);
        }

        Self {
            scenario: state.scenario,
            days_elapsed: params.horizon_days.saturating_sub(state.time_to_maturity),
            days_remaining: state.time_to_maturity,
            position_open: state.has_open_position(),
            is_liquidated: state.is_liquidated,
            final_spot_price: state.current_spot_price,
            final_futures_price: state.current_futures_price,
            final_basis: current_basis(state),
            cash: state.cash,
            equity,
            net_pnl_absolute,
            net_pnl_percentage,
            best_pnl,
            worst_pnl,
            max_drawdown,
            history_len: state.history.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::HistoryPoint;

    fn point(day: u32, pnl: Decimal) -> HistoryPoint {
        HistoryPoint {
            day,
            spot: dec!(2000),
            futures: dec!(2000),
            pnl,
            basis: Decimal::ZERO,
        }
    }

    #[test]
    fn fresh_session_reports_nothing_happened() {
        let params = SessionParams::default();
        let summary = SessionSummary::from_state(&SimulationState::default(), &params);

        assert_eq!(summary.days_elapsed, 0);
        assert_eq!(summary.days_remaining, 90);
        assert_eq!(summary.net_pnl_absolute, Decimal::ZERO);
        assert_eq!(summary.net_pnl_percentage, 0.0);
        assert_eq!(summary.final_basis, dec!(50));
        assert_eq!(summary.history_len, 0);
    }

    #[test]
    fn closed_session_reports_realized_result_and_drawdown() {
        let params = SessionParams::default();
        let state = SimulationState {
            cash: dec!(101_250),
            time_to_maturity: 0,
            current_spot_price: dec!(2040),
            current_futures_price: dec!(2040),
            history: vec![
                point(0, dec!(0)),
                point(1, dec!(400)),
                point(2, dec!(-200)),
                point(3, dec!(1250)),
            ],
            ..SimulationState::default()
        };

        let summary = SessionSummary::from_state(&state, &params);

        assert_eq!(summary.days_elapsed, 90);
        assert_eq!(summary.net_pnl_absolute, dec!(1250));
        assert!((summary.net_pnl_percentage - 1.25).abs() < 1e-9);
        assert_eq!(summary.best_pnl, dec!(1250));
        assert_eq!(summary.worst_pnl, dec!(-200));
        assert_eq!(summary.max_drawdown, dec!(600));
        assert_eq!(summary.final_basis, Decimal::ZERO);
        assert!(!summary.position_open);
    }

    #[test]
    fn liquidated_session_loses_whole_endowment() {
        let params = SessionParams::default();
        let state = SimulationState {
            cash: Decimal::ZERO,
            is_liquidated: true,
            ..SimulationState::default()
        };

        let summary = SessionSummary::from_state(&state, &params);

        assert!(summary.is_liquidated);
        assert_eq!(summary.net_pnl_absolute, dec!(-100_000));
        assert_eq!(summary.net_pnl_percentage, -100.0);
    }
}
