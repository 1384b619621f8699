// In crates/accounting/src/mark.rs

use core_types::{MarginStatus, PnlBreakdown, SimulationState};
use rust_decimal::Decimal;

/// Values both legs of the hedge at current prices.
///
/// The spot leg is long `spot_position` ounces. The futures leg is short, so
/// it profits when the futures price falls below its entry price. A flat
/// state has zero positions and zero entry prices, which yields zeros.
pub fn mark_to_market(state: &SimulationState) -> PnlBreakdown {
    let spot_pnl = state.spot_position * (state.current_spot_price - state.entry_spot_price);
    let futures_pnl =
        state.futures_position.abs() * (state.entry_futures_price - state.current_futures_price);

    PnlBreakdown {
        spot_pnl,
        futures_pnl,
        total_pnl: spot_pnl + futures_pnl,
    }
}

/// Futures minus spot at current prices.
pub fn current_basis(state: &SimulationState) -> Decimal {
    state.current_futures_price - state.current_spot_price
}

/// Approximate account value: free cash, the capital committed to spot at
/// entry, and the unrealized PnL of both legs.
pub fn total_equity(state: &SimulationState, pnl: &PnlBreakdown) -> Decimal {
    state.cash + state.spot_position * state.entry_spot_price + pnl.total_pnl
}

/// Share of futures-account equity consumed by maintenance margin, clamped
/// to `[0, 1]` for display. A liquidation is due at 1.
pub fn margin_utilization(status: &MarginStatus) -> Decimal {
    if status.required_margin <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if status.equity <= Decimal::ZERO {
        return Decimal::ONE;
    }

    (status.required_margin / status.equity).min(Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn open_state() -> SimulationState {
        SimulationState {
            cash: dec!(50_000),
            spot_position: dec!(25),
            futures_position: dec!(-25),
            entry_spot_price: dec!(2000),
            entry_futures_price: dec!(2050),
            current_spot_price: dec!(2100),
            current_futures_price: dec!(2120),
            ..SimulationState::default()
        }
    }

    #[test]
    fn flat_state_marks_to_zero() {
        let pnl = mark_to_market(&SimulationState::default());

        assert_eq!(pnl, PnlBreakdown::default());
    }

    #[test]
    fn hedged_position_captures_basis_convergence() {
        let pnl = mark_to_market(&open_state());

        // Spot +100/oz, futures short loses 70/oz.
        assert_eq!(pnl.spot_pnl, dec!(2500));
        assert_eq!(pnl.futures_pnl, dec!(-1750));
        assert_eq!(pnl.total_pnl, dec!(750));
        assert_eq!(pnl.total_pnl, pnl.spot_pnl + pnl.futures_pnl);
    }

    #[test]
    fn basis_is_futures_minus_spot() {
        assert_eq!(current_basis(&open_state()), dec!(20));
        assert_eq!(current_basis(&SimulationState::default()), dec!(50));
    }

    #[test]
    fn total_equity_adds_committed_spot_capital() {
        let state = open_state();
        let pnl = mark_to_market(&state);

        assert_eq!(total_equity(&state, &pnl), dec!(100_750));
    }

    #[test]
    fn margin_utilization_is_clamped_for_display() {
        let healthy = MarginStatus {
            required_margin: dec!(5000),
            equity: dec!(50_000),
            is_call: false,
        };
        let breached = MarginStatus {
            required_margin: dec!(6250),
            equity: dec!(3000),
            is_call: true,
        };
        let wiped = MarginStatus {
            required_margin: dec!(6250),
            equity: dec!(-10),
            is_call: true,
        };

        assert_eq!(margin_utilization(&healthy), dec!(0.1));
        assert_eq!(margin_utilization(&breached), Decimal::ONE);
        assert_eq!(margin_utilization(&wiped), Decimal::ONE);
        assert_eq!(margin_utilization(&MarginStatus::default()), Decimal::ZERO);
    }
}
