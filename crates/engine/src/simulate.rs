// In crates/engine/src/simulate.rs

use core_types::{HistoryPoint, MarginStatus, PnlBreakdown, SimulationState};
use market::MarketModel;
use rand::RngCore;
use risk::MarginMonitor;
use rust_decimal::Decimal;

/// Everything one simulated day produced.
#[derive(Debug, Clone)]
pub struct DayStep {
    /// The state after the day, liquidation already applied.
    pub state: SimulationState,
    /// Mark-to-market of the position at the new prices, before liquidation.
    pub pnl: PnlBreakdown,
    pub margin: MarginStatus,
    /// True if this day triggered the margin call.
    pub liquidated: bool,
}

impl DayStep {
    /// The snapshot this day appended to history.
    pub fn point(&self) -> Option<&HistoryPoint> {
        self.state.history.last()
    }
}

/// Advances `prev` by one day.
///
/// The pipeline is: new prices from the market model, mark-to-market, one
/// day off the clock, a history snapshot, then the margin check. A margin
/// call flattens the account in the returned state: cash, positions and
/// entry prices drop to zero and `is_liquidated` is set.
///
/// The caller must not pass a terminal state.
pub fn simulate_day(
    prev: &SimulationState,
    market: &MarketModel,
    monitor: &dyn MarginMonitor,
    rng: &mut dyn RngCore,
) -> DayStep {
    // --- 1. Market move ---
    let quote = market.next_prices(prev, rng);
    let day = market.next_day_number(prev.time_to_maturity);

    let mut next = prev.clone();
    next.current_spot_price = quote.spot;
    next.current_futures_price = quote.futures;
    next.time_to_maturity = prev.time_to_maturity.saturating_sub(1);

    // --- 2. Mark-to-market & snapshot ---
    let pnl = accounting::mark_to_market(&next);
    let recorded_pnl = if prev.has_open_position() {
        pnl.total_pnl
    } else {
        Decimal::ZERO
    };
    next.history.push(HistoryPoint {
        day,
        spot: quote.spot,
        futures: quote.futures,
        pnl: recorded_pnl,
        basis: quote.basis(),
    });

    // --- 3. Margin check ---
    let margin = monitor.check_margin(&next, pnl.futures_pnl);
    let liquidated = margin.is_call && !next.is_liquidated;
    if liquidated {
        next.is_liquidated = true;
        next.cash = Decimal::ZERO;
        next.spot_position = Decimal::ZERO;
        next.futures_position = Decimal::ZERO;
        next.entry_spot_price = Decimal::ZERO;
        next.entry_futures_price = Decimal::ZERO;
    }

    DayStep {
        state: next,
        pnl,
        margin,
        liquidated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{MarketScenario, SessionParams};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use risk::MaintenanceMarginMonitor;
    use rust_decimal_macros::dec;

    fn open_state(scenario: MarketScenario) -> SimulationState {
        SimulationState {
            cash: dec!(50_000),
            spot_position: dec!(25),
            futures_position: dec!(-25),
            entry_spot_price: dec!(2000),
            entry_futures_price: dec!(2050),
            scenario,
            ..SimulationState::default()
        }
    }

    #[test]
    fn flat_day_records_zero_pnl_and_moves_clock() {
        let market = MarketModel::from_params(&SessionParams::default());
        let monitor = MaintenanceMarginMonitor::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let prev = SimulationState::default();

        let step = simulate_day(&prev, &market, &monitor, &mut rng);

        assert_eq!(step.state.time_to_maturity, 89);
        assert_eq!(step.state.history.len(), 1);
        let point = step.point().unwrap();
        assert_eq!(point.day, 1);
        assert_eq!(point.pnl, Decimal::ZERO);
        assert_eq!(point.basis, point.futures - point.spot);
        assert!(!step.liquidated);
        assert_eq!(step.state.cash, prev.cash);
    }

    #[test]
    fn open_day_records_total_pnl() {
        let market = MarketModel::from_params(&SessionParams::default());
        let monitor = MaintenanceMarginMonitor::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let step = simulate_day(&open_state(MarketScenario::Normal), &market, &monitor, &mut rng);

        assert_eq!(step.point().unwrap().pnl, step.pnl.total_pnl);
        assert_eq!(step.pnl.total_pnl, step.pnl.spot_pnl + step.pnl.futures_pnl);
        assert_eq!(step.state.futures_position, -step.state.spot_position);
    }

    #[test]
    fn final_day_settles_futures_at_spot() {
        let market = MarketModel::from_params(&SessionParams::default());
        let monitor = MaintenanceMarginMonitor::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for scenario in MarketScenario::ALL {
            let prev = SimulationState {
                time_to_maturity: 1,
                ..open_state(scenario)
            };

            let step = simulate_day(&prev, &market, &monitor, &mut rng);

            assert_eq!(step.state.current_futures_price, step.state.current_spot_price);
            assert_eq!(step.state.time_to_maturity, 0);
            assert_eq!(step.point().unwrap().basis, Decimal::ZERO);
        }
    }

    #[test]
    fn margin_call_flattens_the_account_in_one_step() {
        let market = MarketModel::from_params(&SessionParams::default());
        let monitor = MaintenanceMarginMonitor::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        // Cash so thin that even a favourable futures move cannot cover margin.
        let prev = SimulationState {
            cash: dec!(100),
            ..open_state(MarketScenario::Normal)
        };

        let step = simulate_day(&prev, &market, &monitor, &mut rng);

        assert!(step.liquidated);
        assert!(step.margin.is_call);
        assert!(step.state.is_liquidated);
        assert_eq!(step.state.cash, Decimal::ZERO);
        assert_eq!(step.state.spot_position, Decimal::ZERO);
        assert_eq!(step.state.futures_position, Decimal::ZERO);
        assert_eq!(step.state.entry_spot_price, Decimal::ZERO);
        assert_eq!(step.state.entry_futures_price, Decimal::ZERO);
        assert_eq!(step.state.history.len(), 1);
    }
}
