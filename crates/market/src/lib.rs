// In crates/market/src/lib.rs

use core_types::{MarketScenario, Quote, SessionParams, SimulationState};
use num_traits::FromPrimitive;
use rand::RngCore;
use rust_decimal::Decimal;

pub mod bear_crash;
pub mod bull_run;
pub mod factory;
pub mod high_volatility;
pub mod normal;

pub use factory::model_for;

/// Decimal places kept on generated prices.
pub const PRICE_SCALE: u32 = 6;

/// The universal interface for a market scenario.
///
/// A scenario decides how far the spot price moves in one simulated day and
/// how the futures basis is pushed away from its ideal convergence path.
/// Implementations are stateless; all randomness comes from the generator
/// passed in, so a seeded generator reproduces a price path exactly.
pub trait ScenarioModel: Send + Sync {
    /// The scenario this model implements.
    fn scenario(&self) -> MarketScenario;

    /// Width of the uniform noise added to the basis each day.
    fn volatility(&self) -> f64;

    /// Samples the fractional spot return for one day (0.01 = +1%).
    fn daily_return(&self, rng: &mut dyn RngCore) -> f64;

    /// Offset added to the target basis for one day.
    fn basis_bias(&self, _rng: &mut dyn RngCore) -> f64 {
        0.0
    }
}

/// Generates the next day's spot and futures prices.
///
/// The futures price tracks spot plus a basis that shrinks linearly from the
/// initial basis to zero over the contract horizon. On the last day before
/// expiry the futures price is pinned to spot.
#[derive(Debug, Clone)]
pub struct MarketModel {
    horizon_days: u32,
    initial_basis: Decimal,
}

impl MarketModel {
    pub fn new(horizon_days: u32, initial_basis: Decimal) -> Self {
        Self {
            horizon_days: horizon_days.max(1),
            initial_basis,
        }
    }

    pub fn from_params(params: &SessionParams) -> Self {
        Self::new(params.horizon_days, params.initial_basis())
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// The day number the next simulated step lands on.
    pub fn next_day_number(&self, time_to_maturity: u32) -> u32 {
        self.horizon_days.saturating_sub(time_to_maturity) + 1
    }

    /// The ideal basis for a given day, before scenario bias and noise.
    pub fn target_basis(&self, day: u32) -> Decimal {
        let progress = Decimal::from(day) / Decimal::from(self.horizon_days);
        self.initial_basis * (Decimal::ONE - progress)
    }

    /// Produces the marked prices for the day after `state`.
    ///
    /// # Arguments
    ///
    /// * `state`: The current session state. Only the spot price, time to
    ///   maturity and scenario are read.
    /// * `rng`: The random source. Draw order is spot return, basis bias,
    ///   basis noise.
    pub fn next_prices(&self, state: &SimulationState, rng: &mut dyn RngCore) -> Quote {
        let model = model_for(state.scenario);

        // --- 1. Spot move ---
        let daily_return = to_decimal(model.daily_return(rng));
        let spot = (state.current_spot_price * (Decimal::ONE + daily_return)).round_dp(PRICE_SCALE);

        // --- 2. Basis convergence ---
        let day = self.next_day_number(state.time_to_maturity);
        let target = self.target_basis(day) + to_decimal(model.basis_bias(rng));
        let noise = to_decimal(uniform_centered(rng, model.volatility()));
        let mut futures = (spot + target + noise).round_dp(PRICE_SCALE);

        // --- 3. Settlement ---
        if state.time_to_maturity <= 1 {
            futures = spot;
        }

        tracing::trace!(
            scenario = %state.scenario,
            day,
            %spot,
            %futures,
            "Generated next day prices."
        );

        Quote { spot, futures }
    }
}

/// Samples uniformly from `[-width / 2, width / 2)`.
pub(crate) fn uniform_centered(rng: &mut dyn RngCore, width: f64) -> f64 {
    (unit(rng) - 0.5) * width
}

/// Samples uniformly from `[0, 1)`.
pub(crate) fn unit(rng: &mut dyn RngCore) -> f64 {
    use rand::Rng;
    rng.gen_range(0.0..1.0)
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rust_decimal_macros::dec;

    fn state_with(scenario: MarketScenario, time_to_maturity: u32) -> SimulationState {
        SimulationState {
            scenario,
            time_to_maturity,
            ..SimulationState::default()
        }
    }

    #[test]
    fn target_basis_converges_linearly_to_zero() {
        let model = MarketModel::new(90, dec!(50));

        assert_eq!(model.target_basis(0), dec!(50));
        assert_eq!(model.target_basis(45), dec!(25));
        assert_eq!(model.target_basis(90), Decimal::ZERO);
    }

    #[test]
    fn next_day_number_counts_from_horizon() {
        let model = MarketModel::new(90, dec!(50));

        assert_eq!(model.next_day_number(90), 1);
        assert_eq!(model.next_day_number(1), 90);
    }

    #[test]
    fn last_day_forces_exact_convergence_in_every_scenario() {
        let model = MarketModel::new(90, dec!(50));
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for scenario in MarketScenario::ALL {
            for ttm in [1, 0] {
                let quote = model.next_prices(&state_with(scenario, ttm), &mut rng);
                assert_eq!(quote.futures, quote.spot, "{scenario} at ttm {ttm}");
            }
        }
    }

    #[test]
    fn seeded_generators_produce_identical_paths() {
        let model = MarketModel::new(90, dec!(50));
        let state = state_with(MarketScenario::HighVolatility, 60);
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);

        let path_a: Vec<Quote> = (0..10).map(|_| model.next_prices(&state, &mut rng_a)).collect();
        let path_b: Vec<Quote> = (0..10).map(|_| model.next_prices(&state, &mut rng_b)).collect();

        assert_eq!(path_a, path_b);
    }

    #[test]
    fn normal_basis_stays_near_target_before_expiry() {
        let model = MarketModel::new(90, dec!(50));
        let state = state_with(MarketScenario::Normal, 90);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..200 {
            let quote = model.next_prices(&state, &mut rng);
            let deviation = (quote.basis() - model.target_basis(1)).abs();
            // Normal noise is uniform over +/- 2.5.
            assert!(deviation <= dec!(2.5), "basis {} too far from target", quote.basis());
        }
    }

    #[test]
    fn bull_run_basis_carries_premium() {
        let model = MarketModel::new(90, dec!(50));
        let state = state_with(MarketScenario::BullRun, 45);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let target = model.target_basis(model.next_day_number(45));

        for _ in 0..200 {
            let quote = model.next_prices(&state, &mut rng);
            // +5 bias with noise of +/- 5 never drops below target.
            assert!(quote.basis() >= target);
        }
    }
}
