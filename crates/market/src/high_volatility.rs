// In crates/market/src/high_volatility.rs

use crate::{uniform_centered, ScenarioModel};
use core_types::MarketScenario;
use rand::RngCore;

/// Large two-way swings of up to +/-2% a day.
///
/// The basis target itself jitters by up to +/-10 on top of the daily noise,
/// so the spread can briefly invert before expiry.
#[derive(Debug, Default, Clone, Copy)]
pub struct HighVolatility;

impl ScenarioModel for HighVolatility {
    fn scenario(&self) -> MarketScenario {
        MarketScenario::HighVolatility
    }

    fn volatility(&self) -> f64 {
        30.0
    }

    fn daily_return(&self, rng: &mut dyn RngCore) -> f64 {
        uniform_centered(rng, 0.04)
    }

    fn basis_bias(&self, rng: &mut dyn RngCore) -> f64 {
        uniform_centered(rng, 20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::HighVolatility;
    use crate::ScenarioModel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn returns_and_bias_stay_within_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut saw_up = false;
        let mut saw_down = false;

        for _ in 0..1_000 {
            let sample = HighVolatility.daily_return(&mut rng);
            assert!((-0.02..0.02).contains(&sample));
            saw_up |= sample > 0.0;
            saw_down |= sample < 0.0;

            let bias = HighVolatility.basis_bias(&mut rng);
            assert!((-10.0..10.0).contains(&bias));
        }

        assert!(saw_up && saw_down);
    }
}
