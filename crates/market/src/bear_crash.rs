// In crates/market/src/bear_crash.rs

use crate::{unit, ScenarioModel};
use core_types::MarketScenario;
use rand::RngCore;

/// One-way sell-off: every day closes flat or lower, by up to 1.5%.
#[derive(Debug, Default, Clone, Copy)]
pub struct BearCrash;

impl ScenarioModel for BearCrash {
    fn scenario(&self) -> MarketScenario {
        MarketScenario::BearCrash
    }

    fn volatility(&self) -> f64 {
        15.0
    }

    fn daily_return(&self, rng: &mut dyn RngCore) -> f64 {
        -(unit(rng) * 0.015)
    }

    fn basis_bias(&self, _rng: &mut dyn RngCore) -> f64 {
        -5.0
    }
}
