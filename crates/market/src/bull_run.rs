// In crates/market/src/bull_run.rs

use crate::{unit, ScenarioModel};
use core_types::MarketScenario;
use rand::RngCore;

/// One-way rally: every day closes flat or higher, by up to 1.5%.
///
/// The futures trade at a +5 premium over the convergence path, which is
/// what squeezes the short leg's margin.
#[derive(Debug, Default, Clone, Copy)]
pub struct BullRun;

impl ScenarioModel for BullRun {
    fn scenario(&self) -> MarketScenario {
        MarketScenario::BullRun
    }

    fn volatility(&self) -> f64 {
        10.0
    }

    fn daily_return(&self, rng: &mut dyn RngCore) -> f64 {
        unit(rng) * 0.015
    }

    fn basis_bias(&self, _rng: &mut dyn RngCore) -> f64 {
        5.0
    }
}
