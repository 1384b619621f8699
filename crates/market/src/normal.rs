// In crates/market/src/normal.rs

use crate::{unit, ScenarioModel};
use core_types::MarketScenario;
use rand::RngCore;

/// Quiet market with a slight upward drift.
///
/// Daily returns are uniform over `[-0.225%, +0.275%)`: the unit draw is
/// shifted by 0.45 instead of 0.5 before scaling by 0.5%.
#[derive(Debug, Default, Clone, Copy)]
pub struct Normal;

impl ScenarioModel for Normal {
    fn scenario(&self) -> MarketScenario {
        MarketScenario::Normal
    }

    fn volatility(&self) -> f64 {
        5.0
    }

    fn daily_return(&self, rng: &mut dyn RngCore) -> f64 {
        (unit(rng) - 0.45) * 0.005
    }
}
