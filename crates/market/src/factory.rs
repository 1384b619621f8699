// In crates/market/src/factory.rs

use crate::{
    ScenarioModel, bear_crash::BearCrash, bull_run::BullRun, high_volatility::HighVolatility,
    normal::Normal,
};
use core_types::MarketScenario;

static NORMAL: Normal = Normal;
static BULL_RUN: BullRun = BullRun;
static BEAR_CRASH: BearCrash = BearCrash;
static HIGH_VOLATILITY: HighVolatility = HighVolatility;

/// Resolves the price-generation strategy for a scenario.
pub fn model_for(scenario: MarketScenario) -> &'static dyn ScenarioModel {
    match scenario {
        MarketScenario::Normal => &NORMAL,
        MarketScenario::BullRun => &BULL_RUN,
        MarketScenario::BearCrash => &BEAR_CRASH,
        MarketScenario::HighVolatility => &HIGH_VOLATILITY,
    }
}

#[cfg(test)]
mod tests {
    use super::model_for;
    use core_types::MarketScenario;

    #[test]
    fn every_scenario_resolves_to_its_own_model() {
        for scenario in MarketScenario::ALL {
            assert_eq!(model_for(scenario).scenario(), scenario);
        }
    }

    #[test]
    fn volatility_grows_with_scenario_stress() {
        assert_eq!(model_for(MarketScenario::Normal).volatility(), 5.0);
        assert_eq!(model_for(MarketScenario::BullRun).volatility(), 10.0);
        assert_eq!(model_for(MarketScenario::BearCrash).volatility(), 15.0);
        assert_eq!(model_for(MarketScenario::HighVolatility).volatility(), 30.0);
    }
}
