// In crates/core-types/src/scenario.rs

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of market regimes a session can be simulated under.
///
/// Each variant selects the drift, volatility and basis bias used by the
/// market model. The serialized form matches the labels shown to students
/// (`NORMAL`, `BULL_RUN`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketScenario {
    /// Mild upward drift, basis converges cleanly.
    #[default]
    Normal,
    /// Relentless rally; the short futures leg bleeds margin.
    BullRun,
    /// Steady sell-off; capital shrinks but the hedge pays.
    BearCrash,
    /// Large two-way moves and a noisy basis.
    HighVolatility,
}

impl MarketScenario {
    pub const ALL: [MarketScenario; 4] = [
        MarketScenario::Normal,
        MarketScenario::BullRun,
        MarketScenario::BearCrash,
        MarketScenario::HighVolatility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::BullRun => "BULL_RUN",
            Self::BearCrash => "BEAR_CRASH",
            Self::HighVolatility => "HIGH_VOLATILITY",
        }
    }

    /// A short human description, used by the CLI and tutor prompts.
    pub fn description(self) -> &'static str {
        match self {
            Self::Normal => "standard market, basis reverts to zero",
            Self::BullRun => "one-way bull market, margin pressure on the short leg",
            Self::BearCrash => "one-way bear market, shrinking capital",
            Self::HighVolatility => "high volatility, oscillating basis",
        }
    }
}

impl fmt::Display for MarketScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketScenario {
    type Err = Error;

    /// Accepts the canonical label as well as kebab/snake lower-case forms
    /// (`bull-run`, `bull_run`).
    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "NORMAL" => Ok(Self::Normal),
            "BULL_RUN" => Ok(Self::BullRun),
            "BEAR_CRASH" => Ok(Self::BearCrash),
            "HIGH_VOLATILITY" => Ok(Self::HighVolatility),
            _ => Err(Error::UnknownScenario(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MarketScenario;
    use crate::Error;

    #[test]
    fn parses_canonical_and_cli_spellings() {
        assert_eq!("NORMAL".parse::<MarketScenario>(), Ok(MarketScenario::Normal));
        assert_eq!("bull-run".parse::<MarketScenario>(), Ok(MarketScenario::BullRun));
        assert_eq!("bear_crash".parse::<MarketScenario>(), Ok(MarketScenario::BearCrash));
        assert_eq!(
            " High-Volatility ".parse::<MarketScenario>(),
            Ok(MarketScenario::HighVolatility)
        );
    }

    #[test]
    fn rejects_unknown_scenario() {
        let err = "sideways".parse::<MarketScenario>().unwrap_err();
        assert_eq!(err, Error::UnknownScenario("sideways".to_string()));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for scenario in MarketScenario::ALL {
            assert_eq!(scenario.to_string().parse::<MarketScenario>(), Ok(scenario));
        }
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&MarketScenario::HighVolatility).unwrap();
        assert_eq!(json, "\"HIGH_VOLATILITY\"");
    }
}
