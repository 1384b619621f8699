// In crates/app-config/src/types.rs

use core_types::SessionParams;
use core_types::types::{
    DEFAULT_HORIZON_DAYS, DEFAULT_INITIAL_CASH, DEFAULT_INITIAL_FUTURES_PRICE,
    DEFAULT_INITIAL_SPOT_PRICE, DEFAULT_LOT_SIZE, DEFAULT_MAINTENANCE_MARGIN_RATIO,
    DEFAULT_MAX_SKIP_ITERATIONS, DEFAULT_OPENING_BUFFER,
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Starting conditions and pacing of the simulator.
    pub simulation: SimulationSettings,
    /// Settings for the AI tutor.
    pub tutor: TutorSettings,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SimulationSettings {
    pub initial_cash: Decimal,
    pub initial_spot_price: Decimal,
    pub initial_futures_price: Decimal,
    pub horizon_days: u32,
    pub lot_size: Decimal,
    /// Cash must cover the spot cost times this factor before opening.
    pub opening_buffer: Decimal,
    pub maintenance_margin_ratio: Decimal,
    pub max_skip_iterations: u32,
    /// Milliseconds between simulated days while the session is running.
    pub tick_interval_ms: u64,
    /// Fixes the price path. A random seed is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            initial_cash: DEFAULT_INITIAL_CASH,
            initial_spot_price: DEFAULT_INITIAL_SPOT_PRICE,
            initial_futures_price: DEFAULT_INITIAL_FUTURES_PRICE,
            horizon_days: DEFAULT_HORIZON_DAYS,
            lot_size: DEFAULT_LOT_SIZE,
            opening_buffer: DEFAULT_OPENING_BUFFER,
            maintenance_margin_ratio: DEFAULT_MAINTENANCE_MARGIN_RATIO,
            max_skip_iterations: DEFAULT_MAX_SKIP_ITERATIONS,
            tick_interval_ms: 1000,
            seed: None,
        }
    }
}

impl SimulationSettings {
    /// The session parameters these settings describe.
    pub fn to_params(&self) -> SessionParams {
        SessionParams {
            initial_cash: self.initial_cash,
            initial_spot_price: self.initial_spot_price,
            initial_futures_price: self.initial_futures_price,
            horizon_days: self.horizon_days,
            maintenance_margin_ratio: self.maintenance_margin_ratio,
            lot_size: self.lot_size,
            opening_buffer: self.opening_buffer,
            max_skip_iterations: self.max_skip_iterations,
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct TutorSettings {
    /// The Gemini API key. An empty key selects the offline tutor.
    pub api_key: String,
    pub model: String,
    /// The REST base URL of the Generative Language API.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
        }
    }
}

impl TutorSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for TutorSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorSettings")
            .field("api_key", &if self.is_configured() { "<redacted>" } else { "<unset>" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
