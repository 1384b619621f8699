// In crates/app-config/src/lib.rs

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, Settings, SimulationSettings, TutorSettings};

/// Environment variables checked, in order, when no tutor key is configured.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Starts from the built-in defaults.
/// 2. Merges an optional `config/base.toml` file.
/// 3. Merges an optional environment-specific file (e.g., `config/development.toml`).
/// 4. Merges settings from environment variables (e.g., `TENOR__SIMULATION__SEED=7`).
///
/// A tutor key left empty by all of these is taken from `GEMINI_API_KEY` or
/// `API_KEY`.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let builder = Config::builder()
        .add_source(File::with_name("config/base").required(false))
        .add_source(File::with_name(&format!("config/{environment}")).required(false))
        .add_source(
            Environment::with_prefix("TENOR")
                .separator("__")
                .try_parsing(true),
        );

    let mut settings = build_settings(builder)?;
    if !settings.tutor.is_configured() {
        if let Some(key) = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|key| !key.trim().is_empty()))
        {
            settings.tutor.api_key = key;
        }
    }

    Ok(settings)
}

/// Builds and validates settings from an assembled set of sources.
///
/// Sections and keys missing from every source keep their defaults.
pub fn build_settings(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.simulation.to_params().validate()?;
    Ok(settings)
}
