// In crates/tutor/src/lib.rs

use app_config::TutorSettings;
use async_trait::async_trait;
use core_types::HistoryPoint;

pub mod error;
pub mod gemini;
pub mod offline;
pub mod prompt;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use gemini::GeminiTutor;
pub use offline::OfflineTutor;

pub const FALLBACK_UNCONFIGURED: &str =
    "API key not configured. Please check your environment settings.";
pub const FALLBACK_UNAVAILABLE: &str = "The tutor is temporarily unavailable.";
pub const FALLBACK_NO_ANSWER: &str =
    "Sorry, I cannot answer this question right now. Please try again later.";
pub const FALLBACK_ANALYSIS_UNAVAILABLE: &str =
    "The analysis service is temporarily unavailable.";
pub const FALLBACK_NO_ANALYSIS: &str = "Unable to analyze the current data.";

/// The universal interface for the basis-trading tutor.
///
/// A tutor never fails: any problem reaching or reading the underlying model
/// is logged and answered with a fixed fallback message instead.
#[async_trait]
pub trait Tutor: Send + Sync {
    /// The name of the tutor (e.g., "GeminiTutor", "OfflineTutor").
    fn name(&self) -> &'static str;

    /// Answers a learner's question.
    ///
    /// # Arguments
    ///
    /// * `context`: What the learner is currently looking at.
    /// * `question`: The learner's question, verbatim.
    async fn explain(&self, context: &str, question: &str) -> String;

    /// Explains in a few sentences why the PnL moved over recent days.
    ///
    /// Only the last few points of `history` are considered.
    async fn summarize(&self, history: &[HistoryPoint]) -> String;
}

/// Selects a tutor for the given settings.
///
/// Without an API key, or if the HTTP client cannot be built, the offline
/// tutor is returned.
pub fn tutor_from_settings(settings: &TutorSettings) -> Box<dyn Tutor> {
    if !settings.is_configured() {
        tracing::info!("No tutor API key configured. Using the offline tutor.");
        return Box::new(OfflineTutor);
    }

    match GeminiTutor::new(settings) {
        Ok(tutor) => Box::new(tutor),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create the Gemini tutor. Using the offline tutor.");
            Box::new(OfflineTutor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_selects_offline_tutor() {
        let tutor = tutor_from_settings(&TutorSettings::default());

        assert_eq!(tutor.name(), "OfflineTutor");
    }

    #[test]
    fn configured_key_selects_gemini_tutor() {
        let settings = TutorSettings {
            api_key: "key".to_string(),
            ..TutorSettings::default()
        };

        assert_eq!(tutor_from_settings(&settings).name(), "GeminiTutor");
    }
}
