// In crates/tutor/src/gemini.rs

use crate::prompt::{explain_prompt, summary_prompt};
use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};
use crate::{
    Error, FALLBACK_ANALYSIS_UNAVAILABLE, FALLBACK_NO_ANALYSIS, FALLBACK_NO_ANSWER,
    FALLBACK_UNAVAILABLE, Result, Tutor,
};
use app_config::TutorSettings;
use async_trait::async_trait;
use core_types::HistoryPoint;
use std::time::Duration;

/// A tutor backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiTutor {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTutor {
    /// Constructs a new GeminiTutor from TutorSettings.
    pub fn new(settings: &TutorSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .user_agent("TenorArb/0.1 (Basis Trading Simulator)")
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: settings.api_key.trim().to_string(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends one prompt and returns the model's text.
    ///
    /// This corresponds to the `POST /models/{model}:generateContent` endpoint.
    ///
    /// # Returns
    ///
    /// * `Ok(text)`: The text of the first candidate.
    /// * `Err(Error::EmptyResponse)`: If the model answered without any text.
    pub async fn generate(&self, prompt: String) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(%status, bytes = text.len(), model = %self.model, "Received tutor response.");

        parse_response(&text)
    }
}

/// Extracts the answer text from a raw `generateContent` body.
///
/// The API reports failures as an `{"error": {...}}` object, so that is
/// checked first.
pub fn parse_response(body: &str) -> Result<String> {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorResponse>(body) {
        return Err(Error::ApiError {
            code: envelope.error.code,
            msg: envelope.error.message,
        });
    }

    let response: GenerateContentResponse = serde_json::from_str(body)?;
    response.text().ok_or(Error::EmptyResponse)
}

#[async_trait]
impl Tutor for GeminiTutor {
    fn name(&self) -> &'static str {
        "GeminiTutor"
    }

    async fn explain(&self, context: &str, question: &str) -> String {
        match self.generate(explain_prompt(context, question)).await {
            Ok(answer) => answer,
            Err(Error::EmptyResponse) => FALLBACK_NO_ANSWER.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Tutor request failed.");
                FALLBACK_UNAVAILABLE.to_string()
            }
        }
    }

    async fn summarize(&self, history: &[HistoryPoint]) -> String {
        let prompt = match summary_prompt(history) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode history for the tutor.");
                return FALLBACK_ANALYSIS_UNAVAILABLE.to_string();
            }
        };

        match self.generate(prompt).await {
            Ok(analysis) => analysis,
            Err(Error::EmptyResponse) => FALLBACK_NO_ANALYSIS.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Tutor analysis request failed.");
                FALLBACK_ANALYSIS_UNAVAILABLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_tutor() -> GeminiTutor {
        GeminiTutor::new(&TutorSettings {
            api_key: "test-key".to_string(),
            // Nothing listens on the discard port.
            base_url: "http://127.0.0.1:9/v1beta/".to_string(),
            timeout_secs: 2,
            ..TutorSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn parses_first_candidate_text() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Basis is "}, {"text": "futures minus spot."}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;

        assert_eq!(parse_response(body).unwrap(), "Basis is futures minus spot.");
    }

    #[test]
    fn blank_answer_is_empty_response() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#;

        assert!(matches!(parse_response(body), Err(Error::EmptyResponse)));
        assert!(matches!(parse_response(r#"{"candidates": []}"#), Err(Error::EmptyResponse)));
    }

    #[test]
    fn api_error_envelope_is_reported() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;

        match parse_response(body) {
            Err(Error::ApiError { code, msg }) => {
                assert_eq!(code, 400);
                assert_eq!(msg, "API key not valid.");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_a_deserialization_error() {
        assert!(matches!(parse_response("<html>"), Err(Error::DeserializationFailed(_))));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        assert_eq!(unreachable_tutor().base_url, "http://127.0.0.1:9/v1beta");
    }

    #[tokio::test]
    async fn unreachable_service_degrades_to_fallback_text() {
        let tutor = unreachable_tutor();

        assert_eq!(tutor.explain("Basis chart", "What is basis?").await, FALLBACK_UNAVAILABLE);
        assert_eq!(tutor.summarize(&[]).await, FALLBACK_ANALYSIS_UNAVAILABLE);
    }
}
