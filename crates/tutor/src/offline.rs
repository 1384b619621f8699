// In crates/tutor/src/offline.rs

use crate::{FALLBACK_UNCONFIGURED, Tutor};
use async_trait::async_trait;
use core_types::HistoryPoint;

/// The tutor used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTutor;

#[async_trait]
impl Tutor for OfflineTutor {
    fn name(&self) -> &'static str {
        "OfflineTutor"
    }

    async fn explain(&self, _context: &str, _question: &str) -> String {
        FALLBACK_UNCONFIGURED.to_string()
    }

    async fn summarize(&self, _history: &[HistoryPoint]) -> String {
        FALLBACK_UNCONFIGURED.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_points_at_missing_configuration() {
        let tutor = OfflineTutor;

        assert_eq!(tutor.explain("Basis chart", "What is basis?").await, FALLBACK_UNCONFIGURED);
        assert_eq!(tutor.summarize(&[]).await, FALLBACK_UNCONFIGURED);
    }
}
