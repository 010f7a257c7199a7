//! Completion boundary: prompt in, text out.
//!
//! [`CompletionModel`] is the only seam through which the summariser talks
//! to a language model. Production code uses [`LlmCompletionModel`], a thin
//! wrapper over an `edgequake-llm` provider; tests plug in scripted models.
//!
//! Calls are not retried: a failed or timed-out call is returned as an
//! error immediately.

use crate::config::SummaryConfig;
use crate::error::PdfSumError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, OpenAIProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Given a prompt, return the model's completion.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, PdfSumError>;
}

/// [`CompletionModel`] backed by an `edgequake-llm` provider.
pub struct LlmCompletionModel {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    timeout_secs: u64,
}

impl LlmCompletionModel {
    /// Build an OpenAI-backed model from the resolved configuration.
    ///
    /// Fails with [`PdfSumError::MissingApiKey`] when no key was resolved.
    pub fn from_config(config: &SummaryConfig) -> Result<Self, PdfSumError> {
        let api_key = config.require_api_key()?;
        let provider = OpenAIProvider::new(api_key).with_model(&config.model);
        Ok(Self::with_provider(Arc::new(provider), config))
    }

    /// Wrap a pre-constructed provider (any vendor `edgequake-llm` supports).
    pub fn with_provider(provider: Arc<dyn LLMProvider>, config: &SummaryConfig) -> Self {
        Self {
            provider,
            temperature: config.temperature,
            timeout_secs: config.api_timeout_secs,
        }
    }

    fn options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            ..Default::default()
        }
    }
}

#[async_trait]
impl CompletionModel for LlmCompletionModel {
    async fn complete(&self, prompt: &str) -> Result<String, PdfSumError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::user(prompt)];
        let options = self.options();

        let response = timeout(
            Duration::from_secs(self.timeout_secs),
            self.provider.chat(&messages, Some(&options)),
        )
        .await
        .map_err(|_| PdfSumError::ApiTimeout {
            secs: self.timeout_secs,
        })?
        .map_err(|e| PdfSumError::CompletionFailed {
            message: e.to_string(),
        })?;

        debug!(
            "Completion: {} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_api_key() {
        let config = SummaryConfig::default();
        assert!(matches!(
            LlmCompletionModel::from_config(&config),
            Err(PdfSumError::MissingApiKey)
        ));
    }

    #[test]
    fn options_carry_temperature() {
        let config = SummaryConfig::builder()
            .api_key("sk-test")
            .temperature(0.4)
            .build()
            .unwrap();
        let model = LlmCompletionModel::from_config(&config).unwrap();
        assert_eq!(model.options().temperature, Some(0.4));
        assert_eq!(model.timeout_secs, config.api_timeout_secs);
    }
}
