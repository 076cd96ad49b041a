use std::sync::Arc;

use thiserror::Error;

use crate::constants::{messages, persona};
use crate::llm::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::llm::traits::{CompletionRequest, FailureKind, LlmClient};

/// Terminal outcome of a fetch that produced no answer text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{}", messages::MISSING_CREDENTIAL)]
    Config,

    #[error("{}", messages::RETRIES_EXHAUSTED)]
    Exhausted { attempts: u32, last_error: String },

    #[error("Cannot send an empty prompt")]
    EmptyPrompt,
}

/// Sends prompts to the completion API with bounded exponential backoff and
/// maps terminal failures to user-facing text.
pub struct ResponseFetcher {
    client: Arc<dyn LlmClient>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    system_instruction: String,
}

impl ResponseFetcher {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            system_instruction: persona::SYSTEM_INSTRUCTION.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Fetch an answer for `prompt`.
    ///
    /// Content-policy and credential rejections resolve to fixed explanatory
    /// text rather than an error. Transient failures are retried up to
    /// `policy.max_retries` times, waiting `policy.next_delay(attempt)` in
    /// between; when the budget runs out the result is
    /// [`FetchError::Exhausted`].
    pub async fn fetch_response(&self, prompt: &str) -> Result<String, FetchError> {
        if prompt.trim().is_empty() {
            return Err(FetchError::EmptyPrompt);
        }
        if !self.client.has_credential() {
            tracing::warn!("No API credential configured; skipping request");
            return Err(FetchError::Config);
        }

        let request = CompletionRequest {
            prompt,
            system_instruction: &self.system_instruction,
        };

        let mut attempt: u32 = 0;
        loop {
            let err = match self.client.generate(&request).await {
                Ok(text) => {
                    tracing::debug!(attempt, "Completion succeeded");
                    return Ok(text);
                }
                Err(err) => err,
            };

            match err.kind() {
                FailureKind::ContentPolicy => {
                    tracing::warn!("Prompt rejected by content policy: {err}");
                    return Ok(messages::CONTENT_POLICY_REFUSAL.to_string());
                }
                FailureKind::Credential => {
                    tracing::warn!("API credential rejected: {err}");
                    return Ok(messages::CREDENTIAL_SUPPORT.to_string());
                }
                FailureKind::Transient => {}
            }

            if attempt < self.policy.max_retries {
                let delay = self.policy.next_delay(attempt);
                tracing::warn!(
                    "Completion failed: {err}. Retrying in {}ms... ({}/{})",
                    delay.as_millis(),
                    attempt + 1,
                    self.policy.max_retries
                );
                self.sleeper.sleep(delay).await;
                attempt += 1;
            } else {
                tracing::error!("Completion failed after {} attempts: {err}", attempt + 1);
                return Err(FetchError::Exhausted {
                    attempts: attempt + 1,
                    last_error: err.to_string(),
                });
            }
        }
    }
}
