use thiserror::Error;

/// One completion request: a single user prompt and the fixed system instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub system_instruction: &'a str,
}

/// Failure of a single completion attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Prompt blocked: {0}")]
    Blocked(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// How the fetcher should treat a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Worth retrying: network hiccups, 5xx, rate limits, garbled bodies.
    Transient,
    /// The service refused the prompt. Retrying cannot change the outcome.
    ContentPolicy,
    /// The service refused the credential.
    Credential,
}

const INVALID_KEY_MARKERS: &[&str] = &["API key not valid", "API_KEY_INVALID"];

impl LlmError {
    pub fn kind(&self) -> FailureKind {
        // Credential check comes first: Gemini reports a bad key as a 400.
        if INVALID_KEY_MARKERS.iter().any(|m| self.to_string().contains(m)) {
            return FailureKind::Credential;
        }
        match self {
            LlmError::Api { status: 401 | 403, .. } => FailureKind::Credential,
            LlmError::Api { status: 400, .. } | LlmError::Blocked(_) => FailureKind::ContentPolicy,
            _ => FailureKind::Transient,
        }
    }
}

/// The LLM client trait. Implementations perform exactly one request per call;
/// retrying is the fetcher's job.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Whether a credential is configured. Without one no request is attempted.
    fn has_credential(&self) -> bool;

    /// Send one completion request and return the answer text.
    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError>;
}
