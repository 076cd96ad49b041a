use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::constants::{defaults, endpoints, models};
use crate::llm::traits::*;

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: build_http_client(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS)),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: models::DEFAULT_GEMINI_MODEL.to_string(),
            base_url: endpoints::GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn build_request_body(request: &CompletionRequest<'_>) -> Value {
        serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }]
        })
    }
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Finish reasons Gemini uses when it withholds a candidate's content.
const SAFETY_FINISH_REASONS: &[&str] = &["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

/// Extract the answer text from a successful `generateContent` body.
pub(crate) fn parse_response(body: &str) -> Result<String, LlmError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        return match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(LlmError::Blocked(reason)),
            None => Err(LlmError::Parse("response contained no candidates".to_string())),
        };
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = candidate
            .finish_reason
            .filter(|r| SAFETY_FINISH_REASONS.contains(&r.as_str()))
        {
            return Err(LlmError::Blocked(reason));
        }
    }

    Ok(text)
}

/// Turn a non-success status and body into an attempt error, preferring the
/// service's own `error.message` over the raw body.
pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    LlmError::Api { status, message }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let url = self.endpoint();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&Self::build_request_body(request))
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &body));
        }

        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GeminiClient::build_request_body(&CompletionRequest {
            prompt: "What is the IT Act 2000?",
            system_instruction: "Be brief.",
        });
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "What is the IT Act 2000?");
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(Some("k".into()))
            .with_base_url("http://localhost:9999/")
            .with_model("gemini-2.5-pro");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_credential_presence() {
        assert!(GeminiClient::new(Some("abc".into())).has_credential());
        assert!(!GeminiClient::new(Some("  ".into())).has_credential());
        assert!(!GeminiClient::new(None).has_credential());
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r###"{
            "candidates": [{
                "content": { "role": "model", "parts": [{"text": "## IT Act\n"}, {"text": "- Section 66"}] },
                "finishReason": "STOP"
            }]
        }"###;
        assert_eq!(parse_response(body).unwrap(), "## IT Act\n- Section 66");
    }

    #[test]
    fn test_parse_response_blocked_prompt() {
        let body = r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#;
        assert_eq!(parse_response(body), Err(LlmError::Blocked("SAFETY".into())));
    }

    #[test]
    fn test_parse_response_blocked_candidate() {
        let body = r#"{
            "candidates": [{
                "finishReason": "SAFETY",
                "safetyRatings": [{"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "probability": "HIGH"}]
            }]
        }"#;
        let err = parse_response(body).unwrap_err();
        assert_eq!(err, LlmError::Blocked("SAFETY".into()));
        assert_eq!(err.kind(), FailureKind::ContentPolicy);

        let body = r#"{"candidates":[{"content":{"parts":[]},"finishReason":"PROHIBITED_CONTENT"}]}"#;
        assert_eq!(
            parse_response(body),
            Err(LlmError::Blocked("PROHIBITED_CONTENT".into()))
        );
    }

    #[test]
    fn test_parse_response_keeps_text_despite_finish_reason() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Partial"}]},"finishReason":"MAX_TOKENS"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Partial");
    }

    #[test]
    fn test_parse_response_garbage_is_parse_error() {
        assert!(matches!(parse_response("<html>"), Err(LlmError::Parse(_))));
        assert!(matches!(parse_response("{}"), Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_parse_error_prefers_service_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = parse_error(400, body);
        assert_eq!(
            err,
            LlmError::Api {
                status: 400,
                message: "API key not valid. Please pass a valid API key.".into()
            }
        );
        assert_eq!(err.kind(), FailureKind::Credential);

        let err = parse_error(502, "Bad Gateway\n");
        assert_eq!(
            err,
            LlmError::Api {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }
}
