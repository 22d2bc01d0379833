//! Gemini text-generation adapter.
//!
//! The API key never leaves the server; clients talk to the assist
//! endpoint, which proxies a single generation attempt here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fable_core::ports::{TextGenError, TextGenerator};

const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini-backed [`TextGenerator`].
pub struct GeminiTextGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiTextGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Construct from `GEMINI_API_KEY`. Returns `None` when the key is
    /// unset, so the caller can disable the assist feature cleanly.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        if api_key.is_empty() {
            return None;
        }
        Some(Self::new(api_key))
    }

    /// Override the endpoint, for tests against a local stub server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TextGenerator for GeminiTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, TextGenError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TextGenError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Generation upstream returned an error");
            return Err(TextGenError::Request(format!(
                "Upstream returned {status}: {detail}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TextGenError::Malformed(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| TextGenError::Malformed("Response carried no candidates".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_is_extracted_from_first_candidate() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Once upon a time" }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        });

        let parsed: GenerateResponse = serde_json::from_value(raw).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text);
        assert_eq!(text.as_deref(), Some("Once upon a time"));
    }

    #[test]
    fn empty_candidate_list_is_detected() {
        let parsed: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
