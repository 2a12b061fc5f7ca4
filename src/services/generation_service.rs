use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{read_json, ServiceError};
use crate::config::GenerationConfig;

/// Prompt in, free text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Google Generative Language `generateContent` client.
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, ServiceError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        let endpoint = Url::parse_with_params(&raw, &[("key", config.api_key.as_str())])
            .map_err(|e| ServiceError::Response(format!("invalid generation endpoint: {}", e)))?;

        Ok(Self {
            client: Client::builder().timeout(config.timeout).build()?,
            endpoint,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let payload: GenerateResponse = read_json(response).await?;
        let text = first_candidate_text(payload)?;
        debug!("Generation returned {} characters", text.len());
        Ok(text)
    }
}

fn first_candidate_text(payload: GenerateResponse) -> Result<String, ServiceError> {
    payload
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| ServiceError::Response("No candidate generated from the AI API.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_endpoint_carries_model_and_key() {
        let client = GeminiClient::new(&GenerationConfig {
            api_key: "secret key".to_string(),
            base_url: "https://generativelanguage.googleapis.com/".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(
            client.endpoint.path(),
            "/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(client.endpoint.query(), Some("key=secret+key"));
    }

    #[test]
    fn test_first_candidate_text_extracted() {
        let payload: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"itinerary\": []}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(first_candidate_text(payload).unwrap(), "{\"itinerary\": []}");
    }

    #[test]
    fn test_missing_candidate_is_an_error() {
        let payload: GenerateResponse =
            serde_json::from_value(serde_json::json!({ "promptFeedback": {} })).unwrap();
        let err = first_candidate_text(payload).unwrap_err();
        assert!(err.to_string().contains("No candidate generated"));
    }
}
