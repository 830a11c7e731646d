//! Generative Language API client.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ContentGenerator, GenerateFuture};
use crate::{AppError, Result};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Wrap the user's requirement in the email-body instruction.
#[must_use]
pub fn email_body_prompt(prompt: &str) -> String {
    format!(
        "You are an automated alert system.\n\
         Write a short, concise email body (max 100 words) based on the following requirement:\n\
         \"{prompt}\".\n\
         Do not include subject lines or placeholders like \"[Your Name]\". Just the body text."
    )
}

/// Client for the `models/{model}:generateContent` endpoint.
pub struct GeminiGenerator {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiGenerator {
    /// Build a client for `model` under `api_base`.
    #[must_use]
    pub fn new(api_base: String, model: String, api_key: String) -> Self {
        let endpoint = format!(
            "{}/models/{model}:generateContent",
            api_base.trim_end_matches('/')
        );
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let instruction = email_body_prompt(prompt);
        let body = GenerateRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: &instruction }],
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "generation request rejected");
            return Err(AppError::Generation(format!(
                "generation request failed with status {status}"
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(AppError::Generation("model returned no content".into()));
        }

        debug!(chars = text.len(), "generation succeeded");
        Ok(text.trim().to_owned())
    }
}

impl ContentGenerator for GeminiGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(self.request(prompt))
    }
}
