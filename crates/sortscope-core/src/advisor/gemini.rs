use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::retry::{with_backoff, RetryPolicy};
use super::{AdvisoryProvider, QuizQuestion};
use crate::{Error, Result};

const NO_EXPLANATION: &str = "No explanation found.";

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiRequest {
    fn prompt(text: String) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text }],
            }],
            generation_config: None,
        }
    }

    fn with_quiz_schema(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: json!({
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "answer": { "type": "STRING" }
                    }
                }
            }),
        });
        self
    }
}

fn explain_prompt(algorithm_name: &str) -> String {
    format!(
        "Explain the \"{algorithm_name}\" sorting algorithm in simple terms for a beginner.\n\
Focus on the main steps and how it works. Keep the explanation concise and easy to understand."
    )
}

fn quiz_prompt(algorithm_name: &str) -> String {
    format!(
        "Generate a 3-question multiple-choice quiz about \"{algorithm_name}\" sorting.\n\
Provide the output in a JSON array format. Each object in the array should have \"question\" (string), \
\"options\" (array of strings), and \"answer\" (string, the correct option text)."
    )
}

/// Parse the model's quiz JSON, tolerating a surrounding markdown fence
fn parse_quiz(text: &str) -> Result<Vec<QuizQuestion>> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(body.trim())?)
}

/// Gemini API provider
pub struct GeminiAdvisor {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    policy: RetryPolicy,
}

impl GeminiAdvisor {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            policy: RetryPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// One request, no retries. Returns the first candidate's text.
    async fn generate(&self, request: &GeminiRequest) -> Result<Option<String>> {
        let response = self.client.post(self.endpoint()).json(request).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited(status.as_u16()));
        }
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        if let Some(error) = gemini_response.error {
            return Err(Error::Advisor(format!("Gemini API error: {}", error.message)));
        }

        Ok(gemini_response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text))
    }
}

#[async_trait::async_trait]
impl AdvisoryProvider for GeminiAdvisor {
    async fn explain(&self, algorithm_name: &str) -> Result<String> {
        let request = &GeminiRequest::prompt(explain_prompt(algorithm_name));
        let text = with_backoff(&self.policy, "explanation", move || self.generate(request)).await?;
        Ok(text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| NO_EXPLANATION.to_string()))
    }

    async fn quiz(&self, algorithm_name: &str) -> Result<Vec<QuizQuestion>> {
        let request = &GeminiRequest::prompt(quiz_prompt(algorithm_name)).with_quiz_schema();
        with_backoff(&self.policy, "quiz", move || async move {
            match self.generate(request).await? {
                Some(text) => parse_quiz(&text),
                None => Err(Error::Advisor(
                    "Failed to generate quiz. Please try again.".to_string(),
                )),
            }
        })
        .await
    }
}
