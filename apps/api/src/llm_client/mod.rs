/// LLM Client — the single point of entry for all Gemini API calls in the agent.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All caption generation MUST go through this module.
///
/// Model selection is data-driven: `CANDIDATE_MODELS` is tried in order, and
/// only a not-found-class failure advances the chain. Auth, quota, and
/// transport failures are terminal on the first attempt.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Candidate model identifiers, primary first. Consumed top to bottom by
/// `generate`; the order is part of the contract.
pub const CANDIDATE_MODELS: &[&str] = &[
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
    "gemini-1.5-pro",
    "gemini-pro",
];

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model '{model}' not found: {message}")]
    ModelNotFound { model: String, message: String },

    #[error(
        "All candidate models unavailable ({detail}). \
         Check that your GEMINI_API_KEY has access to the Gemini API and that \
         the configured model names are still offered."
    )]
    ModelsExhausted { detail: String },

    #[error("Model returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (generateContent request / response / error body)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
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
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Extracts the text of the first candidate's first text part.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Returns true for the not-found failure class that triggers the model
/// fallback chain. Everything else is terminal.
fn is_model_not_found(http_status: u16, api_status: Option<&str>) -> bool {
    http_status == 404 || api_status == Some("NOT_FOUND")
}

/// The single Gemini client used by the generation pipeline.
#[derive(Clone, Debug)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE.to_string())
    }

    /// Points the client at an alternate endpoint. Tests use this to drive
    /// the fallback chain against a local stub server.
    fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url,
        }
    }

    /// Generates text with the candidate-model fallback chain.
    ///
    /// Tries `CANDIDATE_MODELS` in declared order. A `ModelNotFound` failure
    /// advances to the next candidate; any other failure returns immediately
    /// without trying alternates. Exhausting the chain yields
    /// `ModelsExhausted` carrying the first not-found detail.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let mut first_detail: Option<String> = None;

        for model in CANDIDATE_MODELS {
            match self.call(model, prompt).await {
                Ok(text) => {
                    debug!("Model '{model}' produced {} bytes", text.len());
                    return Ok(text);
                }
                Err(LlmError::ModelNotFound { model, message }) => {
                    warn!("Model '{model}' unavailable, trying next candidate: {message}");
                    first_detail.get_or_insert(format!("'{model}': {message}"));
                }
                Err(other) => return Err(other),
            }
        }

        Err(LlmError::ModelsExhausted {
            detail: first_detail.unwrap_or_else(|| "no candidates configured".to_string()),
        })
    }

    /// Makes one generateContent call against a specific model.
    pub async fn call(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/{model}:generateContent", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The error body may not be JSON (proxies, HTML error pages)
            let (message, api_status) = match serde_json::from_str::<GeminiError>(&body) {
                Ok(e) => (e.error.message, e.error.status),
                Err(_) => (body, None),
            };

            if is_model_not_found(status.as_u16(), api_status.as_deref()) {
                return Err(LlmError::ModelNotFound {
                    model: model.to_string(),
                    message,
                });
            }

            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;

        parsed
            .text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}
