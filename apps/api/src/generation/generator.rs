//! Content generation — orchestrates one generation request.
//!
//! Flow: validate → caption (Gemini, with model fallback) → image lookup
//! (Unsplash) → compose record → append → respond.
//!
//! The two remote calls run strictly sequentially; the image lookup never
//! starts until the caption call has succeeded. A terminal caption error stops
//! the flow with no record and no image lookup.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::build_caption_prompt;
use crate::generation::tone::Tone;
use crate::image_client::{ImageClient, ImageResult};
use crate::llm_client::LlmClient;
use crate::state::AppState;
use crate::store::{ContentRecord, ContentStore};

/// Caption length bounds, in words.
pub const MIN_WORDS: u32 = 20;
pub const MAX_WORDS: u32 = 100;

/// Warning returned when the caption succeeded but no image matched.
const NO_IMAGE_WARNING: &str = "Caption generated but no image found. Try a different topic.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    pub tone: Tone,
    pub max_words: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub caption: String,
    pub image: Option<ImageResult>,
    /// False for caption-only results: those are displayed but not persisted.
    pub record_appended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs one generation request end to end.
pub async fn generate_content(
    state: &AppState,
    request: GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    // Step 1: Validate — credentials and input, before any outbound call
    let (llm, images) = require_clients(state)?;
    validate_input(&request)?;
    let topic = request.topic.trim();

    // Step 2: Generate caption. Terminal failures propagate here; nothing is
    // appended and the image provider is never contacted.
    info!("Generating {} caption for topic '{topic}'", request.tone);
    let prompt = build_caption_prompt(topic, request.tone, request.max_words);
    let caption = llm.generate(&prompt).await?;

    // Step 3: Image lookup, strictly after the caption call completes
    let image = images.search(topic).await;

    // Step 4: Compose and append. Caption-only results are returned to the
    // caller but NOT persisted — the store holds captioned-and-pictured rows
    // only. Preserved from the source flow; see DESIGN.md before changing.
    let record_appended = {
        let mut store = state.store.lock().map_err(|_| {
            AppError::Internal(anyhow::anyhow!("content store mutex poisoned"))
        })?;
        compose_and_append(&mut store, topic, request.tone, &caption, image.as_ref())
    };

    if record_appended {
        info!("Content generated for '{topic}', record appended");
    } else {
        warn!("No image found for '{topic}', returning caption-only result");
    }

    // Step 5: Respond
    Ok(GenerateResponse {
        caption,
        image,
        record_appended,
        warning: (!record_appended).then_some(NO_IMAGE_WARNING),
    })
}

/// Both credentials must be configured before either provider is called.
fn require_clients(state: &AppState) -> Result<(&LlmClient, &ImageClient), AppError> {
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::Configuration("GEMINI_API_KEY is not set. Add it to the environment.".to_string())
    })?;
    let images = state.images.as_ref().ok_or_else(|| {
        AppError::Configuration(
            "UNSPLASH_ACCESS_KEY is not set. Add it to the environment.".to_string(),
        )
    })?;
    Ok((llm, images))
}

fn validate_input(request: &GenerateRequest) -> Result<(), AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }
    if !(MIN_WORDS..=MAX_WORDS).contains(&request.max_words) {
        return Err(AppError::Validation(format!(
            "max_words must be between {MIN_WORDS} and {MAX_WORDS}"
        )));
    }
    Ok(())
}

/// Appends a full record when an image was found; returns whether it did.
fn compose_and_append(
    store: &mut ContentStore,
    topic: &str,
    tone: Tone,
    caption: &str,
    image: Option<&ImageResult>,
) -> bool {
    let Some(image) = image else {
        return false;
    };

    store.append(ContentRecord {
        timestamp: Utc::now(),
        topic: topic.to_string(),
        tone,
        caption: caption.to_string(),
        image_url: Some(image.url.clone()),
        photographer: Some(image.photographer.clone()),
        photographer_url: Some(image.photographer_url.clone()),
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(topic: &str, max_words: u32) -> GenerateRequest {
        GenerateRequest {
            topic: topic.to_string(),
            tone: Tone::Educational,
            max_words,
        }
    }

    fn sample_image() -> ImageResult {
        ImageResult {
            url: "https://images.unsplash.com/photo-1".to_string(),
            thumb_url: "https://images.unsplash.com/photo-1?w=200".to_string(),
            photographer: "A. Photographer".to_string(),
            photographer_url: "https://unsplash.com/@aphotographer".to_string(),
            download_url: "https://unsplash.com/photos/abc123/download".to_string(),
        }
    }

    #[test]
    fn test_empty_topic_rejected() {
        let err = validate_input(&request("   ", 50)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_max_words_bounds_enforced() {
        assert!(validate_input(&request("Dates", 19)).is_err());
        assert!(validate_input(&request("Dates", 101)).is_err());
        assert!(validate_input(&request("Dates", 20)).is_ok());
        assert!(validate_input(&request("Dates", 100)).is_ok());
    }

    #[test]
    fn test_missing_gemini_key_is_configuration_error() {
        let state = AppState::new(&crate::config::Config {
            gemini_api_key: None,
            unsplash_access_key: Some("u-key".to_string()),
            port: 8080,
            rust_log: "info".to_string(),
        });
        let err = require_clients(&state).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_missing_unsplash_key_is_configuration_error() {
        let state = AppState::new(&crate::config::Config {
            gemini_api_key: Some("g-key".to_string()),
            unsplash_access_key: None,
            port: 8080,
            rust_log: "info".to_string(),
        });
        let err = require_clients(&state).unwrap_err();
        assert!(err.to_string().contains("UNSPLASH_ACCESS_KEY"));
    }

    #[test]
    fn test_image_found_appends_full_record() {
        let mut store = ContentStore::new();
        let image = sample_image();
        let appended = compose_and_append(
            &mut store,
            "Harvesting Dates",
            Tone::Educational,
            "Dates are ready. #Palm",
            Some(&image),
        );

        assert!(appended);
        assert_eq!(store.len(), 1);
        let table = store.as_table();
        assert_eq!(table[0].topic, "Harvesting Dates");
        assert_eq!(table[0].caption, "Dates are ready. #Palm");
    }

    #[test]
    fn test_no_image_shows_caption_without_appending() {
        let mut store = ContentStore::new();
        let appended = compose_and_append(
            &mut store,
            "Xyzzyqqq123",
            Tone::Casual,
            "Still a caption. #Palm",
            None,
        );

        assert!(!appended, "caption-only results must not be persisted");
        assert!(store.is_empty());
    }
}
