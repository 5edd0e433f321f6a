//! Generative Language API client.
//!
//! Structured requests ask the model for `application/json` output
//! constrained by a response schema, then deserialize the first candidate's
//! text. Rate-limited calls are retried with exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use crate::config::GeminiConfig;
use crate::models::{BrandIdentity, Product, SalesData};

use super::error::{AiError, ApiErrorResponse};
use super::{
    BrandStrategy, ChatRole, ChatTurn, ContentGenerator, DuelScenario, ProductSuggestion,
    SocialPost,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Retries after the first rate-limited attempt.
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(1000);

const PERSONA_FALLBACK: &str = "I'm having a bit of an identity crisis right now. Try again.";
const INSIGHT_FALLBACK: &str = "Could not analyze sales data right now.";

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: text.into() }],
        }
    }
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

// =============================================================================
// Client
// =============================================================================

/// Generative Language API client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    api_base: String,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `AiError::Parse` if the API key is not a valid header value,
    /// or `AiError::Http` if the HTTP client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, AiError> {
        Self::with_api_base(config, GEMINI_API_BASE)
    }

    /// Create a client against a different API base URL.
    ///
    /// # Errors
    ///
    /// Same as [`GeminiClient::new`].
    pub fn with_api_base(config: &GeminiConfig, api_base: &str) -> Result<Self, AiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| AiError::Parse(format!("invalid API key header: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                api_base: api_base.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.inner.api_base, self.inner.model
        )
    }

    /// Generate a value matching `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after retries or the output
    /// does not deserialize into `T`.
    #[instrument(skip(self, prompt, schema), fields(model = %self.inner.model))]
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<T, AiError> {
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        };
        let text = self.generate_with_retry(&request).await?;
        serde_json::from_str(&text)
            .map_err(|e| AiError::Parse(format!("model output did not match schema: {e}")))
    }

    /// Generate free text from a conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after retries or the model
    /// returns no text.
    #[instrument(skip_all, fields(model = %self.inner.model, turns = contents_len(history)))]
    pub async fn generate_text(
        &self,
        history: &[ChatTurn],
        message: &str,
        system: Option<&str>,
    ) -> Result<String, AiError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                };
                Content::text(Some(role), turn.text.clone())
            })
            .collect();
        contents.push(Content::text(Some("user"), message));

        let request = GenerateRequest {
            contents,
            system_instruction: system.map(|s| Content::text(None, s)),
            generation_config: None,
        };
        self.generate_with_retry(&request).await
    }

    /// Send a request, retrying rate limits with doubling delays.
    async fn generate_with_retry(&self, request: &GenerateRequest) -> Result<String, AiError> {
        let mut delay = INITIAL_BACKOFF;
        let mut retries = 0;
        loop {
            match self.generate(request).await {
                Err(e) if e.is_rate_limit() && retries < MAX_RETRIES => {
                    retries += 1;
                    tracing::warn!(
                        retry = retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Generation rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                result => return result,
            }
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, AiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.parse_error(response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::Parse(format!("Failed to parse response: {e}")))?;
        body.into_text().ok_or(AiError::EmptyResponse)
    }

    async fn parse_error(&self, response: reqwest::Response) -> AiError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            return AiError::RateLimited(retry_after);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        if status == 401 || status == 403 {
            return AiError::Unauthorized(message);
        }

        AiError::Api { status, message }
    }
}

const fn contents_len(history: &[ChatTurn]) -> usize {
    history.len() + 1
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.inner.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Prompts
// =============================================================================

fn product_details_prompt(name: &str, category: &str) -> String {
    format!(
        "Act as an e-commerce expert. Generate a compelling product description, a suggested \
         price (USD), relevant tags, and a short marketing hook for a product named \"{name}\" \
         in the category \"{category}\". Keep the description under 80 words."
    )
}

fn product_details_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "description": { "type": "STRING" },
            "price": { "type": "NUMBER" },
            "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "marketingHook": { "type": "STRING" }
        },
        "required": ["description", "price", "tags", "marketingHook"]
    })
}

fn brand_strategy_prompt(store_name: &str, category: &str) -> String {
    format!(
        "Act as a world-class Brand Strategist. Create a brand identity for an online store \
         named \"{store_name}\" in the \"{category}\" industry. Provide a Mission Statement, a \
         Vision Statement, 3 Core Values, and a Tone of Voice description."
    )
}

fn brand_strategy_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "mission": { "type": "STRING" },
            "vision": { "type": "STRING" },
            "values": { "type": "ARRAY", "items": { "type": "STRING" } },
            "toneOfVoice": { "type": "STRING" }
        },
        "required": ["mission", "vision", "values", "toneOfVoice"]
    })
}

fn duel_prompt(category: &str) -> String {
    format!(
        "Act as a master marketing psychologist.\n\
         1. Invent a hypothetical e-commerce product in the \"{category}\" niche.\n\
         2. Create two different marketing headlines (Subject Lines or Ad Hooks) for this product. \
         One should be \"Good/Standard\". One should be \"Excellent/High-Converting\" based on \
         principles like urgency, social proof, or emotional hook.\n\
         3. Determine which one is better (The Winner).\n\
         4. Explain WHY it is better in one concise sentence.\n\
         5. Assign \"Odds\" (multiplier) between 1.5 and 2.5 based on how obvious the win is \
         (Higher odds = harder to guess)."
    )
}

fn duel_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "productName": { "type": "STRING" },
            "productContext": {
                "type": "STRING",
                "description": "Short description of what the product is"
            },
            "optionA": { "type": "STRING" },
            "optionB": { "type": "STRING" },
            "winner": { "type": "STRING", "enum": ["A", "B"] },
            "reason": { "type": "STRING" },
            "odds": { "type": "NUMBER" }
        },
        "required": [
            "productName", "productContext", "optionA", "optionB", "winner", "reason", "odds"
        ]
    })
}

fn persona_system_prompt(identity: &BrandIdentity, store_name: &str) -> String {
    format!(
        "You are NOT an AI assistant. You ARE the physical embodiment of the brand \"{store_name}\".\n\n\
         Your Brand Identity:\n\
         - Mission: {mission}\n\
         - Values: {values}\n\
         - Tone of Voice: {tone}\n\n\
         Rules:\n\
         1. Respond STRICTLY in the tone of voice defined above.\n\
         2. If the tone is \"witty\", be witty. If \"professional\", be professional.\n\
         3. Defend your brand values if challenged.\n\
         4. Keep responses concise (under 50 words) unless asked for more.\n\
         5. Do not break character.",
        mission = identity.mission,
        values = identity.values.join(", "),
        tone = identity.tone_of_voice,
    )
}

fn social_post_prompt(product: &Product, platform: &str, identity: &BrandIdentity) -> String {
    format!(
        "Create a viral social media post for the platform \"{platform}\".\n\n\
         Product: {title} - {description}\n\
         Brand Tone: {tone}\n\n\
         Output JSON with:\n\
         1. caption: High converting copy, include emojis.\n\
         2. hashtags: 5 relevant tags.\n\
         3. visualDescription: A short description of what the image/video should look like.\n\
         4. estimatedReach: A fictional estimate (e.g. \"1.2k - 5k\").\n\
         5. bestTime: Best time to post today.",
        title = product.title,
        description = product.description,
        tone = identity.tone_of_voice,
    )
}

fn social_post_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "caption": { "type": "STRING" },
            "hashtags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "visualDescription": { "type": "STRING" },
            "estimatedReach": { "type": "STRING" },
            "bestTime": { "type": "STRING" }
        },
        "required": ["caption", "hashtags", "visualDescription", "estimatedReach", "bestTime"]
    })
}

/// Prompt over the most recent seven days.
fn sales_insight_prompt(data: &[SalesData]) -> Result<String, AiError> {
    let recent = data.get(data.len().saturating_sub(7)..).unwrap_or(data);
    let data = serde_json::to_string(recent).map_err(|e| AiError::Parse(e.to_string()))?;
    Ok(format!(
        "Analyze the following sales data for the last 7 days of an online store:\n{data}\n\n\
         Provide a concise summary (max 3 sentences) of the trend and 2 actionable tips to \
         improve sales next week.\nFormat the output as simple text, not Markdown."
    ))
}

fn store_concept_prompt(topic: &str) -> String {
    format!(
        "Generate a catchy store tagline and a one-sentence visual theme description for an \
         online store that sells: {topic}. Return in format: \"Tagline: [tagline] | Theme: \
         [description]\""
    )
}

// =============================================================================
// ContentGenerator
// =============================================================================

/// Log a failed generation and discard it.
fn absorb<T>(what: &str, result: Result<T, AiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, what, "Content generation failed");
            None
        }
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn product_details(&self, name: &str, category: &str) -> Option<ProductSuggestion> {
        let result = self
            .generate_structured(
                &product_details_prompt(name, category),
                product_details_schema(),
            )
            .await;
        absorb("product details", result)
    }

    async fn brand_strategy(&self, store_name: &str, category: &str) -> Option<BrandStrategy> {
        let result = self
            .generate_structured(
                &brand_strategy_prompt(store_name, category),
                brand_strategy_schema(),
            )
            .await;
        absorb("brand strategy", result)
    }

    async fn duel_scenario(&self, category: &str) -> Option<DuelScenario> {
        let result = self
            .generate_structured(&duel_prompt(category), duel_schema())
            .await;
        absorb("duel scenario", result)
    }

    async fn brand_persona_reply(
        &self,
        message: &str,
        history: &[ChatTurn],
        identity: &BrandIdentity,
        store_name: &str,
    ) -> String {
        let system = persona_system_prompt(identity, store_name);
        let result = self.generate_text(history, message, Some(&system)).await;
        absorb("brand persona", result).unwrap_or_else(|| PERSONA_FALLBACK.to_string())
    }

    async fn social_post(
        &self,
        product: &Product,
        platform: &str,
        identity: &BrandIdentity,
    ) -> Option<SocialPost> {
        let result = self
            .generate_structured(
                &social_post_prompt(product, platform, identity),
                social_post_schema(),
            )
            .await;
        absorb("social post", result)
    }

    async fn sales_insight(&self, data: &[SalesData]) -> String {
        let result = match sales_insight_prompt(data) {
            Ok(prompt) => self.generate_text(&[], &prompt, None).await,
            Err(e) => Err(e),
        };
        absorb("sales insight", result).unwrap_or_else(|| INSIGHT_FALLBACK.to_string())
    }

    async fn store_concept(&self, topic: &str) -> Option<String> {
        let result = self
            .generate_text(&[], &store_concept_prompt(topic), None)
            .await;
        absorb("store concept", result)
    }
}
