//! AI content generation.
//!
//! The studio only depends on the [`ContentGenerator`] contract. Generators
//! never fail loudly: structured requests yield `None` and free-text
//! requests yield a fallback sentence when the model is unavailable.
//!
//! - [`GeminiClient`] - Generative Language API with JSON-schema output
//! - [`DisabledGenerator`] - used when no API key is configured

mod error;
mod gemini;

pub use error::AiError;
pub use gemini::GeminiClient;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BrandIdentity, BrandIdentityPatch, Product, SalesData};

/// Reply used when AI features are not configured.
pub const NOT_CONFIGURED: &str = "AI not configured.";

/// Listing copy suggested for a new product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSuggestion {
    pub description: String,
    /// Suggested price in USD.
    pub price: Decimal,
    pub tags: Vec<String>,
    pub marketing_hook: String,
}

/// Brand positioning generated for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandStrategy {
    pub mission: String,
    pub vision: String,
    pub values: Vec<String>,
    pub tone_of_voice: String,
}

impl BrandStrategy {
    /// The brand fields this strategy replaces.
    #[must_use]
    pub fn into_patch(self) -> BrandIdentityPatch {
        BrandIdentityPatch {
            mission: Some(self.mission),
            vision: Some(self.vision),
            values: Some(self.values),
            tone_of_voice: Some(self.tone_of_voice),
            ..BrandIdentityPatch::default()
        }
    }
}

/// One of the two headlines of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelOption {
    A,
    B,
}

impl std::str::FromStr for DuelOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            _ => Err(format!("invalid duel option: {s}")),
        }
    }
}

/// A headline duel for the growth arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelScenario {
    pub product_name: String,
    pub product_context: String,
    pub option_a: String,
    pub option_b: String,
    pub winner: DuelOption,
    pub reason: String,
    /// Payout multiplier, nominally 1.5 to 2.5.
    pub odds: Decimal,
}

/// A generated social media post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    pub caption: String,
    pub hashtags: Vec<String>,
    pub visual_description: String,
    pub estimated_reach: String,
    pub best_time: String,
}

/// Speaker of a persona chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of a persona chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Generates marketing content for a store.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn product_details(&self, name: &str, category: &str) -> Option<ProductSuggestion>;

    async fn brand_strategy(&self, store_name: &str, category: &str) -> Option<BrandStrategy>;

    async fn duel_scenario(&self, category: &str) -> Option<DuelScenario>;

    /// Reply in character as the brand.
    async fn brand_persona_reply(
        &self,
        message: &str,
        history: &[ChatTurn],
        identity: &BrandIdentity,
        store_name: &str,
    ) -> String;

    async fn social_post(
        &self,
        product: &Product,
        platform: &str,
        identity: &BrandIdentity,
    ) -> Option<SocialPost>;

    /// Short trend summary with tips for the last seven days.
    async fn sales_insight(&self, data: &[SalesData]) -> String;

    /// Tagline and visual theme for a store idea.
    async fn store_concept(&self, topic: &str) -> Option<String>;
}

/// Generator used when AI is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl ContentGenerator for DisabledGenerator {
    async fn product_details(&self, _name: &str, _category: &str) -> Option<ProductSuggestion> {
        None
    }

    async fn brand_strategy(&self, _store_name: &str, _category: &str) -> Option<BrandStrategy> {
        None
    }

    async fn duel_scenario(&self, _category: &str) -> Option<DuelScenario> {
        None
    }

    async fn brand_persona_reply(
        &self,
        _message: &str,
        _history: &[ChatTurn],
        _identity: &BrandIdentity,
        _store_name: &str,
    ) -> String {
        NOT_CONFIGURED.to_string()
    }

    async fn social_post(
        &self,
        _product: &Product,
        _platform: &str,
        _identity: &BrandIdentity,
    ) -> Option<SocialPost> {
        None
    }

    async fn sales_insight(&self, _data: &[SalesData]) -> String {
        "AI Configuration missing. Please set GEMINI_API_KEY.".to_string()
    }

    async fn store_concept(&self, _topic: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_duel_scenario_from_model_json() {
        let json = r#"{
            "productName": "AeroBottle",
            "productContext": "Self-cleaning water bottle",
            "optionA": "Stay hydrated",
            "optionB": "Only 12 left: the bottle that cleans itself",
            "winner": "B",
            "reason": "Scarcity plus a concrete benefit.",
            "odds": 1.8
        }"#;
        let scenario: DuelScenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.winner, DuelOption::B);
        assert_eq!(scenario.odds, Decimal::new(18, 1));
    }

    #[test]
    fn test_brand_strategy_into_patch() {
        let patch = BrandStrategy {
            mission: "m".to_string(),
            vision: "v".to_string(),
            values: vec!["a".to_string()],
            tone_of_voice: "t".to_string(),
        }
        .into_patch();
        assert_eq!(patch.mission.as_deref(), Some("m"));
        assert!(patch.colors.is_none());
    }

    #[tokio::test]
    async fn test_disabled_generator_falls_back() {
        let generator = DisabledGenerator;
        assert!(generator.duel_scenario("Tech").await.is_none());
        let reply = generator
            .brand_persona_reply("hi", &[], &BrandIdentity::default(), "Nova")
            .await;
        assert_eq!(reply, NOT_CONFIGURED);
    }

    #[test]
    fn test_duel_option_parse() {
        assert_eq!("a".parse::<DuelOption>().unwrap(), DuelOption::A);
        assert!("C".parse::<DuelOption>().is_err());
    }
}
