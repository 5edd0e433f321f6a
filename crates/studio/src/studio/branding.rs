//! Store settings, brand identity and AI brand assists.

use tracing::instrument;

use crate::ai::{ChatTurn, ProductSuggestion};
use crate::models::{BrandIdentityPatch, SettingsPatch, project_brand_onto_settings};

use super::Studio;

impl Studio {
    /// Shallow-merge settings into the active tenant.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.modify_active_tenant(|store| store.settings.apply(patch));
        self.notifications.success("Settings saved.");
    }

    /// Deep-merge a brand identity patch and refresh the settings projection.
    pub fn update_brand_identity(&mut self, patch: BrandIdentityPatch) -> bool {
        self.modify_active_tenant(|store| {
            project_brand_onto_settings(&patch, &mut store.settings);
            store.brand_identity.apply(patch);
        })
    }

    /// Generate mission, vision, values and tone for the active tenant.
    ///
    /// Returns `false` when there is no tenant or generation failed.
    #[instrument(skip(self))]
    pub async fn apply_brand_strategy(&mut self) -> bool {
        let Some(store) = self.collection.active() else {
            return false;
        };
        let (name, category) = (store.name().to_string(), store.settings.category.clone());

        let generator = self.generator.clone();
        match generator.brand_strategy(&name, &category).await {
            Some(strategy) => {
                let applied = self.update_brand_identity(strategy.into_patch());
                if applied {
                    self.notifications.success("Brand strategy generated.");
                }
                applied
            }
            None => {
                self.notifications
                    .error("Failed to generate brand strategy. Try again.");
                false
            }
        }
    }

    /// Ask the AI collaborator for listing copy and a price.
    pub async fn suggest_product_details(
        &self,
        name: &str,
        category: &str,
    ) -> Option<ProductSuggestion> {
        self.generator.product_details(name, category).await
    }

    /// Talk to the active tenant's brand persona.
    pub async fn chat_with_brand(&self, message: &str, history: &[ChatTurn]) -> String {
        let store = self.view();
        self.generator
            .brand_persona_reply(message, history, &store.brand_identity, store.name())
            .await
    }

    /// Tagline and theme for a store idea.
    pub async fn store_concept(&self, topic: &str) -> Option<String> {
        self.generator.store_concept(topic).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use storeloom_core::NotificationKind;

    use crate::ai::{
        BrandStrategy, ChatTurn, ContentGenerator, DuelScenario, ProductSuggestion, SocialPost,
    };
    use crate::models::{
        BrandColorsPatch, BrandIdentity, Product, SalesData, StylingPatch, TypographyPatch,
    };

    use super::super::test_support::{ScriptedCatalog, builder, messages, studio};
    use super::*;

    struct StrategyOnly;

    #[async_trait]
    impl ContentGenerator for StrategyOnly {
        async fn product_details(&self, _: &str, _: &str) -> Option<ProductSuggestion> {
            None
        }
        async fn brand_strategy(&self, store_name: &str, _: &str) -> Option<BrandStrategy> {
            Some(BrandStrategy {
                mission: format!("{store_name} for everyone"),
                vision: "Everywhere".to_string(),
                values: vec!["Craft".to_string()],
                tone_of_voice: "witty".to_string(),
            })
        }
        async fn duel_scenario(&self, _: &str) -> Option<DuelScenario> {
            None
        }
        async fn brand_persona_reply(
            &self,
            message: &str,
            history: &[ChatTurn],
            identity: &BrandIdentity,
            store_name: &str,
        ) -> String {
            format!(
                "{store_name}/{}/{}: {message}",
                identity.tone_of_voice,
                history.len()
            )
        }
        async fn social_post(&self, _: &Product, _: &str, _: &BrandIdentity) -> Option<SocialPost> {
            None
        }
        async fn sales_insight(&self, _: &[SalesData]) -> String {
            String::new()
        }
        async fn store_concept(&self, _: &str) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn test_settings_saved_even_without_tenant() {
        let mut studio = studio();
        studio.update_settings(SettingsPatch {
            name: Some("Ghost".to_string()),
            ..SettingsPatch::default()
        });
        assert_eq!(studio.settings().name, "My Brand");
        assert_eq!(
            messages(&studio, NotificationKind::Success),
            vec!["Settings saved."]
        );
    }

    #[tokio::test]
    async fn test_brand_identity_deep_merge_and_projection() {
        let mut studio = studio();
        studio.create_tenant("Nova", "General");
        let before = studio.brand_identity().clone();

        assert!(studio.update_brand_identity(BrandIdentityPatch {
            colors: Some(BrandColorsPatch {
                background: Some("#000000".to_string()),
                ..BrandColorsPatch::default()
            }),
            typography: Some(TypographyPatch {
                body_font: Some("Poppins".to_string()),
                ..TypographyPatch::default()
            }),
            styling: Some(StylingPatch {
                border_radius: Some(4),
                ..StylingPatch::default()
            }),
            ..BrandIdentityPatch::default()
        }));

        let after = studio.brand_identity();
        assert_eq!(after.colors.background, "#000000");
        assert_eq!(after.colors.primary, before.colors.primary);
        assert_eq!(after.colors.text, before.colors.text);
        assert_eq!(after.typography.heading_font, before.typography.heading_font);
        assert_eq!(after.typography.body_font, "Poppins");
        assert_eq!(after.styling.border_radius, 4);

        let settings = studio.settings();
        assert_eq!(settings.background_color.as_deref(), Some("#000000"));
        assert_eq!(settings.font_family, "Poppins");
        assert_eq!(settings.border_radius, "4px");
    }

    #[tokio::test]
    async fn test_apply_brand_strategy() {
        let mut studio = builder(Arc::new(ScriptedCatalog::default()))
            .generator(Arc::new(StrategyOnly))
            .build()
            .unwrap();
        assert!(!studio.apply_brand_strategy().await);

        studio.create_tenant("Nova", "Tech");
        assert!(studio.apply_brand_strategy().await);
        assert_eq!(studio.brand_identity().mission, "Nova for everyone");
        assert_eq!(studio.brand_identity().tone_of_voice, "witty");
        assert_eq!(studio.brand_identity().colors.primary, "#007AFF");
    }

    #[tokio::test]
    async fn test_brand_strategy_failure_notifies() {
        let mut studio = studio();
        studio.create_tenant("Nova", "Tech");
        assert!(!studio.apply_brand_strategy().await);
        assert_eq!(
            messages(&studio, NotificationKind::Error),
            vec!["Failed to generate brand strategy. Try again."]
        );
    }

    #[tokio::test]
    async fn test_chat_passes_identity_and_history() {
        let mut studio = builder(Arc::new(ScriptedCatalog::default()))
            .generator(Arc::new(StrategyOnly))
            .build()
            .unwrap();
        studio.create_tenant("Nova", "Tech");
        studio.apply_brand_strategy().await;

        let history = vec![ChatTurn {
            role: crate::ai::ChatRole::User,
            text: "hi".to_string(),
        }];
        let reply = studio.chat_with_brand("who are you?", &history).await;
        assert_eq!(reply, "Nova/witty/1: who are you?");
    }
}
