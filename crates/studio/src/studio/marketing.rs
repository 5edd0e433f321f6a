//! Marketing stats, campaigns, reviews and discount codes.

use storeloom_core::{DiscountId, ProductId, ReviewId};

use crate::ai::SocialPost;
use crate::ids;
use crate::models::{CustomerReview, Discount, MarketingCampaign, MarketingStatsPatch};

use super::Studio;

impl Studio {
    /// Merge stats into the active tenant, levelling up at most once.
    ///
    /// Returns the new rank title when a level-up happened.
    pub fn update_marketing_stats(&mut self, patch: MarketingStatsPatch) -> Option<&'static str> {
        let mut promoted = None;
        self.modify_active_tenant(|store| promoted = store.marketing_stats.apply(patch));
        if let Some(title) = promoted {
            self.notifications
                .success(format!("Leveled Up! You are now a {title}"));
        }
        promoted
    }

    /// Schedule a campaign.
    pub fn add_campaign(&mut self, campaign: MarketingCampaign) {
        self.modify_active_tenant(|store| store.campaigns.push(campaign));
        self.notifications.success("Campaign scheduled.");
    }

    /// Record a customer review, newest first.
    pub fn add_review(&mut self, review: CustomerReview) -> bool {
        self.modify_active_tenant(|store| store.reviews.insert(0, review))
    }

    /// Attach the merchant's reply to a review.
    pub fn reply_to_review(&mut self, id: &ReviewId, reply: &str) {
        self.modify_active_tenant(|store| {
            if let Some(review) = store.reviews.iter_mut().find(|r| &r.id == id) {
                review.reply = Some(reply.to_string());
            }
        });
        self.notifications.success("Reply posted.");
    }

    /// Create an active discount code with no uses.
    pub fn add_discount(&mut self, code: &str, percentage: u32) -> DiscountId {
        let id = DiscountId::new(ids::short_token());
        let discount = Discount {
            id: id.clone(),
            code: code.to_string(),
            percentage,
            uses: 0,
            active: true,
        };
        self.modify_active_tenant(|store| store.discounts.push(discount));
        self.notifications
            .success(format!("Discount {code} created."));
        id
    }

    /// Flip a discount between active and inactive.
    pub fn toggle_discount(&mut self, id: &DiscountId) {
        self.modify_active_tenant(|store| {
            if let Some(discount) = store.discounts.iter_mut().find(|d| &d.id == id) {
                discount.active = !discount.active;
            }
        });
    }

    /// Draft a social post for one of the active tenant's products.
    pub async fn draft_social_post(
        &self,
        product_id: &ProductId,
        platform: &str,
    ) -> Option<SocialPost> {
        let store = self.view();
        let product = store.product(product_id)?;
        self.generator
            .social_post(product, platform, &store.brand_identity)
            .await
    }

    /// Trend summary of the active tenant's last seven days.
    pub async fn sales_insight(&self) -> String {
        self.generator.sales_insight(self.sales_data()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use storeloom_core::{
        CampaignId, CampaignPlatform, CampaignStatus, NotificationKind, ReviewSentiment,
    };

    use super::super::test_support::{messages, studio};
    use super::*;

    fn earnings(total: i64) -> MarketingStatsPatch {
        MarketingStatsPatch {
            total_earnings: Some(total),
            ..MarketingStatsPatch::default()
        }
    }

    #[tokio::test]
    async fn test_level_up_boundary() {
        let mut studio = studio();
        studio.create_tenant("Nova", "Tech");

        assert_eq!(studio.update_marketing_stats(earnings(5000)), None);
        assert_eq!(studio.marketing_stats().level, 1);

        assert_eq!(studio.update_marketing_stats(earnings(5001)), Some("Strategist"));
        assert_eq!(studio.marketing_stats().level, 2);
        assert_eq!(studio.marketing_stats().title, "Strategist");
        assert!(
            messages(&studio, NotificationKind::Success)
                .contains(&"Leveled Up! You are now a Strategist".to_string())
        );
    }

    #[tokio::test]
    async fn test_discount_lifecycle() {
        let mut studio = studio();
        studio.create_tenant("Nova", "Tech");
        let id = studio.add_discount("SPRING10", 10);
        assert_eq!(studio.discounts().len(), 1);
        assert!(studio.discounts()[0].active);

        studio.toggle_discount(&id);
        assert!(!studio.discounts()[0].active);
        studio.toggle_discount(&DiscountId::new("nope"));
        assert!(!studio.discounts()[0].active);
        assert!(
            messages(&studio, NotificationKind::Success)
                .contains(&"Discount SPRING10 created.".to_string())
        );
    }

    #[tokio::test]
    async fn test_campaigns_append_and_reviews_reply() {
        let mut studio = studio();
        studio.create_tenant("Nova", "Tech");
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        for title in ["Launch", "Restock"] {
            studio.add_campaign(MarketingCampaign {
                id: CampaignId::new(title),
                title: title.to_string(),
                platform: CampaignPlatform::Instagram,
                status: CampaignStatus::Planned,
                date,
                content: String::new(),
            });
        }
        let titles: Vec<&str> = studio.campaigns().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Launch", "Restock"]);

        assert!(studio.add_review(CustomerReview {
            id: ReviewId::new("r1"),
            customer_name: "Ada".to_string(),
            rating: 5,
            comment: "Love it".to_string(),
            date,
            product_id: None,
            sentiment: ReviewSentiment::Positive,
            reply: None,
        }));
        studio.reply_to_review(&ReviewId::new("r1"), "Thank you!");
        assert_eq!(studio.reviews()[0].reply.as_deref(), Some("Thank you!"));
    }

    #[tokio::test]
    async fn test_ai_passthroughs_without_generator() {
        let mut studio = studio();
        studio.create_tenant("Nova", "Tech");
        assert!(
            studio
                .draft_social_post(&ProductId::new("missing"), "Instagram")
                .await
                .is_none()
        );
        assert!(studio.sales_insight().await.contains("GEMINI_API_KEY"));
    }
}
