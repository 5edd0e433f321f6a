//! Campaigns, reviews and the gamified marketing stats.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storeloom_core::{
    CampaignId, CampaignPlatform, CampaignStatus, ProductId, ReviewId, ReviewSentiment,
};

/// Rank titles by level, starting at level 1.
pub const RANK_TITLES: [&str; 6] = [
    "Apprentice",
    "Strategist",
    "Growth Hacker",
    "CMO",
    "Tycoon",
    "Legend",
];

/// Earnings needed per level before the next level-up.
pub const EARNINGS_PER_LEVEL: i64 = 5000;

/// A scheduled piece of marketing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingCampaign {
    pub id: CampaignId,
    pub title: String,
    pub platform: CampaignPlatform,
    pub status: CampaignStatus,
    pub date: NaiveDate,
    pub content: String,
}

/// A customer review with an optional merchant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerReview {
    pub id: ReviewId,
    pub customer_name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub sentiment: ReviewSentiment,
    #[serde(default)]
    pub reply: Option<String>,
}

/// Growth arena progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingStats {
    pub ad_credits: i64,
    pub level: u32,
    pub title: String,
    pub wins: u32,
    pub losses: u32,
    pub streak: u32,
    pub total_earnings: i64,
}

impl Default for MarketingStats {
    fn default() -> Self {
        Self {
            ad_credits: 1000,
            level: 1,
            title: rank_title(1).to_string(),
            wins: 0,
            losses: 0,
            streak: 0,
            total_earnings: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarketingStatsPatch {
    pub ad_credits: Option<i64>,
    pub level: Option<u32>,
    pub title: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub streak: Option<u32>,
    pub total_earnings: Option<i64>,
}

/// Title for a level, clamped to the highest rank.
#[must_use]
pub fn rank_title(level: u32) -> &'static str {
    let index = usize::try_from(level.saturating_sub(1)).unwrap_or(usize::MAX);
    RANK_TITLES
        .get(index)
        .or_else(|| RANK_TITLES.last())
        .copied()
        .unwrap_or_default()
}

impl MarketingStats {
    /// Merge a patch, then level up at most once.
    ///
    /// Returns the new title when a level-up happened.
    pub fn apply(&mut self, patch: MarketingStatsPatch) -> Option<&'static str> {
        merge_fields!(self, patch; set: [
            ad_credits, level, title, wins, losses, streak, total_earnings,
        ]);

        if self.total_earnings > i64::from(self.level) * EARNINGS_PER_LEVEL {
            self.level = self.level.checked_add(1)?;
            let title = rank_title(self.level);
            title.clone_into(&mut self.title);
            return Some(title);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earnings(total: i64) -> MarketingStatsPatch {
        MarketingStatsPatch {
            total_earnings: Some(total),
            ..MarketingStatsPatch::default()
        }
    }

    #[test]
    fn test_level_up_boundary_is_strict() {
        let mut stats = MarketingStats::default();
        assert_eq!(stats.apply(earnings(5000)), None);
        assert_eq!(stats.level, 1);

        assert_eq!(stats.apply(earnings(5001)), Some("Strategist"));
        assert_eq!(stats.level, 2);
        assert_eq!(stats.title, "Strategist");
    }

    #[test]
    fn test_single_level_per_update() {
        let mut stats = MarketingStats::default();
        assert_eq!(stats.apply(earnings(50_000)), Some("Strategist"));
        assert_eq!(stats.level, 2);
    }

    #[test]
    fn test_top_level_does_not_overflow() {
        let mut stats = MarketingStats::default();
        let patch = MarketingStatsPatch {
            level: Some(u32::MAX),
            total_earnings: Some(i64::MAX),
            ..MarketingStatsPatch::default()
        };
        assert_eq!(stats.apply(patch), None);
        assert_eq!(stats.level, u32::MAX);
    }

    #[test]
    fn test_title_clamps_to_last_rank() {
        assert_eq!(rank_title(1), "Apprentice");
        assert_eq!(rank_title(6), "Legend");
        assert_eq!(rank_title(40), "Legend");
    }

    #[test]
    fn test_patch_merges_other_fields() {
        let mut stats = MarketingStats::default();
        stats.apply(MarketingStatsPatch {
            ad_credits: Some(990),
            wins: Some(1),
            ..MarketingStatsPatch::default()
        });
        assert_eq!(stats.ad_credits, 990);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.total_earnings, 0);
    }
}
