//! Growth arena: wager ad credits on which headline converts better.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::instrument;

use crate::ai::{DuelOption, DuelScenario};
use crate::error::Rejection;
use crate::models::MarketingStatsPatch;

use super::Studio;

/// Credits required to enter a duel.
pub const MIN_DUEL_CREDITS: i64 = 10;

/// Wager suggested when a duel starts, capped by the credits on hand.
pub const DEFAULT_WAGER: i64 = 50;

/// Result of a settled duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelOutcome {
    Won { earnings: i64 },
    Lost { wager: i64 },
}

/// Credits won for a wager: `floor(wager * odds)`.
fn duel_earnings(wager: i64, odds: Decimal) -> i64 {
    (Decimal::from(wager) * odds)
        .floor()
        .to_i64()
        .unwrap_or(i64::MAX)
}

impl Studio {
    /// Wager to suggest for the next duel.
    #[must_use]
    pub fn default_wager(&self) -> i64 {
        DEFAULT_WAGER.min(self.marketing_stats().ad_credits)
    }

    /// Generate a duel for the active tenant's category.
    ///
    /// # Errors
    ///
    /// Returns `Rejection::NoActiveStore` when the active id names no tenant,
    /// `Rejection::InsufficientCredits` below [`MIN_DUEL_CREDITS`], or
    /// `Rejection::GenerationFailed` when no scenario could be generated.
    #[instrument(skip(self))]
    pub async fn start_duel(&mut self) -> Result<DuelScenario, Rejection> {
        let Some(store) = self
            .writable_tenant_id()
            .and_then(|id| self.collection.get(&id))
        else {
            return Err(self.reject(Rejection::NoActiveStore));
        };
        if store.marketing_stats.ad_credits < MIN_DUEL_CREDITS {
            return Err(self.reject(Rejection::InsufficientCredits));
        }
        let category = store.settings.category.clone();

        let generator = self.generator.clone();
        generator.duel_scenario(&category).await.ok_or_else(|| {
            self.reject(Rejection::GenerationFailed(
                "Failed to generate scenario. Try again.".to_string(),
            ))
        })
    }

    /// Settle a duel for the headline the merchant picked.
    ///
    /// # Errors
    ///
    /// Returns `Rejection::NoActiveStore` when the active id names no tenant,
    /// and `Rejection::InvalidWager` unless `1 <= wager <= ad_credits`.
    pub fn settle_duel(
        &mut self,
        scenario: &DuelScenario,
        pick: DuelOption,
        wager: i64,
    ) -> Result<DuelOutcome, Rejection> {
        if self.writable_tenant_id().is_none() {
            return Err(self.reject(Rejection::NoActiveStore));
        }
        let stats = self.marketing_stats().clone();
        if wager < 1 || wager > stats.ad_credits {
            return Err(self.reject(Rejection::InvalidWager {
                max: stats.ad_credits,
            }));
        }

        let (outcome, patch) = if pick == scenario.winner {
            let earnings = duel_earnings(wager, scenario.odds);
            (
                DuelOutcome::Won { earnings },
                MarketingStatsPatch {
                    ad_credits: Some(stats.ad_credits.saturating_add(earnings)),
                    wins: Some(stats.wins.saturating_add(1)),
                    streak: Some(stats.streak.saturating_add(1)),
                    total_earnings: Some(stats.total_earnings.saturating_add(earnings)),
                    ..MarketingStatsPatch::default()
                },
            )
        } else {
            (
                DuelOutcome::Lost { wager },
                MarketingStatsPatch {
                    ad_credits: Some(stats.ad_credits - wager),
                    losses: Some(stats.losses.saturating_add(1)),
                    streak: Some(0),
                    ..MarketingStatsPatch::default()
                },
            )
        };

        self.update_marketing_stats(patch);
        tracing::info!(?outcome, wager, odds = %scenario.odds, "Duel settled");
        match outcome {
            DuelOutcome::Won { earnings } => {
                self.notifications
                    .success(format!("You won {earnings} Credits!"));
            }
            DuelOutcome::Lost { wager } => {
                self.notifications
                    .error(format!("Lost {wager} Credits. Better luck next time!"));
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use storeloom_core::{NotificationKind, StoreId};

    use crate::collection::{PlatformCredentials, TenantCollection};
    use crate::models::Store;

    use super::super::test_support::{ScriptedCatalog, builder, messages, studio};
    use super::*;

    fn scenario(odds: Decimal) -> DuelScenario {
        DuelScenario {
            product_name: "AeroBottle".to_string(),
            product_context: "Self-cleaning bottle".to_string(),
            option_a: "Stay hydrated".to_string(),
            option_b: "Only 12 left".to_string(),
            winner: DuelOption::B,
            reason: "Scarcity".to_string(),
            odds,
        }
    }

    #[test]
    fn test_earnings_floor() {
        assert_eq!(duel_earnings(50, Decimal::new(18, 1)), 90);
        assert_eq!(duel_earnings(33, Decimal::new(15, 1)), 49);
    }

    #[tokio::test]
    async fn test_win_and_loss_update_stats() {
        let mut studio = studio();
        studio.create_tenant("Nova", "Tech");
        let duel = scenario(Decimal::new(18, 1));

        let outcome = studio.settle_duel(&duel, DuelOption::B, 50).unwrap();
        assert_eq!(outcome, DuelOutcome::Won { earnings: 90 });
        let stats = studio.marketing_stats();
        assert_eq!(stats.ad_credits, 1090);
        assert_eq!((stats.wins, stats.streak, stats.total_earnings), (1, 1, 90));

        let outcome = studio.settle_duel(&duel, DuelOption::A, 100).unwrap();
        assert_eq!(outcome, DuelOutcome::Lost { wager: 100 });
        let stats = studio.marketing_stats();
        assert_eq!(stats.ad_credits, 990);
        assert_eq!((stats.losses, stats.streak), (1, 0));

        assert_eq!(
            messages(&studio, NotificationKind::Error),
            vec!["Lost 100 Credits. Better luck next time!"]
        );
    }

    #[tokio::test]
    async fn test_wager_must_fit_credits() {
        let mut studio = studio();
        studio.create_tenant("Nova", "Tech");
        let duel = scenario(Decimal::TWO);

        let err = studio.settle_duel(&duel, DuelOption::B, 0).unwrap_err();
        assert_eq!(err, Rejection::InvalidWager { max: 1000 });
        assert!(studio.settle_duel(&duel, DuelOption::B, 1001).is_err());
        assert_eq!(studio.marketing_stats().wins, 0);
    }

    #[tokio::test]
    async fn test_duel_rejected_when_active_id_names_no_tenant() {
        let store = Store::new(StoreId::new("a"), "Alpha", "Tech", Utc::now().date_naive());
        let tenants = TenantCollection::new(vec![store], None, PlatformCredentials::default());
        let mut studio = builder(Arc::new(ScriptedCatalog::default()))
            .collection(tenants)
            .build()
            .unwrap();
        assert_eq!(studio.marketing_stats().ad_credits, 1000);

        assert_eq!(
            studio.start_duel().await.unwrap_err(),
            Rejection::NoActiveStore
        );
        let err = studio
            .settle_duel(&scenario(Decimal::TWO), DuelOption::B, 50)
            .unwrap_err();
        assert_eq!(err, Rejection::NoActiveStore);

        let stats = studio.marketing_stats();
        assert_eq!((stats.ad_credits, stats.wins, stats.total_earnings), (1000, 0, 0));
        assert!(messages(&studio, NotificationKind::Success).is_empty());
    }

    #[tokio::test]
    async fn test_start_duel_requires_credits() {
        let mut studio = studio();
        studio.create_tenant("Nova", "Tech");
        studio.update_marketing_stats(MarketingStatsPatch {
            ad_credits: Some(9),
            ..MarketingStatsPatch::default()
        });
        assert_eq!(studio.default_wager(), 9);
        assert_eq!(
            studio.start_duel().await.unwrap_err(),
            Rejection::InsufficientCredits
        );

        studio.update_marketing_stats(MarketingStatsPatch {
            ad_credits: Some(10),
            ..MarketingStatsPatch::default()
        });
        assert!(matches!(
            studio.start_duel().await,
            Err(Rejection::GenerationFailed(_))
        ));
        assert!(
            messages(&studio, NotificationKind::Error)
                .contains(&"Failed to generate scenario. Try again.".to_string())
        );
    }
}
