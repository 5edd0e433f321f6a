//! Growth arena: one duel per invocation.

use storeloom_studio::StudioConfig;
use storeloom_studio::ai::DuelOption;
use storeloom_studio::studio::DuelOutcome;

use super::{CommandError, open};

/// Generate a duel, reveal both options, then settle it for `pick`.
pub async fn duel(
    config: &StudioConfig,
    pick: DuelOption,
    wager: Option<i64>,
) -> Result<(), CommandError> {
    let mut studio = open(config).await?;

    let scenario = match studio.start_duel().await {
        Ok(scenario) => scenario,
        Err(rejection) => {
            studio.shutdown().await;
            return Err(rejection.into());
        }
    };
    tracing::info!("{}: {}", scenario.product_name, scenario.product_context);
    tracing::info!("A: {}", scenario.option_a);
    tracing::info!("B: {}", scenario.option_b);

    let wager = wager.unwrap_or_else(|| studio.default_wager());
    let result = studio.settle_duel(&scenario, pick, wager);
    let credits = studio.marketing_stats().ad_credits;
    studio.shutdown().await;

    match result? {
        DuelOutcome::Won { earnings } => tracing::info!(earnings, credits, "Duel won"),
        DuelOutcome::Lost { wager } => tracing::info!(wager, credits, "Duel lost"),
    }
    tracing::info!("Winner: {:?}. {}", scenario.winner, scenario.reason);
    Ok(())
}
