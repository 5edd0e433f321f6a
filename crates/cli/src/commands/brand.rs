//! Brand identity commands.

use storeloom_studio::StudioConfig;

use super::{CommandError, open};

/// Generate mission, vision, values and tone, and merge them into the brand.
pub async fn strategy(config: &StudioConfig) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    studio.apply_brand_strategy().await;
    studio.shutdown().await;
    Ok(())
}

/// Print the active tenant's brand identity as JSON.
pub async fn show(config: &StudioConfig) -> Result<(), CommandError> {
    let studio = open(config).await?;
    let identity = serde_json::to_string_pretty(studio.brand_identity())?;
    tracing::info!("\n{identity}");
    Ok(())
}
