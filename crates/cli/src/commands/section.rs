//! Page block commands for the active tenant.

use serde_json::Value;

use storeloom_core::{MoveDirection, SectionId};
use storeloom_studio::StudioConfig;
use storeloom_studio::models::SectionType;

use super::{CommandError, open};

fn parse_content(raw: Option<&str>) -> Result<Value, CommandError> {
    Ok(raw.map(serde_json::from_str).transpose()?.unwrap_or(Value::Null))
}

pub async fn add(
    config: &StudioConfig,
    kind: SectionType,
    content: Option<&str>,
) -> Result<(), CommandError> {
    let overrides = parse_content(content)?;
    let mut studio = open(config).await?;
    let result = studio.add_section(kind, &overrides);
    studio.shutdown().await;

    let id = result?;
    tracing::info!(section_id = %id, "Block added");
    Ok(())
}

pub async fn update(config: &StudioConfig, id: &str, content: &str) -> Result<(), CommandError> {
    let patch = parse_content(Some(content))?;
    let mut studio = open(config).await?;
    let result = studio.update_section(&SectionId::new(id), &patch);
    studio.shutdown().await;

    if result? {
        Ok(())
    } else {
        Err(CommandError::not_found("Block", id))
    }
}

pub async fn reorder(
    config: &StudioConfig,
    id: &str,
    direction: MoveDirection,
) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    studio.move_section(&SectionId::new(id), direction);
    studio.shutdown().await;
    Ok(())
}

pub async fn set_visible(config: &StudioConfig, id: &str, visible: bool) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    studio.set_section_visibility(&SectionId::new(id), visible);
    studio.shutdown().await;
    Ok(())
}

pub async fn remove(config: &StudioConfig, id: &str) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    studio.remove_section(&SectionId::new(id));
    studio.shutdown().await;
    Ok(())
}

pub async fn list(config: &StudioConfig) -> Result<(), CommandError> {
    let studio = open(config).await?;
    for (position, section) in studio.sections().iter().enumerate() {
        let visibility = if section.is_visible { "" } else { " (hidden)" };
        tracing::info!(
            "{}. {}  {}{visibility}",
            position + 1,
            section.id,
            section.kind()
        );
    }
    Ok(())
}
