//! Page layout blocks of the active tenant.

use chrono::Utc;
use serde_json::Value;

use storeloom_core::{MoveDirection, SectionId};

use crate::error::Rejection;
use crate::ids;
use crate::models::{ProfileSection, SectionContent, SectionPatchError, SectionType};

use super::Studio;

fn invalid_content(kind: SectionType, error: &SectionPatchError) -> Rejection {
    Rejection::InvalidSectionContent {
        kind: kind.to_string(),
        reason: error.to_string(),
    }
}

impl Studio {
    /// Append a block with default content merged with `overrides`.
    ///
    /// # Errors
    ///
    /// Returns `Rejection::InvalidSectionContent` when the overrides do not
    /// fit the block type.
    pub fn add_section(
        &mut self,
        kind: SectionType,
        overrides: &Value,
    ) -> Result<SectionId, Rejection> {
        let content = SectionContent::default_for(kind, Utc::now())
            .merged(overrides)
            .map_err(|e| self.reject(invalid_content(kind, &e)))?;

        let id = SectionId::new(ids::short_token());
        let section = ProfileSection {
            id: id.clone(),
            title: None,
            is_visible: true,
            content,
        };
        self.modify_active_tenant(|store| store.sections.push(section));
        self.notifications.success(format!("Added {kind} block"));
        Ok(id)
    }

    pub fn remove_section(&mut self, id: &SectionId) {
        self.modify_active_tenant(|store| store.sections.retain(|s| &s.id != id));
    }

    /// Shallow-merge `patch` into a block's content, keeping its type.
    ///
    /// Returns `Ok(false)` when no block has this id.
    ///
    /// # Errors
    ///
    /// Returns `Rejection::InvalidSectionContent` when the merged content no
    /// longer fits the block type. The block is left unchanged.
    pub fn update_section(&mut self, id: &SectionId, patch: &Value) -> Result<bool, Rejection> {
        let Some(section) = self.sections().iter().find(|s| &s.id == id) else {
            return Ok(false);
        };
        let content = match section.content.merged(patch) {
            Ok(content) => content,
            Err(e) => {
                let rejection = invalid_content(section.kind(), &e);
                return Err(self.reject(rejection));
            }
        };

        Ok(self.modify_active_tenant(|store| {
            if let Some(section) = store.sections.iter_mut().find(|s| &s.id == id) {
                section.content = content;
            }
        }))
    }

    /// Show or hide a block.
    pub fn set_section_visibility(&mut self, id: &SectionId, visible: bool) {
        self.modify_active_tenant(|store| {
            if let Some(section) = store.sections.iter_mut().find(|s| &s.id == id) {
                section.is_visible = visible;
            }
        });
    }

    /// Swap a block with its neighbour. Moves past either end are ignored.
    pub fn move_section(&mut self, id: &SectionId, direction: MoveDirection) {
        let Some(index) = self.sections().iter().position(|s| &s.id == id) else {
            return;
        };
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&t| t < self.sections().len()),
        };
        let Some(target) = target else {
            return;
        };
        self.modify_active_tenant(|store| store.sections.swap(index, target));
    }
}
