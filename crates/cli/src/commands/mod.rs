//! Command implementations.
//!
//! Each command opens the studio, applies one operation, then shuts it down
//! so pending catalog sync and snapshot writes land before the process
//! exits. Notifications reach the terminal through the studio's own logging.

pub mod arena;
pub mod brand;
pub mod migrate;
pub mod order;
pub mod product;
pub mod section;
pub mod tenant;

use storeloom_studio::{Rejection, Studio, StudioConfig, StudioError};
use thiserror::Error;

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The studio could not be opened.
    #[error("{0}")]
    Studio(#[from] StudioError),

    /// The studio refused the operation.
    #[error("{0}")]
    Rejected(#[from] Rejection),

    /// No record with this id on the active tenant.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A JSON argument could not be parsed.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The command cannot run in this build or environment.
    #[error("{0}")]
    Unavailable(&'static str),

    /// The snapshot database could not be migrated.
    #[error("Persistence error: {0}")]
    Persistence(#[from] storeloom_studio::persistence::PersistenceError),
}

impl CommandError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_owned(),
        }
    }
}

/// Open the studio described by `config`.
pub async fn open(config: &StudioConfig) -> Result<Studio, CommandError> {
    Ok(Studio::open(config).await?)
}
