//! Unified error handling for the studio.
//!
//! Two families live here:
//! - [`StudioError`] - infrastructure failures while opening a studio
//!   (configuration, HTTP client construction, storage backends).
//! - [`Rejection`] - user-input rejections. Every rejection has already been
//!   surfaced as an error notification when it is returned; its `Display` is
//!   the notification text.

use thiserror::Error;

use crate::ai::AiError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::PersistenceError;

/// Infrastructure error raised while assembling a studio.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot backend could not be reached.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Payment catalog client could not be built.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// AI client could not be built.
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// Built outside a Tokio runtime.
    #[error("No Tokio runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
}

/// A mutation refused because of user input.
///
/// No state changes when a rejection is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No tenant exists yet.
    #[error("Create a store first")]
    NoActiveStore,

    /// Physical product with nothing left in stock.
    #[error("Product out of stock")]
    OutOfStock,

    /// Adding one more unit would exceed the stock on hand.
    #[error("Only {available} available")]
    StockLimit {
        /// Units in stock.
        available: i64,
    },

    /// Checkout attempted with an empty cart.
    #[error("Your bag is empty")]
    EmptyCart,

    /// Checkout form is missing a required field or has an invalid email.
    #[error("Please fill in all fields")]
    IncompleteCheckout,

    /// Secret key does not follow the platform's format.
    #[error("Invalid Secret Key format. Must start with 'sk_'.")]
    MalformedSecretKey,

    /// The payment platform refused or could not verify the credentials.
    #[error("Payment connection failed: {0}")]
    PlatformUnavailable(String),

    /// Not enough ad credits to start a duel.
    #[error("Insufficient Ad Credits. Wait for daily reset.")]
    InsufficientCredits,

    /// Wager outside the credits on hand.
    #[error("Wager must be between 1 and {max} credits")]
    InvalidWager {
        /// Credits currently available.
        max: i64,
    },

    /// The content generator returned nothing usable.
    #[error("{0}")]
    GenerationFailed(String),

    /// Section content override does not fit the block type.
    #[error("Invalid {kind} block content: {reason}")]
    InvalidSectionContent {
        /// Section type tag.
        kind: String,
        /// Parser message.
        reason: String,
    },
}
