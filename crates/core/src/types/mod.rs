//! Core types for Storeloom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use credential::SecretKey;
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{DEFAULT_TAX_RATE, round_cents, to_minor_units};
pub use status::*;
