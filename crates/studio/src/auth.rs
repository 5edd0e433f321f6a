//! Session contract for the signed-in merchant.
//!
//! Sign-in screens live outside this crate; the studio only asks whether a
//! session exists and asks for it to be ended.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

/// Provider of the merchant session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Whether a merchant is currently signed in.
    async fn has_session(&self) -> bool;

    /// End the current session, if any.
    async fn sign_out(&self);
}

/// In-process session flag.
#[derive(Debug, Clone, Default)]
pub struct LocalSession {
    signed_in: Arc<AtomicBool>,
}

impl LocalSession {
    /// Session that starts signed in.
    #[must_use]
    pub fn signed_in() -> Self {
        Self {
            signed_in: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn sign_in(&self) {
        self.signed_in.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionProvider for LocalSession {
    async fn has_session(&self) -> bool {
        self.signed_in.load(Ordering::SeqCst)
    }

    async fn sign_out(&self) {
        if self.signed_in.swap(false, Ordering::SeqCst) {
            tracing::info!("Signed out");
        }
    }
}
