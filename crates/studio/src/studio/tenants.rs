//! Tenant lifecycle and the global payment credentials.

use chrono::Utc;
use tracing::instrument;

use storeloom_core::{SecretKey, StoreId};

use crate::catalog::CatalogAccount;
use crate::collection::PlatformCredentials;
use crate::error::Rejection;
use crate::ids;
use crate::models::Store;

use super::Studio;

impl Studio {
    /// Create a tenant with full defaults and make it active.
    ///
    /// When global platform keys exist the tenant gets a synthetic account
    /// reference and is stamped with the keys.
    pub fn create_tenant(&mut self, name: &str, category: &str) -> StoreId {
        let id = StoreId::new(ids::short_token());
        let mut store = Store::new(id.clone(), name, category, Utc::now().date_naive());

        let platform = self.collection.platform();
        if !platform.secret_key.is_empty() {
            store.external_account_ref = Some(format!("acct_virtual_{}", ids::digits(8)));
            store.settings.payment_enabled = true;
            store
                .settings
                .payment_public_key
                .clone_from(&platform.public_key);
            store.settings.payment_secret_key = platform.secret_key.clone();
        }

        self.collection.insert_and_activate(store);
        self.persist_tenants();
        self.persist_active_id();
        self.cart.clear();

        tracing::info!(store_id = %id, category, "Tenant created");
        self.notifications
            .success(format!("Store \"{name}\" created!"));
        id
    }

    /// Make `id` the active tenant. Unknown ids are ignored.
    pub fn switch_tenant(&mut self, id: &StoreId) -> bool {
        let Some(name) = self.collection.get(id).map(|s| s.name().to_string()) else {
            tracing::debug!(store_id = %id, "Switch to unknown tenant ignored");
            return false;
        };
        self.collection.activate(id);
        self.persist_active_id();
        self.cart.clear();
        self.notifications.info(format!("Switched to: {name}"));
        true
    }

    /// Replace the global keys and stamp them onto every tenant.
    pub fn update_platform_credentials(&mut self, public_key: &str, secret_key: SecretKey) {
        self.collection.set_platform(PlatformCredentials {
            public_key: public_key.to_string(),
            secret_key: secret_key.clone(),
        });
        self.collection.update_all(|store| {
            public_key.clone_into(&mut store.settings.payment_public_key);
            store.settings.payment_secret_key = secret_key.clone();
            store.settings.payment_enabled = true;
        });
        self.persist_platform();
        self.persist_tenants();
        self.notifications.success("Payment keys updated globally.");
    }

    /// Verify a secret key against the payment platform, then adopt it.
    ///
    /// # Errors
    ///
    /// Returns `Rejection::MalformedSecretKey` when the key lacks the
    /// platform's secret prefix, or `Rejection::PlatformUnavailable` when
    /// verification fails. Nothing changes in either case.
    #[instrument(skip(self, secret_key))]
    pub async fn connect_platform(
        &mut self,
        public_key: &str,
        secret_key: SecretKey,
    ) -> Result<CatalogAccount, Rejection> {
        if !secret_key.is_usable() {
            return Err(self.reject(Rejection::MalformedSecretKey));
        }

        let gateway = self.catalog.clone();
        let account = match gateway.retrieve_account(&secret_key).await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(error = %e, "Payment account verification failed");
                return Err(self.reject(Rejection::PlatformUnavailable(e.to_string())));
            }
        };

        self.update_platform_credentials(public_key, secret_key);
        self.notifications.success(format!(
            "Connected to payment account: {}",
            account.label()
        ));
        Ok(account)
    }
}
