//! The tenant collection and its active-tenant indirection.

use serde::{Deserialize, Serialize};

use storeloom_core::{SecretKey, StoreId};

use crate::models::Store;

/// Payment platform keys shared by every tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformCredentials {
    pub public_key: String,
    pub secret_key: SecretKey,
}

/// Every tenant, the active selection and the global credentials.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenantCollection {
    tenants: Vec<Store>,
    active_id: Option<StoreId>,
    platform: PlatformCredentials,
}

impl TenantCollection {
    #[must_use]
    pub const fn new(
        tenants: Vec<Store>,
        active_id: Option<StoreId>,
        platform: PlatformCredentials,
    ) -> Self {
        Self {
            tenants,
            active_id,
            platform,
        }
    }

    /// All tenants in creation order.
    #[must_use]
    pub fn tenants(&self) -> &[Store] {
        &self.tenants
    }

    /// The stored active id, which may reference no tenant.
    #[must_use]
    pub const fn active_id(&self) -> Option<&StoreId> {
        self.active_id.as_ref()
    }

    #[must_use]
    pub const fn platform(&self) -> &PlatformCredentials {
        &self.platform
    }

    /// The tenant reads go to.
    ///
    /// When the stored id matches no tenant, the first tenant stands in.
    #[must_use]
    pub fn active(&self) -> Option<&Store> {
        self.active_id
            .as_ref()
            .and_then(|id| self.get(id))
            .or_else(|| self.tenants.first())
    }

    #[must_use]
    pub fn get(&self, id: &StoreId) -> Option<&Store> {
        self.tenants.iter().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &StoreId) -> bool {
        self.get(id).is_some()
    }

    /// Append a tenant and make it active.
    pub fn insert_and_activate(&mut self, store: Store) {
        self.active_id = Some(store.id.clone());
        self.tenants.push(store);
    }

    /// Make `id` active. Returns `false` and changes nothing for unknown ids.
    pub fn activate(&mut self, id: &StoreId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.active_id = Some(id.clone());
        true
    }

    /// Replace the tenant whose id equals the stored active id.
    ///
    /// Writes never fall back to the first tenant: without an exact match
    /// this is a no-op returning `false`.
    pub fn update_active<F>(&mut self, transform: F) -> bool
    where
        F: FnOnce(Store) -> Store,
    {
        match self.active_id.clone() {
            Some(id) => self.update_tenant(&id, transform),
            None => false,
        }
    }

    /// Replace the tenant with the given id, keeping its position.
    pub fn update_tenant<F>(&mut self, id: &StoreId, transform: F) -> bool
    where
        F: FnOnce(Store) -> Store,
    {
        let Some(slot) = self.tenants.iter_mut().find(|s| &s.id == id) else {
            return false;
        };
        let current = std::mem::take(slot);
        *slot = transform(current);
        true
    }

    /// Apply `transform` to every tenant.
    pub fn update_all<F>(&mut self, mut transform: F)
    where
        F: FnMut(&mut Store),
    {
        self.tenants.iter_mut().for_each(&mut transform);
    }

    /// Replace the global credentials.
    pub fn set_platform(&mut self, platform: PlatformCredentials) {
        self.platform = platform;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(id: &str, name: &str) -> Store {
        let mut store = Store {
            id: StoreId::new(id),
            ..Store::default()
        };
        store.settings.name = name.to_string();
        store
    }

    fn collection() -> TenantCollection {
        TenantCollection::new(
            vec![store("a", "Alpha"), store("b", "Beta"), store("c", "Gamma")],
            Some(StoreId::new("b")),
            PlatformCredentials::default(),
        )
    }

    #[test]
    fn test_update_active_preserves_order_and_count() {
        let mut tenants = collection();
        let changed = tenants.update_active(|mut s| {
            s.settings.name = "Beta 2".to_string();
            s
        });

        assert!(changed);
        let names: Vec<&str> = tenants.tenants().iter().map(Store::name).collect();
        assert_eq!(names, ["Alpha", "Beta 2", "Gamma"]);
    }

    #[test]
    fn test_dangling_active_id_reads_first_but_writes_nothing() {
        let mut tenants = collection();
        tenants.active_id = Some(StoreId::new("gone"));

        assert_eq!(tenants.active().map(Store::name), Some("Alpha"));

        let before = tenants.clone();
        assert!(!tenants.update_active(|mut s| {
            s.settings.name = "Changed".to_string();
            s
        }));
        assert_eq!(tenants, before);
    }

    #[test]
    fn test_activate_unknown_is_noop() {
        let mut tenants = collection();
        assert!(!tenants.activate(&StoreId::new("zzz")));
        assert_eq!(tenants.active_id(), Some(&StoreId::new("b")));
        assert!(tenants.activate(&StoreId::new("c")));
        assert_eq!(tenants.active().map(Store::name), Some("Gamma"));
    }

    #[test]
    fn test_empty_collection_has_no_active() {
        let tenants = TenantCollection::default();
        assert!(tenants.active().is_none());
    }
}
