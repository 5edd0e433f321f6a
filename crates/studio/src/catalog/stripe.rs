//! Stripe-compatible REST client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use storeloom_core::SecretKey;

use crate::config::CatalogConfig;

use super::error::ApiErrorResponse;
use super::{
    CatalogAccount, CatalogError, CatalogGateway, CatalogItemUpdate, NewCatalogItem,
    NewCatalogPrice,
};

/// Minimal shape of any created catalog object.
#[derive(Debug, Deserialize)]
struct CreatedObject {
    id: String,
}

/// Payment catalog client.
///
/// Holds no credentials; every call authenticates with the key it is given.
#[derive(Clone)]
pub struct StripeCatalogClient {
    inner: Arc<StripeCatalogClientInner>,
}

struct StripeCatalogClientInner {
    client: reqwest::Client,
    api_base: String,
}

impl StripeCatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(StripeCatalogClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.api_base)
    }

    /// Execute a form POST and parse the created object.
    async fn post_form(
        &self,
        key: &SecretKey,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<CreatedObject, CatalogError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .bearer_auth(key.expose())
            .form(form)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| CatalogError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response).await)
    }

    /// Parse error response from the catalog API.
    async fn parse_error(&self, response: reqwest::Response) -> CatalogError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            return CatalogError::RateLimited(retry_after);
        }

        if status == 401 {
            return CatalogError::Unauthorized;
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or(body);

        CatalogError::Api { status, message }
    }
}

impl std::fmt::Debug for StripeCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeCatalogClient")
            .field("api_base", &self.inner.api_base)
            .finish_non_exhaustive()
    }
}

fn item_form(item: &NewCatalogItem) -> Vec<(&'static str, String)> {
    let mut form = vec![("name", item.name.clone())];
    if let Some(description) = &item.description {
        form.push(("description", description.clone()));
    }
    if let Some(image) = &item.image {
        form.push(("images[]", image.clone()));
    }
    form
}

fn update_form(update: &CatalogItemUpdate) -> Vec<(&'static str, String)> {
    let mut form = Vec::new();
    if let Some(name) = &update.name {
        form.push(("name", name.clone()));
    }
    if let Some(description) = &update.description {
        form.push(("description", description.clone()));
    }
    form
}

#[async_trait]
impl CatalogGateway for StripeCatalogClient {
    #[instrument(skip(self, key, item), fields(name = %item.name))]
    async fn create_item(
        &self,
        key: &SecretKey,
        item: &NewCatalogItem,
    ) -> Result<String, CatalogError> {
        let created = self.post_form(key, "/products", &item_form(item)).await?;
        tracing::debug!(item_ref = %created.id, "Catalog item created");
        Ok(created.id)
    }

    #[instrument(skip(self, key, price), fields(item_ref = %price.item_ref, unit_amount = price.unit_amount))]
    async fn create_price(
        &self,
        key: &SecretKey,
        price: &NewCatalogPrice,
    ) -> Result<String, CatalogError> {
        let form = [
            ("unit_amount", price.unit_amount.to_string()),
            ("currency", price.currency.clone()),
            ("product", price.item_ref.clone()),
        ];
        let created = self.post_form(key, "/prices", &form).await?;
        tracing::debug!(price_ref = %created.id, "Catalog price created");
        Ok(created.id)
    }

    #[instrument(skip(self, key, update))]
    async fn update_item(
        &self,
        key: &SecretKey,
        item_ref: &str,
        update: &CatalogItemUpdate,
    ) -> Result<(), CatalogError> {
        let form = update_form(update);
        if form.is_empty() {
            return Ok(());
        }
        self.post_form(key, &format!("/products/{item_ref}"), &form)
            .await
            .map(|_| ())
    }

    #[instrument(skip(self, key))]
    async fn retrieve_account(&self, key: &SecretKey) -> Result<CatalogAccount, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.url("/account"))
            .bearer_auth(key.expose())
            .send()
            .await?;
        self.handle_response(response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_form_fields() {
        let form = item_form(&NewCatalogItem {
            name: "Mug".to_string(),
            description: None,
            image: Some("https://cdn.example.com/mug.png".to_string()),
        });
        assert_eq!(
            form,
            vec![
                ("name", "Mug".to_string()),
                ("images[]", "https://cdn.example.com/mug.png".to_string()),
            ]
        );
    }

    #[test]
    fn test_update_form_skips_absent_fields() {
        assert!(update_form(&CatalogItemUpdate::default()).is_empty());
        let form = update_form(&CatalogItemUpdate {
            name: None,
            description: Some("Copy".to_string()),
        });
        assert_eq!(form, vec![("description", "Copy".to_string())]);
    }

    #[test]
    fn test_url_joins_base() {
        let client = StripeCatalogClient::new(&CatalogConfig {
            api_base: "http://localhost:12111/v1/".to_string(),
        })
        .unwrap();
        assert_eq!(client.url("/prices"), "http://localhost:12111/v1/prices");
    }

    #[test]
    fn test_debug_shows_base_only() {
        let client = StripeCatalogClient::new(&CatalogConfig::default()).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("api.stripe.com"));
    }
}
