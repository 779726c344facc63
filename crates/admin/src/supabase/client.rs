//! Supabase REST client.
//!
//! Wraps a `reqwest::Client` with the project URL and service key. Table
//! access lives in `tables.rs`, Storage access in `storage.rs`.

use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::config::SupabaseConfig;

use super::error::SupabaseError;

/// PostgREST path prefix.
const REST_PATH: &str = "rest/v1";

/// Storage API path prefix.
const STORAGE_PATH: &str = "storage/v1";

/// Supabase API client for the fleet tables and the photo bucket.
#[derive(Clone)]
pub struct SupabaseClient {
    /// HTTP client.
    client: Client,
    /// Project base URL without trailing slash.
    base_url: String,
    /// Service role key.
    service_key: SecretString,
    /// Bucket that holds variant photos.
    bucket: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("service_key", &"[REDACTED]")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            base_url: config.url.as_str().trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            bucket: config.image_bucket.clone(),
        }
    }

    /// Name of the photo bucket.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// URL of a PostgREST table endpoint.
    pub(super) fn table_url(&self, table: &str) -> String {
        format!("{}/{REST_PATH}/{table}", self.base_url)
    }

    /// URL of a PostgREST table endpoint with filter/order query parameters.
    pub(super) fn table_query(
        &self,
        table: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, SupabaseError> {
        Url::parse_with_params(&self.table_url(table), params)
            .map_err(|e| SupabaseError::Request(format!("invalid URL for {table}: {e}")))
    }

    /// URL of a Storage API endpoint.
    pub(super) fn storage_url(&self, path: &str) -> String {
        format!("{}/{STORAGE_PATH}/{path}", self.base_url)
    }

    /// Attach the `apikey` and bearer headers to a request.
    pub(super) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.service_key.expose_secret();
        request.header("apikey", key).bearer_auth(key)
    }

    pub(super) fn http(&self) -> &Client {
        &self.client
    }

    /// Send a request, turning transport failures and non-2xx responses into
    /// [`SupabaseError`].
    pub(super) async fn send(&self, request: RequestBuilder) -> Result<Response, SupabaseError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            error!(error = %e, "Supabase request failed");
            SupabaseError::Request(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Supabase request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = SupabaseError::from_response_body(status.as_u16(), &body);
        error!(status = status.as_u16(), error = %err, "Supabase API error");
        Err(err)
    }

    /// Send a request and decode its JSON body.
    pub(super) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SupabaseError> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| SupabaseError::Response(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> SupabaseConfig {
        SupabaseConfig {
            url: url::Url::parse("https://abcd.supabase.co/").unwrap(),
            service_key: SecretString::from("service-key-value"),
            image_bucket: "vehicle-images".to_string(),
            image_prefix: "vehicle-variants".to_string(),
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let client = SupabaseClient::new(&config());

        assert_eq!(
            client.table_url("vehicles"),
            "https://abcd.supabase.co/rest/v1/vehicles"
        );
        assert_eq!(
            client.storage_url("object/vehicle-images/a.jpg"),
            "https://abcd.supabase.co/storage/v1/object/vehicle-images/a.jpg"
        );
    }

    #[test]
    fn test_table_query_encodes_filters() {
        let client = SupabaseClient::new(&config());
        let url = client
            .table_query("car_owners", &[("select", "*"), ("status", "eq.active")])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://abcd.supabase.co/rest/v1/car_owners?select=*&status=eq.active"
        );
    }

    #[test]
    fn test_debug_redacts_service_key() {
        let client = SupabaseClient::new(&config());
        let debug_output = format!("{client:?}");

        assert!(debug_output.contains("abcd.supabase.co"));
        assert!(!debug_output.contains("service-key-value"));
    }
}
