//! Storage API operations for the photo bucket.

use reqwest::header::CONTENT_TYPE;
use tracing::{info, instrument};

use crate::backend::ObjectStorage;

use super::{SupabaseClient, SupabaseError};

impl SupabaseClient {
    /// Upload an object to the photo bucket.
    ///
    /// Sends `x-upsert: false`, so an existing key is rejected instead of
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or if Storage rejects the upload.
    #[instrument(skip(self, bytes), fields(bucket = %self.bucket(), size = bytes.len()))]
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        let url = self.storage_url(&format!("object/{}/{key}", self.bucket()));

        self.send(
            self.http()
                .post(url)
                .header(CONTENT_TYPE, content_type)
                .header("x-upsert", "false")
                .body(bytes),
        )
        .await?;

        info!(key = %key, "Object uploaded");
        Ok(())
    }

    /// Public URL for an object in the photo bucket.
    #[must_use]
    pub fn object_public_url(&self, key: &str) -> String {
        self.storage_url(&format!("object/public/{}/{key}", self.bucket()))
    }
}

impl ObjectStorage for SupabaseClient {
    async fn upload_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        self.upload(key, bytes, content_type).await
    }

    fn public_url(&self, key: &str) -> String {
        self.object_public_url(key)
    }
}
