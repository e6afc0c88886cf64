//! AWS S3 storage backend

use super::traits::ObjectStore;
use super::url::{public_url, UrlStrategy};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials as SdkCredentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client,
};
use bytes::Bytes;
use filegate_auth::Credentials;
use filegate_core::{GatewayError, Result, StorageKey};
use tracing::{debug, info, warn};

/// Connection settings for an S3 bucket
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub credentials: Credentials,
    /// Custom endpoint for S3-compatible providers
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub urls: UrlStrategy,
    /// Follow continuation tokens when listing instead of stopping after one page
    pub list_all_pages: bool,
}

impl S3Settings {
    pub fn new(
        bucket: impl Into<String>,
        region: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            credentials,
            endpoint_url: None,
            force_path_style: false,
            urls: UrlStrategy::default(),
            list_all_pages: false,
        }
    }
}

/// Bucket handle backed by the AWS SDK client
pub struct S3Store {
    client: Client,
    bucket: String,
    urls: UrlStrategy,
    list_all_pages: bool,
}

impl S3Store {
    /// Build an authenticated client from static credentials
    pub async fn connect(settings: S3Settings) -> Self {
        let credentials = SdkCredentials::new(
            settings.credentials.access_key_id,
            settings.credentials.secret_access_key,
            None,
            None,
            "filegate",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.force_path_style)
            .build();

        info!(
            bucket = %settings.bucket,
            region = %settings.region,
            endpoint = ?settings.endpoint_url,
            "Connected S3 client"
        );

        Self::from_client(
            Client::from_conf(config),
            settings.bucket,
            settings.urls,
            settings.list_all_pages,
        )
    }

    pub fn from_client(
        client: Client,
        bucket: impl Into<String>,
        urls: UrlStrategy,
        list_all_pages: bool,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            urls,
            list_all_pages,
        }
    }

    async fn object_url(&self, key: &StorageKey) -> Result<String> {
        match self.urls {
            UrlStrategy::Public => Ok(public_url(&self.bucket, key.as_str())),
            UrlStrategy::Presigned { expires_in } => {
                let config = PresigningConfig::expires_in(expires_in)
                    .map_err(|e| GatewayError::upload(key.as_str(), e))?;
                let request = self
                    .client
                    .get_object()
                    .bucket(&self.bucket)
                    .key(key.as_str())
                    .presigned(config)
                    .await
                    .map_err(|e| GatewayError::upload(key.as_str(), e))?;
                Ok(request.uri().to_string())
            }
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &StorageKey, body: Bytes) -> Result<String> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .body(ByteStream::from(body))
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| GatewayError::upload(key.as_str(), e))?;
        debug!(bucket = %self.bucket, key = %key, size, "Stored object");

        self.object_url(key).await
    }

    async fn delete(&self, key: &StorageKey) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| GatewayError::delete(key.as_str(), e))?;
        debug!(bucket = %self.bucket, key = %key, "Deleted object");
        Ok(())
    }

    async fn list_by_prefix(&self, prefix: &StorageKey) -> Result<Vec<StorageKey>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix.as_str())
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| GatewayError::list(prefix.as_str(), e))?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .map(StorageKey::from),
            );

            let truncated = response.is_truncated().unwrap_or(false);
            if !truncated {
                break;
            }
            if !self.list_all_pages {
                warn!(
                    bucket = %self.bucket,
                    prefix = %prefix,
                    returned = keys.len(),
                    "Listing truncated to one page"
                );
                break;
            }
            match response.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }
}
