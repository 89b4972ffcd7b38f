//! Bucket listing backends.

use aws_config::meta::region::RegionProviderChain;
use aws_config::SdkConfig;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use tokio::runtime::Runtime;

use super::model::{BucketListing, DeleteMarker, ObjectVersion};
use crate::error::{LinterError, Result};

/// Region reported for buckets without a location constraint.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Read access to a versioned bucket.
pub trait InventorySource {
    /// Fail unless the bucket exists and is accessible.
    fn check_access(&self, bucket: &str) -> Result<()>;

    /// Every version and delete marker under `prefix`.
    fn list_versions(&self, bucket: &str, prefix: Option<&str>) -> Result<BucketListing>;
}

/// Error text for a failed access check, keyed by HTTP status.
pub fn access_error(bucket: &str, status: Option<u16>, detail: &str) -> LinterError {
    let message = match status {
        Some(404) => format!("Bucket '{}' does not exist", bucket),
        Some(403) => format!("Permission denied for bucket '{}'", bucket),
        _ => format!("Error accessing bucket: {}", detail),
    };
    LinterError::S3Access {
        bucket: bucket.to_string(),
        message,
    }
}

/// Listing prefix for an inventory path: slashes trimmed, one trailing `/`.
///
/// An empty path lists the whole bucket.
pub fn normalize_prefix(path: &str) -> Option<String> {
    let trimmed = path.trim_matches('/');
    (!trimmed.is_empty()).then(|| format!("{}/", trimmed))
}

/// S3 client settings for a bucket living in `region`.
pub fn regional_config(sdk_config: &SdkConfig, region: &str) -> aws_sdk_s3::Config {
    aws_sdk_s3::config::Builder::from(sdk_config)
        .region(Region::new(region.to_string()))
        .build()
}

/// [`InventorySource`] backed by the AWS SDK.
///
/// Bucket operations go to the bucket's own region, since the SDK does not
/// follow S3 region redirects.
pub struct S3Source {
    sdk_config: SdkConfig,
    client: Client,
    runtime: Runtime,
}

impl S3Source {
    /// Load credentials from the default chain, optionally with a named profile.
    ///
    /// Without a configured region, requests start in [`DEFAULT_REGION`].
    pub fn connect(profile: Option<&str>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let sdk_config = runtime.block_on(async {
            let region = RegionProviderChain::default_provider().or_else(Region::new(DEFAULT_REGION));
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);
            if let Some(profile) = profile {
                loader = loader.profile_name(profile);
            }
            loader.load().await
        });

        Ok(Self {
            client: Client::new(&sdk_config),
            sdk_config,
            runtime,
        })
    }

    async fn region(&self, bucket: &str) -> Result<String> {
        let location = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                access_error(bucket, status, &describe(&e))
            })?;

        Ok(location
            .location_constraint()
            .map(|c| c.as_str().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string()))
    }

    async fn bucket_client(&self, bucket: &str) -> Result<(Client, String)> {
        let region = self.region(bucket).await?;
        tracing::debug!("Bucket {} is in {}", bucket, region);
        let client = Client::from_conf(regional_config(&self.sdk_config, &region));
        Ok((client, region))
    }

    async fn head(&self, bucket: &str) -> Result<()> {
        let (client, _) = self.bucket_client(bucket).await?;
        client.head_bucket().bucket(bucket).send().await.map(|_| ()).map_err(|e| {
            let status = e.raw_response().map(|r| r.status().as_u16());
            access_error(bucket, status, &describe(&e))
        })
    }

    async fn list(&self, bucket: &str, prefix: Option<&str>) -> Result<BucketListing> {
        let (client, region) = self.bucket_client(bucket).await?;
        let mut listing = BucketListing::default();
        let mut key_marker: Option<String> = None;
        let mut version_marker: Option<String> = None;

        loop {
            let page = client
                .list_object_versions()
                .bucket(bucket)
                .set_prefix(prefix.map(str::to_string))
                .set_key_marker(key_marker.take())
                .set_version_id_marker(version_marker.take())
                .send()
                .await
                .map_err(|e| listing_error(bucket, &e))?;

            for version in page.versions() {
                let Some(key) = version.key() else { continue };
                listing.versions.push(ObjectVersion {
                    bucket: bucket.to_string(),
                    region: region.clone(),
                    key: key.to_string(),
                    version_id: version.version_id().map(str::to_string),
                    size: version.size().map_or(0, |s| s.max(0) as u64),
                    last_modified: to_chrono(version.last_modified()),
                    storage_class: version.storage_class().map(|c| c.as_str().to_string()),
                    e_tag: version.e_tag().map(str::to_string),
                });
            }

            for marker in page.delete_markers() {
                let Some(key) = marker.key() else { continue };
                listing.delete_markers.push(DeleteMarker {
                    bucket: bucket.to_string(),
                    region: region.clone(),
                    key: key.to_string(),
                    version_id: marker.version_id().map(str::to_string),
                    last_modified: to_chrono(marker.last_modified()),
                });
            }

            if !page.is_truncated().unwrap_or(false) {
                break;
            }
            key_marker = page.next_key_marker().map(str::to_string);
            version_marker = page.next_version_id_marker().map(str::to_string);
            if key_marker.is_none() && version_marker.is_none() {
                break;
            }
            tracing::debug!(
                "Listed {} versions of {} so far",
                listing.versions.len(),
                bucket
            );
        }

        Ok(listing)
    }
}

impl InventorySource for S3Source {
    fn check_access(&self, bucket: &str) -> Result<()> {
        self.runtime.block_on(self.head(bucket))
    }

    fn list_versions(&self, bucket: &str, prefix: Option<&str>) -> Result<BucketListing> {
        self.runtime.block_on(self.list(bucket, prefix))
    }
}

fn listing_error<E, R>(bucket: &str, err: &SdkError<E, R>) -> LinterError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    LinterError::S3Access {
        bucket: bucket.to_string(),
        message: format!("Error listing bucket contents: {}", describe(err)),
    }
}

fn describe<E, R>(err: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(service) => {
            let inner = service.err();
            match (inner.code(), inner.message()) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                (Some(code), None) => code.to_string(),
                _ => inner.to_string(),
            }
        }
        other => other.to_string(),
    }
}

fn to_chrono(timestamp: Option<&aws_sdk_s3::primitives::DateTime>) -> DateTime<Utc> {
    timestamp
        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
        .unwrap_or_default()
}
