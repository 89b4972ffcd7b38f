//! Records returned by a bucket listing.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One stored version of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectVersion {
    pub bucket: String,
    pub region: String,
    pub key: String,
    pub version_id: Option<String>,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub storage_class: Option<String>,
    pub e_tag: Option<String>,
}

/// A delete marker left by a versioned delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMarker {
    pub bucket: String,
    pub region: String,
    pub key: String,
    pub version_id: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// Everything listed under a prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketListing {
    pub versions: Vec<ObjectVersion>,
    pub delete_markers: Vec<DeleteMarker>,
}

impl BucketListing {
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty() && self.delete_markers.is_empty()
    }
}

/// `s3://bucket/key`, with `?versionId=` when versioned.
pub fn s3_uri(bucket: &str, key: &str, version_id: Option<&str>) -> String {
    with_version(format!("s3://{}/{}", bucket, key), version_id)
}

/// Virtual-hosted HTTPS URL for an object.
pub fn http_uri(bucket: &str, region: &str, key: &str, version_id: Option<&str>) -> String {
    with_version(
        format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
        version_id,
    )
}

fn with_version(uri: String, version_id: Option<&str>) -> String {
    match version_id.filter(|v| !v.is_empty()) {
        Some(id) => format!("{}?versionId={}", uri, id),
        None => uri,
    }
}

/// A live object version as written to the JSON inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    pub uri: String,
    pub base_uri: String,
    pub bucket: String,
    pub key: String,
    pub version_id: Option<String>,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub storage_class: Option<String>,
    pub e_tag: Option<String>,
}

impl From<&ObjectVersion> for InventoryEntry {
    fn from(version: &ObjectVersion) -> Self {
        Self {
            uri: s3_uri(&version.bucket, &version.key, version.version_id.as_deref()),
            base_uri: s3_uri(&version.bucket, &version.key, None),
            bucket: version.bucket.clone(),
            key: version.key.clone(),
            version_id: version.version_id.clone(),
            size: version.size,
            last_modified: version.last_modified,
            storage_class: version.storage_class.clone(),
            e_tag: version.e_tag.clone(),
        }
    }
}
