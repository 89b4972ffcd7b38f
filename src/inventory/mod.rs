//! Versioned S3 bucket inventory.
//!
//! Lists every object version and delete marker under a prefix and writes
//! a CSV inventory, a summary, and JSON and text inventories of the live
//! objects into an output directory.

pub mod model;
pub mod report;
pub mod source;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};

use crate::error::Result;

pub use model::{BucketListing, DeleteMarker, InventoryEntry, ObjectVersion};
pub use report::{process_objects, ProcessedObjects};
pub use source::{
    access_error, normalize_prefix, regional_config, InventorySource, S3Source, DEFAULT_REGION,
};

/// Default directory for inventory files.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Timestamp format used in file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What to inventory and where to write it.
#[derive(Debug, Clone)]
pub struct InventoryRequest {
    pub bucket: String,
    pub path: String,
    pub output_dir: PathBuf,
}

impl InventoryRequest {
    pub fn new(bucket: impl Into<String>, path: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn prefix(&self) -> Option<String> {
        normalize_prefix(&self.path)
    }

    /// File name suffix: the prefix with `/` as `_`, or `full`.
    pub fn suffix(&self) -> String {
        match self.prefix() {
            Some(prefix) => prefix.replace('/', "_").trim_end_matches('_').to_string(),
            None => "full".to_string(),
        }
    }

    pub fn files(&self, now: DateTime<Local>) -> InventoryFiles {
        InventoryFiles::new(&self.output_dir, &self.suffix(), &now.format(TIMESTAMP_FORMAT).to_string())
    }
}

/// Paths of every file an inventory run may write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryFiles {
    pub csv: PathBuf,
    pub summary: PathBuf,
    pub error_log: PathBuf,
    pub json: PathBuf,
    pub text: PathBuf,
}

impl InventoryFiles {
    pub fn new(output_dir: &Path, suffix: &str, timestamp: &str) -> Self {
        Self {
            csv: output_dir.join(format!("s3_inventory_{}_{}.csv", suffix, timestamp)),
            summary: output_dir.join(format!("s3_inventory_summary_{}_{}.txt", suffix, timestamp)),
            error_log: output_dir.join(format!("s3_inventory_errors_{}.log", timestamp)),
            json: output_dir.join(format!("inventory_{}.json", suffix)),
            text: output_dir.join(format!("inventory_{}.txt", suffix)),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryOutcome {
    /// Nothing was listed under the prefix.
    Empty { prefix: String },
    Written { files: InventoryFiles, live_objects: usize },
}

/// Run an inventory, writing the error log on failure.
pub fn run_inventory<S: InventorySource>(
    source: &S,
    request: &InventoryRequest,
    now: DateTime<Local>,
) -> Result<InventoryOutcome> {
    let files = request.files(now);
    let result = generate(source, request, &files, now);

    if let Err(e) = &result {
        record_failure(request, now, &e.to_string());
    }
    result
}

/// Write the run's error log. Returns the log path when it was written.
pub fn record_failure(request: &InventoryRequest, now: DateTime<Local>, message: &str) -> Option<PathBuf> {
    let error_log = request.files(now).error_log;
    match write_error_log(&request.output_dir, &error_log, message, now) {
        Ok(()) => Some(error_log),
        Err(e) => {
            tracing::error!("Could not write {}: {}", error_log.display(), e);
            None
        }
    }
}

fn generate<S: InventorySource>(
    source: &S,
    request: &InventoryRequest,
    files: &InventoryFiles,
    now: DateTime<Local>,
) -> Result<InventoryOutcome> {
    fs::create_dir_all(&request.output_dir)?;
    source.check_access(&request.bucket)?;

    let prefix = request.prefix();
    tracing::info!("Starting inventory of bucket: {}", request.bucket);
    let listing = source.list_versions(&request.bucket, prefix.as_deref())?;

    if listing.is_empty() {
        return Ok(InventoryOutcome::Empty {
            prefix: prefix.unwrap_or_else(|| "/".to_string()),
        });
    }

    write_file(&files.csv, |w| report::write_csv(&listing, w))?;
    write_file(&files.summary, |w| report::write_summary(&listing, &request.bucket, now, w))?;

    let objects = process_objects(&listing);
    let generated_at = now.with_timezone(&Utc);
    write_file(&files.json, |w| report::write_json_inventory(&objects, generated_at, w))?;
    write_file(&files.text, |w| report::write_text_inventory(&objects, w))?;

    tracing::info!(
        "Inventoried {} versions ({} live objects) in {}",
        listing.versions.len(),
        objects.len(),
        request.bucket
    );

    Ok(InventoryOutcome::Written {
        files: files.clone(),
        live_objects: objects.len(),
    })
}

fn write_file<F>(path: &Path, render: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    render(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_error_log(output_dir: &Path, path: &Path, message: &str, now: DateTime<Local>) -> std::io::Result<()> {
    fs::create_dir_all(output_dir)?;
    fs::write(
        path,
        format!("Error occurred at {}\n{}", now.to_rfc3339(), message),
    )
}
