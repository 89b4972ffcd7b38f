//! CSV, summary, JSON and text renderings of a bucket listing.

use std::collections::BTreeMap;
use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::model::{http_uri, s3_uri, BucketListing, InventoryEntry};

pub const CSV_HEADER: [&str; 8] = [
    "File Path",
    "Size (Bytes)",
    "Last Modified",
    "Version ID",
    "Storage Class",
    "S3 URI",
    "HTTP URI",
    "ETag",
];

/// Storage class shown for versions that report none.
pub const DEFAULT_STORAGE_CLASS: &str = "Standard";

const MISSING: &str = "-";
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Live objects keyed by object key, versions oldest first.
pub type ProcessedObjects = BTreeMap<String, Vec<InventoryEntry>>;

/// Write every version, then every delete marker, as CSV rows.
pub fn write_csv<W: Write>(listing: &BucketListing, writer: &mut W) -> io::Result<()> {
    write_row(writer, &CSV_HEADER)?;

    for v in &listing.versions {
        let version = v.version_id.as_deref();
        let size = v.size.to_string();
        let modified = v.last_modified.to_rfc3339();
        let s3 = s3_uri(&v.bucket, &v.key, version);
        let http = http_uri(&v.bucket, &v.region, &v.key, version);
        write_row(
            writer,
            &[
                &v.key,
                &size,
                &modified,
                version.unwrap_or(MISSING),
                v.storage_class.as_deref().unwrap_or(MISSING),
                &s3,
                &http,
                v.e_tag.as_deref().unwrap_or(MISSING),
            ],
        )?;
    }

    for dm in &listing.delete_markers {
        let version = dm.version_id.as_deref();
        let modified = dm.last_modified.to_rfc3339();
        let s3 = s3_uri(&dm.bucket, &dm.key, version);
        let http = http_uri(&dm.bucket, &dm.region, &dm.key, version);
        write_row(
            writer,
            &[
                &dm.key,
                "0",
                &modified,
                version.unwrap_or(MISSING),
                "DeleteMarker",
                &s3,
                &http,
                MISSING,
            ],
        )?;
    }

    Ok(())
}

fn write_row<W: Write>(writer: &mut W, fields: &[&str; 8]) -> io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    write!(writer, "{}\r\n", line.join(","))
}

/// Quote a field when it contains a delimiter, quote or line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Totals and storage class distribution.
pub fn write_summary<W: Write>(
    listing: &BucketListing,
    bucket: &str,
    generated: DateTime<Local>,
    writer: &mut W,
) -> io::Result<()> {
    let unique: std::collections::BTreeSet<&str> =
        listing.versions.iter().map(|v| v.key.as_str()).collect();
    let total_size: u64 = listing.versions.iter().map(|v| v.size).sum();

    let mut classes: BTreeMap<&str, usize> = BTreeMap::new();
    for v in &listing.versions {
        let class = v.storage_class.as_deref().unwrap_or(DEFAULT_STORAGE_CLASS);
        *classes.entry(class).or_default() += 1;
    }

    let rule = "-".repeat(40);
    writeln!(writer, "S3 Bucket Inventory Summary")?;
    writeln!(writer, "{}", rule)?;
    writeln!(writer, "Bucket: {}", bucket)?;
    writeln!(writer, "Generated: {}", generated.to_rfc3339())?;
    writeln!(writer, "{}\n", rule)?;
    writeln!(writer, "Total Objects (including versions): {}", listing.versions.len())?;
    writeln!(writer, "Total Delete Markers: {}", listing.delete_markers.len())?;
    writeln!(writer, "Unique Objects: {}", unique.len())?;
    writeln!(writer, "Total Size: {:.2} GB\n", total_size as f64 / BYTES_PER_GB)?;
    writeln!(writer, "Storage Class Distribution:")?;
    for (class, count) in classes {
        writeln!(writer, "{}: {}", class, count)?;
    }

    Ok(())
}

/// Group live versions by key.
///
/// A key with any delete marker is dropped entirely.
pub fn process_objects(listing: &BucketListing) -> ProcessedObjects {
    let deleted: std::collections::HashSet<&str> =
        listing.delete_markers.iter().map(|dm| dm.key.as_str()).collect();

    let mut objects = ProcessedObjects::new();
    for version in listing.versions.iter().filter(|v| !deleted.contains(v.key.as_str())) {
        objects
            .entry(version.key.clone())
            .or_default()
            .push(InventoryEntry::from(version));
    }

    for versions in objects.values_mut() {
        versions.sort_by_key(|v| v.last_modified);
    }
    objects
}

#[derive(Serialize)]
struct JsonInventory<'a> {
    generated_at: DateTime<Utc>,
    objects: &'a ProcessedObjects,
}

pub fn write_json_inventory<W: Write>(
    objects: &ProcessedObjects,
    generated_at: DateTime<Utc>,
    writer: &mut W,
) -> io::Result<()> {
    let inventory = JsonInventory {
        generated_at,
        objects,
    };
    serde_json::to_writer_pretty(&mut *writer, &inventory)?;
    writeln!(writer)
}

/// Base URIs, then each versioned URI with its creation time.
pub fn write_text_inventory<W: Write>(objects: &ProcessedObjects, writer: &mut W) -> io::Result<()> {
    let rule = "-".repeat(80);
    writeln!(writer, "S3 URI Inventory")?;
    writeln!(writer, "{}\n", "=".repeat(80))?;

    writeln!(writer, "Base URIs (without versions):")?;
    writeln!(writer, "{}", rule)?;
    for versions in objects.values() {
        if let Some(first) = versions.first() {
            writeln!(writer, "{}", first.base_uri)?;
        }
    }

    writeln!(writer, "\nVersioned URIs with creation dates:")?;
    writeln!(writer, "{}", rule)?;
    for entry in objects.values().flatten() {
        writeln!(writer, "{}", entry.uri)?;
        writeln!(writer, "    Created: {}", entry.last_modified.to_rfc3339())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::model::{DeleteMarker, ObjectVersion};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 25, hour, 0, 0).unwrap()
    }

    fn version(key: &str, id: &str, hour: u32, size: u64, class: Option<&str>) -> ObjectVersion {
        ObjectVersion {
            bucket: "artifacts".into(),
            region: "us-west-2".into(),
            key: key.into(),
            version_id: Some(id.into()),
            size,
            last_modified: at(hour),
            storage_class: class.map(String::from),
            e_tag: Some("\"abc\"".into()),
        }
    }

    fn listing() -> BucketListing {
        BucketListing {
            versions: vec![
                version("templates/app.yml", "v2", 10, 1024, Some("STANDARD")),
                version("templates/app.yml", "v1", 8, 512, Some("STANDARD")),
                version("templates/old.yml", "v1", 9, 2048, None),
            ],
            delete_markers: vec![DeleteMarker {
                bucket: "artifacts".into(),
                region: "us-west-2".into(),
                key: "templates/old.yml".into(),
                version_id: Some("d1".into()),
                last_modified: at(11),
            }],
        }
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn csv_lists_versions_then_markers() {
        let csv = render(|w| write_csv(&listing(), w));
        let rows: Vec<&str> = csv.split("\r\n").filter(|r| !r.is_empty()).collect();

        assert_eq!(rows.len(), 5);
        assert_eq!(
            rows[0],
            "File Path,Size (Bytes),Last Modified,Version ID,Storage Class,S3 URI,HTTP URI,ETag"
        );
        assert_eq!(
            rows[1],
            "templates/app.yml,1024,2025-01-25T10:00:00+00:00,v2,STANDARD,\
             s3://artifacts/templates/app.yml?versionId=v2,\
             https://artifacts.s3.us-west-2.amazonaws.com/templates/app.yml?versionId=v2,\"\"\"abc\"\"\""
        );
        assert!(rows[3].contains(",-,s3://artifacts/templates/old.yml?versionId=v1,"));
        assert!(rows[4].starts_with("templates/old.yml,0,2025-01-25T11:00:00+00:00,d1,DeleteMarker,"));
        assert!(rows[4].ends_with(",-"));
    }

    #[test]
    fn csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn summary_counts() {
        let generated = Local.with_ymd_and_hms(2025, 1, 25, 12, 0, 0).unwrap();
        let summary = render(|w| write_summary(&listing(), "artifacts", generated, w));

        assert!(summary.starts_with("S3 Bucket Inventory Summary\n"));
        assert!(summary.contains("Bucket: artifacts\n"));
        assert!(summary.contains("Total Objects (including versions): 3\n"));
        assert!(summary.contains("Total Delete Markers: 1\n"));
        assert!(summary.contains("Unique Objects: 2\n"));
        assert!(summary.contains("Total Size: 0.00 GB\n"));
        assert!(summary.contains("STANDARD: 2\n"));
        assert!(summary.contains("Standard: 1\n"));
    }

    #[test]
    fn deleted_keys_are_dropped_and_versions_sorted() {
        let objects = process_objects(&listing());

        assert_eq!(objects.keys().collect::<Vec<_>>(), vec!["templates/app.yml"]);
        let ids: Vec<_> = objects["templates/app.yml"]
            .iter()
            .map(|v| v.version_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["v1", "v2"]);
    }

    #[test]
    fn json_inventory_shape() {
        let objects = process_objects(&listing());
        let json = render(|w| write_json_inventory(&objects, at(12), w));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["generated_at"], "2025-01-25T12:00:00Z");
        let versions = value["objects"]["templates/app.yml"].as_array().unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0]["uri"], "s3://artifacts/templates/app.yml?versionId=v1");
        assert_eq!(versions[0]["base_uri"], "s3://artifacts/templates/app.yml");
        assert_eq!(versions[0]["size"], 512);
    }

    #[test]
    fn text_inventory_lists_base_then_versions() {
        let objects = process_objects(&listing());
        let text = render(|w| write_text_inventory(&objects, w));

        let base = text.find("Base URIs (without versions):").unwrap();
        let versioned = text.find("Versioned URIs with creation dates:").unwrap();
        assert!(base < versioned);
        assert!(text.contains("s3://artifacts/templates/app.yml\n"));
        assert!(text.contains(
            "s3://artifacts/templates/app.yml?versionId=v1\n    Created: 2025-01-25T08:00:00+00:00\n"
        ));
        assert!(!text.contains("old.yml"));
    }
}
