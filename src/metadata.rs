use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::path::Path;
use std::time::SystemTime;

use crate::exif::ExifFields;

/// Size and timestamps reported by the filesystem for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileAttributes {
    pub size_bytes: u64,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
}

impl FileAttributes {
    /// Stat a file.
    ///
    /// When the platform or filesystem cannot report a creation time, the
    /// modification time is used in its place.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let modified = meta.modified()?;
        let created = meta.created().unwrap_or_else(|e| {
            log::debug!("No creation time for {}: {e}", path.display());
            modified
        });
        Ok(Self {
            size_bytes: meta.len(),
            created_time: to_utc(created),
            modified_time: to_utc(modified),
        })
    }
}

fn to_utc(t: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(t)
}

/// Everything known about one image, in output order.
///
/// Optional fields are either a valid value or left out of the JSON
/// entirely; they are never written as `null` or an empty string.
///
/// # Example
///
/// ```rust
/// use metadata_extractor::metadata::MetadataRecord;
/// use chrono::{TimeZone, Utc};
///
/// let t = Utc.with_ymd_and_hms(2020, 8, 13, 10, 57, 6).unwrap();
/// let record = MetadataRecord {
///     filename: "CAM18839.jpg".into(),
///     size_bytes: 1164980,
///     created_time: t,
///     modified_time: t,
///     orientation: Some(1),
///     capture_time: None,
///     camera_model: None,
///     camera_serial: None,
/// };
/// let json = record.to_json().unwrap();
/// assert!(json.contains("\"size\": 1164980"));
/// assert!(!json.contains("capture_time"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub filename: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(serialize_with = "utc_iso8601")]
    pub created_time: DateTime<Utc>,
    #[serde(serialize_with = "utc_iso8601")]
    pub modified_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "naive_iso8601")]
    pub capture_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_serial: Option<String>,
}

impl MetadataRecord {
    /// Merge filesystem attributes and normalized EXIF fields into one record.
    pub fn assemble(filename: String, attrs: FileAttributes, exif: ExifFields) -> Self {
        Self {
            filename,
            size_bytes: attrs.size_bytes,
            created_time: attrs.created_time,
            modified_time: attrs.modified_time,
            orientation: exif.orientation,
            capture_time: exif.capture_time,
            camera_model: exif.camera_model,
            camera_serial: exif.camera_serial,
        }
    }

    /// Serialize to pretty-printed JSON (two-space indent, fixed key order).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `2020-08-13T10:57:06Z`
fn utc_iso8601<S: Serializer>(t: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// `2020-08-09T12:58:32`; EXIF dates carry no zone, so none is added.
fn naive_iso8601<S: Serializer>(t: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
    match t {
        Some(t) => s.serialize_str(&t.format("%Y-%m-%dT%H:%M:%S").to_string()),
        None => s.serialize_none(),
    }
}
