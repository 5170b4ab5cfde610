use chrono::NaiveDateTime;

use super::reader::{RawTagValue, TagDirectory};

// Tag IDs (IFD0)
pub const TAG_ORIENTATION: u16 = 0x0112;
pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_DATE_TIME: u16 = 0x0132;
// Tag IDs (Exif sub-IFD)
pub const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const TAG_BODY_SERIAL_NUMBER: u16 = 0xA431;

/// The fixed EXIF date layout, `YYYY:MM:DD HH:MM:SS`.
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// The EXIF-derived fields of a metadata record.
///
/// Each field is `None` when the tag is missing, has an incompatible raw
/// type, or does not parse. Conversion never fails the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifFields {
    pub orientation: Option<u32>,
    pub capture_time: Option<NaiveDateTime>,
    pub camera_model: Option<String>,
    pub camera_serial: Option<String>,
}

impl ExifFields {
    /// Normalize the four tags of interest out of a raw tag directory.
    ///
    /// `capture_time` prefers `DateTimeOriginal` and falls back to `DateTime`.
    pub fn from_directory(dir: &TagDirectory) -> Self {
        let capture_time = [TAG_DATE_TIME_ORIGINAL, TAG_DATE_TIME]
            .into_iter()
            .find_map(|tag| dir.get(tag).and_then(as_datetime));

        Self {
            orientation: dir.get(TAG_ORIENTATION).and_then(as_unsigned),
            capture_time,
            camera_model: dir.get(TAG_MODEL).and_then(as_text),
            camera_serial: dir.get(TAG_BODY_SERIAL_NUMBER).and_then(as_text),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Any integer representation that fits `u32`; the code itself is not validated.
fn as_unsigned(value: &RawTagValue) -> Option<u32> {
    match value {
        RawTagValue::UnsignedInt(v) => Some(*v),
        RawTagValue::SignedInt(v) => u32::try_from(*v).ok(),
        _ => None,
    }
}

/// ASCII text with trailing NUL padding removed; empty means absent.
fn as_text(value: &RawTagValue) -> Option<String> {
    let RawTagValue::Text(s) = value else {
        return None;
    };
    let s = s.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    if s.is_empty() { None } else { Some(s.to_string()) }
}

fn as_datetime(value: &RawTagValue) -> Option<NaiveDateTime> {
    let text = as_text(value)?;
    parse_exif_datetime(&text)
}

/// Parse the exact EXIF date layout. Anything else is rejected.
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, EXIF_DATE_FORMAT).ok()
}
