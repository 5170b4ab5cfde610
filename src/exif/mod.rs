//! EXIF decoding for JPEG images.
//!
//! - [`read_tags`]: Decode the EXIF tag directory of a JPEG into raw values
//! - [`ExifFields::from_directory`]: Normalize the raw tags into typed, optional fields
//!
//! A missing or broken EXIF block is not an error for callers of
//! [`read_fields`]; it yields empty [`ExifFields`].

mod fields;
mod reader;

#[cfg(test)]
pub(crate) mod fixtures;

pub use fields::{
    EXIF_DATE_FORMAT, ExifFields, TAG_BODY_SERIAL_NUMBER, TAG_DATE_TIME, TAG_DATE_TIME_ORIGINAL,
    TAG_MODEL, TAG_ORIENTATION, parse_exif_datetime,
};
pub use reader::{RawTagValue, TAG_EXIF_IFD_POINTER, TagDirectory, is_jpeg, read_tags};

/// Decode and normalize EXIF fields, downgrading decode errors to "no fields".
pub fn read_fields(jpeg: &[u8]) -> ExifFields {
    match read_tags(jpeg) {
        Ok(dir) => {
            log::debug!("EXIF directory has {} tags", dir.len());
            ExifFields::from_directory(&dir)
        }
        Err(e) => {
            log::debug!("EXIF fields omitted: {e}");
            ExifFields::default()
        }
    }
}
