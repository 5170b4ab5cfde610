use exif::{Context, In, Reader, Value};
use std::collections::BTreeMap;
use std::io::Cursor;

use crate::error::ExifError;

const SOI: [u8; 2] = [0xFF, 0xD8];

/// Tag in IFD0 pointing at the Exif sub-IFD.
pub const TAG_EXIF_IFD_POINTER: u16 = 0x8769;

/// An EXIF value before any semantic interpretation.
///
/// Single-component numeric values are decoded into the scalar variants.
/// Multi-component numeric values and types this reader has no scalar form
/// for (UNDEFINED, FLOAT, DOUBLE, unknown type codes) are kept as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTagValue {
    UnsignedInt(u32),
    SignedInt(i32),
    Rational(i64, i64),
    Text(String),
    Bytes(Vec<u8>),
}

/// Tag identifier to raw value, for one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDirectory {
    entries: BTreeMap<u16, RawTagValue>,
}

impl TagDirectory {
    pub fn get(&self, tag: u16) -> Option<&RawTagValue> {
        self.entries.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &RawTagValue)> {
        self.entries.iter().map(|(tag, value)| (*tag, value))
    }

    /// Insert unless the tag is already present; the first directory read wins.
    fn insert_first(&mut self, tag: u16, value: RawTagValue) {
        self.entries.entry(tag).or_insert(value);
    }
}

impl FromIterator<(u16, RawTagValue)> for TagDirectory {
    fn from_iter<I: IntoIterator<Item = (u16, RawTagValue)>>(iter: I) -> Self {
        let mut dir = TagDirectory::default();
        for (tag, value) in iter {
            dir.insert_first(tag, value);
        }
        dir
    }
}

/// Check whether a byte stream starts with the JPEG SOI marker.
pub fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(&SOI)
}

/// Decode the EXIF tag directory embedded in a JPEG byte stream.
///
/// Reads IFD0 and the Exif sub-IFD of the primary image, merging both into a
/// single [`TagDirectory`]. Unknown tags are kept.
pub fn read_tags(jpeg: &[u8]) -> Result<TagDirectory, ExifError> {
    if !is_jpeg(jpeg) {
        return Err(ExifError::NoExifSegment);
    }

    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(jpeg))
        .map_err(|e| match e {
            exif::Error::NotFound(_) => ExifError::NoExifSegment,
            other => ExifError::malformed(other.to_string()),
        })?;

    let little_endian = exif.little_endian();
    let primary = || exif.fields().filter(|f| f.ifd_num == In::PRIMARY);
    let ifd0 = primary().filter(|f| matches!(f.tag.context(), Context::Tiff));
    let sub_ifd = primary().filter(|f| matches!(f.tag.context(), Context::Exif));

    // IFD0 first: its value wins over a duplicate in the sub-IFD.
    let mut dir = TagDirectory::default();
    for field in ifd0.chain(sub_ifd) {
        dir.insert_first(field.tag.number(), raw_value(&field.value, little_endian, exif.buf()));
    }

    log::trace!(
        "decoded {} EXIF tags ({})",
        dir.len(),
        if little_endian { "II" } else { "MM" }
    );
    Ok(dir)
}

/// Re-encode decoded components in the byte order of the TIFF block.
macro_rules! encode {
    ($items:expr, $le:expr) => {
        $items
            .iter()
            .flat_map(|v| if $le { v.to_le_bytes() } else { v.to_be_bytes() })
            .collect::<Vec<u8>>()
    };
}

/// Map a decoded field value onto [`RawTagValue`].
///
/// Single components become scalars. Everything else is handed back as the
/// bytes the field occupies in the TIFF block.
fn raw_value(value: &Value, le: bool, tiff: &[u8]) -> RawTagValue {
    match value {
        Value::Ascii(parts) => RawTagValue::Text(String::from_utf8_lossy(&parts.join(&0u8)).into_owned()),
        Value::Byte(v) => match v.as_slice() {
            [x] => RawTagValue::UnsignedInt(*x as u32),
            _ => RawTagValue::Bytes(v.clone()),
        },
        Value::Short(v) => match v.as_slice() {
            [x] => RawTagValue::UnsignedInt(*x as u32),
            _ => RawTagValue::Bytes(encode!(v, le)),
        },
        Value::Long(v) => match v.as_slice() {
            [x] => RawTagValue::UnsignedInt(*x),
            _ => RawTagValue::Bytes(encode!(v, le)),
        },
        Value::SByte(v) => match v.as_slice() {
            [x] => RawTagValue::SignedInt(*x as i32),
            _ => RawTagValue::Bytes(v.iter().map(|b| *b as u8).collect()),
        },
        Value::SShort(v) => match v.as_slice() {
            [x] => RawTagValue::SignedInt(*x as i32),
            _ => RawTagValue::Bytes(encode!(v, le)),
        },
        Value::SLong(v) => match v.as_slice() {
            [x] => RawTagValue::SignedInt(*x),
            _ => RawTagValue::Bytes(encode!(v, le)),
        },
        Value::Rational(v) => match v.as_slice() {
            [r] => RawTagValue::Rational(r.num as i64, r.denom as i64),
            _ => {
                let flat: Vec<u32> = v.iter().flat_map(|r| [r.num, r.denom]).collect();
                RawTagValue::Bytes(encode!(flat, le))
            }
        },
        Value::SRational(v) => match v.as_slice() {
            [r] => RawTagValue::Rational(r.num as i64, r.denom as i64),
            _ => {
                let flat: Vec<i32> = v.iter().flat_map(|r| [r.num, r.denom]).collect();
                RawTagValue::Bytes(encode!(flat, le))
            }
        },
        Value::Float(v) => RawTagValue::Bytes(encode!(v, le)),
        Value::Double(v) => RawTagValue::Bytes(encode!(v, le)),
        Value::Undefined(v, _) => RawTagValue::Bytes(v.clone()),
        // Unknown type: the payload size is unknowable, keep the 4-byte value slot.
        Value::Unknown(_, _, slot) => {
            let slot = *slot as usize;
            RawTagValue::Bytes(tiff.get(slot..slot + 4).map(<[u8]>::to_vec).unwrap_or_default())
        }
    }
}
