//! In-memory JPEG/EXIF builders, shared by the unit tests and `tests/`.

const TAG_EXIF_IFD_POINTER: u16 = 0x8769;

/// One IFD entry: tag, TIFF type, component count and already-encoded payload.
///
/// Payloads are encoded in little-endian by the constructors and re-encoded
/// by [`ExifBuilder`] when building a big-endian block.
#[derive(Debug, Clone)]
pub struct Entry {
    tag: u16,
    typ: u16,
    count: u32,
    data: Vec<u8>,
}

impl Entry {
    pub fn short(tag: u16, value: u16) -> Self {
        Self { tag, typ: 3, count: 1, data: value.to_le_bytes().to_vec() }
    }

    pub fn long(tag: u16, value: u32) -> Self {
        Self { tag, typ: 4, count: 1, data: value.to_le_bytes().to_vec() }
    }

    /// TIFF type 13, an IFD offset stored like a LONG.
    pub fn ifd(tag: u16, value: u32) -> Self {
        Self { tag, typ: 13, count: 1, data: value.to_le_bytes().to_vec() }
    }

    pub fn slong(tag: u16, value: i32) -> Self {
        Self { tag, typ: 9, count: 1, data: value.to_le_bytes().to_vec() }
    }

    pub fn rational(tag: u16, num: u32, den: u32) -> Self {
        let mut data = num.to_le_bytes().to_vec();
        data.extend_from_slice(&den.to_le_bytes());
        Self { tag, typ: 5, count: 1, data }
    }

    /// NUL-terminated ASCII, as cameras write it.
    pub fn ascii(tag: u16, value: &str) -> Self {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        Self { tag, typ: 2, count: data.len() as u32, data }
    }

    /// Verbatim payload; never byte-swapped.
    pub fn raw(tag: u16, typ: u16, count: u32, data: Vec<u8>) -> Self {
        Self { tag, typ: typ | 0x8000, count, data }
    }

    fn type_code(&self) -> u16 {
        self.typ & 0x7FFF
    }

    fn is_raw(&self) -> bool {
        self.typ & 0x8000 != 0
    }
}

/// Builds a TIFF block: header, IFD0, optional Exif sub-IFD, then a data area.
pub struct ExifBuilder {
    big_endian: bool,
    ifd0: Vec<Entry>,
    exif: Option<Vec<Entry>>,
}

impl ExifBuilder {
    pub fn little() -> Self {
        Self { big_endian: false, ifd0: Vec::new(), exif: None }
    }

    pub fn big() -> Self {
        Self { big_endian: true, ifd0: Vec::new(), exif: None }
    }

    pub fn ifd0(mut self, entries: Vec<Entry>) -> Self {
        self.ifd0 = entries;
        self
    }

    pub fn exif_ifd(mut self, entries: Vec<Entry>) -> Self {
        self.exif = Some(entries);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let be = self.big_endian;
        let mut ifd0 = self.ifd0;
        let exif = self.exif;
        if exif.is_some() && !ifd0.iter().any(|e| e.tag == TAG_EXIF_IFD_POINTER) {
            ifd0.push(Entry::long(TAG_EXIF_IFD_POINTER, 0));
        }

        let ifd_len = |n: usize| 2 + n * 12 + 4;
        let ifd0_off = 8;
        let exif_off = ifd0_off + ifd_len(ifd0.len());
        let mut data_off = exif_off + exif.as_ref().map_or(0, |e| ifd_len(e.len()));

        let mut out = Vec::new();
        out.extend_from_slice(if be { b"MM" } else { b"II" });
        out.extend_from_slice(&u16_bytes(42, be));
        out.extend_from_slice(&u32_bytes(ifd0_off as u32, be));

        let mut data_area = Vec::new();
        for (entries, is_ifd0) in [(Some(ifd0), true), (exif, false)] {
            let Some(mut entries) = entries else { continue };
            if is_ifd0 {
                if let Some(ptr) = entries.iter_mut().find(|e| e.tag == TAG_EXIF_IFD_POINTER) {
                    if ptr.data == 0u32.to_le_bytes() {
                        ptr.data = (exif_off as u32).to_le_bytes().to_vec();
                    }
                }
            }
            out.extend_from_slice(&u16_bytes(entries.len() as u16, be));
            for entry in &entries {
                let payload = encode(entry, be);
                out.extend_from_slice(&u16_bytes(entry.tag, be));
                out.extend_from_slice(&u16_bytes(entry.type_code(), be));
                out.extend_from_slice(&u32_bytes(entry.count, be));
                if payload.len() <= 4 {
                    let mut slot = payload.clone();
                    slot.resize(4, 0);
                    out.extend_from_slice(&slot);
                } else {
                    out.extend_from_slice(&u32_bytes(data_off as u32, be));
                    data_off += payload.len();
                    data_area.extend_from_slice(&payload);
                }
            }
            out.extend_from_slice(&u32_bytes(0, be));
        }
        out.extend_from_slice(&data_area);
        out
    }
}

/// Re-encode an entry payload in the target byte order.
fn encode(entry: &Entry, be: bool) -> Vec<u8> {
    if !be || entry.is_raw() {
        return entry.data.clone();
    }
    let width = match entry.type_code() {
        3 | 8 => 2,
        4 | 9 | 5 | 10 | 13 => 4,
        _ => 1,
    };
    entry.data.chunks(width).flat_map(|c| c.iter().rev().copied()).collect()
}

fn u16_bytes(v: u16, be: bool) -> [u8; 2] {
    if be { v.to_be_bytes() } else { v.to_le_bytes() }
}

fn u32_bytes(v: u32, be: bool) -> [u8; 4] {
    if be { v.to_be_bytes() } else { v.to_le_bytes() }
}

/// Wrap a TIFF block in SOI, an APP1 `Exif\0\0` segment, a tiny SOS and EOI.
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((tiff.len() + 8) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);
    jpeg.extend_from_slice(&scan_tail());
    jpeg
}

/// A JPEG with a JFIF APP0 segment and no EXIF.
pub fn jpeg_without_exif() -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    jpeg.extend_from_slice(b"JFIF\0\x01\x01\x00\x00\x01\x00\x01\x00\x00");
    jpeg.extend_from_slice(&scan_tail());
    jpeg
}

fn scan_tail() -> Vec<u8> {
    vec![0xFF, 0xDA, 0x00, 0x02, 0x00, 0xFF, 0xD9]
}
