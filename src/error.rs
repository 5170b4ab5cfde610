use std::path::PathBuf;

/// Failure to decode an embedded EXIF block.
///
/// These never fail a file: the pipeline downgrades both variants to
/// "no EXIF fields" and keeps the filesystem-derived metadata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExifError {
    #[error("no EXIF segment found")]
    NoExifSegment,

    #[error("malformed EXIF: {0}")]
    MalformedExif(String),
}

impl ExifError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedExif(msg.into())
    }
}

/// A per-file failure recorded in a [`BatchResult`](crate::pipeline::BatchResult).
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("cannot read {}: {source}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported format for {}: {reason}", .path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("{} is {size} bytes, over the {limit}-byte limit", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("failed to serialize metadata for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Stable name of the error category, used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileUnreadable { .. } => "FileUnreadable",
            Self::UnsupportedFormat { .. } => "UnsupportedFormat",
            Self::FileTooLarge { .. } => "FileTooLarge",
            Self::Serialize { .. } => "SerializeFailure",
            Self::WriteFailure { .. } => "WriteFailure",
        }
    }

    /// Missing or unreadable inputs are reported as warnings, everything else as errors.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::FileUnreadable { .. })
    }
}
