//! # metadata-extractor
//!
//! Extract a fixed set of metadata fields from JPEG images and write each
//! image's metadata to a sibling `.json` file. Source images are never modified.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use metadata_extractor::config::Config;
//! use metadata_extractor::pipeline::{collect_inputs, process_batch};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!
//!     // Files are kept as given; directories are walked for supported images
//!     let inputs = collect_inputs(&[PathBuf::from("./images")], &config);
//!
//!     let result = process_batch(&inputs, &config);
//!     println!("{} written, {} failed", result.success_count(), result.failure_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! For `images/CAM18839.jpg` the pipeline writes `images/CAM18839.json`:
//!
//! ```json
//! {
//!   "filename": "CAM18839.jpg",
//!   "size": 1164980,
//!   "created_time": "2020-08-13T10:57:06Z",
//!   "modified_time": "2020-08-13T10:57:06Z",
//!   "orientation": 1,
//!   "capture_time": "2020-08-09T12:58:32",
//!   "camera_model": "EOS 5D Mark IV",
//!   "camera_serial": "025021000535"
//! }
//! ```
//!
//! EXIF-derived keys that are missing, of the wrong type, or unparseable are
//! left out rather than written as `null`.
//!
//! ## Modules
//!
//! - [`exif`]: JPEG/EXIF tag decoding and field normalization
//! - [`metadata`]: Filesystem attributes, the metadata record and its JSON form
//! - [`pipeline`]: Per-file processing and the batch coordinator
//! - [`config`]: Configuration types and loading/saving
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod exif;
pub mod metadata;
pub mod pipeline;

pub use config::Config;
pub use error::{ExifError, ExtractError};
pub use metadata::MetadataRecord;
pub use pipeline::{BatchResult, FileOutcome, process_batch};
