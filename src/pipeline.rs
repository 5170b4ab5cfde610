use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::ExtractError;
use crate::exif;
use crate::metadata::{FileAttributes, MetadataRecord};

/// Progress of one file through the pipeline.
///
/// A file moves forward one stage at a time and ends either at
/// [`Stage::Written`] or as a failure recorded with the last stage it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Unprocessed,
    FormatValidated,
    FilesystemRead,
    ExifParsed,
    Assembled,
    Serialized,
    Written,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unprocessed => "unprocessed",
            Self::FormatValidated => "format validated",
            Self::FilesystemRead => "filesystem read",
            Self::ExifParsed => "EXIF parsed",
            Self::Assembled => "assembled",
            Self::Serialized => "serialized",
            Self::Written => "written",
        };
        f.write_str(name)
    }
}

/// The result of processing a single input path.
#[derive(Debug)]
pub enum FileOutcome {
    /// Metadata was written to `output`.
    Success { input: PathBuf, output: PathBuf },
    /// Processing stopped after `stage`; no output file was written.
    Failure {
        input: PathBuf,
        stage: Stage,
        error: ExtractError,
    },
}

impl FileOutcome {
    pub fn input(&self) -> &Path {
        match self {
            Self::Success { input, .. } | Self::Failure { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn error(&self) -> Option<&ExtractError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// A failure that is only worth a warning, such as a missing input.
    pub fn is_skipped(&self) -> bool {
        self.error().is_some_and(ExtractError::is_warning)
    }
}

/// Per-input outcomes of one batch, in input order.
///
/// # Example
///
/// ```rust,no_run
/// use metadata_extractor::config::Config;
/// use metadata_extractor::pipeline::{process_batch, FileOutcome};
/// use std::path::PathBuf;
///
/// let result = process_batch(&[PathBuf::from("images/CAM18839.jpg")], &Config::default());
/// for outcome in result.outcomes() {
///     match outcome {
///         FileOutcome::Success { output, .. } => println!("wrote {}", output.display()),
///         FileOutcome::Failure { input, error, .. } => eprintln!("{}: {error}", input.display()),
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct BatchResult {
    outcomes: Vec<FileOutcome>,
}

impl BatchResult {
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<FileOutcome> {
        self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Inputs that were reported as warnings and skipped.
    pub fn skipped(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_skipped())
    }

    /// Failures that count against the batch: every failure except skipped inputs.
    pub fn errors(&self) -> impl Iterator<Item = &FileOutcome> {
        self.failures().filter(|o| !o.is_skipped())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Sibling JSON path for an image: same directory and stem, `.json` extension.
pub fn json_path(image: &Path) -> PathBuf {
    image.with_extension("json")
}

/// Expand the caller's paths into the list of inputs to process.
///
/// Directories are walked recursively and contribute their supported images,
/// sorted by path. Any other path is kept as given, so missing or
/// unsupported files still show up as failures in the batch.
pub fn collect_inputs(paths: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let mut inputs = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && config.supports(p))
                .collect();
            found.sort();
            log::debug!("{}: {} image(s)", path.display(), found.len());
            inputs.extend(found);
        } else {
            inputs.push(path.clone());
        }
    }

    inputs
}

/// Build the metadata record for one image without writing anything.
pub fn extract_metadata(path: &Path, config: &Config) -> Result<MetadataRecord, ExtractError> {
    let mut stage = Stage::Unprocessed;
    extract(path, config, &mut stage)
}

fn extract(path: &Path, config: &Config, stage: &mut Stage) -> Result<MetadataRecord, ExtractError> {
    if !config.supports(path) {
        let ext = path
            .extension()
            .map(|e| format!("extension .{}", e.to_string_lossy()))
            .unwrap_or_else(|| "no file extension".to_string());
        return Err(ExtractError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: ext,
        });
    }
    *stage = Stage::FormatValidated;

    let unreadable = |source| ExtractError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let attrs = FileAttributes::read(path).map_err(unreadable)?;
    if let Some(limit) = config.limits.max_file_size {
        if attrs.size_bytes > limit {
            return Err(ExtractError::FileTooLarge {
                path: path.to_path_buf(),
                size: attrs.size_bytes,
                limit,
            });
        }
    }
    let bytes = std::fs::read(path).map_err(unreadable)?;
    if !exif::is_jpeg(&bytes) {
        return Err(ExtractError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: "content is not a JPEG stream".to_string(),
        });
    }
    *stage = Stage::FilesystemRead;

    let fields = exif::read_fields(&bytes);
    *stage = Stage::ExifParsed;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let record = MetadataRecord::assemble(filename, attrs, fields);
    *stage = Stage::Assembled;
    Ok(record)
}

fn run(path: &Path, config: &Config, stage: &mut Stage) -> Result<PathBuf, ExtractError> {
    let record = extract(path, config, stage)?;

    let json = record.to_json().map_err(|source| ExtractError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    *stage = Stage::Serialized;

    let output = json_path(path);
    std::fs::write(&output, json).map_err(|source| ExtractError::WriteFailure {
        path: output.clone(),
        source,
    })?;
    *stage = Stage::Written;
    Ok(output)
}

/// Process a single image: validate, read, decode, assemble, serialize, write.
///
/// Never panics on bad input; every failure is returned as a
/// [`FileOutcome::Failure`].
pub fn process_image(path: &Path, config: &Config) -> FileOutcome {
    let mut stage = Stage::Unprocessed;
    match run(path, config, &mut stage) {
        Ok(output) => {
            log::debug!("{} -> {}", path.display(), output.display());
            FileOutcome::Success {
                input: path.to_path_buf(),
                output,
            }
        }
        Err(error) => {
            log::debug!("{} failed after stage '{stage}': {error}", path.display());
            FileOutcome::Failure {
                input: path.to_path_buf(),
                stage,
                error,
            }
        }
    }
}

/// Process every path independently and report outcomes in input order.
///
/// Files are spread over a worker pool of `config.batch.workers` threads.
/// A failure on one file never stops the others.
pub fn process_batch(paths: &[PathBuf], config: &Config) -> BatchResult {
    log::info!("Processing {} image(s)", paths.len());

    let outcomes = if config.batch.workers == 1 || paths.len() < 2 {
        process_sequential(paths, config)
    } else {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.batch.workers)
            .build()
        {
            Ok(pool) => pool.install(|| {
                paths
                    .par_iter()
                    .map(|p| process_image(p, config))
                    .collect::<Vec<_>>()
            }),
            Err(e) => {
                log::warn!("Failed to start worker pool, processing sequentially: {e}");
                process_sequential(paths, config)
            }
        }
    };

    let result = BatchResult { outcomes };
    log::info!(
        "Done: {} succeeded, {} failed",
        result.success_count(),
        result.failure_count()
    );
    result
}

fn process_sequential(paths: &[PathBuf], config: &Config) -> Vec<FileOutcome> {
    paths.iter().map(|p| process_image(p, config)).collect()
}
