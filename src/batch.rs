//! Recursive conversion of a directory tree of `.snb` notes.
//!
//! Every note found below the start directory is converted into a mirror of
//! its relative location under the export root, with `.snb` swapped for
//! `.md`. Images land next to the Markdown file (or in a subdirectory of it).

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Error;
use crate::model::{ConversionReport, ConvertOptions};

const SOURCE_EXTENSION: &str = "snb";
const MARKDOWN_EXTENSION: &str = "md";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub export_root: PathBuf,
    /// Extra directory, relative to each Markdown file, to hold its images.
    pub image_subdir: Option<PathBuf>,
    pub convert: ConvertOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            export_root: PathBuf::from("exported"),
            image_subdir: None,
            convert: ConvertOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub image_dir: PathBuf,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub job: BatchJob,
    pub result: Result<ConversionReport, Error>,
}

/// Find every note below `start_dir`, in file-name order. Entries that
/// cannot be read are logged and skipped; only an unreadable `start_dir`
/// is an error.
pub fn discover_jobs(start_dir: &Path, options: &BatchOptions) -> Result<Vec<BatchJob>, Error> {
    let mut jobs = Vec::new();
    let walk = walkdir::WalkDir::new(start_dir)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(std::io::Error::from(e).into()),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        let path = entry.path();
        let is_note = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION));
        if !entry.file_type().is_file() || !is_note {
            continue;
        }
        let relative = path.strip_prefix(start_dir).unwrap_or(path);
        jobs.push(job_for(path, relative, options));
    }
    log::info!(
        "Found {} .{} files under {}",
        jobs.len(),
        SOURCE_EXTENSION,
        start_dir.display()
    );
    Ok(jobs)
}

fn job_for(input: &Path, relative: &Path, options: &BatchOptions) -> BatchJob {
    let output = options
        .export_root
        .join(relative)
        .with_extension(MARKDOWN_EXTENSION);
    let mut image_dir = match relative.parent() {
        Some(parent) => options.export_root.join(parent),
        None => options.export_root.clone(),
    };
    if let Some(subdir) = &options.image_subdir {
        image_dir.push(subdir);
    }
    BatchJob {
        input: input.to_path_buf(),
        output,
        image_dir,
    }
}

/// Convert every job; documents are independent, so they run in parallel.
/// Outcomes come back in job order and one failure does not stop the rest.
pub fn run_batch(jobs: &[BatchJob], options: &BatchOptions) -> Vec<BatchOutcome> {
    jobs.par_iter()
        .map(|job| {
            let result = run_job(job, &options.convert);
            if let Err(e) = &result {
                log::error!("{}: {}", job.input.display(), e);
            }
            BatchOutcome {
                job: job.clone(),
                result,
            }
        })
        .collect()
}

fn run_job(job: &BatchJob, options: &ConvertOptions) -> Result<ConversionReport, Error> {
    if let Some(parent) = job.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    crate::convert_snb_to_markdown(&job.input, &job.output, &job.image_dir, options)
}
