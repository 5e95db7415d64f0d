use crate::constants::{PROGRESS_BAR_CHARS, PROGRESS_BAR_TEMPLATE, SUPPORTED_IMAGE_EXTENSIONS};
use crate::error::{CompressionError, Result};
use crate::processing::{transform, ImageOutcome, ImageResult, ImageTask};
use crate::profile::CompressionPlan;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// How a batch enumerates its inputs and where it writes.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Destination directory. `None` writes next to each source file.
    pub output_dir: Option<PathBuf>,
    /// Descend into subdirectories. Off means top-level files only.
    pub recursive: bool,
    pub show_progress: bool,
}

/// Runs `plan` over a single file or a directory of images.
///
/// Fails only on pre-flight problems (missing input, bad output directory)
/// before any file is touched. Per-file failures come back as `Failed`
/// results and never stop the batch.
pub fn run_batch(
    input: &Path,
    plan: &CompressionPlan,
    options: &BatchOptions,
) -> Result<Vec<ImageResult>> {
    if !input.is_file() && !input.is_dir() {
        return Err(CompressionError::InputNotFound(input.to_path_buf()));
    }

    let image_files = collect_image_files(input, options.recursive, options.output_dir.as_deref())?;

    if let Some(output_dir) = &options.output_dir {
        prepare_output_dir(output_dir)?;
    }

    let total_files = image_files.len();

    if total_files == 0 {
        warn!("No image files found in {:?}", input);
        return Ok(Vec::new());
    }

    info!("Found {} image files to process", total_files);

    let progress = if options.show_progress {
        let bar = ProgressBar::new(total_files as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
            bar.set_style(style.progress_chars(PROGRESS_BAR_CHARS));
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut results = Vec::with_capacity(total_files);
    for (index, source_path) in image_files.iter().enumerate() {
        let file_name = source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.set_message(file_name.clone());
        info!("Processing {}/{}: {}", index + 1, total_files, file_name);

        let result = process_single_image(source_path, plan, options.output_dir.as_deref());
        if let ImageOutcome::Failed { kind, message } = result.outcome() {
            warn!("Failed to process {:?} ({}): {}", source_path, kind, message);
        }
        results.push(result);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(results)
}

fn process_single_image(
    source_path: &Path,
    plan: &CompressionPlan,
    output_dir: Option<&Path>,
) -> ImageResult {
    match ImageTask::new(source_path, output_dir, plan) {
        Ok(task) => transform(&task),
        Err(e) => ImageResult::failure(source_path.to_path_buf(), None, 0, &e),
    }
}

/// Creates the output directory if needed. An existing non-directory at that
/// path is a configuration error.
pub fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        if !output_dir.is_dir() {
            return Err(CompressionError::configuration(
                "output",
                format!("{:?} exists and is not a directory", output_dir),
            ));
        }
        debug!("Using existing output directory {:?}", output_dir);
        return Ok(());
    }

    fs::create_dir_all(output_dir).map_err(|e| {
        CompressionError::configuration(
            "output",
            format!("cannot create {:?}: {}", output_dir, e),
        )
    })?;
    info!("Created output directory {:?}", output_dir);
    Ok(())
}

/// Lists the files a batch will process, sorted by path.
///
/// A file input is returned as-is whatever its extension. Directories are
/// filtered to supported image extensions, skip hidden entries and, when
/// `exclude` lies inside the walked tree, skip that subtree.
pub fn collect_image_files(
    input: &Path,
    recursive: bool,
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(CompressionError::InputNotFound(input.to_path_buf()));
    }

    let excluded = exclude.and_then(|dir| dir.canonicalize().ok());

    let walker = if recursive {
        WalkDir::new(input)
    } else {
        WalkDir::new(input).max_depth(1)
    };

    let mut image_files = Vec::new();
    let entries = walker.into_iter().filter_entry(|e| {
        if e.depth() == 0 {
            return true;
        }
        if e.file_name().to_string_lossy().starts_with('.') {
            return false;
        }
        match (&excluded, e.file_type().is_dir()) {
            (Some(excluded), true) => e
                .path()
                .canonicalize()
                .map(|path| &path != excluded)
                .unwrap_or(true),
            _ => true,
        }
    });

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            // Only an unreadable root aborts the walk.
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_image_file(entry.path()) {
            image_files.push(entry.into_path());
        }
    }

    image_files.sort();
    Ok(image_files)
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}
