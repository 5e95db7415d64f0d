use crate::constants::{
    HIGH_EFFORT_QUALITY_THRESHOLD, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, OXIPNG_PRESET,
    WEBP_METHOD, ZOPFLI_ITERATIONS, ZOPFLI_QUALITY_THRESHOLD,
};
use crate::error::{FailureKind, TransformError};
use crate::formats::OutputFormat;
use crate::metadata::EmbeddedMetadata;
use crate::profile::CompressionPlan;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageReader};
use oxipng::{Deflaters, Options};
use std::fs;
use std::io::{Cursor, Write};
use std::num::NonZeroU8;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// One file paired with the plan it is processed under.
#[derive(Debug, Clone)]
pub struct ImageTask<'a> {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    /// Effective output format, already resolved from `Auto` if needed.
    pub format: OutputFormat,
    pub plan: &'a CompressionPlan,
}

impl<'a> ImageTask<'a> {
    /// Builds the task for `source_path`, settling the output format and
    /// path. `output_dir` defaults to the source's own directory.
    pub fn new(
        source_path: &Path,
        output_dir: Option<&Path>,
        plan: &'a CompressionPlan,
    ) -> Result<Self, TransformError> {
        let format = effective_format(source_path, plan)?;
        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => source_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        let output_path = generate_output_path(source_path, &output_dir, plan.tag(), format)?;

        Ok(ImageTask {
            source_path: source_path.to_path_buf(),
            output_path,
            format,
            plan,
        })
    }
}

/// Outcome of processing one [`ImageTask`].
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Success { compressed_size: u64 },
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageResult {
    source_path: PathBuf,
    output_path: Option<PathBuf>,
    original_size: u64,
    outcome: ImageOutcome,
}

impl ImageResult {
    pub fn success(
        source_path: PathBuf,
        output_path: PathBuf,
        original_size: u64,
        compressed_size: u64,
    ) -> Self {
        ImageResult {
            source_path,
            output_path: Some(output_path),
            original_size,
            outcome: ImageOutcome::Success { compressed_size },
        }
    }

    pub fn failure(
        source_path: PathBuf,
        output_path: Option<PathBuf>,
        original_size: u64,
        error: &TransformError,
    ) -> Self {
        ImageResult {
            source_path,
            output_path,
            original_size,
            outcome: ImageOutcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn original_size(&self) -> u64 {
        self.original_size
    }

    pub fn outcome(&self) -> &ImageOutcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ImageOutcome::Success { .. })
    }

    pub fn compressed_size(&self) -> Option<u64> {
        match self.outcome {
            ImageOutcome::Success { compressed_size } => Some(compressed_size),
            ImageOutcome::Failed { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<FailureKind> {
        match self.outcome {
            ImageOutcome::Success { .. } => None,
            ImageOutcome::Failed { kind, .. } => Some(kind),
        }
    }
}

/// Runs the whole pipeline for one task:
/// read -> decode -> resize -> encode -> restore metadata -> write
///
/// Never fails: every error is captured in the returned [`ImageResult`],
/// and no output file is left behind on failure.
pub fn transform(task: &ImageTask) -> ImageResult {
    let source = match fs::read(&task.source_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return ImageResult::failure(
                task.source_path.clone(),
                Some(task.output_path.clone()),
                0,
                &TransformError::Io(e),
            )
        }
    };
    let original_size = source.len() as u64;

    match process_image_pipeline(&source, task) {
        Ok(compressed_size) => {
            info!(
                "Compressed {:?} -> {:?} ({} -> {} bytes)",
                task.source_path, task.output_path, original_size, compressed_size
            );
            ImageResult::success(
                task.source_path.clone(),
                task.output_path.clone(),
                original_size,
                compressed_size,
            )
        }
        Err(e) => ImageResult::failure(
            task.source_path.clone(),
            Some(task.output_path.clone()),
            original_size,
            &e,
        ),
    }
}

/// Pipeline over already-read source bytes. Returns the written file size.
pub fn process_image_pipeline(source: &[u8], task: &ImageTask) -> Result<u64, TransformError> {
    let plan = task.plan;

    let metadata = if plan.keep_metadata() {
        EmbeddedMetadata::read(source)
    } else {
        EmbeddedMetadata::default()
    };

    // Stripped output loses the orientation tag, so bake it into the pixels.
    let img = decode_image(source, !plan.keep_metadata())?;
    let img = resize_image(img, plan.scale());

    let encoded = encode_image(&img, task.format, plan.quality())?;
    let encoded = metadata.apply(encoded);

    write_output(&task.output_path, &encoded)
}

/// Decodes an in-memory image, sniffing the format from its content.
pub fn decode_image(bytes: &[u8], apply_orientation: bool) -> Result<DynamicImage, TransformError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(TransformError::Io)?;
    if reader.format().is_none() {
        return Err(TransformError::Decode(
            "unrecognized image data".to_string(),
        ));
    }

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| TransformError::Decode(e.to_string()))?;
    let orientation = if apply_orientation {
        decoder.orientation().unwrap_or(Orientation::NoTransforms)
    } else {
        Orientation::NoTransforms
    };

    let mut img =
        DynamicImage::from_decoder(decoder).map_err(|e| TransformError::Decode(e.to_string()))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Proportional target size for `scale`, each side rounded and never below
/// one pixel.
pub fn scale_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let scale_side = |side: u32| ((side as f64 * scale).round() as u32).max(1);
    (scale_side(width), scale_side(height))
}

pub fn resize_image(img: DynamicImage, scale: f64) -> DynamicImage {
    if scale >= 1.0 {
        return img;
    }

    let (width, height) = img.dimensions();
    let (new_width, new_height) = scale_dimensions(width, height, scale);
    if (new_width, new_height) == (width, height) {
        return img;
    }

    debug!(
        "Resizing {}x{} -> {}x{}",
        width, height, new_width, new_height
    );
    img.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

/// Encodes to `format`. `quality` drives lossy JPEG/WebP encoding; for PNG
/// it only picks the lossless optimization effort.
pub fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, TransformError> {
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            // JPEG carries no alpha and only 8-bit samples.
            let written = match img {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => {
                    img.write_with_encoder(encoder)
                }
                _ => DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder),
            };
            written.map_err(|e| TransformError::Format(e.to_string()))?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut buffer,
                CompressionType::Best,
                PngFilterType::Adaptive,
            );
            img.write_with_encoder(encoder)
                .map_err(|e| TransformError::Format(e.to_string()))?;
            buffer = optimize_png(&buffer, quality)?;
        }
        OutputFormat::WebP => {
            let (width, height) = img.dimensions();
            buffer = if img.color().has_alpha() {
                let rgba = img.to_rgba8();
                let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
                encode_webp(&encoder, quality)?
            } else {
                let rgb = img.to_rgb8();
                let encoder = webp::Encoder::from_rgb(rgb.as_raw(), width, height);
                encode_webp(&encoder, quality)?
            };
        }
    }

    Ok(buffer)
}

/// Lossy WebP at the slowest, best-compressing method.
fn encode_webp(encoder: &webp::Encoder, quality: u8) -> Result<Vec<u8>, TransformError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| TransformError::Format("WebP config initialization failed".to_string()))?;
    config.lossless = 0;
    config.quality = quality as f32;
    config.method = WEBP_METHOD;

    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| TransformError::Format(format!("WebP encoding failed: {:?}", e)))?;
    Ok(memory.to_vec())
}

fn optimize_png(data: &[u8], quality: u8) -> Result<Vec<u8>, TransformError> {
    let mut options = Options::from_preset(OXIPNG_PRESET);

    options.deflate = if quality >= ZOPFLI_QUALITY_THRESHOLD {
        Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
        }
    } else if quality >= HIGH_EFFORT_QUALITY_THRESHOLD {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    };

    oxipng::optimize_from_memory(data, &options)
        .map_err(|e| TransformError::Format(format!("PNG optimization failed: {}", e)))
}

/// Writes through a temporary file in the destination directory and renames
/// it into place, so a failed write never leaves a partial output.
pub fn write_output(output_path: &Path, data: &[u8]) -> Result<u64, TransformError> {
    let write_error = |e: std::io::Error| TransformError::Write(format!("{:?}: {}", output_path, e));

    let dir = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(data).map_err(write_error)?;
    temp.persist(output_path)
        .map_err(|e| write_error(e.error))?;

    let written = fs::metadata(output_path).map_err(write_error)?.len();
    Ok(written)
}

fn effective_format(source_path: &Path, plan: &CompressionPlan) -> Result<OutputFormat, TransformError> {
    plan.target_format()
        .resolve(OutputFormat::from_path(source_path))
        .ok_or_else(|| {
            TransformError::Format(format!(
                "cannot keep the source format of {:?}, choose jpg, png or webp",
                source_path
            ))
        })
}

/// `<stem>_<tag>.<ext>` inside `output_dir`.
pub fn generate_output_path(
    source_path: &Path,
    output_dir: &Path,
    tag: &str,
    format: OutputFormat,
) -> Result<PathBuf, TransformError> {
    let file_stem = source_path
        .file_stem()
        .ok_or_else(|| TransformError::Format(format!("Invalid file name: {:?}", source_path)))?;

    let output_filename = format!(
        "{}_{}.{}",
        file_stem.to_string_lossy(),
        tag,
        format.extension()
    );
    Ok(output_dir.join(output_filename))
}
