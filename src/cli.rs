use crate::error::Result;
use crate::formats::TargetFormat;
use crate::profile::{CompressionProfile, Overrides};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-compact",
    about = "Compress single images or whole directories with preset profiles",
    long_about = "img-compact reduces image file sizes by lowering quality, scaling resolution, \
                  converting format and stripping metadata. Pick a profile (leve, moderado, \
                  agressivo) and optionally override any of its parameters.",
    version,
    after_help = "EXAMPLES:\n  \
    img-compact photo.jpg -m leve\n  \
    img-compact ./photos -m agressivo -o ./compressed\n  \
    img-compact ./photos -r -q 60 -s 0.5 -f webp"
)]
pub struct Args {
    #[arg(help = "Image file or directory to compress")]
    pub input: PathBuf,

    #[arg(
        short = 'm',
        long,
        default_value = "moderado",
        value_parser = ["leve", "moderado", "agressivo"],
        help = "Compression profile",
        long_help = "leve: quality 85, full size, keeps metadata. \
                     moderado: quality 70, 80% size, strips metadata. \
                     agressivo: quality 50, 60% size, strips metadata, converts to WebP."
    )]
    pub mode: String,

    #[arg(
        short = 'o',
        long,
        help = "Output directory (default: next to each source)",
        long_help = "Directory for compressed files. Created if missing. \
                     Outputs are named <name>_<profile>.<ext>, or <name>_custom.<ext> when overrides are given."
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'q',
        long,
        help = "Quality override (1-100)",
        long_help = "Lossy quality for JPEG and WebP output. For PNG it only selects the \
                     lossless optimization effort."
    )]
    pub quality: Option<u8>,

    #[arg(
        short = 's',
        long,
        help = "Scale factor override (0 < scale <= 1)",
        long_help = "Resize factor applied to both dimensions, e.g. 0.5 halves width and height. \
                     Upscaling is not allowed."
    )]
    pub scale: Option<f64>,

    #[arg(
        long,
        conflicts_with = "strip_metadata",
        help = "Keep EXIF/ICC metadata"
    )]
    pub keep_metadata: bool,

    #[arg(long, help = "Strip EXIF/ICC metadata")]
    pub strip_metadata: bool,

    #[arg(
        short = 'f',
        long,
        help = "Output format override (auto, jpg, png, webp)",
        long_help = "Force an output format. 'auto' keeps each source file's format. \
                     Without this flag the profile decides."
    )]
    pub format: Option<String>,

    #[arg(short = 'r', long, help = "Process subdirectories recursively")]
    pub recursive: bool,

    #[arg(short = 'v', long, help = "Show per-file diagnostic output")]
    pub verbose: bool,

    #[arg(long, help = "Hide the progress bar")]
    pub no_progress: bool,
}

impl Args {
    pub fn profile(&self) -> Result<CompressionProfile> {
        self.mode.parse()
    }

    pub fn overrides(&self) -> Result<Overrides> {
        let target_format = self
            .format
            .as_deref()
            .map(str::parse::<TargetFormat>)
            .transpose()?;

        let keep_metadata = if self.keep_metadata {
            Some(true)
        } else if self.strip_metadata {
            Some(false)
        } else {
            None
        };

        Ok(Overrides {
            quality: self.quality,
            scale: self.scale,
            target_format,
            keep_metadata,
        })
    }
}
