//! Image format utilities and type-safe format handling
//!
//! `OutputFormat` is a concrete container the encoder can produce;
//! `TargetFormat` is what a plan asks for, where `Auto` defers the choice to
//! each source file.

use crate::error::CompressionError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Formats the engine can encode to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JPEG, lossy with a quality parameter
    Jpeg,
    /// PNG, lossless
    Png,
    /// WebP, lossy with a quality parameter
    WebP,
}

impl OutputFormat {
    /// Returns the file extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    /// Whether the encoder honours a lossy quality setting
    pub fn supports_quality(&self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::WebP)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(OutputFormat::from_extension)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

/// Format requested by a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// Keep each source file's own format
    Auto,
    Fixed(OutputFormat),
}

impl TargetFormat {
    /// Resolves the format for one file. `None` means `Auto` was requested
    /// and the source format has no encodable counterpart.
    pub fn resolve(&self, source: Option<OutputFormat>) -> Option<OutputFormat> {
        match self {
            TargetFormat::Auto => source,
            TargetFormat::Fixed(format) => Some(*format),
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFormat::Auto => write!(f, "auto"),
            TargetFormat::Fixed(format) => write!(f, "{}", format.extension()),
        }
    }
}

impl FromStr for TargetFormat {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(TargetFormat::Auto);
        }
        OutputFormat::from_extension(s)
            .map(TargetFormat::Fixed)
            .ok_or_else(|| {
                CompressionError::configuration(
                    "format",
                    format!("'{}' is not one of auto, jpg, png, webp", s),
                )
            })
    }
}
