use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run before (or instead of) processing any file.
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("Invalid {field}: {message}")]
    Configuration {
        field: &'static str,
        message: String,
    },

    #[error("Input path not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Walkdir error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl CompressionError {
    pub fn configuration(field: &'static str, message: impl Into<String>) -> Self {
        CompressionError::Configuration {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;

/// Errors raised while transforming a single image.
///
/// These never leave the batch: each one is folded into that file's
/// [`ImageResult`](crate::processing::ImageResult).
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Cannot read source: {0}")]
    Io(#[source] std::io::Error),

    #[error("Cannot decode image: {0}")]
    Decode(String),

    #[error("Cannot write output: {0}")]
    Write(String),

    #[error("Unsupported format: {0}")]
    Format(String),
}

impl TransformError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransformError::Io(_) => FailureKind::Io,
            TransformError::Decode(_) => FailureKind::Decode,
            TransformError::Write(_) => FailureKind::Write,
            TransformError::Format(_) => FailureKind::Format,
        }
    }
}

/// Category of a per-file failure, as shown in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Io,
    Decode,
    Write,
    Format,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Io => "IOError",
            FailureKind::Decode => "DecodeError",
            FailureKind::Write => "WriteError",
            FailureKind::Format => "FormatError",
        };
        write!(f, "{}", name)
    }
}
