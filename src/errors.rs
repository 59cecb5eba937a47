use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for the crack detection pipeline.
///
/// Each variant captures context specific to its error domain (filesystem,
/// decode, encode, buffer shape), so callers can react without parsing error
/// strings. The thiserror crate generates Display implementations from the
/// format strings.
#[derive(Error, Debug)]
pub enum CrackSegError {
    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode raster output: {operation}")]
    Encode {
        operation: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to serialize result record")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Compositor fed buffers of different dimensions. This is a programmer
    /// error: the pipeline always transforms image and mask with the same
    /// parameters, so shapes can only diverge if a caller mixes buffers from
    /// different pipeline runs.
    #[error("Buffer shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

pub type Result<T> = std::result::Result<T, CrackSegError>;

/// Fallback conversion for I/O errors without path/operation context.
/// Code that has context should construct FileSystem directly.
impl From<std::io::Error> for CrackSegError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("unknown"),
            operation: "unknown".to_string(),
            source: err,
        }
    }
}

impl From<image::ImageError> for CrackSegError {
    fn from(err: image::ImageError) -> Self {
        Self::Encode {
            operation: "image processing".to_string(),
            source: err,
        }
    }
}
