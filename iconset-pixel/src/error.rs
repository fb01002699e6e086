//! Per-file processing errors

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("decode error: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("encode error: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("write error: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Path of the file that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Decode { path, .. } | Self::Encode { path, .. } | Self::Write { path, .. } => {
                path.as_path()
            }
        }
    }
}
