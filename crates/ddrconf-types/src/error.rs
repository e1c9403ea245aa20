use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading or validating a dataset.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported dataset format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{table}[{index}]: register 0x{reg:x} exceeds the 20-bit PHY address space")]
    AddressOutOfRange {
        table: String,
        index: usize,
        reg: u32,
    },
}

pub type TypeResult<T> = Result<T, TypeError>;
