//! Loading timing datasets from disk.
//!
//! Datasets are stored as JSON or TOML. TOML is the friendlier choice for
//! hand-maintained tables because it accepts hex integer literals:
//!
//! ```toml
//! [[ddrc_cfg]]
//! reg = 0x4e300110
//! val = 0x44100001
//! ```

use std::path::Path;

use tracing::debug;

use crate::error::{TypeError, TypeResult};
use crate::timing::DramTiming;

impl DramTiming {
    /// Load and validate a dataset, picking the format from the extension.
    pub fn from_path(path: &Path) -> TypeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TypeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let timing = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            Some("toml") => Self::from_toml_str(&text)?,
            other => {
                return Err(TypeError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        debug!(
            path = %path.display(),
            fsp_cfg = timing.fsp_cfg.len(),
            fsp_msg = timing.fsp_msg.len(),
            bytes = timing.total_bytes(),
            "loaded timing dataset"
        );
        Ok(timing)
    }

    /// Parse and validate a JSON dataset.
    pub fn from_json_str(text: &str) -> TypeResult<Self> {
        let timing: Self =
            serde_json::from_str(text).map_err(|e| TypeError::Serialization(e.to_string()))?;
        timing.validate()?;
        Ok(timing)
    }

    /// Parse and validate a TOML dataset.
    pub fn from_toml_str(text: &str) -> TypeResult<Self> {
        let timing: Self =
            toml::from_str(text).map_err(|e| TypeError::Serialization(e.to_string()))?;
        timing.validate()?;
        Ok(timing)
    }
}
