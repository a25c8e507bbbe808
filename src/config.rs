//! Combined engine configuration, loadable from a partial JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::label::LabelConfig;
use crate::marker::MarkerConfig;
use crate::route::ObstructionConfig;

/// Settings for one annotation run. Missing JSON fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    pub marker: MarkerConfig,
    pub obstruction: ObstructionConfig,
    pub label: LabelConfig,
}

impl AnnotateConfig {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
