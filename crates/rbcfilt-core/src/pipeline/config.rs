use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::export::ChompConfig;
use crate::mask::EdgePolicy;
use crate::spectral::FilterSpec;

/// Everything needed to filter one cell's frames.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchConfig {
    /// A frame file, or a directory of `.npy` / `.txt` frames.
    pub frames: PathBuf,
    /// Boundary mask of the cell, in the text matrix format.
    pub boundary: PathBuf,
    /// Directory receiving records and exports.
    pub output: PathBuf,
    /// Filters applied to every frame.
    #[serde(default = "default_filters")]
    pub filters: Vec<FilterSpec>,
    /// Edge handling when eroding the boundary mask.
    #[serde(default)]
    pub edge_policy: EdgePolicy,
    #[serde(default)]
    pub layout: RecordLayout,
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_filters() -> Vec<FilterSpec> {
    vec![FilterSpec::default()]
}

impl BatchConfig {
    pub fn new(frames: PathBuf, boundary: PathBuf, output: PathBuf) -> Self {
        Self {
            frames,
            boundary,
            output,
            filters: default_filters(),
            edge_policy: EdgePolicy::default(),
            layout: RecordLayout::default(),
            export: ExportConfig::default(),
        }
    }
}

/// How filtered records are grouped on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordLayout {
    /// One record file per (frame, filter), under a directory per filter.
    #[default]
    PerFrame,
    /// One list file per filter holding every frame, in frame order.
    PerFilter,
}

impl std::fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerFrame => write!(f, "Per frame"),
            Self::PerFilter => write!(f, "Per filter"),
        }
    }
}

/// Downstream exports for the topology toolchain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Write thresholded coordinate lists.
    #[serde(default)]
    pub coords: bool,
    /// Run the homology tool on each coordinate list (implies `coords`).
    #[serde(default)]
    pub chomp: Option<ChompConfig>,
}

impl ExportConfig {
    pub fn writes_coords(&self) -> bool {
        self.coords || self.chomp.is_some()
    }
}
