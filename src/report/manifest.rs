//! Run manifest listing the files an experiment produced

use crate::simulation::SimulationResult;
use crate::types::{ExperimentKind, RunId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the manifest inside the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Identity and output files of one experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Unique run identifier
    pub run_id: RunId,
    /// Wall-clock time the manifest was created
    pub generated_at: DateTime<Utc>,
    /// Experiment that was run
    pub experiment: ExperimentKind,
    /// Seed of the random streams
    pub seed: u64,
    /// Report files, relative to the output directory when possible
    pub files: Vec<PathBuf>,
}

impl RunManifest {
    /// Empty manifest stamped with a fresh run id and the current time
    pub fn new(experiment: ExperimentKind, seed: u64) -> Self {
        Self { run_id: RunId::new(), generated_at: Utc::now(), experiment, seed, files: Vec::new() }
    }

    /// Record a written file, stripping `dir` from its path
    pub fn add_file(&mut self, dir: &Path, path: PathBuf) {
        let relative = path.strip_prefix(dir).map(Path::to_path_buf).unwrap_or(path);
        self.files.push(relative);
    }

    /// Write the manifest as `manifest.json` in `dir`
    pub fn write(&self, dir: &Path) -> SimulationResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(MANIFEST_FILE);
        fs::write(&path, serde_json::to_vec_pretty(self)?)?;
        Ok(path)
    }

    /// Read a manifest back from `dir`
    pub fn load(dir: &Path) -> SimulationResult<Self> {
        let content = fs::read_to_string(dir.join(MANIFEST_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }
}
