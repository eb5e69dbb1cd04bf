//! Filesystem persistence for the four derived scoring artifacts.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use wrmsse_core::{Result, WrmsseError};

/// Bottom-level series identifiers, in dataset row order.
pub const SALES_IDS: &str = "sales_ids";
/// Aggregated actuals over the evaluation horizon.
pub const TEST_AGG: &str = "test_agg";
/// Naive-forecast error scale per aggregated series.
pub const TRAIN_MSE: &str = "train_mse";
/// Revenue weight per aggregated series.
pub const WEIGHTS: &str = "weights";

/// Artifact store backed by one JSON file per artifact in a directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Persist one artifact, creating the store directory if needed.
    pub fn save<T: Serialize>(&self, name: &str, artifact: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(name);
        let json = serde_json::to_vec(artifact)?;
        fs::write(&path, json)?;
        debug!(name, path = %path.display(), "saved artifact");
        Ok(())
    }

    /// Load one artifact. An absent file is reported as a typed
    /// `MissingArtifact` so a caller can never mistake it for a score.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.path(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(WrmsseError::MissingArtifact(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}
