// ABOUTME: Lab-directory path conventions for generated artifacts
// ABOUTME: Keeps the authorized_keys artifact name in one place for the aggregator and node provisioning

use std::path::{Path, PathBuf};

/// Name of the shared authorized-keys artifact inside a lab directory.
const AUTHZ_KEYS_FILENAME: &str = "authorized_keys";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabPaths {
    lab_dir: PathBuf,
}

impl LabPaths {
    pub fn new(lab_dir: impl Into<PathBuf>) -> Self {
        Self {
            lab_dir: lab_dir.into(),
        }
    }

    pub fn lab_dir(&self) -> &Path {
        &self.lab_dir
    }

    /// Path of the aggregated authorized_keys file handed to node provisioning.
    pub fn authorized_keys_file(&self) -> PathBuf {
        self.lab_dir.join(AUTHZ_KEYS_FILENAME)
    }
}
