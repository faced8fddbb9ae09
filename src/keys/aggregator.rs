// ABOUTME: Key-source discovery and aggregation into a single authorized_keys artifact
// ABOUTME: Concatenates newline-normalized public key files so operators can SSH into lab nodes

use crate::config::KeysConfig;
use glob::glob;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Mode for the generated artifact; node provisioning only needs to read it.
const AUTHZ_KEYS_MODE: u32 = 0o644;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed globbing the path {pattern}")]
    Discovery {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed reading the file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed writing {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed setting permissions on {}", .path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct KeyAggregator {
    pub_keys_glob: String,
    authorized_keys_path: PathBuf,
}

impl KeyAggregator {
    pub fn new(pub_keys_glob: impl Into<String>, authorized_keys_path: impl Into<PathBuf>) -> Self {
        Self {
            pub_keys_glob: pub_keys_glob.into(),
            authorized_keys_path: authorized_keys_path.into(),
        }
    }

    pub fn from_config(config: &KeysConfig) -> Self {
        Self::new(
            config.pub_keys_glob.clone(),
            config.authorized_keys_path.clone(),
        )
    }

    /// Builds the authorized_keys file at `destination` from every glob match
    /// plus the host's own authorized_keys file if it exists.
    ///
    /// Finding no sources at all is a valid no-op: the destination is left
    /// untouched and no error is returned. Any read failure aborts before the
    /// destination is written.
    pub fn build(&self, destination: &Path) -> Result<(), AggregateError> {
        let sources = self.discover()?;

        if sources.is_empty() {
            debug!("no public keys found");
            return Ok(());
        }

        debug!("found public key files {:?}", sources);

        let mut buffer: Vec<u8> = Vec::new();

        for path in &sources {
            let mut content = fs::read(path).map_err(|source| AggregateError::Read {
                path: path.clone(),
                source,
            })?;

            // ensure the key ends with a newline
            if !content.ends_with(b"\n") {
                content.push(b'\n');
            }

            buffer.extend_from_slice(&content);
        }

        fs::write(destination, &buffer).map_err(|source| AggregateError::Write {
            path: destination.to_path_buf(),
            source,
        })?;

        set_artifact_mode(destination)
    }

    /// Enumerates the key sources in the order they will be concatenated:
    /// glob matches first, then the host authorized_keys file if present.
    fn discover(&self) -> Result<Vec<PathBuf>, AggregateError> {
        let matches = glob(&self.pub_keys_glob).map_err(|source| AggregateError::Discovery {
            pattern: self.pub_keys_glob.clone(),
            source,
        })?;

        let mut sources = Vec::new();
        for entry in matches {
            match entry {
                Ok(path) => sources.push(path),
                // unreadable entries during traversal are not key sources
                Err(err) => debug!("skipping unreadable glob match: {err}"),
            }
        }

        if self.authorized_keys_path.exists() {
            debug!(
                "{} found, adding the public keys it contains",
                self.authorized_keys_path.display()
            );
            sources.push(self.authorized_keys_path.clone());
        }

        Ok(sources)
    }
}

fn set_artifact_mode(path: &Path) -> Result<(), AggregateError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)
            .map_err(|source| AggregateError::Permissions {
                path: path.to_path_buf(),
                source,
            })?
            .permissions();
        perms.set_mode(AUTHZ_KEYS_MODE);
        fs::set_permissions(path, perms).map_err(|source| AggregateError::Permissions {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(())
}
