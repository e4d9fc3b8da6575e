//! Timestamp marker file.
//!
//! The marker is an empty file whose modification time records the last
//! completed check. Its content is never read. An absent marker means no
//! check has completed yet.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::trace;

/// Suffix appended to the package name to form the marker file name.
pub const TIMESTAMP_SUFFIX: &str = "-update-check";

/// Handle on the marker file of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampMarker {
    path: PathBuf,
}

impl TimestampMarker {
    /// Marker for `package_name` inside `folder`.
    ///
    /// The file is `<folder>/<package_name>-update-check`. Scoped names
    /// such as `@xpack/xpm` therefore land in a `@xpack` subfolder.
    pub fn new(folder: &Path, package_name: &str) -> Self {
        Self {
            path: folder.join(format!("{package_name}{TIMESTAMP_SUFFIX}")),
        }
    }

    /// Absolute path of the marker file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time of the marker, or `None` when it cannot be read.
    pub async fn modified(&self) -> Option<SystemTime> {
        match fs::metadata(&self.path).await.and_then(|metadata| metadata.modified()) {
            Ok(modified) => {
                trace!("Read timestamp {}", self.path.display());
                Some(modified)
            }
            Err(e) => {
                trace!("No timestamp at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Time elapsed since the marker was last written.
    ///
    /// A modification time in the future counts as zero age.
    pub async fn age(&self) -> Option<Duration> {
        let modified = self.modified().await?;
        Some(SystemTime::now().duration_since(modified).unwrap_or(Duration::ZERO))
    }

    /// Returns `true` when there is no marker or it is at least `interval` old.
    pub async fn is_expired(&self, interval: Duration) -> bool {
        match self.age().await {
            Some(age) if age < interval => {
                trace!(
                    "Update timeout did not expire {} < {}",
                    age.as_secs(),
                    interval.as_secs()
                );
                false
            }
            Some(_) => true,
            None => {
                trace!("There is no previous update timestamp");
                true
            }
        }
    }

    /// Delete the marker. A missing marker is not an error.
    pub async fn clear(&self) -> Result<()> {
        trace!("Clearing timestamp {}", self.path.display());

        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove timestamp file: {}", self.path.display())
            }),
        }
    }

    /// Create the marker as an empty file, creating its folder if needed.
    pub async fn touch(&self) -> Result<()> {
        trace!("Creating timestamp {}", self.path.display());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::File::create(&self.path)
            .await
            .with_context(|| format!("Failed to create timestamp file: {}", self.path.display()))?;

        Ok(())
    }

    /// Delete and recreate the marker so its modification time becomes now.
    pub async fn refresh(&self) -> Result<()> {
        self.clear().await?;
        self.touch().await
    }
}
