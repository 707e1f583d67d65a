//! Output directory listing.

use annals_core::parse_chapter_dir_name;
use annals_error::{AnnalsResult, StorageError, StorageErrorKind};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, instrument};

/// Which chapters already exist on disk.
///
/// A chapter counts as existing when `chapter_NN/<readme>` is present.
/// Selection works on this snapshot rather than on the filesystem, so it can
/// be tested with plain sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSnapshot {
    generated: BTreeSet<u32>,
}

impl OutputSnapshot {
    /// Snapshot from explicit chapter numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use annals_book::OutputSnapshot;
    ///
    /// let snapshot = OutputSnapshot::from_numbers([3, 1, 2]);
    /// assert_eq!(snapshot.max(), Some(3));
    /// assert!(snapshot.contains(2));
    /// ```
    pub fn from_numbers(numbers: impl IntoIterator<Item = u32>) -> Self {
        Self {
            generated: numbers.into_iter().collect(),
        }
    }

    /// Scans `chapters_dir` for `chapter_NN/<readme_filename>` files.
    ///
    /// A missing directory is an empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns `FileRead` if the directory exists but cannot be listed.
    #[instrument(skip(chapters_dir), fields(dir = %chapters_dir.display()))]
    pub async fn scan(chapters_dir: &Path, readme_filename: &str) -> AnnalsResult<Self> {
        let mut entries = match tokio::fs::read_dir(chapters_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Chapters directory does not exist yet");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    chapters_dir.display(),
                    e
                )))
                .into());
            }
        };

        let mut generated = BTreeSet::new();
        loop {
            let entry = entries.next_entry().await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    chapters_dir.display(),
                    e
                )))
            })?;
            let Some(entry) = entry else { break };

            let name = entry.file_name();
            let Some(number) = name.to_str().and_then(parse_chapter_dir_name) else {
                continue;
            };
            let readme = entry.path().join(readme_filename);
            if tokio::fs::try_exists(&readme).await.unwrap_or(false) {
                generated.insert(number);
            }
        }

        debug!(count = generated.len(), "Scanned chapter output");
        Ok(Self { generated })
    }

    /// Whether a chapter exists.
    pub fn contains(&self, number: u32) -> bool {
        self.generated.contains(&number)
    }

    /// Highest existing chapter.
    pub fn max(&self) -> Option<u32> {
        self.generated.last().copied()
    }

    /// Existing chapters, ascending.
    pub fn numbers(&self) -> &BTreeSet<u32> {
        &self.generated
    }

    /// Number of existing chapters.
    pub fn len(&self) -> usize {
        self.generated.len()
    }

    /// Whether nothing has been generated.
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }
}
