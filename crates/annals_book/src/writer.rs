//! Chapter output.

use crate::fs::{ensure_dir, write_atomic};
use annals_core::{ChapterArtifact, OutputSettings, chapter_dir_name};
use annals_error::{AnnalsResult, StorageError, StorageErrorKind};
use chrono::SecondsFormat;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, instrument};

/// Renders the chapter file: YAML front matter followed by the body.
///
/// # Examples
///
/// ```
/// use annals_book::render_chapter_file;
/// use annals_core::ChapterArtifact;
/// use chrono::{TimeZone, Utc};
///
/// let artifact = ChapterArtifact::new(1, "烽火戏诸侯", "西周末年", "# 第1章\n", vec![])
///     .with_generated_at(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap());
///
/// assert_eq!(
///     render_chapter_file(&artifact),
///     "---\nchapter: 1\ntitle: 烽火戏诸侯\nperiod: 西周末年\ngenerated_at: 2024-05-01T08:30:00Z\n---\n\n# 第1章\n",
/// );
/// ```
pub fn render_chapter_file(artifact: &ChapterArtifact) -> String {
    format!(
        "---\nchapter: {}\ntitle: {}\nperiod: {}\ngenerated_at: {}\n---\n\n{}",
        artifact.number(),
        artifact.title(),
        artifact.period(),
        artifact
            .generated_at()
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        artifact.markdown()
    )
}

/// Writes chapter artifacts under `chapters_dir/chapter_NN/`.
///
/// Writing a chapter that already exists replaces it: images left over from
/// the previous run are removed before the new ones are written, and the
/// markdown file is written last so its presence means the chapter is
/// complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterWriter {
    chapters_dir: PathBuf,
    readme_filename: String,
    image_dir: String,
}

impl ChapterWriter {
    /// Creates a writer.
    pub fn new(
        chapters_dir: impl Into<PathBuf>,
        readme_filename: impl Into<String>,
        image_dir: impl Into<String>,
    ) -> Self {
        Self {
            chapters_dir: chapters_dir.into(),
            readme_filename: readme_filename.into(),
            image_dir: image_dir.into(),
        }
    }

    /// Creates a writer from output settings and the image directory name.
    pub fn from_settings(output: &OutputSettings, image_dir: impl Into<String>) -> Self {
        Self::new(
            output.chapters_dir().clone(),
            output.readme_filename().clone(),
            image_dir,
        )
    }

    /// Directory for a chapter.
    pub fn chapter_dir(&self, number: u32) -> PathBuf {
        self.chapters_dir.join(chapter_dir_name(number))
    }

    /// Markdown file for a chapter.
    pub fn chapter_file(&self, number: u32) -> PathBuf {
        self.chapter_dir(number).join(&self.readme_filename)
    }

    /// Writes the images and markdown for one chapter.
    ///
    /// Returns the path of the markdown file.
    ///
    /// # Errors
    ///
    /// * `InvalidPath` if an image path is absolute or leaves the chapter
    ///   directory; nothing is written in that case
    /// * `DirectoryCreation`, `FileWrite` or `FileRemove` on I/O failure
    #[instrument(skip(self, artifact), fields(chapter = *artifact.number(), images = artifact.images().len()))]
    pub async fn write(&self, artifact: &ChapterArtifact) -> AnnalsResult<PathBuf> {
        for image in artifact.images() {
            check_relative(image.local_path())?;
        }

        let number = *artifact.number();
        let chapter_dir = self.chapter_dir(number);
        ensure_dir(&chapter_dir).await?;

        let removed = self.remove_stale_images(&chapter_dir, number).await?;
        if removed > 0 {
            debug!(removed, "Removed images from previous run");
        }

        for image in artifact.images() {
            let path = chapter_dir.join(image.local_path());
            write_atomic(&path, image.data()).await?;
            debug!(path = %path.display(), bytes = image.data().len(), "Wrote image");
        }

        let file = chapter_dir.join(&self.readme_filename);
        write_atomic(&file, render_chapter_file(artifact).as_bytes()).await?;

        info!(path = %file.display(), "Chapter written");
        Ok(file)
    }

    async fn remove_stale_images(&self, chapter_dir: &Path, number: u32) -> AnnalsResult<usize> {
        let image_dir = chapter_dir.join(&self.image_dir);
        let mut entries = match tokio::fs::read_dir(&image_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    image_dir.display(),
                    e
                )))
                .into());
            }
        };

        let prefix = format!("{}_image_", chapter_dir_name(number));
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                image_dir.display(),
                e
            )))
        })? {
            let is_ours = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&prefix));
            if !is_ours {
                continue;
            }
            let path = entry.path();
            tokio::fs::remove_file(&path).await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRemove(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?;
            removed += 1;
        }
        Ok(removed)
    }
}

fn check_relative(path: &Path) -> AnnalsResult<()> {
    let escapes = path.as_os_str().is_empty()
        || path.components().any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(StorageError::new(StorageErrorKind::InvalidPath(format!(
            "image path must stay inside the chapter directory: {}",
            path.display()
        )))
        .into());
    }
    Ok(())
}
