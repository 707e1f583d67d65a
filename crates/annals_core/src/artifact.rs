//! Generated chapter artifacts.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use std::path::PathBuf;

/// An image downloaded for a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ChapterImage {
    /// Path relative to the chapter directory, e.g. `images/chapter_01_image_1.jpg`
    local_path: PathBuf,
    /// Where the bytes came from
    source_url: String,
    /// Placeholder keyword the image illustrates
    keyword: String,
    /// Image body
    data: Vec<u8>,
}

impl ChapterImage {
    /// Creates an image record.
    pub fn new(
        local_path: impl Into<PathBuf>,
        source_url: impl Into<String>,
        keyword: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            source_url: source_url.into(),
            keyword: keyword.into(),
            data,
        }
    }
}

/// The output of one generation run, ready to be written.
///
/// `markdown` is the body text; front matter is added by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ChapterArtifact {
    /// Chapter number
    number: u32,
    /// Chapter title, for front matter
    title: String,
    /// Chapter period, for front matter
    period: String,
    /// Body text, with placeholders resolved where possible
    markdown: String,
    /// Downloaded images in placeholder order
    images: Vec<ChapterImage>,
    /// When the text was generated
    generated_at: DateTime<Utc>,
}

impl ChapterArtifact {
    /// Creates an artifact stamped with the current time.
    pub fn new(
        number: u32,
        title: impl Into<String>,
        period: impl Into<String>,
        markdown: impl Into<String>,
        images: Vec<ChapterImage>,
    ) -> Self {
        Self {
            number,
            title: title.into(),
            period: period.into(),
            markdown: markdown.into(),
            images,
            generated_at: Utc::now(),
        }
    }

    /// Overrides the generation timestamp.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}
