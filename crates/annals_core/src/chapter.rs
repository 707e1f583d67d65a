//! Chapter plan types.

use annals_error::{ChapterError, ChapterErrorKind};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Metadata for one planned chapter.
///
/// Authored by hand in the plan file and never mutated by the generator.
/// Plan files written for older tooling call the number `id`.
///
/// # Examples
///
/// ```
/// use annals_core::ChapterSpec;
///
/// let spec = ChapterSpec::builder()
///     .number(1u32)
///     .title("烽火戏诸侯")
///     .period("西周末年")
///     .keywords(vec!["周幽王".to_string(), "褒姒".to_string()])
///     .core_concept("一场玩笑断送了西周")
///     .build()
///     .unwrap();
///
/// assert_eq!(*spec.number(), 1);
/// assert_eq!(spec.keyword_list(), "周幽王, 褒姒");
/// assert!(spec.content_guide().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into, strip_option))]
pub struct ChapterSpec {
    /// Chapter number, starting at 1
    #[serde(alias = "id")]
    number: u32,
    /// Chapter title
    title: String,
    /// Historical period covered
    #[serde(default)]
    #[builder(default)]
    period: String,
    /// Ordered subject keywords
    #[serde(default)]
    #[builder(default)]
    keywords: Vec<String>,
    /// Free-form description
    #[serde(default)]
    #[builder(default)]
    description: String,
    /// One-line hook for the chapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    core_concept: Option<String>,
    /// Reading guide shown ahead of the chapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    content_guide: Option<String>,
}

impl ChapterSpec {
    /// Creates a new chapter builder.
    pub fn builder() -> ChapterSpecBuilder {
        ChapterSpecBuilder::default()
    }

    /// Keywords joined with `", "`.
    pub fn keyword_list(&self) -> String {
        self.keywords.join(", ")
    }

    /// Checks the fields a prompt cannot be built without.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for the first of title, period or keywords
    /// that is empty.
    pub fn require_prompt_fields(&self) -> Result<(), ChapterError> {
        let missing = if self.title.trim().is_empty() {
            Some("title")
        } else if self.period.trim().is_empty() {
            Some("period")
        } else if self.keywords.iter().all(|k| k.trim().is_empty()) {
            Some("keywords")
        } else {
            None
        };

        match missing {
            Some(field) => Err(ChapterError::new(ChapterErrorKind::MissingField {
                chapter: self.number,
                field,
            })),
            None => Ok(()),
        }
    }
}

/// The authored list of every chapter in the book.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct ChapterPlan {
    /// Book title
    #[serde(default)]
    book_title: String,
    /// Book blurb shown on the index page
    #[serde(default)]
    book_description: String,
    /// System prompt sent with every chapter request
    #[serde(default)]
    system_prompt: String,
    /// Chapter records, in authored order
    #[serde(default)]
    chapters: Vec<ChapterSpec>,
}

impl ChapterPlan {
    /// Creates a plan from its parts.
    pub fn new(
        book_title: impl Into<String>,
        book_description: impl Into<String>,
        system_prompt: impl Into<String>,
        chapters: Vec<ChapterSpec>,
    ) -> Self {
        Self {
            book_title: book_title.into(),
            book_description: book_description.into(),
            system_prompt: system_prompt.into(),
            chapters,
        }
    }

    /// Checks that the plan is usable: non-empty, numbered from 1, unique.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPlan`, `ZeroChapterNumber` or `DuplicateChapter`.
    pub fn validate(&self) -> Result<(), ChapterError> {
        if self.chapters.is_empty() {
            return Err(ChapterError::new(ChapterErrorKind::EmptyPlan));
        }

        let mut seen = HashSet::new();
        for chapter in &self.chapters {
            if chapter.number == 0 {
                return Err(ChapterError::new(ChapterErrorKind::ZeroChapterNumber));
            }
            if !seen.insert(chapter.number) {
                return Err(ChapterError::new(ChapterErrorKind::DuplicateChapter(
                    chapter.number,
                )));
            }
        }
        Ok(())
    }

    /// Looks up a chapter by number.
    pub fn get(&self, number: u32) -> Option<&ChapterSpec> {
        self.chapters.iter().find(|c| c.number == number)
    }

    /// Whether the plan has a chapter with this number.
    pub fn contains(&self, number: u32) -> bool {
        self.get(number).is_some()
    }

    /// All chapter numbers in ascending order.
    pub fn numbers(&self) -> BTreeSet<u32> {
        self.chapters.iter().map(|c| c.number).collect()
    }

    /// Lowest chapter number.
    pub fn first_number(&self) -> Option<u32> {
        self.chapters.iter().map(|c| c.number).min()
    }

    /// Highest chapter number.
    pub fn max_number(&self) -> Option<u32> {
        self.chapters.iter().map(|c| c.number).max()
    }

    /// Number of planned chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Whether the plan has no chapters.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapters sorted by number.
    pub fn sorted(&self) -> Vec<&ChapterSpec> {
        let mut chapters: Vec<&ChapterSpec> = self.chapters.iter().collect();
        chapters.sort_by_key(|c| c.number);
        chapters
    }
}

/// Directory name for a chapter: `chapter_01`, `chapter_12`, `chapter_120`.
///
/// # Examples
///
/// ```
/// use annals_core::chapter_dir_name;
///
/// assert_eq!(chapter_dir_name(7), "chapter_07");
/// assert_eq!(chapter_dir_name(123), "chapter_123");
/// ```
pub fn chapter_dir_name(number: u32) -> String {
    format!("chapter_{number:02}")
}

/// Inverse of [`chapter_dir_name`]; `None` for anything else.
///
/// Only the canonical spelling is accepted, so `chapter_1` and `chapter_007`
/// are not chapter directories.
///
/// # Examples
///
/// ```
/// use annals_core::parse_chapter_dir_name;
///
/// assert_eq!(parse_chapter_dir_name("chapter_07"), Some(7));
/// assert_eq!(parse_chapter_dir_name("chapter_00"), None);
/// assert_eq!(parse_chapter_dir_name("chapter_7b"), None);
/// assert_eq!(parse_chapter_dir_name("images"), None);
/// assert_eq!(parse_chapter_dir_name("chapter_1"), None);
/// assert_eq!(parse_chapter_dir_name("chapter_007"), None);
/// assert_eq!(parse_chapter_dir_name("chapter_100"), Some(100));
/// ```
pub fn parse_chapter_dir_name(name: &str) -> Option<u32> {
    let digits = name.strip_prefix("chapter_")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits
        .parse()
        .ok()
        .filter(|n| *n > 0 && chapter_dir_name(*n) == name)
}
