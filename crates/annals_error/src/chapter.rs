//! Plan, selection and prompt error types.

use crate::ErrorClass;

/// Specific error conditions for chapter planning and prompt assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ChapterErrorKind {
    /// Failed to read the plan or template file
    #[display("Failed to read {}: {}", path, message)]
    FileRead {
        /// Path that could not be read
        path: String,
        /// Underlying I/O message
        message: String,
    },
    /// Plan file is not valid JSON/TOML for the plan schema
    #[display("Failed to parse plan: {}", _0)]
    Parse(String),
    /// Plan contains no chapters
    #[display("Chapter plan contains no chapters")]
    EmptyPlan,
    /// Chapter numbers start at 1
    #[display("Chapter numbers must be positive, found 0")]
    ZeroChapterNumber,
    /// Two plan records share a number
    #[display("Chapter {} appears more than once in the plan", _0)]
    DuplicateChapter(u32),
    /// Requested chapter is not in the plan
    #[display("Chapter {} not found in plan", _0)]
    UnknownChapter(u32),
    /// Every chapter up to the plan's maximum already exists
    #[display("All {} planned chapters have been generated", _0)]
    AllChaptersGenerated(usize),
    /// The chapter after the highest generated one is missing from the plan,
    /// or earlier chapters are missing from the output
    #[display(
        "Cannot pick next chapter: expected {}, but chapter {} is missing from the {}",
        expected,
        missing,
        location
    )]
    OutOfSequence {
        /// Highest generated chapter + 1
        expected: u32,
        /// First chapter number that breaks the sequence
        missing: u32,
        /// "plan" or "output directory"
        location: &'static str,
    },
    /// A required chapter field is empty
    #[display("Chapter {} is missing required field '{}'", chapter, field)]
    MissingField {
        /// Chapter number
        chapter: u32,
        /// Field name
        field: &'static str,
    },
    /// Prompt template could not be rendered
    #[display("Template error: {}", _0)]
    Template(String),
}

impl ChapterErrorKind {
    /// Failure class of this condition.
    pub fn class(&self) -> ErrorClass {
        match self {
            ChapterErrorKind::FileRead { .. } => ErrorClass::Io,
            ChapterErrorKind::AllChaptersGenerated(_) | ChapterErrorKind::OutOfSequence { .. } => {
                ErrorClass::NotFound
            }
            _ => ErrorClass::InvalidArgument,
        }
    }
}

/// Error type for plan, selection and prompt operations.
///
/// # Examples
///
/// ```
/// use annals_error::{ChapterError, ChapterErrorKind, ErrorClass};
///
/// let err = ChapterError::new(ChapterErrorKind::AllChaptersGenerated(30));
/// assert!(format!("{}", err).contains("30"));
/// assert_eq!(err.kind.class(), ErrorClass::NotFound);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Chapter Error: {} at line {} in {}", kind, line, file)]
pub struct ChapterError {
    /// The specific error condition
    pub kind: ChapterErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ChapterError {
    /// Create a new ChapterError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ChapterErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
