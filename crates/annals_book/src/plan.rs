//! Plan file loading.

use annals_core::ChapterPlan;
use annals_error::{AnnalsResult, ChapterError, ChapterErrorKind};
use std::path::Path;
use tracing::{debug, instrument};

/// Loads and validates a chapter plan.
///
/// Files ending in `.toml` are read as TOML; everything else as JSON.
///
/// # Errors
///
/// * `FileRead` (Io) if the file cannot be read
/// * `Parse` if it does not match the plan schema
/// * `EmptyPlan`, `ZeroChapterNumber` or `DuplicateChapter` from validation
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn load_plan(path: impl AsRef<Path>) -> AnnalsResult<ChapterPlan> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        ChapterError::new(ChapterErrorKind::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let plan: ChapterPlan = if is_toml {
        toml::from_str(&text)
            .map_err(|e| ChapterError::new(ChapterErrorKind::Parse(e.to_string())))?
    } else {
        serde_json::from_str(&text)
            .map_err(|e| ChapterError::new(ChapterErrorKind::Parse(e.to_string())))?
    };

    plan.validate()?;
    debug!(
        book = %plan.book_title(),
        chapters = plan.len(),
        "Chapter plan loaded"
    );
    Ok(plan)
}
