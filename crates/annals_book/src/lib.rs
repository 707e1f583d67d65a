//! Chapter selection, prompting, writing and indexing for annals.
//!
//! One [`ChapterGenerator::generate`] call runs the whole pipeline for one
//! chapter:
//!
//! ```text
//! ChapterSelector -> PromptBuilder -> AnnalsDriver -> ImageEnricher -> ChapterWriter
//! ```
//!
//! [`IndexUpdater`] runs independently and only reads the filesystem and the
//! plan.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod fs;
mod generator;
mod index;
mod plan;
mod prompt;
mod selector;
mod snapshot;
mod writer;

pub use book::Book;
pub use generator::{ChapterGenerator, GeneratedChapter};
pub use index::{IndexSummary, IndexUpdater};
pub use plan::load_plan;
pub use prompt::{BUNDLED_TEMPLATE, PromptBuilder, TemplateVariable};
pub use selector::ChapterSelector;
pub use snapshot::OutputSnapshot;
pub use writer::{ChapterWriter, render_chapter_file};
