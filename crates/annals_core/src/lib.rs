//! Core data types for the annals chapter generator.
//!
//! This crate holds the plan, settings, chat and artifact types shared by
//! every other crate in the workspace. Nothing in here performs network I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod chapter;
mod image;
mod message;
mod prompt;
mod request;
mod role;
mod settings;

pub use artifact::{ChapterArtifact, ChapterImage};
pub use chapter::{
    ChapterPlan, ChapterSpec, ChapterSpecBuilder, chapter_dir_name, parse_chapter_dir_name,
};
pub use image::{FetchedImage, ImageCandidate};
pub use message::Message;
pub use prompt::ChapterPrompt;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse, TokenUsage};
pub use role::Role;
pub use settings::{
    AnnalsConfig, ApiSettings, GenerationConfig, GenerationSettings, ImageSettings, ImageSource,
    OutputSettings, PathSettings,
};
