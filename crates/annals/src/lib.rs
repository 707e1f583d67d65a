//! Annals - a serialized history book, written one chapter at a time.
//!
//! Each run asks an LLM for the next chapter in a hand-written plan,
//! optionally swaps image placeholders for searched pictures, writes
//! `chapters/chapter_NN/README.md`, and can refresh the book's index page.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use annals::{AnnalsConfig, Book, ChapterGenerator, ProcessEnv};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnnalsConfig::load(None)?;
//!     let book = Book::load(config, None).await?;
//!     let generator = ChapterGenerator::from_config(book, &ProcessEnv)?;
//!
//!     let chapter = generator.generate(None).await?;
//!     println!("wrote {}", chapter.path().display());
//!
//!     generator.book().update_index().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `annals_error` - error types and failure classes
//! - `annals_core` - plan, request and configuration types
//! - `annals_interface` - driver, image and secret traits
//! - `annals_models` - OpenAI-compatible DeepSeek client
//! - `annals_images` - image placeholder resolution
//! - `annals_book` - selection, prompting, writing and indexing
//!
//! This crate (`annals`) re-exports everything for convenience.

pub use annals_book::*;
pub use annals_core::*;
pub use annals_error::*;
pub use annals_images::*;
pub use annals_interface::*;
pub use annals_models::*;

pub mod telemetry;
