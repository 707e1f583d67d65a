//! Error types for the annals chapter generator.
//!
//! This crate provides the error types used throughout the annals workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Every error maps onto an [`ErrorClass`], which is what the CLI reports and
//! turns into a process exit code.
//!
//! # Examples
//!
//! ```
//! use annals_error::{AnnalsResult, ChapterError, ChapterErrorKind, ErrorClass};
//!
//! fn select() -> AnnalsResult<u32> {
//!     Err(ChapterError::new(ChapterErrorKind::UnknownChapter(99)))?
//! }
//!
//! let err = select().unwrap_err();
//! assert_eq!(err.class(), ErrorClass::InvalidArgument);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chapter;
mod class;
mod config;
mod error;
mod image;
mod models;
mod storage;

pub use chapter::{ChapterError, ChapterErrorKind};
pub use class::ErrorClass;
pub use config::ConfigError;
pub use error::{AnnalsError, AnnalsErrorKind, AnnalsResult};
pub use image::{ImageError, ImageErrorKind, ImageResult};
pub use models::{ModelsError, ModelsErrorKind, ModelsResult};
pub use storage::{StorageError, StorageErrorKind};
