//! Trait definitions for the annals chapter generator.
//!
//! The generation pipeline only talks to the network through these traits,
//! so every stage can be driven by an in-memory double in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{AnnalsDriver, ImageFetch, ImageSearch, SecretSource};
