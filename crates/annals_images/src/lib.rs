//! Image placeholder resolution for annals chapters.
//!
//! Generated chapters may contain placeholders such as `__周天子东迁__`.
//! The [`ImageEnricher`] resolves each one, in source order, into a markdown
//! image that points at a downloaded file (or at the remote URL when
//! downloading is turned off). Failures are logged and the placeholder is
//! left as written.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod baidu;
mod enricher;
mod placeholder;
mod policy;

pub use baidu::BaiduImageSearcher;
pub use enricher::{Enrichment, ImageEnricher};
pub use placeholder::{FALLBACK_KEYWORD, Placeholder, extract_placeholders};
pub use policy::ImagePolicy;
