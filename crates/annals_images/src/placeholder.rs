//! Placeholder extraction.

use derive_getters::Getters;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Search term used when a placeholder and its chapter offer nothing better.
pub const FALLBACK_KEYWORD: &str = "历史";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_\n]+)__").expect("Valid placeholder regex"));

/// An image placeholder found in generated text.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Placeholder {
    /// 1-based position among all placeholders in the text
    index: usize,
    /// Description between the underscores, trimmed; may be empty
    keyword: String,
    /// The placeholder exactly as written
    raw: String,
    /// Byte range of `raw` in the text
    span: Range<usize>,
}

impl Placeholder {
    /// The term to search for.
    ///
    /// A blank placeholder borrows the chapter keyword at
    /// `(index - 1) % keywords.len()`, or [`FALLBACK_KEYWORD`].
    ///
    /// # Examples
    ///
    /// ```
    /// use annals_images::extract_placeholders;
    ///
    /// let keywords = vec!["管仲".to_string(), "齐桓公".to_string()];
    /// let found = extract_placeholders("__ __ 和 __葵丘会盟__ 和 __  __");
    ///
    /// assert_eq!(found[0].search_keyword(&keywords), "管仲");
    /// assert_eq!(found[1].search_keyword(&keywords), "葵丘会盟");
    /// assert_eq!(found[2].search_keyword(&keywords), "管仲");
    /// assert_eq!(found[2].search_keyword(&[]), "历史");
    /// ```
    pub fn search_keyword(&self, chapter_keywords: &[String]) -> String {
        if !self.keyword.is_empty() {
            return self.keyword.clone();
        }
        let usable: Vec<&str> = chapter_keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if usable.is_empty() {
            FALLBACK_KEYWORD.to_string()
        } else {
            usable[(self.index - 1) % usable.len()].to_string()
        }
    }
}

/// Finds every `__keyword__` placeholder, in source order.
///
/// # Examples
///
/// ```
/// use annals_images::extract_placeholders;
///
/// let text = "周平王 __周天子东迁__ 洛邑。__ 洛邑城墙 __";
/// let found = extract_placeholders(text);
///
/// assert_eq!(found.len(), 2);
/// assert_eq!(*found[0].index(), 1);
/// assert_eq!(found[0].keyword(), "周天子东迁");
/// assert_eq!(found[1].keyword(), "洛邑城墙");
/// assert_eq!(&text[found[1].span().clone()], "__ 洛邑城墙 __");
/// ```
pub fn extract_placeholders(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(text)
        .enumerate()
        .filter_map(|(i, cap)| {
            let whole = cap.get(0)?;
            let keyword = cap.get(1)?.as_str().trim().to_string();
            Some(Placeholder {
                index: i + 1,
                keyword,
                raw: whole.as_str().to_string(),
                span: whole.range(),
            })
        })
        .collect()
}
