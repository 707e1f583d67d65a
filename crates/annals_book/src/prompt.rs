//! User-prompt template rendering.

use annals_core::{ChapterPlan, ChapterPrompt, ChapterSpec, GenerationConfig};
use annals_error::{AnnalsResult, ChapterError, ChapterErrorKind};
use regex::Regex;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, instrument};

/// Template shipped with the crate.
pub const BUNDLED_TEMPLATE: &str = include_str!("../prompts/chapter_prompt.txt");

/// Instructions appended when image enrichment is enabled.
const IMAGE_INSTRUCTIONS: &str = "\n\n**配图要求：**\n\
在适合配图的段落之后单独起一行，写下形如 __图片描述__ 的图片占位符，\
描述用几个字概括画面，例如 __周幽王烽火戏诸侯__。全章放 2 到 4 个占位符，\
不要使用任何其他图片语法。";

/// Matches escaped braces, a variable, or a stray brace.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([a-z_]+)\}|\{|\}").expect("Valid template token regex")
});

/// Placeholders a template may use, written `{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum TemplateVariable {
    /// Book title from the plan
    BookTitle,
    /// Chapter number
    ChapterNumber,
    /// Chapter title
    ChapterTitle,
    /// Historical period
    ChapterPeriod,
    /// Keywords joined with `", "`
    ChapterKeywords,
    /// Free-form description
    ChapterDescription,
    /// `- 核心梗：...` line, or empty
    CoreConceptSection,
    /// Reading-guide block, or empty
    ContentGuideSection,
    /// Image placeholder instructions, or empty when images are off
    ImageSection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Variable(TemplateVariable),
}

/// Renders the user prompt for a chapter.
///
/// The template is parsed once at construction, so a malformed template is
/// reported before any chapter is selected. Rendering is deterministic: the
/// same plan, chapter and configuration always give the same prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBuilder {
    segments: Vec<Segment>,
}

impl PromptBuilder {
    /// Parses a template.
    ///
    /// `{{` and `}}` render as literal braces.
    ///
    /// # Errors
    ///
    /// Returns `Template` for an unknown `{name}` or an unmatched brace.
    ///
    /// # Examples
    ///
    /// ```
    /// use annals_book::PromptBuilder;
    ///
    /// assert!(PromptBuilder::new("写《{book_title}》第{chapter_number}章").is_ok());
    /// assert!(PromptBuilder::new("{{literal}} {chapter_title}").is_ok());
    /// assert!(PromptBuilder::new("{author}").is_err());
    /// assert!(PromptBuilder::new("{chapter_title").is_err());
    /// ```
    pub fn new(template: &str) -> Result<Self, ChapterError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut last = 0;

        for caps in TOKEN.captures_iter(template) {
            let Some(whole) = caps.get(0) else { continue };
            text.push_str(&template[last..whole.start()]);
            last = whole.end();

            match whole.as_str() {
                "{{" => text.push('{'),
                "}}" => text.push('}'),
                "{" | "}" => {
                    return Err(ChapterError::new(ChapterErrorKind::Template(format!(
                        "unmatched '{}' at byte {}",
                        whole.as_str(),
                        whole.start()
                    ))));
                }
                _ => {
                    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                    let variable = TemplateVariable::from_str(name).map_err(|_| {
                        ChapterError::new(ChapterErrorKind::Template(format!(
                            "unknown placeholder '{{{}}}'",
                            name
                        )))
                    })?;
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Variable(variable));
                }
            }
        }
        text.push_str(&template[last..]);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self { segments })
    }

    /// The template shipped with the crate.
    pub fn bundled() -> Result<Self, ChapterError> {
        Self::new(BUNDLED_TEMPLATE)
    }

    /// Reads and parses a template file.
    ///
    /// # Errors
    ///
    /// Returns `FileRead` if the file cannot be read, or `Template` if it
    /// does not parse.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn from_file(path: impl AsRef<Path>) -> AnnalsResult<Self> {
        let path = path.as_ref();
        let template = tokio::fs::read_to_string(path).await.map_err(|e| {
            ChapterError::new(ChapterErrorKind::FileRead {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        debug!(bytes = template.len(), "Loaded prompt template");
        Ok(Self::new(&template)?)
    }

    /// Variables the template uses, in first-use order.
    pub fn variables(&self) -> Vec<TemplateVariable> {
        let mut used = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(v) = segment
                && !used.contains(v)
            {
                used.push(*v);
            }
        }
        used
    }

    /// Renders the prompt pair for `chapter`.
    ///
    /// The system prompt comes from the plan.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if the chapter lacks a title, period or
    /// keywords.
    #[instrument(skip_all, fields(chapter = *chapter.number()))]
    pub fn build(
        &self,
        plan: &ChapterPlan,
        chapter: &ChapterSpec,
        generation: &GenerationConfig,
    ) -> Result<ChapterPrompt, ChapterError> {
        chapter.require_prompt_fields()?;

        let mut user = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => user.push_str(text),
                Segment::Variable(variable) => {
                    user.push_str(&value_of(*variable, plan, chapter, generation))
                }
            }
        }

        debug!(chars = user.chars().count(), "Rendered chapter prompt");
        Ok(ChapterPrompt::new(plan.system_prompt().clone(), user))
    }
}

fn value_of(
    variable: TemplateVariable,
    plan: &ChapterPlan,
    chapter: &ChapterSpec,
    generation: &GenerationConfig,
) -> String {
    match variable {
        TemplateVariable::BookTitle => plan.book_title().clone(),
        TemplateVariable::ChapterNumber => chapter.number().to_string(),
        TemplateVariable::ChapterTitle => chapter.title().clone(),
        TemplateVariable::ChapterPeriod => chapter.period().clone(),
        TemplateVariable::ChapterKeywords => chapter.keyword_list(),
        TemplateVariable::ChapterDescription => chapter.description().clone(),
        TemplateVariable::CoreConceptSection => non_blank(chapter.core_concept())
            .map(|c| format!("- 核心梗：{}", c))
            .unwrap_or_default(),
        TemplateVariable::ContentGuideSection => non_blank(chapter.content_guide())
            .map(|g| format!("\n\n**内容导读：**\n{}", g))
            .unwrap_or_default(),
        TemplateVariable::ImageSection => {
            if *generation.images_enabled() {
                IMAGE_INSTRUCTIONS.to_string()
            } else {
                String::new()
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TemplateVariable {
    /// Every variable, as `{name}`.
    pub fn all_placeholders() -> Vec<String> {
        Self::iter().map(|v| format!("{{{}}}", v)).collect()
    }
}
