//! A loaded book project: configuration, plan and prompt template.

use crate::{
    ChapterSelector, ChapterWriter, IndexSummary, IndexUpdater, OutputSnapshot, PromptBuilder,
    load_plan,
};
use annals_core::{AnnalsConfig, ChapterPlan, ChapterPrompt, ChapterSpec};
use annals_error::{AnnalsResult, ChapterError, ModelsError, ModelsErrorKind};
use std::path::Path;
use tracing::{debug, instrument};

/// Everything needed to select, prompt, write and index chapters.
///
/// Holds no network clients; see [`crate::ChapterGenerator`] for the full
/// pipeline.
#[derive(Debug, Clone)]
pub struct Book {
    config: AnnalsConfig,
    plan: ChapterPlan,
    prompts: PromptBuilder,
}

impl Book {
    /// Assembles a book from loaded parts.
    pub fn new(config: AnnalsConfig, plan: ChapterPlan, prompts: PromptBuilder) -> Self {
        Self {
            config,
            plan,
            prompts,
        }
    }

    /// Loads the plan and prompt template named by `config`.
    ///
    /// `plan_override` replaces `paths.plan`.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan or a custom template cannot be read or
    /// parsed.
    #[instrument(skip(config, plan_override))]
    pub async fn load(config: AnnalsConfig, plan_override: Option<&Path>) -> AnnalsResult<Self> {
        let plan_path = plan_override.unwrap_or(config.paths().plan());
        let plan = load_plan(plan_path).await?;

        let prompts = match config.paths().prompt_template() {
            Some(path) => PromptBuilder::from_file(path).await?,
            None => PromptBuilder::bundled()?,
        };
        debug!(variables = prompts.variables().len(), "Prompt template ready");

        Ok(Self::new(config, plan, prompts))
    }

    /// Configuration.
    pub fn config(&self) -> &AnnalsConfig {
        &self.config
    }

    /// Chapter plan.
    pub fn plan(&self) -> &ChapterPlan {
        &self.plan
    }

    /// Prompt template.
    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Lists the chapters that exist on disk.
    pub async fn snapshot(&self) -> AnnalsResult<OutputSnapshot> {
        OutputSnapshot::scan(
            self.config.output().chapters_dir(),
            self.config.output().readme_filename(),
        )
        .await
    }

    /// Selects a chapter against a snapshot.
    pub fn select(
        &self,
        requested: Option<u32>,
        snapshot: &OutputSnapshot,
    ) -> Result<&ChapterSpec, ChapterError> {
        ChapterSelector::new(&self.plan).select(requested, snapshot)
    }

    /// Renders the prompt for a chapter.
    pub fn prompt_for(&self, chapter: &ChapterSpec) -> Result<ChapterPrompt, ChapterError> {
        self.prompts.build(&self.plan, chapter, &self.config.generation())
    }

    /// The request for a chapter as pretty-printed JSON.
    pub fn request_json(&self, chapter: &ChapterSpec) -> AnnalsResult<String> {
        let request = self.prompt_for(chapter)?.request(&self.config.generation());
        let text = serde_json::to_string_pretty(&request).map_err(|e| {
            ModelsError::new(ModelsErrorKind::InvalidRequest(format!(
                "Could not serialize request: {}",
                e
            )))
        })?;
        Ok(text)
    }

    /// Writer for this book's output directory.
    pub fn writer(&self) -> ChapterWriter {
        ChapterWriter::from_settings(self.config.output(), self.config.images().image_dir().clone())
    }

    /// Index updater for this book.
    pub fn indexer(&self) -> IndexUpdater {
        IndexUpdater::from_settings(self.config.output())
    }

    /// Rewrites the index page.
    pub async fn update_index(&self) -> AnnalsResult<IndexSummary> {
        self.indexer().update(&self.plan).await
    }
}
