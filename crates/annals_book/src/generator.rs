//! The chapter generation pipeline.

use crate::Book;
use annals_core::{ApiSettings, ChapterArtifact, TokenUsage};
use annals_error::AnnalsResult;
use annals_images::ImageEnricher;
use annals_interface::{AnnalsDriver, SecretSource};
use annals_models::{ApiKey, DeepSeekDriver};
use derive_getters::Getters;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// What one generation run produced.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GeneratedChapter {
    /// Chapter number
    number: u32,
    /// Chapter title
    title: String,
    /// Written markdown file
    path: PathBuf,
    /// Whether the chapter existed before this run
    regenerated: bool,
    /// Images written
    images: usize,
    /// Placeholders left unresolved
    unresolved_placeholders: usize,
    /// Token usage, when the provider reported it
    usage: Option<TokenUsage>,
}

/// Runs select, prompt, generate, enrich and write for one chapter.
///
/// Any failure other than an image lookup aborts the run; nothing is retried.
pub struct ChapterGenerator {
    book: Book,
    driver: Arc<dyn AnnalsDriver>,
    enricher: ImageEnricher,
}

impl std::fmt::Debug for ChapterGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChapterGenerator")
            .field("book", &self.book.plan().book_title())
            .field("provider", &self.driver.provider_name())
            .field("model", &self.driver.model_name())
            .field("enricher", &self.enricher)
            .finish()
    }
}

impl ChapterGenerator {
    /// Creates a generator from explicit parts.
    pub fn new(book: Book, driver: Arc<dyn AnnalsDriver>, enricher: ImageEnricher) -> Self {
        Self {
            book,
            driver,
            enricher,
        }
    }

    /// Creates a generator with the DeepSeek driver and the configured image
    /// source.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the key named by `api.api_key_env` is not
    /// in `secrets`; no client is built in that case.
    pub fn from_config(book: Book, secrets: &dyn SecretSource) -> AnnalsResult<Self> {
        Self::from_config_with(book, secrets, |settings, key| {
            let driver: Arc<dyn AnnalsDriver> = Arc::new(DeepSeekDriver::new(settings, key)?);
            Ok(driver)
        })
    }

    /// Like [`from_config`](Self::from_config) with a custom driver factory.
    ///
    /// The factory only runs once the API key has been resolved.
    pub fn from_config_with<F>(
        book: Book,
        secrets: &dyn SecretSource,
        make_driver: F,
    ) -> AnnalsResult<Self>
    where
        F: FnOnce(&ApiSettings, ApiKey) -> AnnalsResult<Arc<dyn AnnalsDriver>>,
    {
        let api = book.config().api();
        let key = ApiKey::resolve(api.api_key_env(), secrets)?;
        let driver = make_driver(api, key)?;
        let enricher = ImageEnricher::from_settings(book.config().images())?;
        Ok(Self::new(book, driver, enricher))
    }

    /// The book being generated.
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Generates one chapter and writes it.
    ///
    /// `requested` picks a chapter explicitly; `None` selects the next one.
    ///
    /// # Errors
    ///
    /// Returns selection, prompt, LLM or storage errors. Nothing is written
    /// unless the LLM call succeeds.
    #[instrument(skip(self), fields(provider = self.driver.provider_name(), model = self.driver.model_name()))]
    pub async fn generate(&self, requested: Option<u32>) -> AnnalsResult<GeneratedChapter> {
        let snapshot = self.book.snapshot().await?;
        let chapter = self.book.select(requested, &snapshot)?;
        let number = *chapter.number();
        let regenerated = snapshot.contains(number);

        let prompt = self.book.prompt_for(chapter)?;
        let request = prompt.request(&self.book.config().generation());

        info!(
            chapter = number,
            title = %chapter.title(),
            regenerated,
            images = self.enricher.is_enabled(),
            "Generating chapter"
        );
        let response = self.driver.generate(&request).await?;
        let usage = *response.usage();
        if let Some(usage) = usage {
            info!(
                prompt_tokens = usage.prompt_tokens(),
                completion_tokens = usage.completion_tokens(),
                "Chapter text received"
            );
        }

        let enrichment = self.enricher.enrich(chapter, response.text()).await;
        let unresolved = *enrichment.skipped();
        let (markdown, images) = enrichment.into_parts();
        let image_count = images.len();

        let artifact = ChapterArtifact::new(
            number,
            chapter.title().clone(),
            chapter.period().clone(),
            markdown,
            images,
        );
        let path = self.book.writer().write(&artifact).await?;

        Ok(GeneratedChapter {
            number,
            title: chapter.title().clone(),
            path,
            regenerated,
            images: image_count,
            unresolved_placeholders: unresolved,
            usage,
        })
    }
}
