//! Shared fixtures for pipeline tests.
#![allow(dead_code)]

use annals_core::{
    AnnalsConfig, ChapterPlan, ChapterSpec, FetchedImage, GenerateRequest, GenerateResponse,
    ImageCandidate, OutputSettings, TokenUsage,
};
use annals_error::{AnnalsResult, ImageError, ImageErrorKind, ImageResult, ModelsError, ModelsErrorKind};
use annals_interface::{AnnalsDriver, ImageFetch, ImageSearch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const SYSTEM_PROMPT: &str = "你是一位幽默风趣的历史作家。";

/// LLM driver that records requests and returns a canned reply.
#[derive(Clone)]
pub struct MockDriver {
    reply: Result<String, ModelsErrorKind>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockDriver {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(kind: ModelsErrorKind) -> Self {
        Self {
            reply: Err(kind),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnnalsDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> AnnalsResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        match &self.reply {
            Ok(text) => Ok(GenerateResponse::new(text.clone())
                .with_finish_reason(Some("stop".to_string()))
                .with_usage(Some(TokenUsage::new(120, 900, 1020)))),
            Err(kind) => Err(ModelsError::new(kind.clone()).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Image backend: keywords in `results` succeed with one JPEG, others fail.
#[derive(Clone, Default)]
pub struct MockImages {
    results: HashMap<String, String>,
    searches: Arc<Mutex<usize>>,
}

impl MockImages {
    pub fn with_image(mut self, keyword: &str, url: &str) -> Self {
        self.results.insert(keyword.to_string(), url.to_string());
        self
    }

    pub fn search_count(&self) -> usize {
        *self.searches.lock().unwrap()
    }
}

#[async_trait]
impl ImageSearch for MockImages {
    async fn search(&self, query: &str, _limit: usize) -> ImageResult<Vec<ImageCandidate>> {
        *self.searches.lock().unwrap() += 1;
        match self.results.get(query) {
            Some(url) => Ok(vec![
                ImageCandidate::new(url.clone()).with_dimensions(Some(800), Some(600)),
            ]),
            None => Err(ImageError::new(ImageErrorKind::Search {
                keyword: query.to_string(),
                message: "mock search failure".to_string(),
            })),
        }
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl ImageFetch for MockImages {
    async fn fetch(&self, _url: &str) -> ImageResult<FetchedImage> {
        Ok(FetchedImage::new(vec![0xff; 4096], "image/jpeg"))
    }
}

/// One planned chapter.
pub fn chapter(number: u32, title: &str) -> ChapterSpec {
    ChapterSpec::builder()
        .number(number)
        .title(title)
        .period("春秋")
        .keywords(vec!["管仲".to_string(), "齐桓公".to_string()])
        .description(format!("{}的故事", title))
        .build()
        .unwrap()
}

/// Plan with chapters `1..=count`.
pub fn plan(count: u32) -> ChapterPlan {
    let chapters = (1..=count)
        .map(|n| chapter(n, &format!("第{}回", n)))
        .collect();
    ChapterPlan::new("趣说中国史", "一本轻松的历史书", SYSTEM_PROMPT, chapters)
}

/// Plan with specific chapter numbers.
pub fn plan_with(numbers: &[u32]) -> ChapterPlan {
    let chapters = numbers
        .iter()
        .map(|n| chapter(*n, &format!("第{}回", n)))
        .collect();
    ChapterPlan::new("趣说中国史", "一本轻松的历史书", SYSTEM_PROMPT, chapters)
}

/// Configuration writing under `root`.
pub fn config_in(root: &Path) -> AnnalsConfig {
    AnnalsConfig::default().with_output(
        OutputSettings::default()
            .with_chapters_dir(root.join("chapters"))
            .with_index_file(root.join("README.md")),
    )
}

/// Creates `chapters/chapter_NN/README.md` with a heading.
pub fn touch_chapter(root: &Path, number: u32, heading: &str) {
    let dir = root.join("chapters").join(format!("chapter_{:02}", number));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("README.md"),
        format!("---\nchapter: {}\n---\n\n# {}\n\n正文\n", number, heading),
    )
    .unwrap();
}
