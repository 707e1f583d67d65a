//! Runtime configuration.
//!
//! Configuration is layered with the `config` crate. Later sources override
//! earlier ones:
//! 1. Bundled defaults (include_str! from annals.toml)
//! 2. `~/.config/annals/annals.toml`
//! 3. An explicit file, or `./annals.{toml,json}` and `./config/config.json`
//! 4. `ANNALS__SECTION__KEY` environment variables

use annals_error::{AnnalsResult, ConfigError};
use config::{
    Config, ConfigBuilder, Environment, File, FileFormat, FileSourceFile, builder::DefaultState,
};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../annals.toml");

/// Older configuration files name the endpoint section `deepseek_api`.
const LEGACY_API_SECTION: &str = "deepseek_api";

/// LLM endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct ApiSettings {
    /// Base URL of the OpenAI-compatible API, without `/chat/completions`
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Model name sent with each request
    #[serde(default = "default_model")]
    model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
    /// Request timeout; the HTTP client default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_api_key_env() -> String {
    "DEEPSEEK_API_KEY".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: None,
        }
    }
}

/// Sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct GenerationSettings {
    /// Sampling temperature in [0, 1]
    #[serde(default = "default_temperature")]
    temperature: f32,
    /// Completion token limit
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
    /// Nucleus sampling mass in [0, 1]
    #[serde(default = "default_top_p")]
    top_p: f32,
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_top_p() -> f32 {
    0.95
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

/// Where image candidates come from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Baidu image search JSON endpoint
    #[default]
    #[display("baidu")]
    Baidu,
}

/// Image enrichment settings, including the acceptance policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct ImageSettings {
    /// Whether placeholders are resolved at all
    #[serde(default)]
    enabled: bool,
    /// Search backend
    #[serde(default)]
    search_source: ImageSource,
    /// Image directory, relative to the chapter directory
    #[serde(default = "default_image_dir")]
    image_dir: String,
    /// Download images locally; when false, link the remote URL instead
    #[serde(default = "default_true")]
    download: bool,
    /// Candidates tried per placeholder
    #[serde(default = "default_max_candidates")]
    max_candidates: usize,
    /// Minimum reported width in pixels
    #[serde(default = "default_min_width")]
    min_width: u32,
    /// Minimum reported height in pixels
    #[serde(default = "default_min_height")]
    min_height: u32,
    /// Minimum downloaded size in bytes
    #[serde(default = "default_min_bytes")]
    min_bytes: u64,
    /// Accepted `Content-Type` values
    #[serde(default = "default_content_types")]
    allowed_content_types: Vec<String>,
}

fn default_image_dir() -> String {
    "images".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_candidates() -> usize {
    5
}

fn default_min_width() -> u32 {
    200
}

fn default_min_height() -> u32 {
    150
}

fn default_min_bytes() -> u64 {
    2048
}

fn default_content_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/gif", "image/webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            search_source: ImageSource::default(),
            image_dir: default_image_dir(),
            download: true,
            max_candidates: default_max_candidates(),
            min_width: default_min_width(),
            min_height: default_min_height(),
            min_bytes: default_min_bytes(),
            allowed_content_types: default_content_types(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct OutputSettings {
    /// Directory holding `chapter_NN/` directories
    #[serde(default = "default_chapters_dir")]
    chapters_dir: PathBuf,
    /// File name of each chapter's markdown
    #[serde(default = "default_readme")]
    readme_filename: String,
    /// Path of the top-level index page
    #[serde(default = "default_index_file")]
    index_file: PathBuf,
}

fn default_chapters_dir() -> PathBuf {
    PathBuf::from("chapters")
}

fn default_readme() -> String {
    "README.md".to_string()
}

fn default_index_file() -> PathBuf {
    PathBuf::from("README.md")
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            chapters_dir: default_chapters_dir(),
            readme_filename: default_readme(),
            index_file: default_index_file(),
        }
    }
}

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct PathSettings {
    /// Chapter plan (JSON or TOML)
    #[serde(default = "default_plan")]
    plan: PathBuf,
    /// Custom user-prompt template; the bundled one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt_template: Option<PathBuf>,
}

fn default_plan() -> PathBuf {
    PathBuf::from("chapters_plan.json")
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            plan: default_plan(),
            prompt_template: None,
        }
    }
}

/// Top-level annals configuration.
///
/// # Examples
///
/// ```
/// use annals_core::{AnnalsConfig, GenerationSettings};
///
/// let config = AnnalsConfig::default()
///     .with_generation_settings(GenerationSettings::default().with_temperature(0.3));
/// config.validate().unwrap();
///
/// let generation = config.generation();
/// assert_eq!(*generation.temperature(), 0.3);
/// assert!(!*generation.images_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct AnnalsConfig {
    /// LLM endpoint
    #[serde(default)]
    api: ApiSettings,
    /// Sampling parameters
    #[serde(default)]
    generation_settings: GenerationSettings,
    /// Image enrichment
    #[serde(default)]
    images: ImageSettings,
    /// Output locations
    #[serde(default)]
    output: OutputSettings,
    /// Input locations
    #[serde(default)]
    paths: PathSettings,
}

impl AnnalsConfig {
    /// Load configuration with the full precedence chain.
    ///
    /// When `explicit` is given it must exist; otherwise `./annals.toml`,
    /// `./annals.json` and `./config/config.json` are read if present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be parsed, a value has
    /// the wrong type, or [`validate`](Self::validate) fails.
    #[instrument(skip(explicit), fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> AnnalsResult<Self> {
        debug!("Loading configuration: env > file > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/annals/annals.toml");
            let home_layer = Self::file_layer(File::from(home_config).required(false))?;
            builder = builder.add_source(home_layer);
        }

        builder = match explicit {
            Some(path) => builder.add_source(Self::file_layer(File::from(path).required(true))?),
            None => builder
                .add_source(Self::file_layer(
                    File::with_name("config/config.json").required(false),
                )?)
                .add_source(Self::file_layer(File::with_name("annals").required(false))?),
        };

        builder = builder.add_source(
            Environment::with_prefix("ANNALS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Load a single file layered over the bundled defaults.
    ///
    /// Neither the home directory nor the environment is consulted.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing or invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> AnnalsResult<Self> {
        debug!("Loading configuration from file");
        let builder = Self::defaults()
            .add_source(Self::file_layer(File::from(path.as_ref()).required(true))?);
        Self::finish(builder)
    }

    /// Reads one file source, folding a legacy `deepseek_api` section into `api`.
    ///
    /// The fold happens per file so environment overrides keep precedence.
    fn file_layer(file: File<FileSourceFile, FileFormat>) -> AnnalsResult<Config> {
        let layer = Config::builder()
            .add_source(file)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to read configuration file: {}", e)))?;

        let Ok(legacy) = layer.get_table(LEGACY_API_SECTION) else {
            return Ok(layer);
        };

        debug!(keys = legacy.len(), "Mapping legacy deepseek_api section onto api");
        let mut builder = Config::builder().add_source(layer);
        for (key, value) in legacy {
            builder = builder
                .set_override(format!("api.{key}"), value)
                .map_err(|e| ConfigError::new(format!("Invalid deepseek_api entry: {}", e)))?;
        }
        Ok(builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> AnnalsResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        debug!(
            model = %config.api.model,
            images = config.images.enabled,
            chapters_dir = %config.output.chapters_dir.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Checks value ranges and required strings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation_settings;
        if !(0.0..=1.0).contains(&generation.temperature) {
            return Err(ConfigError::new(format!(
                "generation_settings.temperature must be in [0, 1], got {}",
                generation.temperature
            )));
        }
        if !(0.0..=1.0).contains(&generation.top_p) {
            return Err(ConfigError::new(format!(
                "generation_settings.top_p must be in [0, 1], got {}",
                generation.top_p
            )));
        }
        if generation.max_tokens == 0 {
            return Err(ConfigError::new(
                "generation_settings.max_tokens must be positive",
            ));
        }

        for (key, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.model", &self.api.model),
            ("api.api_key_env", &self.api.api_key_env),
            ("output.readme_filename", &self.output.readme_filename),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::new(format!("{} must not be empty", key)));
            }
        }
        if self.api.timeout_secs == Some(0) {
            return Err(ConfigError::new("api.timeout_secs must be positive"));
        }
        if self.output.chapters_dir.as_os_str().is_empty() {
            return Err(ConfigError::new("output.chapters_dir must not be empty"));
        }

        let image_dir = Path::new(&self.images.image_dir);
        let escapes = image_dir
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if self.images.image_dir.trim().is_empty() || escapes {
            return Err(ConfigError::new(format!(
                "images.image_dir must be a relative path inside the chapter directory, got '{}'",
                self.images.image_dir
            )));
        }
        if self.images.max_candidates == 0 {
            return Err(ConfigError::new("images.max_candidates must be positive"));
        }
        Ok(())
    }

    /// The per-run generation parameters.
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.generation_settings.temperature,
            max_tokens: self.generation_settings.max_tokens,
            top_p: self.generation_settings.top_p,
            images_enabled: self.images.enabled,
            output_dir: self.output.chapters_dir.clone(),
        }
    }
}

/// Immutable parameters for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GenerationConfig {
    /// Sampling temperature
    temperature: f32,
    /// Completion token limit
    max_tokens: u32,
    /// Nucleus sampling mass
    top_p: f32,
    /// Whether image placeholders are requested and resolved
    images_enabled: bool,
    /// Directory holding chapter directories
    output_dir: PathBuf,
}
