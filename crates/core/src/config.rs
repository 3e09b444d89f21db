//! Configuration management for docseek.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (.docseek/config.yaml)
//!
//! The resulting `AppConfig` is built once at startup and passed down to every
//! component; nothing below the CLI reads process-wide state on its own.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Environment variable consulted for the Gemini key when no provider config names one.
pub const DEFAULT_GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable holding the Drive OAuth access token by default.
pub const DEFAULT_DRIVE_TOKEN_ENV: &str = "DOCSEEK_DRIVE_TOKEN";

/// Default Google Drive v3 REST endpoint.
pub const DEFAULT_DRIVE_ENDPOINT: &str = "https://www.googleapis.com/drive/v3";

const KNOWN_PROVIDERS: [&str; 2] = ["ollama", "gemini"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .docseek/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Active LLM provider ("ollama" or "gemini")
    pub provider: String,

    /// Model identifier for the active provider
    pub model: String,

    /// Explicit API key for the LLM provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations
    pub llm: Option<LlmConfig>,

    /// Where documents are searched and fetched from
    pub store: StoreConfig,

    /// Snippet extraction knobs
    pub snippets: SnippetConfig,

    /// Per-query orchestration knobs
    pub pipeline: PipelineConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    Gemini {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            Self::Gemini { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    /// Custom endpoint, if one is configured.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Gemini { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint),
        }
    }
}

/// Document store selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Google Drive, reached with an already-issued OAuth access token.
    Drive {
        #[serde(rename = "tokenEnv", default = "default_token_env")]
        token_env: String,
        #[serde(default = "default_drive_endpoint")]
        endpoint: String,
    },
    /// A directory on the local filesystem.
    Local { root: PathBuf },
}

fn default_token_env() -> String {
    DEFAULT_DRIVE_TOKEN_ENV.to_string()
}

fn default_drive_endpoint() -> String {
    DEFAULT_DRIVE_ENDPOINT.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Drive {
            token_env: default_token_env(),
            endpoint: default_drive_endpoint(),
        }
    }
}

/// Snippet extraction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetConfig {
    /// Characters of context around each match, split evenly before/after
    #[serde(rename = "bufferSize", default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Matches kept from the scan, in document order
    #[serde(rename = "maxMatches", default = "default_cap")]
    pub max_matches: usize,

    /// Windows kept in the assembled snippet set
    #[serde(rename = "maxSnippets", default = "default_cap")]
    pub max_snippets: usize,
}

fn default_buffer_size() -> usize {
    256
}

fn default_cap() -> usize {
    10
}

impl SnippetConfig {
    /// Both caps must be at least 1.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_matches == 0 || self.max_snippets == 0 {
            return Err(AppError::Config(
                "maxMatches and maxSnippets must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            max_matches: default_cap(),
            max_snippets: default_cap(),
        }
    }
}

/// Orchestration settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Documents processed at once; results keep search order regardless
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Timeout applied to every outbound HTTP request
    #[serde(rename = "requestTimeoutSecs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_concurrency() -> usize {
    1
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    store: Option<StoreConfig>,
    snippets: Option<SnippetConfig>,
    pipeline: Option<PipelineConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "gemini".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            store: StoreConfig::default(),
            snippets: SnippetConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, the YAML config file and defaults.
    ///
    /// Environment variables:
    /// - `DOCSEEK_WORKSPACE`: Override workspace path
    /// - `DOCSEEK_CONFIG`: Path to config file
    /// - `DOCSEEK_PROVIDER`: LLM provider
    /// - `DOCSEEK_MODEL`: Model identifier
    /// - `DOCSEEK_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use docseek_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Buffer: {}", config.snippets.buffer_size);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration, reading the config file from an explicit workspace
    /// or config path when given (CLI flags) instead of the environment.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let workspace =
            workspace.or_else(|| std::env::var("DOCSEEK_WORKSPACE").ok().map(PathBuf::from));
        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        let config_file =
            config_file.or_else(|| std::env::var("DOCSEEK_CONFIG").ok().map(PathBuf::from));
        if let Some(config_file) = config_file {
            config.config_file = Some(config_file);
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.docseek_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DOCSEEK_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("DOCSEEK_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("DOCSEEK_API_KEY").ok();
        if config.log_level.is_none() {
            config.log_level = std::env::var("RUST_LOG").ok();
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();
            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }
            result.llm = Some(llm);
        }

        if let Some(store) = config_file.store {
            result.store = store;
        }

        if let Some(snippets) = config_file.snippets {
            result.snippets = snippets;
        }

        if let Some(pipeline) = config_file.pipeline {
            result.pipeline = pipeline;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            // A different provider invalidates the model picked from the config file
            if provider != self.provider && model.is_none() {
                self.model = default_model(&provider).to_string();
            }
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            self.log_level = Some("debug".to_string());
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Apply per-invocation snippet and pipeline overrides.
    pub fn with_snippet_overrides(
        mut self,
        buffer_size: Option<usize>,
        max_matches: Option<usize>,
        max_snippets: Option<usize>,
        concurrency: Option<usize>,
    ) -> Self {
        if let Some(buffer_size) = buffer_size {
            self.snippets.buffer_size = buffer_size;
        }
        if let Some(max_matches) = max_matches {
            self.snippets.max_matches = max_matches;
        }
        if let Some(max_snippets) = max_snippets {
            self.snippets.max_snippets = max_snippets;
        }
        if let Some(concurrency) = concurrency {
            self.pipeline.concurrency = concurrency;
        }
        self
    }

    /// Get the path to the .docseek directory.
    pub fn docseek_dir(&self) -> PathBuf {
        self.workspace.join(".docseek")
    }

    /// Get the configuration for a provider, if the config file declares one.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Resolve the API key for a provider.
    ///
    /// `DOCSEEK_API_KEY` wins, then the provider's `apiKeyEnv`, then `GEMINI_API_KEY`
    /// for the Gemini provider.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        let env_var = match self.get_provider_config(provider) {
            Some(ProviderConfig::Gemini { api_key_env, .. }) => Some(api_key_env.as_str()),
            Some(ProviderConfig::Ollama { .. }) => None,
            None if provider == "gemini" => Some(DEFAULT_GEMINI_KEY_ENV),
            None => None,
        };

        env_var.and_then(|var| std::env::var(var).ok())
    }

    /// Resolve the Drive access token named by the store configuration.
    pub fn resolve_drive_token(&self) -> AppResult<String> {
        match &self.store {
            StoreConfig::Drive { token_env, .. } => std::env::var(token_env).map_err(|_| {
                AppError::Config(format!(
                    "Drive access token not found in environment variable: {}",
                    token_env
                ))
            }),
            StoreConfig::Local { .. } => Err(AppError::Config(
                "Drive token requested for a local store".to_string(),
            )),
        }
    }

    /// Validate configuration for answering questions.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "gemini" && self.resolve_api_key(provider).is_none() {
            return Err(AppError::Config(format!(
                "No API key for provider gemini. Set DOCSEEK_API_KEY or {}",
                DEFAULT_GEMINI_KEY_ENV
            )));
        }

        self.snippets.validate()?;

        if self.pipeline.concurrency == 0 {
            return Err(AppError::Config(
                "pipeline concurrency must be at least 1".to_string(),
            ));
        }

        if let StoreConfig::Local { root } = &self.store {
            if !root.is_dir() {
                return Err(AppError::Config(format!(
                    "Local store root is not a directory: {:?}",
                    root
                )));
            }
        }

        Ok(())
    }
}

/// Default model for a provider name.
fn default_model(provider: &str) -> &'static str {
    match provider {
        "ollama" => "llama3.2",
        _ => "gemini-1.5-flash",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.snippets.buffer_size, 256);
        assert_eq!(config.snippets.max_matches, 10);
        assert_eq!(config.snippets.max_snippets, 10);
        assert_eq!(config.pipeline.concurrency, 1);
        assert!(matches!(config.store, StoreConfig::Drive { .. }));
        assert!(!config.verbose);
    }

    #[test]
    fn test_docseek_dir() {
        let config = AppConfig::default();
        assert!(config.docseek_dir().ends_with(".docseek"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("ollama".to_string()),
            None,
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(overridden.model, "llama3.2");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_with_snippet_overrides() {
        let config = AppConfig::default().with_snippet_overrides(Some(20), None, Some(3), Some(4));
        assert_eq!(config.snippets.buffer_size, 20);
        assert_eq!(config.snippets.max_matches, 10);
        assert_eq!(config.snippets.max_snippets, 3);
        assert_eq!(config.pipeline.concurrency, 4);
    }

    #[test]
    fn test_merge_yaml() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            format!(
                r#"
llm:
  activeProvider: ollama
  providers:
    ollama:
      endpoint: http://localhost:11434
      model: mistral
store:
  kind: local
  root: {}
snippets:
  bufferSize: 64
  maxSnippets: 4
logging:
  level: debug
  color: false
"#,
                docs.display()
            ),
        )
        .unwrap();

        let config = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.store, StoreConfig::Local { root: docs });
        assert_eq!(config.snippets.buffer_size, 64);
        assert_eq!(config.snippets.max_matches, 10);
        assert_eq!(config.snippets.max_snippets, 4);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.no_color);
        assert_eq!(
            config.get_provider_config("ollama").and_then(|p| p.endpoint()),
            Some("http://localhost:11434")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_explicit_workspace() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".docseek");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "pipeline:\n  concurrency: 3\n").unwrap();

        let config = AppConfig::load_from(Some(temp.path().to_path_buf()), None).unwrap();
        assert_eq!(config.workspace, temp.path());
        assert_eq!(config.pipeline.concurrency, 3);
        assert_eq!(config.pipeline.request_timeout_secs, 60);
    }

    #[test]
    fn test_load_from_missing_workspace() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        assert!(AppConfig::load_from(Some(missing), None).is_err());
    }

    #[test]
    fn test_drive_store_defaults_from_yaml() {
        let store: StoreConfig = serde_yaml::from_str("kind: drive").unwrap();
        assert_eq!(store, StoreConfig::default());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_gemini_with_explicit_key() {
        let mut config = AppConfig::default();
        config.api_key = Some("key".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.resolve_api_key("gemini"), Some("key".to_string()));
    }

    #[test]
    fn test_validate_rejects_zero_caps() {
        let mut config = AppConfig::default();
        config.provider = "ollama".to_string();
        config.snippets.max_snippets = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_snippet_config_rejects_zero_caps() {
        assert!(SnippetConfig::default().validate().is_ok());

        let zero_matches = SnippetConfig {
            max_matches: 0,
            ..SnippetConfig::default()
        };
        assert!(matches!(zero_matches.validate(), Err(AppError::Config(_))));

        let zero_snippets = SnippetConfig {
            max_snippets: 0,
            ..SnippetConfig::default()
        };
        assert!(zero_snippets.validate().is_err());
    }

    #[test]
    fn test_validate_ollama() {
        let mut config = AppConfig::default();
        config.provider = "ollama".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_drive_token_for_local_store_is_error() {
        let mut config = AppConfig::default();
        config.store = StoreConfig::Local {
            root: PathBuf::from("."),
        };
        assert!(config.resolve_drive_token().is_err());
    }
}
