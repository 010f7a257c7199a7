//! Configuration for a batch summarisation run.
//!
//! Every knob lives in [`SummaryConfig`]. It is resolved once at process
//! entry and handed by reference to each pipeline stage; nothing reads the
//! environment after that point.
//!
//! ## Resolution order
//!
//! For each setting, first match wins:
//!
//! 1. CLI flag (applied by the binary on top of the resolved value)
//! 2. Environment variable, if set and not blank
//! 3. Properties file (`application.properties` by default)
//! 4. Built-in default
//!
//! The API key has no default. A missing key is not an error here; it is
//! reported by [`SummaryConfig::require_api_key`] when the run starts.

use crate::error::PdfSumError;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

// ── Property keys ────────────────────────────────────────────────────────

pub const KEY_API_KEY: &str = "openai.api.key";
pub const KEY_MODEL_NAME: &str = "openai.model.name";
pub const KEY_TEMPERATURE: &str = "openai.temperature";
pub const KEY_TIMEOUT_SECS: &str = "openai.timeout.seconds";
pub const KEY_MAX_SIZE_MB: &str = "pdf.max.size.mb";
pub const KEY_PDF_DIRECTORY: &str = "pdf.directory";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Properties file read when none is given explicitly.
pub const DEFAULT_PROPERTIES_FILE: &str = "application.properties";

pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_SIZE_MB: u64 = 5;
pub const DEFAULT_PDF_DIRECTORY: &str = "./pdfs/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Maximum characters sent to the model in one chunk.
pub const DEFAULT_CHUNK_BUDGET: usize = 8000;

// ── Environment access ───────────────────────────────────────────────────

/// Read-only view of environment variables.
///
/// Resolution goes through this trait so tests can supply a fixed map
/// instead of mutating the process environment.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// `openai.model.name` → `OPENAI_MODEL_NAME`.
pub fn env_name_for(key: &str) -> String {
    key.replace(['.', '-'], "_").to_uppercase()
}

// ── Properties file ──────────────────────────────────────────────────────

/// Key/value pairs from a `.properties` file.
///
/// Supports `key=value` and `key: value`, `#` and `!` comment lines, and
/// blank lines. Keys and values are trimmed. Line continuations and escape
/// sequences are not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let split_at = line.find(['=', ':']);
            let (key, value) = match split_at {
                Some(i) => (&line[..i], &line[i + 1..]),
                None => (line, ""),
            };
            let key = key.trim();
            if !key.is_empty() {
                entries.insert(key.to_string(), value.trim().to_string());
            }
        }
        Self { entries }
    }

    /// Load a properties file. Never fails: a problem is logged and an empty
    /// set is returned so the run continues on environment and defaults.
    ///
    /// `explicit` says whether the caller asked for this file by name; a
    /// missing default file is normal and only logged at debug level.
    pub fn load(path: &Path, explicit: bool) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let props = Self::parse(&content);
                debug!(
                    "Loaded {} properties from {}",
                    props.entries.len(),
                    path.display()
                );
                props
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                debug!("No properties file at {}", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Could not load {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── SummaryConfig ────────────────────────────────────────────────────────

/// Immutable settings for one batch run.
///
/// Built via [`SummaryConfig::resolve`] in the binary, or
/// [`SummaryConfig::builder`] when embedding the library.
///
/// # Example
/// ```rust
/// use edgequake_pdfsum::SummaryConfig;
///
/// let config = SummaryConfig::builder()
///     .api_key("sk-test")
///     .pdf_directory("./reports")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_pdf_size_mb, 5);
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// OpenAI API key. Required when the run starts.
    pub api_key: Option<String>,

    /// Completion model identifier. Default: `gpt-4.1-nano`.
    pub model: String,

    /// Sampling temperature. Default: 0.7.
    pub temperature: f32,

    /// Largest accepted PDF, in megabytes (1 MB = 1 048 576 bytes). Default: 5.
    pub max_pdf_size_mb: u64,

    /// Directory scanned for `*.pdf` files. Default: `./pdfs/`.
    pub pdf_directory: PathBuf,

    /// Per-completion-call timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Maximum characters per chunk sent to the model. Default: 8000.
    pub chunk_budget: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_pdf_size_mb: DEFAULT_MAX_SIZE_MB,
            pdf_directory: PathBuf::from(DEFAULT_PDF_DIRECTORY),
            api_timeout_secs: DEFAULT_TIMEOUT_SECS,
            chunk_budget: DEFAULT_CHUNK_BUDGET,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_pdf_size_mb", &self.max_pdf_size_mb)
            .field("pdf_directory", &self.pdf_directory)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("chunk_budget", &self.chunk_budget)
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve settings from the environment, then `properties`, then defaults.
    pub fn resolve(env: &dyn EnvSource, properties: &Properties) -> Result<Self, PdfSumError> {
        let lookup = |key: &str| -> Option<String> {
            env_value(env, &env_name_for(key))
                .or_else(|| env_value(env, key))
                .or_else(|| non_blank(properties.get(key)))
        };

        let api_key = env_value(env, ENV_API_KEY).or_else(|| non_blank(properties.get(KEY_API_KEY)));

        let mut builder = Self::builder();
        builder.config.api_key = api_key;
        if let Some(model) = lookup(KEY_MODEL_NAME) {
            builder = builder.model(model);
        }
        if let Some(raw) = lookup(KEY_TEMPERATURE) {
            builder = builder.temperature(parse_setting(KEY_TEMPERATURE, &raw)?);
        }
        if let Some(raw) = lookup(KEY_MAX_SIZE_MB) {
            builder = builder.max_pdf_size_mb(parse_setting(KEY_MAX_SIZE_MB, &raw)?);
        }
        if let Some(dir) = lookup(KEY_PDF_DIRECTORY) {
            builder = builder.pdf_directory(dir);
        }
        if let Some(raw) = lookup(KEY_TIMEOUT_SECS) {
            builder = builder.api_timeout_secs(parse_setting(KEY_TIMEOUT_SECS, &raw)?);
        }
        builder.build()
    }

    /// The API key, or [`PdfSumError::MissingApiKey`] when absent or blank.
    pub fn require_api_key(&self) -> Result<&str, PdfSumError> {
        match self.api_key.as_deref() {
            Some(k) if !k.trim().is_empty() => Ok(k),
            _ => Err(PdfSumError::MissingApiKey),
        }
    }

    /// Size limit in bytes.
    pub fn max_pdf_size_bytes(&self) -> u64 {
        self.max_pdf_size_mb.saturating_mul(1024 * 1024)
    }
}

fn env_value(env: &dyn EnvSource, name: &str) -> Option<String> {
    env.var(name).filter(|v| !v.trim().is_empty())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn parse_setting<T: FromStr>(key: &str, raw: &str) -> Result<T, PdfSumError> {
    raw.trim()
        .parse()
        .map_err(|_| PdfSumError::InvalidConfig(format!("'{key}' has invalid value '{raw}'")))
}

/// Builder for [`SummaryConfig`].
#[derive(Debug)]
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_pdf_size_mb(mut self, mb: u64) -> Self {
        self.config.max_pdf_size_mb = mb;
        self
    }

    pub fn pdf_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.pdf_directory = dir.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn chunk_budget(mut self, chars: usize) -> Self {
        self.config.chunk_budget = chars.max(100);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, PdfSumError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(PdfSumError::InvalidConfig("Model name must not be empty".into()));
        }
        if !c.temperature.is_finite() {
            return Err(PdfSumError::InvalidConfig(format!(
                "Temperature must be a number, got {}",
                c.temperature
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_without_any_source() {
        let config = SummaryConfig::resolve(&env(&[]), &Properties::default()).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_pdf_size_mb, 5);
        assert_eq!(config.pdf_directory, PathBuf::from("./pdfs/"));
        assert_eq!(config.chunk_budget, 8000);
    }

    #[test]
    fn properties_parse_separators_and_comments() {
        let props = Properties::parse(
            "# comment\n\
             ! also a comment\n\
             \n\
             openai.model.name = gpt-4o\n\
             pdf.directory: /data/pdfs\n\
             openai.temperature=0.2\n\
             lonely.key\n",
        );
        assert_eq!(props.get("openai.model.name"), Some("gpt-4o"));
        assert_eq!(props.get("pdf.directory"), Some("/data/pdfs"));
        assert_eq!(props.get("openai.temperature"), Some("0.2"));
        assert_eq!(props.get("lonely.key"), Some(""));
        assert_eq!(props.get("# comment"), None);
    }

    #[test]
    fn properties_feed_resolution() {
        let props = Properties::parse(
            "openai.api.key=sk-props\n\
             openai.model.name=gpt-4o-mini\n\
             openai.temperature=0.3\n\
             pdf.max.size.mb=12\n\
             pdf.directory=/srv/pdfs\n\
             openai.timeout.seconds=30\n",
        );
        let config = SummaryConfig::resolve(&env(&[]), &props).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-props"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.max_pdf_size_mb, 12);
        assert_eq!(config.pdf_directory, PathBuf::from("/srv/pdfs"));
        assert_eq!(config.api_timeout_secs, 30);
    }

    #[test]
    fn environment_overrides_properties() {
        let props = Properties::parse("openai.api.key=sk-props\nopenai.model.name=from-props\n");
        let vars = env(&[("OPENAI_API_KEY", "sk-env"), ("OPENAI_MODEL_NAME", "from-env")]);
        let config = SummaryConfig::resolve(&vars, &props).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.model, "from-env");
    }

    #[test]
    fn literal_dotted_env_key_is_honoured() {
        let vars = env(&[("pdf.max.size.mb", "9")]);
        let config = SummaryConfig::resolve(&vars, &Properties::default()).unwrap();
        assert_eq!(config.max_pdf_size_mb, 9);
    }

    #[test]
    fn blank_environment_falls_back_to_properties() {
        let props = Properties::parse("openai.api.key=sk-props\npdf.directory=/props\n");
        let vars = env(&[("OPENAI_API_KEY", "   "), ("PDF_DIRECTORY", "")]);
        let config = SummaryConfig::resolve(&vars, &props).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-props"));
        assert_eq!(config.pdf_directory, PathBuf::from("/props"));
    }

    #[test]
    fn invalid_number_is_a_configuration_error() {
        let props = Properties::parse("openai.temperature=warm\n");
        let err = SummaryConfig::resolve(&env(&[]), &props).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("openai.temperature"), "got: {err}");
    }

    #[test]
    fn require_api_key_rejects_missing_and_blank() {
        let config = SummaryConfig::default();
        assert!(matches!(
            config.require_api_key(),
            Err(PdfSumError::MissingApiKey)
        ));
        let blank = SummaryConfig::builder().api_key("  ").build().unwrap();
        assert!(blank.require_api_key().is_err());
        let ok = SummaryConfig::builder().api_key("sk-1").build().unwrap();
        assert_eq!(ok.require_api_key().unwrap(), "sk-1");
    }

    #[test]
    fn builder_clamps_values() {
        let config = SummaryConfig::builder()
            .temperature(9.0)
            .chunk_budget(3)
            .api_timeout_secs(0)
            .build()
            .unwrap();
        assert_eq!(config.temperature, 2.0);
        assert_eq!(config.chunk_budget, 100);
        assert_eq!(config.api_timeout_secs, 1);
    }

    #[test]
    fn builder_rejects_empty_model() {
        assert!(SummaryConfig::builder().model(" ").build().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = SummaryConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn load_missing_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let props = Properties::load(&dir.path().join("nope.properties"), true);
        assert!(props.is_empty());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application.properties");
        std::fs::write(&path, "pdf.max.size.mb=7\n").unwrap();
        let props = Properties::load(&path, false);
        assert_eq!(props.get(KEY_MAX_SIZE_MB), Some("7"));
    }

    #[test]
    fn env_names_are_upper_snake() {
        assert_eq!(env_name_for("openai.model.name"), "OPENAI_MODEL_NAME");
        assert_eq!(env_name_for("pdf.max.size.mb"), "PDF_MAX_SIZE_MB");
    }

    #[test]
    fn max_size_bytes() {
        let config = SummaryConfig::builder().max_pdf_size_mb(2).build().unwrap();
        assert_eq!(config.max_pdf_size_bytes(), 2 * 1024 * 1024);
    }
}
