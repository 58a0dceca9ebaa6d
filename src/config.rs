use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::dimension::{self, Dimension};
use crate::embed::WordHashTokenizer;
use crate::embed::tokenizer::{DEFAULT_MAX_SEQUENCE_LENGTH, DEFAULT_VOCAB_SIZE};
use crate::error::{EmbedError, Result};
use crate::vector::{Backend, Kernel};

pub const CONFIG_ENV: &str = "FASTEMBED_CONFIG";
pub const PROJECT_CONFIG_FILE: &str = "fastembed.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub kernel: KernelConfig,
    #[serde(default)]
    pub neural: NeuralConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Defaults, then the global file, then the project file (or only the
    /// explicit file when one is given), then environment overrides.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                EmbedError::Config(format!("config file {} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_root.join(PROJECT_CONFIG_FILE))? {
                config.merge_patch(project);
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// `~/.config/fastembed/config.toml` or the platform equivalent.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fastembed").join("config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| EmbedError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| EmbedError::Config(format!("parse config {}: {err}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.kernel {
            self.kernel.merge(patch);
        }
        if let Some(patch) = patch.neural {
            self.neural.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    /// Apply `FASTEMBED_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = parse_var::<usize>(&lookup, "FASTEMBED_DEFAULT_DIMENSION")? {
            self.embedding.default_dimension = value;
        }
        if let Some(value) = lookup("FASTEMBED_KERNEL_BACKEND") {
            self.kernel.backend = value.trim().to_lowercase();
        }
        if let Some(value) = lookup("FASTEMBED_MODEL_PATH") {
            self.neural.model_path = Some(PathBuf::from(value));
        }
        if let Some(value) = parse_var::<usize>(&lookup, "FASTEMBED_MAX_SEQUENCE_LENGTH")? {
            self.neural.max_sequence_length = value;
        }
        if let Some(value) = lookup("FASTEMBED_ROBOT") {
            self.output.robot = truthy(&value);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !Dimension::is_supported(self.embedding.default_dimension) {
            return Err(EmbedError::Config(format!(
                "embedding.default_dimension {} is not one of {:?}",
                self.embedding.default_dimension,
                dimension::SUPPORTED_DIMENSIONS
            )));
        }
        Backend::from_choice(&self.kernel.backend)?;
        if !(2..=dimension::MAX_TEXT_LENGTH).contains(&self.neural.max_sequence_length) {
            return Err(EmbedError::Config(format!(
                "neural.max_sequence_length {} outside 2..={}",
                self.neural.max_sequence_length,
                dimension::MAX_TEXT_LENGTH
            )));
        }
        if self.neural.vocab_size <= 101 {
            return Err(EmbedError::Config(format!(
                "neural.vocab_size {} must exceed the special token ids",
                self.neural.vocab_size
            )));
        }
        Ok(())
    }

    pub fn default_dimension(&self) -> Result<Dimension> {
        Dimension::new(self.embedding.default_dimension)
    }

    pub fn kernel(&self) -> Result<Kernel> {
        Backend::from_choice(&self.kernel.backend).map(Kernel::new)
    }

    #[must_use]
    pub fn tokenizer(&self) -> WordHashTokenizer {
        WordHashTokenizer::new(self.neural.vocab_size, self.neural.max_sequence_length)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Hash dimension used when a command does not pass `--dim`.
    #[serde(default = "default_dimension")]
    pub default_dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            default_dimension: dimension::DEFAULT_HASH_DIMENSION,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.default_dimension {
            self.default_dimension = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// `auto`, `simd` or `scalar`.
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

impl KernelConfig {
    fn merge(&mut self, patch: KernelPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeuralConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    #[serde(default = "default_max_sequence_length")]
    pub max_sequence_length: usize,
    #[serde(default = "default_vocab_size")]
    pub vocab_size: u32,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            vocab_size: DEFAULT_VOCAB_SIZE,
        }
    }
}

impl NeuralConfig {
    fn merge(&mut self, patch: NeuralPatch) {
        if let Some(value) = patch.model_path {
            self.model_path = Some(value);
        }
        if let Some(value) = patch.max_sequence_length {
            self.max_sequence_length = value;
        }
        if let Some(value) = patch.vocab_size {
            self.vocab_size = value;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub robot: bool,
    #[serde(default)]
    pub pretty: bool,
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.robot {
            self.robot = value;
        }
        if let Some(value) = patch.pretty {
            self.pretty = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    pub embedding: Option<EmbeddingPatch>,
    pub kernel: Option<KernelPatch>,
    pub neural: Option<NeuralPatch>,
    pub output: Option<OutputPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddingPatch {
    pub default_dimension: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct KernelPatch {
    pub backend: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct NeuralPatch {
    pub model_path: Option<PathBuf>,
    pub max_sequence_length: Option<usize>,
    pub vocab_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    pub robot: Option<bool>,
    pub pretty: Option<bool>,
}

const fn default_dimension() -> usize {
    dimension::DEFAULT_HASH_DIMENSION
}

fn default_backend() -> String {
    "auto".to_string()
}

const fn default_max_sequence_length() -> usize {
    DEFAULT_MAX_SEQUENCE_LENGTH
}

const fn default_vocab_size() -> u32 {
    DEFAULT_VOCAB_SIZE
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| EmbedError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}
