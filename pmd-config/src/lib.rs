//! Shared configuration loader for the pmd toolchain.
//!
//! `defaults/pmd.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`PmdConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use pmd_babel::ConverterOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/pmd.default.toml");

/// Top-level configuration consumed by pmd applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PmdConfig {
    pub markdown: MarkdownConfig,
    pub directives: DirectivesConfig,
    pub code_block: CodeBlockConfig,
}

/// Markdown dialect accepted when reading portable text.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub hard_breaks: bool,
    pub tables: bool,
    pub strikethrough: bool,
    pub autolink: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectivesConfig {
    pub fence_aware: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeBlockConfig {
    pub default_language: String,
}

impl From<PmdConfig> for ConverterOptions {
    fn from(config: PmdConfig) -> Self {
        ConverterOptions {
            hard_breaks: config.markdown.hard_breaks,
            tables: config.markdown.tables,
            strikethrough: config.markdown.strikethrough,
            autolink: config.markdown.autolink,
            fence_aware_directives: config.directives.fence_aware,
            default_code_language: config.code_block.default_language,
        }
    }
}

impl From<&PmdConfig> for ConverterOptions {
    fn from(config: &PmdConfig) -> Self {
        config.clone().into()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PmdConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PmdConfig, ConfigError> {
    Loader::new().build()
}
