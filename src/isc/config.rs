//! Layered configuration
//!
//! `defaults/iscconf.default.toml` is embedded in the crate, so the documented defaults and the
//! runtime defaults are the same file. Callers layer their own files and overrides on top with
//! [Loader] and get an [IscConfig]. Nothing in the parsing or serializing code reads this: the
//! values reach it as [SerializeOptions] and [ZoneLayout].

use crate::isc::dialect::Dialect;
use crate::isc::formats::SerializeOptions;
use crate::isc::zone::ZoneLayout;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/iscconf.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct IscConfig {
    pub formatting: FormattingConfig,
    pub zone: ZoneLayout,
    pub cli: CliConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormattingConfig {
    pub indent_width: usize,
    pub blank_line_after_top_level_block: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    pub default_dialect: Dialect,
}

impl IscConfig {
    /// Serializer options for `dialect`; the blank-line knob only applies to named.
    pub fn serialize_options(&self, dialect: Dialect) -> SerializeOptions {
        let mut options = SerializeOptions::for_dialect(dialect)
            .with_indent_width(self.formatting.indent_width);
        options.blank_line_after_top_level_block =
            dialect == Dialect::Named && self.formatting.blank_line_after_top_level_block;
        options
    }

    pub fn zone_layout(&self) -> ZoneLayout {
        self.zone
    }
}

/// Layers user files and overrides over the embedded defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a file that must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a file if it exists.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one key, e.g. `formatting.indent_width`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<IscConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<IscConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isc::dialect::CloseBrace;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = load_defaults().unwrap();
        assert_eq!(config.formatting.indent_width, 4);
        assert_eq!(config.zone_layout(), ZoneLayout::default());
        assert_eq!(config.cli.default_dialect, Dialect::Dhcpd);
    }

    #[test]
    fn test_blank_lines_only_for_named() {
        let config = load_defaults().unwrap();
        assert!(config.serialize_options(Dialect::Named).blank_line_after_top_level_block);
        let dhcpd = config.serialize_options(Dialect::Dhcpd);
        assert!(!dhcpd.blank_line_after_top_level_block);
        assert_eq!(dhcpd.close_brace, CloseBrace::Bare);
    }

    #[test]
    fn test_overrides() {
        let config = Loader::new()
            .set_override("formatting.indent_width", 2)
            .unwrap()
            .set_override("cli.default_dialect", "named")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.serialize_options(Dialect::Named).indent_width, 2);
        assert_eq!(config.cli.default_dialect, Dialect::Named);
    }

    #[test]
    fn test_user_file_layers_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iscconf.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[zone]\nlabel_width = 20").unwrap();

        let config = Loader::new().with_file(&path).build().unwrap();
        assert_eq!(config.zone.label_width, 20);
        assert_eq!(config.zone.ttl_width, 8);
    }

    #[test]
    fn test_missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/iscconf.toml")
            .build()
            .unwrap();
        assert_eq!(config.formatting.indent_width, 4);
    }
}
