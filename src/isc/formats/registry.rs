//! Format registry for tree output
//!
//! Each output format implements [Formatter] and is looked up by name, which is how the CLI
//! maps `--format` to an implementation.

use super::serializer::{serialize, SerializeOptions};
use super::treeviz::to_treeviz_str;
use crate::isc::ast::RootNode;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Something that renders a whole tree as text.
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "isc", "treeviz")
    fn name(&self) -> &str;

    fn serialize(&self, tree: &RootNode) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

/// ISC configuration text, the inverse of parsing.
pub struct IscFormatter {
    pub options: SerializeOptions,
}

impl Formatter for IscFormatter {
    fn name(&self) -> &str {
        "isc"
    }

    fn serialize(&self, tree: &RootNode) -> Result<String, FormatError> {
        Ok(serialize(tree, &self.options))
    }

    fn description(&self) -> &str {
        "ISC configuration text"
    }
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, tree: &RootNode) -> Result<String, FormatError> {
        Ok(to_treeviz_str(tree))
    }

    fn description(&self) -> &str {
        "One line per node outline"
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, tree: &RootNode) -> Result<String, FormatError> {
        super::to_json(tree)
    }

    fn description(&self) -> &str {
        "The tree as pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, tree: &RootNode) -> Result<String, FormatError> {
        super::to_yaml(tree)
    }

    fn description(&self) -> &str {
        "The tree as YAML"
    }
}

/// Formatters by name.
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any with the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn serialize(&self, tree: &RootNode, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(tree)
    }

    /// Every registered name, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// All built-in formatters, ISC text laid out with `options`.
    pub fn with_defaults(options: SerializeOptions) -> Self {
        let mut registry = Self::new();
        registry.register(IscFormatter { options });
        registry.register(TreevizFormatter);
        registry.register(JsonFormatter);
        registry.register(YamlFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults(SerializeOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isc::ast::PropertyNode;

    #[test]
    fn test_defaults_are_registered() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["isc", "json", "treeviz", "yaml"]);
    }

    #[test]
    fn test_serialize_by_name() {
        let registry = FormatRegistry::default();
        let tree = RootNode::new().with_child(PropertyNode::new("a", Some("1".into()), None));
        assert_eq!(registry.serialize(&tree, "isc").unwrap(), "a 1;\n");
    }

    #[test]
    fn test_unknown_format() {
        let registry = FormatRegistry::new();
        assert_eq!(
            registry.serialize(&RootNode::new(), "xml"),
            Err(FormatError::FormatNotFound("xml".to_string()))
        );
    }
}
