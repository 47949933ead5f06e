//! Document loading
//!
//! [DocumentLoader] reads configuration text from a file or a string, remembers which dialect
//! it is, and runs the standard pipelines on it. The core functions stay string-in,
//! string-out; reading files happens only here.
//!
//! ```rust,ignore
//! let loader = DocumentLoader::from_path("/etc/dhcp/dhcpd.conf")?;
//! let tree = loader.parse()?;
//! let model = loader.dhcpd_model()?;
//!
//! let zone = DocumentLoader::from_string("www IN A 192.0.2.1\n")
//!     .with_dialect(Dialect::Zone)
//!     .zone_model()?;
//! ```

use crate::isc::ast::RootNode;
use crate::isc::dhcpd::Global;
use crate::isc::dialect::Dialect;
use crate::isc::error::IscError;
use crate::isc::formats::{serialize, SerializeOptions};
use crate::isc::sorting::sort_tree;
use crate::isc::token::Token;
use crate::isc::transforms::standard::{tokens_for, tree_for, DHCPD_MODEL, ZONE_MODEL};
use crate::isc::transforms::Transform;
use crate::isc::zone::Zone;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] IscError),

    /// The operation needs a different dialect than the document has
    #[error("{operation} is not available for {dialect} documents")]
    WrongDialect {
        operation: &'static str,
        dialect: Dialect,
    },
}

/// Recognize the dialect from a file name: `dhcpd*`, `named*`/`bind*`, `*.zone`/`*.db`/`db.*`.
pub fn guess_dialect(path: &Path) -> Option<Dialect> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if name.starts_with("named") || name.starts_with("bind") {
        Some(Dialect::Named)
    } else if extension == "zone" || extension == "db" || name.starts_with("db.") {
        Some(Dialect::Zone)
    } else if name.starts_with("dhcpd") {
        Some(Dialect::Dhcpd)
    } else {
        None
    }
}

/// [guess_dialect], falling back to dhcpd.
pub fn detect_dialect(path: &Path) -> Dialect {
    guess_dialect(path).unwrap_or(Dialect::Dhcpd)
}

pub struct DocumentLoader {
    source: String,
    dialect: Dialect,
}

impl DocumentLoader {
    /// Read a file; the dialect is guessed from its name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        Ok(DocumentLoader {
            source,
            dialect: detect_dialect(path),
        })
    }

    /// Wrap text; the dialect defaults to dhcpd.
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
            dialect: Dialect::Dhcpd,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run any transform over the source.
    pub fn with<O: 'static>(&self, transform: &Transform<String, O>) -> Result<O, LoaderError> {
        Ok(transform.run(self.source.clone())?)
    }

    pub fn tokenize(&self) -> Result<Vec<Token>, LoaderError> {
        self.with(tokens_for(self.dialect))
    }

    /// The generic tree; brace dialects only.
    pub fn parse(&self) -> Result<RootNode, LoaderError> {
        let transform = tree_for(self.dialect).ok_or(LoaderError::WrongDialect {
            operation: "the generic tree",
            dialect: self.dialect,
        })?;
        self.with(transform)
    }

    pub fn sorted(&self) -> Result<RootNode, LoaderError> {
        Ok(sort_tree(&self.parse()?, self.dialect))
    }

    /// Parse and write back with `options`.
    pub fn render(&self, options: &SerializeOptions) -> Result<String, LoaderError> {
        Ok(serialize(&self.parse()?, options))
    }

    pub fn dhcpd_model(&self) -> Result<Global, LoaderError> {
        self.require(Dialect::Dhcpd, "the dhcpd model")?;
        self.with(&DHCPD_MODEL)
    }

    pub fn zone_model(&self) -> Result<Zone, LoaderError> {
        self.require(Dialect::Zone, "the zone model")?;
        self.with(&ZONE_MODEL)
    }

    fn require(&self, dialect: Dialect, operation: &'static str) -> Result<(), LoaderError> {
        if self.dialect == dialect {
            Ok(())
        } else {
            Err(LoaderError::WrongDialect {
                operation,
                dialect: self.dialect,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case("/etc/dhcp/dhcpd.conf", Dialect::Dhcpd)]
    #[case("/etc/bind/named.conf.options", Dialect::Named)]
    #[case("example.org.zone", Dialect::Zone)]
    #[case("/var/named/db.example", Dialect::Zone)]
    fn test_detect_dialect(#[case] path: &str, #[case] expected: Dialect) {
        assert_eq!(detect_dialect(&PathBuf::from(path)), expected);
    }

    #[test]
    fn test_unrecognized_name_has_no_guess() {
        assert_eq!(guess_dialect(Path::new("/etc/site.conf")), None);
        assert_eq!(detect_dialect(Path::new("/etc/site.conf")), Dialect::Dhcpd);
    }

    #[test]
    fn test_from_string_parses_dhcpd() {
        let loader = DocumentLoader::from_string("authoritative;\n");
        assert_eq!(loader.parse().unwrap().children.len(), 1);
        assert_eq!(loader.dhcpd_model().unwrap().authoritative, Some(true));
    }

    #[test]
    fn test_zone_has_no_tree() {
        let loader = DocumentLoader::from_string("www IN A 192.0.2.1\n").with_dialect(Dialect::Zone);
        assert!(matches!(loader.parse(), Err(LoaderError::WrongDialect { .. })));
        assert_eq!(loader.zone_model().unwrap().records.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = DocumentLoader::from_path("/nonexistent/dhcpd.conf");
        assert!(matches!(result, Err(LoaderError::Io(_))));
    }

    #[test]
    fn test_fixture_from_disk() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/named.conf");
        let loader = DocumentLoader::from_path(&path).unwrap();
        assert_eq!(loader.dialect(), Dialect::Named);
        assert!(loader.parse().is_ok());
    }
}
