//! Individual pipeline stages

use crate::isc::ast::RootNode;
use crate::isc::building::build;
use crate::isc::dhcpd::{self, Global};
use crate::isc::dialect::Dialect;
use crate::isc::error::IscError;
use crate::isc::formats::{serialize, SerializeOptions};
use crate::isc::lexing::tokenize;
use crate::isc::sorting::sort_tree;
use crate::isc::token::Token;
use crate::isc::transforms::Runnable;
use crate::isc::zone::{self, Zone};

/// Source text to tokens with one dialect's grammar.
pub struct Tokenize {
    dialect: Dialect,
}

impl Tokenize {
    pub fn new(dialect: Dialect) -> Self {
        Tokenize { dialect }
    }
}

impl Runnable<String, Vec<Token>> for Tokenize {
    fn run(&self, input: String) -> Result<Vec<Token>, IscError> {
        Ok(tokenize(&input, self.dialect)?)
    }
}

impl Runnable<&str, Vec<Token>> for Tokenize {
    fn run(&self, input: &str) -> Result<Vec<Token>, IscError> {
        Ok(tokenize(input, self.dialect)?)
    }
}

/// Brace-dialect tokens to the generic tree.
pub struct BuildTree;

impl Runnable<Vec<Token>, RootNode> for BuildTree {
    fn run(&self, input: Vec<Token>) -> Result<RootNode, IscError> {
        build(&input)
    }
}

/// DHCPd tokens to the typed model.
pub struct ConstructDhcpd;

impl Runnable<Vec<Token>, Global> for ConstructDhcpd {
    fn run(&self, input: Vec<Token>) -> Result<Global, IscError> {
        dhcpd::construct(&input)
    }
}

/// Zone tokens to the typed model.
pub struct ConstructZone;

impl Runnable<Vec<Token>, Zone> for ConstructZone {
    fn run(&self, input: Vec<Token>) -> Result<Zone, IscError> {
        zone::construct(&input)
    }
}

pub struct Sort {
    dialect: Dialect,
}

impl Sort {
    pub fn new(dialect: Dialect) -> Self {
        Sort { dialect }
    }
}

impl Runnable<RootNode, RootNode> for Sort {
    fn run(&self, input: RootNode) -> Result<RootNode, IscError> {
        Ok(sort_tree(&input, self.dialect))
    }
}

/// The generic tree back to ISC text.
pub struct SerializeTree {
    options: SerializeOptions,
}

impl SerializeTree {
    pub fn new(options: SerializeOptions) -> Self {
        SerializeTree { options }
    }
}

impl Runnable<RootNode, String> for SerializeTree {
    fn run(&self, input: RootNode) -> Result<String, IscError> {
        Ok(serialize(&input, &self.options))
    }
}
