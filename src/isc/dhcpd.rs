//! ISC DHCPd configuration (dhcpd.conf)
//!
//! Two views of the same text:
//!
//! - the generic tree ([loads] / [dumps]), lossless for anything the lexer accepts, comments
//!   included
//! - the typed model ([load_model] / [dump_model]): [Global] and its declarations with real
//!   fields, built by [construct]. It is stricter: a statement with no typed home is an
//!   [crate::isc::error::UnknownStatementError], and comments are not kept.
//!
//! Modules:
//!
//! - [statements]: leaf statements (options, parameters, ranges, ...)
//! - [declarations]: the block scopes
//! - [capabilities]: `add_`/`find_`/`delete_` accessors shared across scopes
//! - [construct]: tokens to typed model
//! - [emit]: typed model to text

pub mod capabilities;
pub mod construct;
pub mod declarations;
pub mod emit;
pub mod statements;

pub use capabilities::*;
pub use construct::{construct, Constructor};
pub use declarations::{
    DdnsZone, DhcpClass, Event, Failover, Global, Group, Host, Key, Pool4, Pool6, SharedNetwork,
    SubClass, Subnet, Subnet4, Subnet6,
};
pub use emit::ToIsc;
pub use statements::{
    DhcpOption, EventStatement, Formula, Hardware, Parameter, ParameterValue, Parameters,
    Permission, PermissionAction, Range4, Range6, Statement,
};

use crate::isc::ast::RootNode;
use crate::isc::building::build;
use crate::isc::dialect::Dialect;
use crate::isc::error::IscError;
use crate::isc::formats::{serialize, SerializeOptions};
use crate::isc::lexing::tokenize;

/// Parse dhcpd.conf text into the generic tree.
pub fn loads(source: &str) -> Result<RootNode, IscError> {
    build(&tokenize(source, Dialect::Dhcpd)?)
}

/// Write a generic tree as dhcpd.conf text.
pub fn dumps(tree: &RootNode) -> String {
    serialize(tree, &SerializeOptions::for_dialect(Dialect::Dhcpd))
}

/// Parse dhcpd.conf text into the typed model.
pub fn load_model(source: &str) -> Result<Global, IscError> {
    construct(&tokenize(source, Dialect::Dhcpd)?)
}

/// Write the typed model as dhcpd.conf text.
pub fn dump_model(global: &Global) -> String {
    global.to_isc()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "option domain-name \"example.org\";\ndefault-lease-time 600;\n\nsubnet 10.5.5.0 netmask 255.255.255.224 {\n    range 10.5.5.26 10.5.5.30;\n    option routers 10.5.5.1;\n}\n";

    #[test]
    fn test_tree_round_trip() {
        let tree = loads(SAMPLE).unwrap();
        assert_eq!(loads(&dumps(&tree)).unwrap(), tree);
    }

    #[test]
    fn test_model_round_trip() {
        let model = load_model(SAMPLE).unwrap();
        let text = dump_model(&model);
        assert_eq!(load_model(&text).unwrap(), model);
        assert!(model.find_subnet("10.5.5.0").is_some());
    }
}
