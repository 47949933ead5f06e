//! Prebuilt pipelines
//!
//! All defined as statics with `once_cell::sync::Lazy`, built on first use.

use crate::isc::ast::RootNode;
use crate::isc::dhcpd::Global;
use crate::isc::dialect::Dialect;
use crate::isc::formats::SerializeOptions;
use crate::isc::token::Token;
use crate::isc::transforms::stages::{
    BuildTree, ConstructDhcpd, ConstructZone, SerializeTree, Sort, Tokenize,
};
use crate::isc::transforms::Transform;
use crate::isc::zone::Zone;
use once_cell::sync::Lazy;

pub type TokenTransform = Transform<String, Vec<Token>>;
pub type TreeTransform = Transform<String, RootNode>;
pub type TextTransform = Transform<String, String>;

pub static DHCPD_TOKENS: Lazy<TokenTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(Tokenize::new(Dialect::Dhcpd)));

pub static NAMED_TOKENS: Lazy<TokenTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(Tokenize::new(Dialect::Named)));

pub static ZONE_TOKENS: Lazy<TokenTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(Tokenize::new(Dialect::Zone)));

/// dhcpd.conf text to the generic tree
pub static DHCPD_TREE: Lazy<TreeTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then_transform(&DHCPD_TOKENS).then(BuildTree));

/// named.conf text to the generic tree
pub static NAMED_TREE: Lazy<TreeTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then_transform(&NAMED_TOKENS).then(BuildTree));

pub static DHCPD_MODEL: Lazy<Transform<String, Global>> =
    Lazy::new(|| Transform::from_fn(Ok).then_transform(&DHCPD_TOKENS).then(ConstructDhcpd));

pub static ZONE_MODEL: Lazy<Transform<String, Zone>> =
    Lazy::new(|| Transform::from_fn(Ok).then_transform(&ZONE_TOKENS).then(ConstructZone));

/// Parse, sort and write back in house style
pub static DHCPD_CANONICAL: Lazy<TextTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(&DHCPD_TREE)
        .then(Sort::new(Dialect::Dhcpd))
        .then(SerializeTree::new(SerializeOptions::for_dialect(Dialect::Dhcpd)))
});

pub static NAMED_CANONICAL: Lazy<TextTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(&NAMED_TREE)
        .then(Sort::new(Dialect::Named))
        .then(SerializeTree::new(SerializeOptions::for_dialect(Dialect::Named)))
});

pub fn tokens_for(dialect: Dialect) -> &'static TokenTransform {
    match dialect {
        Dialect::Dhcpd => &DHCPD_TOKENS,
        Dialect::Named => &NAMED_TOKENS,
        Dialect::Zone => &ZONE_TOKENS,
    }
}

/// The tree pipeline for a brace dialect; zone files have no generic tree.
pub fn tree_for(dialect: Dialect) -> Option<&'static TreeTransform> {
    match dialect {
        Dialect::Dhcpd => Some(&DHCPD_TREE),
        Dialect::Named => Some(&NAMED_TREE),
        Dialect::Zone => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dhcpd_canonical_sorts_and_formats() {
        let out = DHCPD_CANONICAL
            .run("host b {\n}\nsubnet 10.10.0.0 netmask 255.255.0.0 {\n}\nsubnet 10.2.0.0 netmask 255.255.0.0 {\n}\n".to_string())
            .unwrap();
        assert_eq!(
            out,
            "subnet 10.2.0.0 netmask 255.255.0.0 {\n}\nsubnet 10.10.0.0 netmask 255.255.0.0 {\n}\nhost b {\n}\n"
        );
    }

    #[test]
    fn test_zone_has_no_tree() {
        assert!(tree_for(Dialect::Zone).is_none());
        assert!(tokens_for(Dialect::Zone).run("@ IN A 192.0.2.1\n".to_string()).is_ok());
    }

    #[test]
    fn test_models() {
        let zone = ZONE_MODEL.run("www IN A 192.0.2.1\n".to_string()).unwrap();
        assert_eq!(zone.records.len(), 1);
        let global = DHCPD_MODEL.run("authoritative;\n".to_string()).unwrap();
        assert_eq!(global.authoritative, Some(true));
    }
}
