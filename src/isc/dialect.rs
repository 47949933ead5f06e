//! The three ISC configuration dialects
//!
//! A dialect is picked by the caller; nothing in the crate guesses it from content. It decides
//! which lexer table runs, how a block is closed when serialized, and which priority table the
//! sort utility uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ISC DHCP server configuration (`dhcpd.conf`)
    Dhcpd,
    /// BIND server configuration (`named.conf`)
    Named,
    /// DNS master zone file
    Zone,
}

/// How a declaration block is terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseBrace {
    /// `}`
    Bare,
    /// `};`
    Semicolon,
}

impl CloseBrace {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseBrace::Bare => "}",
            CloseBrace::Semicolon => "};",
        }
    }
}

const DHCPD_SORT_PRIORITY: &[(&str, u8)] = &[
    ("key", 1),
    ("failover", 2),
    ("failover peer", 2),
    ("subnet", 3),
    ("host", 4),
    ("class", 5),
    ("shared-network", 6),
    ("group", 7),
    ("subclass", 8),
];

const NAMED_SORT_PRIORITY: &[(&str, u8)] = &[
    ("acl", 1),
    ("key", 2),
    ("masters", 3),
    ("primaries", 3),
    ("server", 4),
    ("controls", 5),
    ("logging", 6),
    ("options", 7),
    ("view", 8),
    ("zone", 9),
];

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Dhcpd, Dialect::Named, Dialect::Zone];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Dhcpd => "dhcpd",
            Dialect::Named => "named",
            Dialect::Zone => "zone",
        }
    }

    pub fn close_brace(&self) -> CloseBrace {
        match self {
            Dialect::Named => CloseBrace::Semicolon,
            Dialect::Dhcpd | Dialect::Zone => CloseBrace::Bare,
        }
    }

    /// Rank of a statement type in the sort table. Unlisted types rank 0 and sort first.
    pub fn sort_priority(&self, node_type: &str) -> u8 {
        let table = match self {
            Dialect::Dhcpd => DHCPD_SORT_PRIORITY,
            Dialect::Named => NAMED_SORT_PRIORITY,
            Dialect::Zone => return 0,
        };
        table
            .iter()
            .find(|(name, _)| *name == node_type)
            .map(|(_, rank)| *rank)
            .unwrap_or(0)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dhcpd" | "dhcp" => Ok(Dialect::Dhcpd),
            "named" | "bind" => Ok(Dialect::Named),
            "zone" => Ok(Dialect::Zone),
            other => Err(format!(
                "unknown dialect '{}' (expected dhcpd, named or zone)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect_names() {
        assert_eq!("dhcpd".parse::<Dialect>(), Ok(Dialect::Dhcpd));
        assert_eq!("BIND".parse::<Dialect>(), Ok(Dialect::Named));
        assert!("nginx".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_close_brace_per_dialect() {
        assert_eq!(Dialect::Dhcpd.close_brace().as_str(), "}");
        assert_eq!(Dialect::Named.close_brace().as_str(), "};");
    }

    #[test]
    fn test_sort_priority_defaults_to_zero() {
        assert_eq!(Dialect::Dhcpd.sort_priority("key"), 1);
        assert_eq!(Dialect::Dhcpd.sort_priority("subclass"), 8);
        assert_eq!(Dialect::Dhcpd.sort_priority("option"), 0);
        assert_eq!(Dialect::Zone.sort_priority("subnet"), 0);
    }
}
