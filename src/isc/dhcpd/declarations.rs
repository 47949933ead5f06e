//! Block declarations of the typed DHCPd model
//!
//! Each scope is a plain struct that owns its statements and nested blocks. Shared behavior
//! (the `add_`/`find_`/`delete_` accessors) comes from the capability traits in
//! [super::capabilities], implemented per struct, never from a common base.

use super::statements::{
    DhcpOption, EventStatement, Formula, Hardware, Parameters, Permission, Range4, Range6,
};
use crate::isc::error::ConstructionError;
use serde::Serialize;
use std::net::Ipv4Addr;

/// The top level of a dhcpd.conf file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Global {
    /// `authoritative;` is `Some(true)`, `not authoritative;` is `Some(false)`
    pub authoritative: Option<bool>,
    pub includes: Vec<String>,
    pub parameters: Parameters,
    pub permissions: Vec<Permission>,
    pub options: Vec<DhcpOption>,
    pub formulas: Vec<Formula>,
    pub keys: Vec<Key>,
    pub failovers: Vec<Failover>,
    pub zones: Vec<DdnsZone>,
    pub classes: Vec<DhcpClass>,
    pub subclasses: Vec<SubClass>,
    pub shared_networks: Vec<SharedNetwork>,
    pub subnets: Vec<Subnet>,
    pub hosts: Vec<Host>,
    pub groups: Vec<Group>,
    pub events: Vec<Event>,
}

impl Global {
    pub fn new() -> Self {
        Global::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedNetwork {
    pub name: String,
    pub authoritative: Option<bool>,
    pub parameters: Parameters,
    pub permissions: Vec<Permission>,
    pub options: Vec<DhcpOption>,
    pub subnets: Vec<Subnet>,
    pub pools: Vec<Pool4>,
    pub hosts: Vec<Host>,
    pub groups: Vec<Group>,
    pub events: Vec<Event>,
}

impl SharedNetwork {
    pub fn new(name: impl Into<String>) -> Self {
        SharedNetwork {
            name: name.into(),
            authoritative: None,
            parameters: Parameters::new(),
            permissions: Vec::new(),
            options: Vec::new(),
            subnets: Vec::new(),
            pools: Vec::new(),
            hosts: Vec::new(),
            groups: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// Either address family, so containers can hold both in one ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "family")]
pub enum Subnet {
    V4(Subnet4),
    V6(Subnet6),
}

impl Subnet {
    /// The network as written: `10.0.0.0` or `2001:db8::/64`.
    pub fn network(&self) -> String {
        match self {
            Subnet::V4(subnet) => subnet.network.to_string(),
            Subnet::V6(subnet) => subnet.network.clone(),
        }
    }

    pub fn is_v4(&self) -> bool {
        matches!(self, Subnet::V4(_))
    }
}

impl From<Subnet4> for Subnet {
    fn from(subnet: Subnet4) -> Self {
        Subnet::V4(subnet)
    }
}

impl From<Subnet6> for Subnet {
    fn from(subnet: Subnet6) -> Self {
        Subnet::V6(subnet)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet4 {
    pub network: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub authoritative: Option<bool>,
    pub parameters: Parameters,
    pub permissions: Vec<Permission>,
    pub options: Vec<DhcpOption>,
    pub ranges: Vec<Range4>,
    pub pools: Vec<Pool4>,
    pub hosts: Vec<Host>,
    pub groups: Vec<Group>,
    pub events: Vec<Event>,
}

impl Subnet4 {
    pub fn new(network: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        Subnet4 {
            network,
            netmask,
            authoritative: None,
            parameters: Parameters::new(),
            permissions: Vec::new(),
            options: Vec::new(),
            ranges: Vec::new(),
            pools: Vec::new(),
            hosts: Vec::new(),
            groups: Vec::new(),
            events: Vec::new(),
        }
    }

    /// From the declaration header: `10.0.0.0` and `netmask 255.255.255.0`.
    pub fn parse(network: &str, qualifier: Option<&str>) -> Result<Self, ConstructionError> {
        let network = network
            .parse()
            .map_err(|_| ConstructionError::invalid("subnet network", network))?;
        let qualifier = qualifier.unwrap_or_default();
        let netmask = match qualifier.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["netmask", mask] => mask
                .parse()
                .map_err(|_| ConstructionError::invalid("subnet netmask", *mask))?,
            _ => return Err(ConstructionError::invalid("subnet netmask", qualifier)),
        };
        Ok(Subnet4::new(network, netmask))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet6 {
    /// Prefix notation, `2001:db8::/64`
    pub network: String,
    pub authoritative: Option<bool>,
    pub parameters: Parameters,
    pub permissions: Vec<Permission>,
    pub options: Vec<DhcpOption>,
    pub ranges: Vec<Range6>,
    pub prefixes: Vec<String>,
    pub pools: Vec<Pool6>,
    pub hosts: Vec<Host>,
    pub groups: Vec<Group>,
    pub events: Vec<Event>,
}

impl Subnet6 {
    pub fn new(network: impl Into<String>) -> Self {
        Subnet6 {
            network: network.into(),
            authoritative: None,
            parameters: Parameters::new(),
            permissions: Vec::new(),
            options: Vec::new(),
            ranges: Vec::new(),
            prefixes: Vec::new(),
            pools: Vec::new(),
            hosts: Vec::new(),
            groups: Vec::new(),
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pool4 {
    pub failover_peer: Option<String>,
    pub parameters: Parameters,
    pub permissions: Vec<Permission>,
    pub options: Vec<DhcpOption>,
    pub ranges: Vec<Range4>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pool6 {
    pub parameters: Parameters,
    pub permissions: Vec<Permission>,
    pub options: Vec<DhcpOption>,
    pub ranges: Vec<Range6>,
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    pub name: String,
    pub hardware: Option<Hardware>,
    pub fixed_address: Option<String>,
    pub fixed_address6: Option<String>,
    pub host_identifier: Option<String>,
    pub parameters: Parameters,
    pub permissions: Vec<Permission>,
    pub options: Vec<DhcpOption>,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Host {
            name: name.into(),
            hardware: None,
            fixed_address: None,
            fixed_address6: None,
            host_identifier: None,
            parameters: Parameters::new(),
            permissions: Vec::new(),
            options: Vec::new(),
        }
    }
}

/// Shared settings for everything declared inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: Option<String>,
    pub authoritative: Option<bool>,
    pub parameters: Parameters,
    pub permissions: Vec<Permission>,
    pub options: Vec<DhcpOption>,
    pub shared_networks: Vec<SharedNetwork>,
    pub subnets: Vec<Subnet>,
    pub hosts: Vec<Host>,
    pub groups: Vec<Group>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DhcpClass {
    pub name: String,
    /// `match if ...` or `match <expression>`, everything after the keyword
    pub match_statement: Option<String>,
    pub spawn: Option<String>,
    pub parameters: Parameters,
    pub options: Vec<DhcpOption>,
}

impl DhcpClass {
    pub fn new(name: impl Into<String>) -> Self {
        DhcpClass {
            name: name.into(),
            match_statement: None,
            spawn: None,
            parameters: Parameters::new(),
            options: Vec::new(),
        }
    }
}

/// A member of a spawning class. Written as one line when it has no body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubClass {
    pub class_name: String,
    pub match_value: String,
    pub parameters: Parameters,
    pub options: Vec<DhcpOption>,
}

impl SubClass {
    pub fn new(class_name: impl Into<String>, match_value: impl Into<String>) -> Self {
        SubClass {
            class_name: class_name.into(),
            match_value: match_value.into(),
            parameters: Parameters::new(),
            options: Vec::new(),
        }
    }

    pub fn has_body(&self) -> bool {
        !self.parameters.is_empty() || !self.options.is_empty()
    }
}

/// `failover peer "name" { ... }`; its statements stay an ordered bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failover {
    pub name: String,
    pub parameters: Parameters,
}

impl Failover {
    pub fn new(name: impl Into<String>) -> Self {
        Failover {
            name: name.into(),
            parameters: Parameters::new(),
        }
    }
}

/// A TSIG key for dynamic DNS updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Key {
    pub name: String,
    pub algorithm: Option<String>,
    pub secret: Option<String>,
}

impl Key {
    pub fn new(name: impl Into<String>) -> Self {
        Key {
            name: name.into(),
            algorithm: None,
            secret: None,
        }
    }
}

/// `zone example.org. { primary 10.0.0.1; key k; }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DdnsZone {
    pub name: String,
    pub primary: Option<String>,
    pub primary6: Option<String>,
    pub secondary: Option<String>,
    pub secondary6: Option<String>,
    pub key: Option<String>,
}

impl DdnsZone {
    pub fn new(name: impl Into<String>) -> Self {
        DdnsZone {
            name: name.into(),
            primary: None,
            primary6: None,
            secondary: None,
            secondary6: None,
            key: None,
        }
    }

    /// The field a zone statement keyword sets.
    pub fn field_mut(&mut self, keyword: &str) -> Option<&mut Option<String>> {
        match keyword {
            "primary" => Some(&mut self.primary),
            "primary6" => Some(&mut self.primary6),
            "secondary" => Some(&mut self.secondary),
            "secondary6" => Some(&mut self.secondary6),
            "key" => Some(&mut self.key),
            _ => None,
        }
    }

    /// Set fields in emission order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("primary", &self.primary),
            ("primary6", &self.primary6),
            ("secondary", &self.secondary),
            ("secondary6", &self.secondary6),
            ("key", &self.key),
        ]
        .into_iter()
        .filter_map(|(keyword, value)| value.as_deref().map(|v| (keyword, v)))
    }
}

/// `on commit { ... }`; the trigger may name several events (`commit or expiry`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub trigger: String,
    pub statements: Vec<EventStatement>,
}

impl Event {
    pub fn new(trigger: impl Into<String>) -> Self {
        Event {
            trigger: trigger.into(),
            statements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subnet4_header() {
        let subnet = Subnet4::parse("10.5.5.0", Some("netmask 255.255.255.224")).unwrap();
        assert_eq!(subnet.network, Ipv4Addr::new(10, 5, 5, 0));
        assert_eq!(subnet.netmask, Ipv4Addr::new(255, 255, 255, 224));
    }

    #[test]
    fn test_subnet4_header_errors() {
        assert_eq!(
            Subnet4::parse("10.5.5.0", None),
            Err(ConstructionError::invalid("subnet netmask", ""))
        );
        assert!(Subnet4::parse("10.5.5", Some("netmask 255.0.0.0")).is_err());
    }

    #[test]
    fn test_zone_fields_in_order() {
        let mut zone = DdnsZone::new("example.org.");
        *zone.field_mut("key").unwrap() = Some("k".into());
        *zone.field_mut("primary").unwrap() = Some("10.0.0.1".into());
        assert!(zone.field_mut("tertiary").is_none());
        let fields: Vec<_> = zone.fields().collect();
        assert_eq!(fields, vec![("primary", "10.0.0.1"), ("key", "k")]);
    }
}
