//! Leaf statements of the typed DHCPd model
//!
//! Every semicolon-terminated statement the lexer recognizes becomes one [Statement] before it
//! is handed to a scope. Converting is where construction errors surface: an option without a
//! name or code, a range whose bounds are not addresses.

use crate::isc::classify::Split;
use crate::isc::error::ConstructionError;
use crate::isc::token::TokenKind;
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// Parameters that take `on`/`off` (or `true`/`false`) and are kept as booleans.
pub const BOOLEAN_PARAMETERS: &[&str] = &[
    "always-broadcast",
    "always-reply-rfc1048",
    "boot-unknown-clients",
    "check-secs-byte-order",
    "ddns-dual-stack-mixed-mode",
    "ddns-guard-id-must-match",
    "ddns-other-guard-is-dynamic",
    "ddns-updates",
    "dhcpv6-set-tee-times",
    "do-forward-updates",
    "echo-client-id",
    "get-lease-hostnames",
    "infinite-is-reserved",
    "one-lease-per-client",
    "persist-eui-64-leases",
    "ping-check",
    "release-on-roam",
    "server-id-check",
    "stash-agent-options",
    "update-conflict-detection",
    "update-optimization",
    "update-static-leases",
    "use-host-decl-names",
    "use-lease-addr-for-default-route",
];

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" => Some(true),
        "off" | "false" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ParameterValue {
    Text(String),
    Flag(bool),
    /// A keyword with no argument, such as `primary;` in a failover block
    Bare,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub value: ParameterValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: ParameterValue) -> Self {
        Parameter {
            name: name.into(),
            value,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Parameter::new(name, ParameterValue::Text(value.into()))
    }

    /// Build from a name and its raw argument, recognizing the boolean family.
    pub fn parse(name: &str, value: Option<&str>) -> Self {
        match value {
            None => Parameter::new(name, ParameterValue::Bare),
            Some(value) => {
                let flag = BOOLEAN_PARAMETERS
                    .contains(&name)
                    .then(|| parse_flag(value))
                    .flatten();
                match flag {
                    Some(flag) => Parameter::new(name, ParameterValue::Flag(flag)),
                    None => Parameter::text(name, value),
                }
            }
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ParameterValue::Text(value) => write!(f, "{} {}", self.name, value),
            ParameterValue::Flag(flag) => write!(f, "{} {}", self.name, flag),
            ParameterValue::Bare => f.write_str(&self.name),
        }
    }
}

/// An ordered bag of plain parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    pub fn new() -> Self {
        Parameters::default()
    }

    /// Append, keeping any earlier statement with the same name.
    pub fn push(&mut self, parameter: Parameter) {
        self.0.push(parameter);
    }

    /// Replace the first parameter with this name, or append.
    pub fn set(&mut self, parameter: Parameter) {
        match self.0.iter_mut().find(|p| p.name == parameter.name) {
            Some(existing) => *existing = parameter,
            None => self.0.push(parameter),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.0.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        let pos = self.0.iter().position(|p| p.name == name)?;
        Some(self.0.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Allow,
    Deny,
    Ignore,
}

impl PermissionAction {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "allow" => Some(PermissionAction::Allow),
            "deny" => Some(PermissionAction::Deny),
            "ignore" => Some(PermissionAction::Ignore),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            PermissionAction::Allow => "allow",
            PermissionAction::Deny => "deny",
            PermissionAction::Ignore => "ignore",
        }
    }
}

/// `allow unknown-clients;`, `deny bootp;`, `allow members of "x";`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub action: PermissionAction,
    pub subject: String,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action.keyword(), self.subject)
    }
}

/// A DHCP option assignment, identified by name, by code, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DhcpOption {
    pub name: Option<String>,
    pub code: Option<u16>,
    pub value: String,
}

impl DhcpOption {
    pub fn new(
        name: Option<String>,
        code: Option<u16>,
        value: impl Into<String>,
    ) -> Result<Self, ConstructionError> {
        if name.is_none() && code.is_none() {
            return Err(ConstructionError::NamelessOption);
        }
        Ok(DhcpOption {
            name,
            code,
            value: value.into(),
        })
    }

    /// From the option name as written (`domain-name`, `unknown-224`) and its value.
    pub fn parse(name: &str, value: Option<&str>) -> Result<Self, ConstructionError> {
        let value = value.unwrap_or_default();
        if name.is_empty() {
            return DhcpOption::new(None, None, value);
        }
        match name.strip_prefix("unknown-").map(str::parse::<u16>) {
            Some(Ok(code)) => DhcpOption::new(None, Some(code), value),
            _ => DhcpOption::new(Some(name.to_string()), None, value),
        }
    }

    /// `option space foo;` declares a space instead of setting a value.
    pub fn is_space_declaration(&self) -> bool {
        self.name.as_deref() == Some("space")
    }

    /// The name the option is written with.
    pub fn display_name(&self) -> String {
        match (&self.name, self.code) {
            (Some(name), _) => name.clone(),
            (None, Some(code)) => format!("unknown-{}", code),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for DhcpOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "option {}", self.display_name())
        } else {
            write!(f, "option {} {}", self.display_name(), self.value)
        }
    }
}

/// An option expression or definition: `option x = expr;`, `option x code 224 = text;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formula {
    pub target: String,
    pub expression: String,
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.expression)
    }
}

/// `hardware ethernet 00:11:22:33:44:55;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hardware {
    pub hardware_type: String,
    pub address: String,
}

impl fmt::Display for Hardware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hardware {} {}", self.hardware_type, self.address)
    }
}

fn parse_ipv4(field: &'static str, text: &str) -> Result<Ipv4Addr, ConstructionError> {
    text.parse()
        .map_err(|_| ConstructionError::invalid(field, text))
}

/// `range [dynamic-bootp] low [high];`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range4 {
    pub dynamic_bootp: bool,
    pub start: Ipv4Addr,
    pub end: Option<Ipv4Addr>,
}

impl Range4 {
    pub fn parse(text: &str) -> Result<Self, ConstructionError> {
        let mut words: Vec<&str> = text.split_whitespace().collect();
        let dynamic_bootp = words.first() == Some(&"dynamic-bootp");
        if dynamic_bootp {
            words.remove(0);
        }
        match words.as_slice() {
            [start] => Ok(Range4 {
                dynamic_bootp,
                start: parse_ipv4("range start", start)?,
                end: None,
            }),
            [start, end] => Ok(Range4 {
                dynamic_bootp,
                start: parse_ipv4("range start", start)?,
                end: Some(parse_ipv4("range end", end)?),
            }),
            _ => Err(ConstructionError::invalid("range", text)),
        }
    }
}

impl fmt::Display for Range4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("range")?;
        if self.dynamic_bootp {
            f.write_str(" dynamic-bootp")?;
        }
        write!(f, " {}", self.start)?;
        if let Some(end) = self.end {
            write!(f, " {}", end)?;
        }
        Ok(())
    }
}

/// `range6 low high;`, `range6 prefix/len [temporary];`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range6 {
    pub start: String,
    pub end: Option<String>,
    pub temporary: bool,
}

impl Range6 {
    pub fn parse(text: &str) -> Result<Self, ConstructionError> {
        let mut words: Vec<&str> = text.split_whitespace().collect();
        let temporary = words.last() == Some(&"temporary");
        if temporary {
            words.pop();
        }
        match words.as_slice() {
            [start] => Ok(Range6 {
                start: start.to_string(),
                end: None,
                temporary,
            }),
            [start, end] if !temporary => Ok(Range6 {
                start: start.to_string(),
                end: Some(end.to_string()),
                temporary,
            }),
            _ => Err(ConstructionError::invalid("range6", text)),
        }
    }
}

impl fmt::Display for Range6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range6 {}", self.start)?;
        if let Some(end) = &self.end {
            write!(f, " {}", end)?;
        }
        if self.temporary {
            f.write_str(" temporary")?;
        }
        Ok(())
    }
}

/// A statement inside an `on <event> { ... }` block: `set`, `unset`, `execute`, `log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventStatement {
    pub keyword: String,
    pub body: Option<String>,
}

impl fmt::Display for EventStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{} {}", self.keyword, body),
            None => f.write_str(&self.keyword),
        }
    }
}

/// Any leaf statement, converted from its token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Statement {
    Authoritative(bool),
    Option(DhcpOption),
    Formula(Formula),
    Permission(Permission),
    Range4(Range4),
    Range6(Range6),
    Prefix6(String),
    Hardware(Hardware),
    FixedAddress(String),
    FixedAddress6(String),
    HostIdentifier(String),
    FailoverPeer(String),
    Match(String),
    Spawn(String),
    /// The one-line form `subclass "class" match-value;`
    SubClass { class_name: String, match_value: String },
    Include(String),
    Event(EventStatement),
    Parameter(Parameter),
}

fn join_parts(split: &Split) -> Option<String> {
    match (&split.value, &split.parameters) {
        (Some(value), Some(parameters)) => Some(format!("{} {}", value, parameters)),
        (Some(value), None) => Some(value.clone()),
        (None, Some(parameters)) => Some(parameters.clone()),
        (None, None) => None,
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConstructionError> {
    value.ok_or_else(|| ConstructionError::invalid(field, ""))
}

impl Statement {
    /// Convert a split statement token into its typed form.
    pub fn from_split(kind: TokenKind, split: Split) -> Result<Self, ConstructionError> {
        let rest = join_parts(&split);
        let key = split.key.as_str();
        let statement = match kind {
            TokenKind::ParameterBoolean => Statement::Authoritative(!key.starts_with("not")),
            TokenKind::ParameterOption => {
                let name = key.strip_prefix("option").unwrap_or(key).trim();
                Statement::Option(DhcpOption::parse(name, rest.as_deref())?)
            }
            TokenKind::FormulaGeneral => {
                let value = split.value.unwrap_or_default();
                let expression = value.strip_prefix('=').unwrap_or(&value).trim();
                Statement::Formula(Formula {
                    target: split.key,
                    expression: expression.to_string(),
                })
            }
            TokenKind::ParameterFailover => Statement::FailoverPeer(required("failover peer", rest)?),
            TokenKind::EventGeneral => Statement::Event(EventStatement {
                keyword: split.key,
                body: rest,
            }),
            TokenKind::ParameterSingleValue => match key.strip_prefix("hardware ") {
                Some(hardware_type) => Statement::Hardware(Hardware {
                    hardware_type: hardware_type.to_string(),
                    address: required("hardware address", split.value)?,
                }),
                None if key.starts_with("host-identifier") => {
                    let value = split.value.unwrap_or_default();
                    Statement::HostIdentifier(
                        key.trim_start_matches("host-identifier")
                            .trim()
                            .split_whitespace()
                            .chain(std::iter::once(value.as_str()))
                            .filter(|w| !w.is_empty())
                            .collect::<Vec<_>>()
                            .join(" "),
                    )
                }
                None => Statement::Parameter(Parameter::parse(key, rest.as_deref())),
            },
            _ => match (key, rest) {
                ("allow" | "deny" | "ignore", Some(subject)) => {
                    Statement::Permission(Permission {
                        action: PermissionAction::from_keyword(key)
                            .ok_or_else(|| ConstructionError::invalid("permission", key))?,
                        subject,
                    })
                }
                ("range", Some(text)) => Statement::Range4(Range4::parse(&text)?),
                ("range6", Some(text)) => Statement::Range6(Range6::parse(&text)?),
                ("prefix6", Some(text)) => Statement::Prefix6(text),
                ("fixed-address", Some(text)) => Statement::FixedAddress(text),
                ("fixed-address6", Some(text)) => Statement::FixedAddress6(text),
                ("match", Some(text)) => Statement::Match(text),
                ("spawn", Some(text)) => Statement::Spawn(text),
                ("include", Some(text)) => Statement::Include(text),
                ("subclass", Some(_)) => Statement::SubClass {
                    class_name: required("subclass class", split.value)?,
                    match_value: required("subclass match", split.parameters)?,
                },
                (_, rest) => Statement::Parameter(Parameter::parse(key, rest.as_deref())),
            },
        };
        Ok(statement)
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Statement::Authoritative(_) => "authoritative".to_string(),
            Statement::Option(option) => option.to_string(),
            Statement::Formula(formula) => formula.to_string(),
            Statement::Permission(permission) => permission.to_string(),
            Statement::Range4(range) => range.to_string(),
            Statement::Range6(range) => range.to_string(),
            Statement::Prefix6(text) => format!("prefix6 {}", text),
            Statement::Hardware(hardware) => hardware.to_string(),
            Statement::FixedAddress(text) => format!("fixed-address {}", text),
            Statement::FixedAddress6(text) => format!("fixed-address6 {}", text),
            Statement::HostIdentifier(text) => format!("host-identifier {}", text),
            Statement::FailoverPeer(name) => format!("failover peer {}", name),
            Statement::Match(text) => format!("match {}", text),
            Statement::Spawn(text) => format!("spawn {}", text),
            Statement::SubClass {
                class_name,
                match_value,
            } => format!("subclass {} {}", class_name, match_value),
            Statement::Include(path) => format!("include {}", path),
            Statement::Event(event) => event.to_string(),
            Statement::Parameter(parameter) => parameter.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(key: &str, value: Option<&str>, parameters: Option<&str>) -> Split {
        Split::new(key, value.map(String::from), parameters.map(String::from))
    }

    #[test]
    fn test_domain_name_option_is_exact() {
        let statement = Statement::from_split(
            TokenKind::ParameterOption,
            split("option domain-name", Some("\"example.org\""), None),
        )
        .unwrap();
        match statement {
            Statement::Option(option) => {
                assert_eq!(option.name.as_deref(), Some("domain-name"));
                assert_eq!(option.code, None);
                assert_eq!(option.value, "\"example.org\"");
            }
            other => panic!("expected an option, got {:?}", other),
        }
    }

    #[test]
    fn test_option_requires_name_or_code() {
        assert_eq!(
            DhcpOption::new(None, None, "x"),
            Err(ConstructionError::NamelessOption)
        );
        let coded = DhcpOption::new(None, Some(224), "\"x\"").unwrap();
        assert_eq!(coded.to_string(), "option unknown-224 \"x\"");
        assert_eq!(DhcpOption::parse("unknown-224", Some("\"x\"")).unwrap(), coded);
    }

    #[test]
    fn test_not_authoritative() {
        assert_eq!(
            Statement::from_split(TokenKind::ParameterBoolean, split("not authoritative", None, None)),
            Ok(Statement::Authoritative(false))
        );
        assert_eq!(
            Statement::from_split(TokenKind::ParameterBoolean, split("authoritative", None, None)),
            Ok(Statement::Authoritative(true))
        );
    }

    #[test]
    fn test_boolean_parameters_become_flags() {
        assert_eq!(
            Parameter::parse("ping-check", Some("on")).value,
            ParameterValue::Flag(true)
        );
        assert_eq!(Parameter::parse("ping-check", Some("off")).to_string(), "ping-check false");
        assert_eq!(
            Parameter::parse("default-lease-time", Some("600")).value,
            ParameterValue::Text("600".to_string())
        );
        assert_eq!(Parameter::parse("primary", None).to_string(), "primary");
    }

    #[test]
    fn test_ranges() {
        let range = Range4::parse("dynamic-bootp 10.0.0.10 10.0.0.20").unwrap();
        assert!(range.dynamic_bootp);
        assert_eq!(range.to_string(), "range dynamic-bootp 10.0.0.10 10.0.0.20");
        assert!(Range4::parse("10.0.0.300").is_err());

        let range6 = Range6::parse("fd00::/64 temporary").unwrap();
        assert!(range6.temporary);
        assert_eq!(range6.to_string(), "range6 fd00::/64 temporary");
    }

    #[test]
    fn test_single_key_dispatch() {
        let permission = Statement::from_split(
            TokenKind::ParameterSingleKey,
            split("deny", Some("unknown-clients"), None),
        )
        .unwrap();
        assert_eq!(permission.describe(), "deny unknown-clients");

        let hardware = Statement::from_split(
            TokenKind::ParameterSingleValue,
            split("hardware ethernet", Some("00:11:22:33:44:55"), None),
        )
        .unwrap();
        assert_eq!(hardware.describe(), "hardware ethernet 00:11:22:33:44:55");
    }

    #[test]
    fn test_host_identifier() {
        let statement = Statement::from_split(
            TokenKind::ParameterSingleValue,
            split("host-identifier option dhcp6.client-id", Some("00:01"), None),
        )
        .unwrap();
        assert_eq!(
            statement,
            Statement::HostIdentifier("option dhcp6.client-id 00:01".to_string())
        );
    }

    #[test]
    fn test_formula() {
        let statement = Statement::from_split(
            TokenKind::FormulaGeneral,
            split("option x code 224", Some("= text"), None),
        )
        .unwrap();
        assert_eq!(statement.describe(), "option x code 224 = text");
    }

    #[test]
    fn test_parameters_bag() {
        let mut parameters = Parameters::new();
        parameters.push(Parameter::text("default-lease-time", "600"));
        parameters.set(Parameter::text("default-lease-time", "900"));
        parameters.set(Parameter::text("max-lease-time", "7200"));
        assert_eq!(parameters.len(), 2);
        assert_eq!(
            parameters.get("default-lease-time"),
            Some(&ParameterValue::Text("900".to_string()))
        );
        assert!(parameters.remove("max-lease-time").is_some());
        assert!(parameters.get("max-lease-time").is_none());
    }
}
