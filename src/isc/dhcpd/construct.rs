//! Token stream to typed model
//!
//! Walks the same tokens the generic tree builder consumes, but keeps a stack of typed scopes
//! instead of generic nodes. A statement goes to the innermost scope, which either has a place
//! for it or rejects it; a closed block is attached to its parent the same way. Rejections
//! become [UnknownStatementError]s naming the statement and the scope.
//!
//! Comments carry no meaning in the typed model and are skipped. Conditionals (`if`, `elsif`,
//! `else`) have no typed form and are rejected like any other unknown block.

use super::declarations::{
    DdnsZone, DhcpClass, Event, Failover, Global, Group, Host, Key, Pool4, Pool6, SharedNetwork,
    SubClass, Subnet4, Subnet6,
};
use super::capabilities::{
    HasClasses, HasEvents, HasFailovers, HasGroups, HasHosts, HasKeys, HasPools, HasSharedNetworks,
    HasSubClasses, HasSubnets, HasZones,
};
use super::statements::{
    DhcpOption, Parameter, ParameterValue, Parameters, Permission, Range4, Range6, Statement,
};
use crate::isc::classify::{split, statement_body, Split};
use crate::isc::error::{ConstructionError, IscError, StructureError, UnknownStatementError};
use crate::isc::token::{Token, TokenKind};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
enum Scope {
    Global(Global),
    SharedNetwork(SharedNetwork),
    Subnet4(Subnet4),
    Subnet6(Subnet6),
    Pool4(Pool4),
    Pool6(Pool6),
    Host(Host),
    Group(Group),
    Class(DhcpClass),
    SubClass(SubClass),
    Failover(Failover),
    Key(Key),
    Zone(DdnsZone),
    Event(Event),
}

fn push_into<T>(list: Option<&mut Vec<T>>, item: T) -> bool {
    match list {
        Some(list) => {
            list.push(item);
            true
        }
        None => false,
    }
}

fn set_into<T>(slot: Option<&mut Option<T>>, item: T) -> bool {
    match slot {
        Some(slot) => {
            *slot = Some(item);
            true
        }
        None => false,
    }
}

impl Scope {
    /// A typed scope for a declaration header, or `None` when there is no typed form for it.
    fn open(split: Split) -> Result<Option<Scope>, ConstructionError> {
        let Split {
            key,
            value,
            parameters,
        } = split;
        let named = |field: &'static str| {
            value
                .clone()
                .ok_or_else(|| ConstructionError::invalid(field, ""))
        };
        let scope = match (key.as_str(), parameters.as_deref()) {
            ("shared-network", None) => {
                Scope::SharedNetwork(SharedNetwork::new(named("shared-network name")?))
            }
            ("subnet", qualifier) => {
                Scope::Subnet4(Subnet4::parse(&named("subnet network")?, qualifier)?)
            }
            ("subnet6", None) => Scope::Subnet6(Subnet6::new(named("subnet6 network")?)),
            ("pool", None) if value.is_none() => Scope::Pool4(Pool4::default()),
            ("pool6", None) if value.is_none() => Scope::Pool6(Pool6::default()),
            ("host", None) => Scope::Host(Host::new(named("host name")?)),
            ("group", None) => Scope::Group(Group {
                name: value.clone(),
                ..Group::default()
            }),
            ("class", None) => Scope::Class(DhcpClass::new(named("class name")?)),
            ("subclass", Some(match_value)) => {
                Scope::SubClass(SubClass::new(named("subclass class")?, match_value))
            }
            ("failover peer", None) => {
                Scope::Failover(Failover::new(named("failover peer name")?))
            }
            ("key", None) => Scope::Key(Key::new(named("key name")?)),
            ("zone", None) => Scope::Zone(DdnsZone::new(named("zone name")?)),
            ("on", rest) => {
                let trigger = named("event trigger")?;
                Scope::Event(Event::new(match rest {
                    Some(rest) => format!("{} {}", trigger, rest),
                    None => trigger,
                }))
            }
            _ => return Ok(None),
        };
        Ok(Some(scope))
    }

    fn describe(&self) -> String {
        match self {
            Scope::Global(_) => "the global scope".to_string(),
            Scope::SharedNetwork(s) => format!("shared-network {}", s.name),
            Scope::Subnet4(s) => format!("subnet {} netmask {}", s.network, s.netmask),
            Scope::Subnet6(s) => format!("subnet6 {}", s.network),
            Scope::Pool4(_) => "pool".to_string(),
            Scope::Pool6(_) => "pool6".to_string(),
            Scope::Host(h) => format!("host {}", h.name),
            Scope::Group(g) => match &g.name {
                Some(name) => format!("group {}", name),
                None => "group".to_string(),
            },
            Scope::Class(c) => format!("class {}", c.name),
            Scope::SubClass(s) => format!("subclass {} {}", s.class_name, s.match_value),
            Scope::Failover(f) => format!("failover peer {}", f.name),
            Scope::Key(k) => format!("key {}", k.name),
            Scope::Zone(z) => format!("zone {}", z.name),
            Scope::Event(e) => format!("on {}", e.trigger),
        }
    }

    fn authoritative(&mut self) -> Option<&mut Option<bool>> {
        match self {
            Scope::Global(s) => Some(&mut s.authoritative),
            Scope::SharedNetwork(s) => Some(&mut s.authoritative),
            Scope::Subnet4(s) => Some(&mut s.authoritative),
            Scope::Subnet6(s) => Some(&mut s.authoritative),
            Scope::Group(s) => Some(&mut s.authoritative),
            _ => None,
        }
    }

    fn options(&mut self) -> Option<&mut Vec<DhcpOption>> {
        match self {
            Scope::Global(s) => Some(&mut s.options),
            Scope::SharedNetwork(s) => Some(&mut s.options),
            Scope::Subnet4(s) => Some(&mut s.options),
            Scope::Subnet6(s) => Some(&mut s.options),
            Scope::Pool4(s) => Some(&mut s.options),
            Scope::Pool6(s) => Some(&mut s.options),
            Scope::Host(s) => Some(&mut s.options),
            Scope::Group(s) => Some(&mut s.options),
            Scope::Class(s) => Some(&mut s.options),
            Scope::SubClass(s) => Some(&mut s.options),
            Scope::Failover(_) | Scope::Key(_) | Scope::Zone(_) | Scope::Event(_) => None,
        }
    }

    fn permissions(&mut self) -> Option<&mut Vec<Permission>> {
        match self {
            Scope::Global(s) => Some(&mut s.permissions),
            Scope::SharedNetwork(s) => Some(&mut s.permissions),
            Scope::Subnet4(s) => Some(&mut s.permissions),
            Scope::Subnet6(s) => Some(&mut s.permissions),
            Scope::Pool4(s) => Some(&mut s.permissions),
            Scope::Pool6(s) => Some(&mut s.permissions),
            Scope::Host(s) => Some(&mut s.permissions),
            Scope::Group(s) => Some(&mut s.permissions),
            _ => None,
        }
    }

    fn parameters(&mut self) -> Option<&mut Parameters> {
        match self {
            Scope::Global(s) => Some(&mut s.parameters),
            Scope::SharedNetwork(s) => Some(&mut s.parameters),
            Scope::Subnet4(s) => Some(&mut s.parameters),
            Scope::Subnet6(s) => Some(&mut s.parameters),
            Scope::Pool4(s) => Some(&mut s.parameters),
            Scope::Pool6(s) => Some(&mut s.parameters),
            Scope::Host(s) => Some(&mut s.parameters),
            Scope::Group(s) => Some(&mut s.parameters),
            Scope::Class(s) => Some(&mut s.parameters),
            Scope::SubClass(s) => Some(&mut s.parameters),
            Scope::Failover(s) => Some(&mut s.parameters),
            Scope::Key(_) | Scope::Zone(_) | Scope::Event(_) => None,
        }
    }

    fn ranges4(&mut self) -> Option<&mut Vec<Range4>> {
        match self {
            Scope::Subnet4(s) => Some(&mut s.ranges),
            Scope::Pool4(s) => Some(&mut s.ranges),
            _ => None,
        }
    }

    fn ranges6(&mut self) -> Option<&mut Vec<Range6>> {
        match self {
            Scope::Subnet6(s) => Some(&mut s.ranges),
            Scope::Pool6(s) => Some(&mut s.ranges),
            _ => None,
        }
    }

    fn prefixes(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Scope::Subnet6(s) => Some(&mut s.prefixes),
            Scope::Pool6(s) => Some(&mut s.prefixes),
            _ => None,
        }
    }

    fn accept_parameter(&mut self, parameter: Parameter) -> bool {
        let text = match &parameter.value {
            ParameterValue::Text(text) => Some(text.clone()),
            _ => None,
        };
        match (self, text) {
            (Scope::Key(key), Some(text)) => match parameter.name.as_str() {
                "algorithm" => set_into(Some(&mut key.algorithm), text),
                "secret" => set_into(Some(&mut key.secret), text),
                _ => false,
            },
            (Scope::Zone(zone), Some(text)) => set_into(zone.field_mut(&parameter.name), text),
            (scope, _) => match scope.parameters() {
                Some(parameters) => {
                    parameters.push(parameter);
                    true
                }
                None => false,
            },
        }
    }

    /// Store a statement; `false` when this scope has no place for it.
    fn accept(&mut self, statement: Statement) -> bool {
        match statement {
            Statement::Authoritative(flag) => set_into(self.authoritative(), flag),
            Statement::Option(option) => push_into(self.options(), option),
            Statement::Permission(permission) => push_into(self.permissions(), permission),
            Statement::Range4(range) => push_into(self.ranges4(), range),
            Statement::Range6(range) => push_into(self.ranges6(), range),
            Statement::Prefix6(prefix) => push_into(self.prefixes(), prefix),
            Statement::Parameter(parameter) => self.accept_parameter(parameter),
            statement => match (self, statement) {
                (Scope::Global(g), Statement::Formula(formula)) => push_into(Some(&mut g.formulas), formula),
                (Scope::Global(g), Statement::Include(path)) => push_into(Some(&mut g.includes), path),
                (Scope::Global(g), Statement::SubClass { class_name, match_value }) => {
                    g.add_subclass(SubClass::new(class_name, match_value));
                    true
                }
                (Scope::Host(h), Statement::Hardware(hardware)) => set_into(Some(&mut h.hardware), hardware),
                (Scope::Host(h), Statement::FixedAddress(address)) => {
                    set_into(Some(&mut h.fixed_address), address)
                }
                (Scope::Host(h), Statement::FixedAddress6(address)) => {
                    set_into(Some(&mut h.fixed_address6), address)
                }
                (Scope::Host(h), Statement::HostIdentifier(identifier)) => {
                    set_into(Some(&mut h.host_identifier), identifier)
                }
                (Scope::Pool4(p), Statement::FailoverPeer(peer)) => set_into(Some(&mut p.failover_peer), peer),
                (Scope::Class(c), Statement::Match(expression)) => {
                    set_into(Some(&mut c.match_statement), expression)
                }
                (Scope::Class(c), Statement::Spawn(expression)) => set_into(Some(&mut c.spawn), expression),
                (Scope::Event(e), Statement::Event(statement)) => push_into(Some(&mut e.statements), statement),
                _ => false,
            },
        }
    }

    /// Attach a closed block; hands the child back when this scope cannot hold it.
    fn attach(&mut self, child: Scope) -> Result<(), Scope> {
        match (self, child) {
            (Scope::Global(g), Scope::SharedNetwork(c)) => g.add_shared_network(c),
            (Scope::Global(g), Scope::Subnet4(c)) => g.add_subnet(c),
            (Scope::Global(g), Scope::Subnet6(c)) => g.add_subnet(c),
            (Scope::Global(g), Scope::Host(c)) => g.add_host(c),
            (Scope::Global(g), Scope::Group(c)) => g.add_group(c),
            (Scope::Global(g), Scope::Class(c)) => g.add_class(c),
            (Scope::Global(g), Scope::SubClass(c)) => g.add_subclass(c),
            (Scope::Global(g), Scope::Failover(c)) => g.add_failover(c),
            (Scope::Global(g), Scope::Key(c)) => g.add_key(c),
            (Scope::Global(g), Scope::Zone(c)) => g.add_zone(c),
            (Scope::Global(g), Scope::Event(c)) => g.add_event(c),
            (Scope::SharedNetwork(s), Scope::Subnet4(c)) => s.add_subnet(c),
            (Scope::SharedNetwork(s), Scope::Subnet6(c)) => s.add_subnet(c),
            (Scope::SharedNetwork(s), Scope::Pool4(c)) => s.add_pool(c),
            (Scope::SharedNetwork(s), Scope::Host(c)) => s.add_host(c),
            (Scope::SharedNetwork(s), Scope::Group(c)) => s.add_group(c),
            (Scope::SharedNetwork(s), Scope::Event(c)) => s.add_event(c),
            (Scope::Subnet4(s), Scope::Pool4(c)) => s.add_pool(c),
            (Scope::Subnet4(s), Scope::Host(c)) => s.add_host(c),
            (Scope::Subnet4(s), Scope::Group(c)) => s.add_group(c),
            (Scope::Subnet4(s), Scope::Event(c)) => s.add_event(c),
            (Scope::Subnet6(s), Scope::Pool6(c)) => s.add_pool(c),
            (Scope::Subnet6(s), Scope::Host(c)) => s.add_host(c),
            (Scope::Subnet6(s), Scope::Group(c)) => s.add_group(c),
            (Scope::Subnet6(s), Scope::Event(c)) => s.add_event(c),
            (Scope::Group(g), Scope::SharedNetwork(c)) => g.add_shared_network(c),
            (Scope::Group(g), Scope::Subnet4(c)) => g.add_subnet(c),
            (Scope::Group(g), Scope::Subnet6(c)) => g.add_subnet(c),
            (Scope::Group(g), Scope::Host(c)) => g.add_host(c),
            (Scope::Group(g), Scope::Group(c)) => g.add_group(c),
            (Scope::Group(g), Scope::Event(c)) => g.add_event(c),
            (_, child) => return Err(child),
        }
        Ok(())
    }
}

/// Incremental typed-model builder; the DHCPd counterpart of the generic tree builder.
#[derive(Debug)]
pub struct Constructor {
    root: Scope,
    /// Open blocks with the line they started on, innermost last
    stack: Vec<(Scope, usize)>,
}

impl Default for Constructor {
    fn default() -> Self {
        Constructor {
            root: Scope::Global(Global::new()),
            stack: Vec::new(),
        }
    }
}

impl Constructor {
    pub fn new() -> Self {
        Constructor::default()
    }

    fn current(&mut self) -> &mut Scope {
        match self.stack.last_mut() {
            Some((scope, _)) => scope,
            None => &mut self.root,
        }
    }

    fn scope_name(&self) -> String {
        self.stack
            .last()
            .map(|(scope, _)| scope)
            .unwrap_or(&self.root)
            .describe()
    }

    /// Feed one token.
    pub fn push(&mut self, token: &Token) -> Result<(), IscError> {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment => Ok(()),
            TokenKind::SectionEnd => self.close(token),
            kind if kind.is_declaration() => self.open(token),
            kind if kind.is_property() => {
                let statement = Statement::from_split(kind, split(token))?;
                let described = statement.describe();
                if self.current().accept(statement) {
                    trace!(statement = %described, "accepted");
                    Ok(())
                } else {
                    Err(self.unknown(described, token.line))
                }
            }
            _ => Err(self.unknown(token.text.trim().to_string(), token.line)),
        }
    }

    fn unknown(&self, statement: String, line: usize) -> IscError {
        UnknownStatementError {
            statement,
            scope: self.scope_name(),
            line,
        }
        .into()
    }

    fn open(&mut self, token: &Token) -> Result<(), IscError> {
        match Scope::open(split(token))? {
            Some(scope) => {
                trace!(depth = self.stack.len(), scope = %scope.describe(), "open");
                self.stack.push((scope, token.line));
                Ok(())
            }
            None => Err(self.unknown(statement_body(&token.text).to_string(), token.line)),
        }
    }

    fn close(&mut self, token: &Token) -> Result<(), IscError> {
        let (child, line) = self.stack.pop().ok_or(StructureError::UnexpectedClose {
            line: token.line,
            column: token.column,
        })?;
        let described = child.describe();
        trace!(depth = self.stack.len(), scope = %described, "close");
        if self.current().attach(child).is_err() {
            return Err(self.unknown(described, line));
        }
        Ok(())
    }

    /// Close the pass and hand back the model.
    pub fn finish(mut self) -> Result<Global, StructureError> {
        if let Some((scope, line)) = self.stack.pop() {
            return Err(StructureError::Unclosed {
                open: scope.describe(),
                line,
            });
        }
        match self.root {
            Scope::Global(global) => Ok(global),
            other => Err(StructureError::Unclosed {
                open: other.describe(),
                line: 0,
            }),
        }
    }
}

/// Build the typed model from DHCPd tokens.
pub fn construct(tokens: &[Token]) -> Result<Global, IscError> {
    let mut constructor = Constructor::new();
    for token in tokens {
        constructor.push(token)?;
    }
    let global = constructor.finish()?;
    debug!(
        subnets = global.subnets.len(),
        hosts = global.hosts.len(),
        "constructed dhcpd model"
    );
    Ok(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isc::dhcpd::capabilities::{HasOptions, HasRanges};
    use crate::isc::dhcpd::declarations::Subnet;
    use crate::isc::dialect::Dialect;
    use crate::isc::lexing::tokenize;
    use std::net::Ipv4Addr;

    fn model(source: &str) -> Result<Global, IscError> {
        construct(&tokenize(source, Dialect::Dhcpd)?)
    }

    #[test]
    fn test_subnet_with_range_and_options() {
        let global = model(
            "subnet 10.5.5.0 netmask 255.255.255.224 {\n  range 10.5.5.26 10.5.5.30;\n  option routers 10.5.5.1;\n}\n",
        )
        .unwrap();
        let subnet = match global.find_subnet("10.5.5.0") {
            Some(Subnet::V4(subnet)) => subnet,
            other => panic!("expected an IPv4 subnet, got {:?}", other),
        };
        assert_eq!(subnet.netmask, Ipv4Addr::new(255, 255, 255, 224));
        assert_eq!(subnet.ranges().len(), 1);
        assert_eq!(subnet.find_option("routers").map(|o| o.value.as_str()), Some("10.5.5.1"));
    }

    #[test]
    fn test_global_statements() {
        let global = model(
            "not authoritative;\noption domain-name \"example.org\";\nddns-update-style none;\nping-check on;\n",
        )
        .unwrap();
        assert_eq!(global.authoritative, Some(false));
        assert_eq!(global.find_option("domain-name").map(|o| o.value.as_str()), Some("\"example.org\""));
        assert_eq!(global.parameters.get("ping-check"), Some(&ParameterValue::Flag(true)));
    }

    #[test]
    fn test_host_fields() {
        let global = model(
            "host printer {\n  hardware ethernet 08:00:07:26:c0:a5;\n  fixed-address 10.0.0.5;\n}\n",
        )
        .unwrap();
        let host = global.find_host("printer").unwrap();
        assert_eq!(host.hardware.as_ref().map(|h| h.address.as_str()), Some("08:00:07:26:c0:a5"));
        assert_eq!(host.fixed_address.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn test_statement_outside_its_scope_is_rejected() {
        let err = model("range 10.0.0.1 10.0.0.9;\n").unwrap_err();
        match err {
            IscError::UnknownStatement(err) => {
                assert_eq!(err.scope, "the global scope");
                assert_eq!(err.line, 1);
            }
            other => panic!("expected an unknown statement, got {:?}", other),
        }
    }

    #[test]
    fn test_block_in_wrong_parent_is_rejected() {
        let err = model("host a {\n  pool {\n  }\n}\n").unwrap_err();
        assert!(matches!(err, IscError::UnknownStatement(ref e) if e.statement == "pool" && e.line == 2));
    }

    #[test]
    fn test_conditionals_are_rejected() {
        let err = model("if exists user-class {\n}\n").unwrap_err();
        assert!(matches!(err, IscError::UnknownStatement(_)));
    }

    #[test]
    fn test_failover_key_and_zone() {
        let global = model(
            "failover peer \"dhcp\" {\n  primary;\n  mclt 3600;\n}\nkey k {\n  algorithm hmac-md5;\n  secret \"abc\";\n}\nzone example.org. {\n  primary 127.0.0.1;\n  key k;\n}\n",
        )
        .unwrap();
        let failover = global.find_failover("\"dhcp\"").unwrap();
        assert_eq!(failover.parameters.get("primary"), Some(&ParameterValue::Bare));
        assert_eq!(global.find_key("k").and_then(|k| k.algorithm.as_deref()), Some("hmac-md5"));
        assert_eq!(global.find_zone("example.org.").and_then(|z| z.key.as_deref()), Some("k"));
    }

    #[test]
    fn test_events_and_subclasses() {
        let global = model(
            "on commit {\n  set ip = binary-to-ascii(10, 8, \".\", leased-address);\n}\nsubclass \"vendor\" 1:2:3;\n",
        )
        .unwrap();
        assert_eq!(global.events[0].trigger, "commit");
        assert_eq!(global.events[0].statements[0].keyword, "set");
        assert_eq!(global.find_subclass("1:2:3").map(|s| s.class_name.as_str()), Some("\"vendor\""));
    }

    #[test]
    fn test_unclosed_block() {
        let err = model("group {\n  host a {\n  }\n").unwrap_err();
        assert_eq!(
            err,
            IscError::Structure(StructureError::Unclosed {
                open: "group".to_string(),
                line: 1
            })
        );
    }

    #[test]
    fn test_unexpected_close() {
        let err = model("}\n").unwrap_err();
        assert!(matches!(err, IscError::Structure(StructureError::UnexpectedClose { line: 1, .. })));
    }
}
