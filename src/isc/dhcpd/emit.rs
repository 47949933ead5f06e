//! Typed model to ISC text
//!
//! Each scope writes its single-line settings first (authoritative, parameters, permissions,
//! options), then its nested blocks grouped by kind. At the top level, option spaces and option
//! definitions come ahead of the settings that use them. Constructing the output again yields
//! an equal model.

use super::declarations::{
    DdnsZone, DhcpClass, Event, Failover, Global, Group, Host, Key, Pool4, Pool6, SharedNetwork,
    SubClass, Subnet, Subnet4, Subnet6,
};
use super::statements::{DhcpOption, Parameters, Permission};
use crate::isc::dialect::Dialect;
use crate::isc::formats::{IscWriter, SerializeOptions};

/// Render as dhcpd.conf text.
pub trait ToIsc {
    fn write_isc(&self, emitter: &mut Emitter);

    fn to_isc_with(&self, options: &SerializeOptions) -> String {
        let mut emitter = Emitter::new(*options);
        self.write_isc(&mut emitter);
        emitter.finish()
    }

    fn to_isc(&self) -> String {
        self.to_isc_with(&SerializeOptions::for_dialect(Dialect::Dhcpd))
    }
}

pub struct Emitter {
    writer: IscWriter,
    options: SerializeOptions,
}

impl Emitter {
    pub fn new(options: SerializeOptions) -> Self {
        Emitter {
            writer: IscWriter::new(options.indent_width),
            options,
        }
    }

    pub fn finish(self) -> String {
        self.writer.finish()
    }

    fn block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.writer.open(header);
        body(self);
        self.writer.close(self.options.close_brace);
        if self.writer.level() == 0 && self.options.blank_line_after_top_level_block {
            self.writer.blank();
        }
    }

    fn statements<T: ToString>(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.writer.statement(&item.to_string());
        }
    }

    fn keyword(&mut self, keyword: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.writer.statement(&format!("{} {}", keyword, value));
        }
    }

    fn settings<'a>(
        &mut self,
        authoritative: Option<bool>,
        parameters: &Parameters,
        permissions: &[Permission],
        options: impl IntoIterator<Item = &'a DhcpOption>,
    ) {
        match authoritative {
            Some(true) => self.writer.statement("authoritative"),
            Some(false) => self.writer.statement("not authoritative"),
            None => {}
        }
        self.statements(parameters.iter());
        self.statements(permissions);
        self.statements(options);
    }

    fn each<T: ToIsc>(&mut self, items: &[T]) {
        for item in items {
            item.write_isc(self);
        }
    }
}

impl ToIsc for Global {
    fn write_isc(&self, e: &mut Emitter) {
        for path in &self.includes {
            e.writer.statement(&format!("include {}", path));
        }
        let (spaces, options): (Vec<_>, Vec<_>) = self
            .options
            .iter()
            .partition(|option| option.is_space_declaration());
        e.statements(spaces);
        e.statements(&self.formulas);
        e.settings(self.authoritative, &self.parameters, &self.permissions, options);
        e.each(&self.keys);
        e.each(&self.failovers);
        e.each(&self.zones);
        e.each(&self.classes);
        e.each(&self.subclasses);
        e.each(&self.shared_networks);
        e.each(&self.subnets);
        e.each(&self.hosts);
        e.each(&self.groups);
        e.each(&self.events);
    }
}

impl ToIsc for SharedNetwork {
    fn write_isc(&self, e: &mut Emitter) {
        e.block(&format!("shared-network {}", self.name), |e| {
            e.settings(self.authoritative, &self.parameters, &self.permissions, &self.options);
            e.each(&self.subnets);
            e.each(&self.pools);
            e.each(&self.hosts);
            e.each(&self.groups);
            e.each(&self.events);
        });
    }
}

impl ToIsc for Subnet {
    fn write_isc(&self, e: &mut Emitter) {
        match self {
            Subnet::V4(subnet) => subnet.write_isc(e),
            Subnet::V6(subnet) => subnet.write_isc(e),
        }
    }
}

impl ToIsc for Subnet4 {
    fn write_isc(&self, e: &mut Emitter) {
        e.block(&format!("subnet {} netmask {}", self.network, self.netmask), |e| {
            e.settings(self.authoritative, &self.parameters, &self.permissions, &self.options);
            e.statements(&self.ranges);
            e.each(&self.pools);
            e.each(&self.hosts);
            e.each(&self.groups);
            e.each(&self.events);
        });
    }
}

impl ToIsc for Subnet6 {
    fn write_isc(&self, e: &mut Emitter) {
        e.block(&format!("subnet6 {}", self.network), |e| {
            e.settings(self.authoritative, &self.parameters, &self.permissions, &self.options);
            e.statements(&self.ranges);
            for prefix in &self.prefixes {
                e.keyword("prefix6", Some(prefix));
            }
            e.each(&self.pools);
            e.each(&self.hosts);
            e.each(&self.groups);
            e.each(&self.events);
        });
    }
}

impl ToIsc for Pool4 {
    fn write_isc(&self, e: &mut Emitter) {
        e.block("pool", |e| {
            e.keyword("failover peer", self.failover_peer.as_deref());
            e.settings(None, &self.parameters, &self.permissions, &self.options);
            e.statements(&self.ranges);
        });
    }
}

impl ToIsc for Pool6 {
    fn write_isc(&self, e: &mut Emitter) {
        e.block("pool6", |e| {
            e.settings(None, &self.parameters, &self.permissions, &self.options);
            e.statements(&self.ranges);
            for prefix in &self.prefixes {
                e.keyword("prefix6", Some(prefix));
            }
        });
    }
}

impl ToIsc for Host {
    fn write_isc(&self, e: &mut Emitter) {
        e.block(&format!("host {}", self.name), |e| {
            e.statements(&self.hardware);
            e.keyword("fixed-address", self.fixed_address.as_deref());
            e.keyword("fixed-address6", self.fixed_address6.as_deref());
            e.keyword("host-identifier", self.host_identifier.as_deref());
            e.settings(None, &self.parameters, &self.permissions, &self.options);
        });
    }
}

impl ToIsc for Group {
    fn write_isc(&self, e: &mut Emitter) {
        let header = match &self.name {
            Some(name) => format!("group {}", name),
            None => "group".to_string(),
        };
        e.block(&header, |e| {
            e.settings(self.authoritative, &self.parameters, &self.permissions, &self.options);
            e.each(&self.shared_networks);
            e.each(&self.subnets);
            e.each(&self.hosts);
            e.each(&self.groups);
            e.each(&self.events);
        });
    }
}

impl ToIsc for DhcpClass {
    fn write_isc(&self, e: &mut Emitter) {
        e.block(&format!("class {}", self.name), |e| {
            e.keyword("match", self.match_statement.as_deref());
            e.keyword("spawn", self.spawn.as_deref());
            e.settings(None, &self.parameters, &[], &self.options);
        });
    }
}

impl ToIsc for SubClass {
    fn write_isc(&self, e: &mut Emitter) {
        let header = format!("subclass {} {}", self.class_name, self.match_value);
        if self.has_body() {
            e.block(&header, |e| e.settings(None, &self.parameters, &[], &self.options));
        } else {
            e.writer.statement(&header);
        }
    }
}

impl ToIsc for Failover {
    fn write_isc(&self, e: &mut Emitter) {
        e.block(&format!("failover peer {}", self.name), |e| {
            e.statements(self.parameters.iter());
        });
    }
}

impl ToIsc for Key {
    fn write_isc(&self, e: &mut Emitter) {
        e.block(&format!("key {}", self.name), |e| {
            e.keyword("algorithm", self.algorithm.as_deref());
            e.keyword("secret", self.secret.as_deref());
        });
    }
}

impl ToIsc for DdnsZone {
    fn write_isc(&self, e: &mut Emitter) {
        e.block(&format!("zone {}", self.name), |e| {
            for (keyword, value) in self.fields() {
                e.keyword(keyword, Some(value));
            }
        });
    }
}

impl ToIsc for Event {
    fn write_isc(&self, e: &mut Emitter) {
        e.block(&format!("on {}", self.trigger), |e| e.statements(&self.statements));
    }
}
