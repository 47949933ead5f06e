//! DNS zone files
//!
//! Zone files have no braces, so there is no generic tree: the lexer yields one token per
//! directive or record and [construct] builds a [Zone] directly. Round trips go through the
//! typed model:
//!
//! ```text
//! text --tokenize--> tokens --construct--> Zone --to_isc--> text
//! ```
//!
//! Comments are not kept. `$GENERATE` lexes but has no typed form and is rejected.
//!
//! `$ORIGIN`, `$TTL` and `$INCLUDE` ahead of the first record form the header. Once records have
//! been read, a directive changes the context only for what follows it, so it is kept at its
//! place in the record stream as a [PlacedDirective].

pub mod construct;
pub mod emit;
pub mod records;

pub use construct::construct;
pub use emit::ZoneLayout;
pub use records::{RecordData, ResourceRecord, Soa};

use crate::isc::dialect::Dialect;
use crate::isc::error::IscError;
use crate::isc::lexing::tokenize;
use crate::isc::token::{Directive, RecordType};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Zone {
    /// `$ORIGIN`
    pub origin: Option<String>,
    /// `$TTL`
    pub ttl: Option<String>,
    /// `$INCLUDE` arguments as written
    pub includes: Vec<String>,
    pub soa: Option<ResourceRecord>,
    pub records: Vec<ResourceRecord>,
    /// Directives between records
    pub directives: Vec<PlacedDirective>,
}

/// A directive written between records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedDirective {
    /// How many records come before it
    pub position: usize,
    pub directive: Directive,
    pub argument: String,
}

impl Zone {
    pub fn new() -> Self {
        Zone::default()
    }

    /// Add a record. An SOA replaces the current one, which is handed back.
    pub fn add_record(&mut self, record: ResourceRecord) -> Option<ResourceRecord> {
        if record.rtype() == RecordType::Soa {
            self.soa.replace(record)
        } else {
            self.records.push(record);
            None
        }
    }

    /// Records owned by `label`, in file order.
    pub fn find_records<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a ResourceRecord> {
        self.records
            .iter()
            .filter(move |record| record.label.as_deref() == Some(label))
    }

    pub fn records_of_type(&self, rtype: RecordType) -> impl Iterator<Item = &ResourceRecord> {
        self.records.iter().filter(move |record| record.rtype() == rtype)
    }

    /// Whether nothing but the header has been seen yet.
    pub fn is_header_open(&self) -> bool {
        self.soa.is_none() && self.records.is_empty()
    }

    /// Place a directive after the records added so far.
    pub fn place_directive(&mut self, directive: Directive, argument: impl Into<String>) {
        self.directives.push(PlacedDirective {
            position: self.records.len(),
            directive,
            argument: argument.into(),
        });
    }

    /// Remove records owned by `label`, optionally only those of one type; returns how many.
    ///
    /// Placed directives keep their place relative to the records that remain.
    pub fn delete_records(&mut self, label: &str, rtype: Option<RecordType>) -> usize {
        let keep: Vec<bool> = self
            .records
            .iter()
            .map(|record| {
                record.label.as_deref() != Some(label) || rtype.is_some_and(|t| record.rtype() != t)
            })
            .collect();
        for placed in &mut self.directives {
            let end = placed.position.min(keep.len());
            placed.position = keep[..end].iter().filter(|kept| **kept).count();
        }
        let before = self.records.len();
        let mut flags = keep.into_iter();
        self.records.retain(|_| flags.next().unwrap_or(true));
        before - self.records.len()
    }
}

/// Parse zone file text.
pub fn loads(source: &str) -> Result<Zone, IscError> {
    construct(&tokenize(source, Dialect::Zone)?)
}

/// Write a zone with the default column layout.
pub fn dumps(zone: &Zone) -> String {
    zone.to_isc()
}
