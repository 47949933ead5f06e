//! Zone text in fixed-width columns
//!
//! ```text
//! $ORIGIN example.org.
//! $TTL 3600
//!
//! @          3600 IN SOA        ns1.example.org.          admin.example.org. (
//!                                                         2021010101                ; serial
//!                                                         ...
//! www             IN A          192.0.2.1
//! ```
//!
//! Columns are label, TTL (right-aligned), class, type, then the rdata. The SOA continuation
//! lines line up under its first rdata field.

use super::records::{ResourceRecord, Soa};
use super::{PlacedDirective, Zone};
use serde::{Deserialize, Serialize};

const CLASS_WIDTH: usize = 2;
const SOA_FIELD_WIDTH: usize = 25;

/// Column widths for zone output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneLayout {
    pub label_width: usize,
    pub ttl_width: usize,
    pub type_width: usize,
}

impl Default for ZoneLayout {
    fn default() -> Self {
        ZoneLayout {
            label_width: 50,
            ttl_width: 8,
            type_width: 10,
        }
    }
}

impl ZoneLayout {
    /// Width of everything before the rdata, separators included.
    fn rdata_column(&self) -> usize {
        self.label_width + self.ttl_width + CLASS_WIDTH + self.type_width + 4
    }

    fn prefix(&self, record: &ResourceRecord) -> String {
        format!(
            "{:<lw$} {:>tw$} {:>cw$} {:<yw$}",
            record.label.as_deref().unwrap_or_default(),
            record.ttl.as_deref().unwrap_or_default(),
            record.class,
            record.rtype().mnemonic(),
            lw = self.label_width,
            tw = self.ttl_width,
            cw = CLASS_WIDTH,
            yw = self.type_width,
        )
    }

    /// One record line, or the parenthesized block for an SOA.
    pub fn record(&self, record: &ResourceRecord) -> String {
        match record.soa() {
            Some(soa) => self.soa(record, soa),
            None => format!("{} {}", self.prefix(record), record.data),
        }
    }

    fn soa(&self, record: &ResourceRecord, soa: &Soa) -> String {
        let pad = " ".repeat(self.rdata_column());
        let field = |value: &str, note: &str| {
            format!("{}{:<w$} ; {}", pad, value, note, w = SOA_FIELD_WIDTH)
        };
        [
            format!(
                "{} {:<w$} {} (",
                self.prefix(record),
                soa.mname,
                soa.rname,
                w = SOA_FIELD_WIDTH
            ),
            field(&soa.serial.to_string(), "serial"),
            field(&soa.refresh, "refresh"),
            field(&soa.retry, "retry"),
            field(&soa.expire, "expire"),
            field(&format!("{} )", soa.minimum), "minimum TTL"),
        ]
        .join("\n")
    }

    pub fn zone(&self, zone: &Zone) -> String {
        let mut out = String::new();
        if let Some(origin) = &zone.origin {
            out.push_str(&format!("$ORIGIN {}\n", origin));
        }
        if let Some(ttl) = &zone.ttl {
            out.push_str(&format!("$TTL {}\n", ttl));
        }
        for include in &zone.includes {
            out.push_str(&format!("$INCLUDE {}\n", include));
        }
        if !out.is_empty() {
            out.push('\n');
        }
        if let Some(soa) = &zone.soa {
            out.push_str(&self.record(soa));
            out.push('\n');
        }
        let mut placed = zone.directives.iter().peekable();
        for (idx, record) in zone.records.iter().enumerate() {
            while let Some(directive) = placed.next_if(|d| d.position <= idx) {
                out.push_str(&directive_line(directive));
            }
            out.push_str(&self.record(record));
            out.push('\n');
        }
        for directive in placed {
            out.push_str(&directive_line(directive));
        }
        out
    }
}

fn directive_line(placed: &PlacedDirective) -> String {
    format!("{} {}\n", placed.directive.keyword(), placed.argument)
}

impl Zone {
    pub fn to_isc(&self) -> String {
        ZoneLayout::default().zone(self)
    }

    pub fn to_isc_with(&self, layout: &ZoneLayout) -> String {
        layout.zone(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isc::zone::records::RecordData;
    use crate::isc::token::RecordType;

    fn compact() -> ZoneLayout {
        ZoneLayout {
            label_width: 6,
            ttl_width: 4,
            type_width: 4,
        }
    }

    #[test]
    fn test_record_columns() {
        let record = ResourceRecord::new(
            Some("www".into()),
            RecordData::parse(RecordType::A, "192.0.2.1").unwrap(),
        )
        .with_ttl("300");
        assert_eq!(compact().record(&record), "www     300 IN A    192.0.2.1");
    }

    #[test]
    fn test_ownerless_record_starts_blank() {
        let record = ResourceRecord::new(None, RecordData::parse(RecordType::Mx, "10 mx").unwrap());
        assert!(compact().record(&record).starts_with(' '));
    }

    #[test]
    fn test_soa_block() {
        let record = ResourceRecord::new(
            Some("@".into()),
            RecordData::parse(RecordType::Soa, "ns1 admin 7 1h 15m 1w 300").unwrap(),
        );
        let layout = ZoneLayout {
            label_width: 2,
            ttl_width: 2,
            type_width: 3,
        };
        let pad = " ".repeat(13);
        let expected = format!(
            "@     IN SOA ns1                       admin (\n{pad}7                         ; serial\n{pad}1h                        ; refresh\n{pad}15m                       ; retry\n{pad}1w                        ; expire\n{pad}300 )                     ; minimum TTL",
            pad = pad
        );
        assert_eq!(layout.record(&record), expected);
    }

    #[test]
    fn test_default_layout_offsets_soa_fields() {
        assert_eq!(ZoneLayout::default().rdata_column(), 74);
    }
}
