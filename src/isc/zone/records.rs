//! Resource records and their typed data

use crate::isc::error::ConstructionError;
use crate::isc::lexing::split_words;
use crate::isc::token::RecordType;
use serde::Serialize;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// The seven SOA fields. Timers stay textual so BIND shorthands like `1h` survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Soa {
    pub mname: String,
    pub rname: String,
    pub serial: u32,
    pub refresh: String,
    pub retry: String,
    pub expire: String,
    pub minimum: String,
}

/// Record data, typed for the common record types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum RecordData {
    A { address: Ipv4Addr },
    Aaaa { address: Ipv6Addr },
    Cname { target: String },
    Dname { target: String },
    Mx { preference: u16, exchange: String },
    Ns { host: String },
    Ptr { target: String },
    /// Character strings as written, quotes included
    Txt { strings: Vec<String> },
    Soa(Soa),
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    Caa { flags: u8, tag: String, value: String },
    Hinfo { cpu: String, os: String },
    Rp { mailbox: String, txt: String },
    /// Any other recognized type, rdata kept verbatim
    Generic { rtype: RecordType, rdata: String },
}

fn number<T: FromStr>(
    rtype: RecordType,
    expected: &'static str,
    word: &str,
    rdata: &str,
) -> Result<T, ConstructionError> {
    word.parse().map_err(|_| shape_error(rtype, expected, rdata))
}

fn shape_error(rtype: RecordType, expected: &'static str, rdata: &str) -> ConstructionError {
    ConstructionError::RecordData {
        rtype: rtype.mnemonic().to_string(),
        expected,
        got: rdata.to_string(),
    }
}

impl RecordData {
    /// Parse the rdata of a record of type `rtype`.
    pub fn parse(rtype: RecordType, rdata: &str) -> Result<Self, ConstructionError> {
        let words = split_words(rdata);
        let w: Vec<&str> = words.iter().map(String::as_str).collect();
        let data = match rtype {
            RecordType::A => match w.as_slice() {
                [address] => RecordData::A {
                    address: number(rtype, "an IPv4 address", address, rdata)?,
                },
                _ => return Err(shape_error(rtype, "an IPv4 address", rdata)),
            },
            RecordType::Aaaa => match w.as_slice() {
                [address] => RecordData::Aaaa {
                    address: number(rtype, "an IPv6 address", address, rdata)?,
                },
                _ => return Err(shape_error(rtype, "an IPv6 address", rdata)),
            },
            RecordType::Cname | RecordType::Dname | RecordType::Ns | RecordType::Ptr => {
                let [name] = w.as_slice() else {
                    return Err(shape_error(rtype, "one domain name", rdata));
                };
                let name = name.to_string();
                match rtype {
                    RecordType::Cname => RecordData::Cname { target: name },
                    RecordType::Dname => RecordData::Dname { target: name },
                    RecordType::Ns => RecordData::Ns { host: name },
                    _ => RecordData::Ptr { target: name },
                }
            }
            RecordType::Mx => match w.as_slice() {
                [preference, exchange] => RecordData::Mx {
                    preference: number(rtype, "preference and exchange", preference, rdata)?,
                    exchange: exchange.to_string(),
                },
                _ => return Err(shape_error(rtype, "preference and exchange", rdata)),
            },
            RecordType::Txt => {
                if words.is_empty() {
                    return Err(shape_error(rtype, "at least one string", rdata));
                }
                RecordData::Txt { strings: words }
            }
            RecordType::Soa => match w.as_slice() {
                [mname, rname, serial, refresh, retry, expire, minimum] => RecordData::Soa(Soa {
                    mname: mname.to_string(),
                    rname: rname.to_string(),
                    serial: number(rtype, "seven fields", serial, rdata)?,
                    refresh: refresh.to_string(),
                    retry: retry.to_string(),
                    expire: expire.to_string(),
                    minimum: minimum.to_string(),
                }),
                _ => return Err(shape_error(rtype, "seven fields", rdata)),
            },
            RecordType::Srv => match w.as_slice() {
                [priority, weight, port, target] => {
                    const EXPECTED: &str = "priority, weight, port and target";
                    RecordData::Srv {
                        priority: number(rtype, EXPECTED, priority, rdata)?,
                        weight: number(rtype, EXPECTED, weight, rdata)?,
                        port: number(rtype, EXPECTED, port, rdata)?,
                        target: target.to_string(),
                    }
                }
                _ => return Err(shape_error(rtype, "priority, weight, port and target", rdata)),
            },
            RecordType::Caa => match w.as_slice() {
                [flags, tag, value] => RecordData::Caa {
                    flags: number(rtype, "flags, tag and value", flags, rdata)?,
                    tag: tag.to_string(),
                    value: value.to_string(),
                },
                _ => return Err(shape_error(rtype, "flags, tag and value", rdata)),
            },
            RecordType::Hinfo => match w.as_slice() {
                [cpu, os] => RecordData::Hinfo {
                    cpu: cpu.to_string(),
                    os: os.to_string(),
                },
                _ => return Err(shape_error(rtype, "cpu and os", rdata)),
            },
            RecordType::Rp => match w.as_slice() {
                [mailbox, txt] => RecordData::Rp {
                    mailbox: mailbox.to_string(),
                    txt: txt.to_string(),
                },
                _ => return Err(shape_error(rtype, "mailbox and txt domain", rdata)),
            },
            other => RecordData::Generic {
                rtype: other,
                rdata: rdata.to_string(),
            },
        };
        Ok(data)
    }

    pub fn rtype(&self) -> RecordType {
        match self {
            RecordData::A { .. } => RecordType::A,
            RecordData::Aaaa { .. } => RecordType::Aaaa,
            RecordData::Cname { .. } => RecordType::Cname,
            RecordData::Dname { .. } => RecordType::Dname,
            RecordData::Mx { .. } => RecordType::Mx,
            RecordData::Ns { .. } => RecordType::Ns,
            RecordData::Ptr { .. } => RecordType::Ptr,
            RecordData::Txt { .. } => RecordType::Txt,
            RecordData::Soa(_) => RecordType::Soa,
            RecordData::Srv { .. } => RecordType::Srv,
            RecordData::Caa { .. } => RecordType::Caa,
            RecordData::Hinfo { .. } => RecordType::Hinfo,
            RecordData::Rp { .. } => RecordType::Rp,
            RecordData::Generic { rtype, .. } => *rtype,
        }
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::A { address } => write!(f, "{}", address),
            RecordData::Aaaa { address } => write!(f, "{}", address),
            RecordData::Cname { target }
            | RecordData::Dname { target }
            | RecordData::Ptr { target } => f.write_str(target),
            RecordData::Ns { host } => f.write_str(host),
            RecordData::Mx {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            RecordData::Txt { strings } => f.write_str(&strings.join(" ")),
            RecordData::Soa(soa) => write!(
                f,
                "{} {} {} {} {} {} {}",
                soa.mname, soa.rname, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum
            ),
            RecordData::Srv {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{} {} {} {}", priority, weight, port, target),
            RecordData::Caa { flags, tag, value } => write!(f, "{} {} {}", flags, tag, value),
            RecordData::Hinfo { cpu, os } => write!(f, "{} {}", cpu, os),
            RecordData::Rp { mailbox, txt } => write!(f, "{} {}", mailbox, txt),
            RecordData::Generic { rdata, .. } => f.write_str(rdata),
        }
    }
}

/// One record. A missing label reuses the previous owner; a missing TTL falls back to `$TTL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    pub label: Option<String>,
    pub ttl: Option<String>,
    pub class: String,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(label: Option<String>, data: RecordData) -> Self {
        ResourceRecord {
            label,
            ttl: None,
            class: "IN".to_string(),
            data,
        }
    }

    pub fn with_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    pub fn rtype(&self) -> RecordType {
        self.data.rtype()
    }

    pub fn soa(&self) -> Option<&Soa> {
        match &self.data {
            RecordData::Soa(soa) => Some(soa),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RecordType::A, "192.0.2.1")]
    #[case(RecordType::Aaaa, "2001:db8::1")]
    #[case(RecordType::Mx, "10 mail.example.org.")]
    #[case(RecordType::Srv, "0 5 5060 sip.example.org.")]
    #[case(RecordType::Caa, "0 issue \"letsencrypt.org\"")]
    #[case(RecordType::Txt, "\"v=spf1 -all\" \"second\"")]
    #[case(RecordType::Sshfp, "1 1 123456789abcdef")]
    fn test_rdata_is_written_back_as_read(#[case] rtype: RecordType, #[case] rdata: &str) {
        let data = RecordData::parse(rtype, rdata).unwrap();
        assert_eq!(data.rtype(), rtype);
        assert_eq!(data.to_string(), rdata);
    }

    #[rstest]
    #[case(RecordType::A, "192.0.2")]
    #[case(RecordType::A, "192.0.2.1 192.0.2.2")]
    #[case(RecordType::Mx, "mail.example.org.")]
    #[case(RecordType::Mx, "high mail.example.org.")]
    #[case(RecordType::Soa, "ns1 admin 1 2 3 4")]
    #[case(RecordType::Srv, "0 5 sip.example.org.")]
    fn test_wrong_shape_is_a_construction_error(#[case] rtype: RecordType, #[case] rdata: &str) {
        assert!(matches!(
            RecordData::parse(rtype, rdata),
            Err(ConstructionError::RecordData { .. })
        ));
    }

    #[test]
    fn test_soa_fields() {
        let data = RecordData::parse(
            RecordType::Soa,
            "ns1.example.org. admin.example.org. 2021010101 1h 15m 1w 300",
        )
        .unwrap();
        let record = ResourceRecord::new(Some("@".into()), data);
        let soa = record.soa().unwrap();
        assert_eq!(soa.serial, 2021010101);
        assert_eq!(soa.refresh, "1h");
        assert_eq!(soa.minimum, "300");
    }
}
