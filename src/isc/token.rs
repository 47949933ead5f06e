//! Token types shared by the lexer, classifier and builders.
//!
//! Tokens are coarse: one token is one whole statement (`option routers 10.0.0.1;`), one
//! declaration header (`subnet 10.0.0.0 netmask 255.0.0.0 {`), one closing brace, or one piece
//! of insignificant text (whitespace, newline, comment). The kind records which grammar rule
//! matched, and the classifier uses it to decide how the statement splits into key, value and
//! parameters.
//!
//! Statement text is whitespace-normalized at lexing time (runs collapse to a single space,
//! quoted strings are kept byte for byte). Comment text is kept raw.

use serde::Serialize;
use std::fmt;

/// A classified slice of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line of the first character
    pub line: usize,
    /// 1-based column of the first character
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Whitespace and newlines carry no structure at all.
    pub fn is_insignificant(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Newline)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {:?} {:?}", self.line, self.column, self.kind, self.text)
    }
}

/// The grammar rule a token matched.
///
/// Brace dialects (dhcpd, named) use the declaration/parameter kinds; zone files use
/// [TokenKind::Directive] and [TokenKind::Record].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    DeclarationFailover,
    DeclarationGeneral,
    EventGeneral,
    FormulaGeneral,
    ParameterBoolean,
    ParameterSingleKey,
    ParameterSingleValue,
    ParameterMultiValue,
    ParameterOption,
    ParameterFailover,
    ParameterGeneral,
    SectionEnd,
    Directive(Directive),
    Record(RecordType),
    Comment,
    Newline,
    Whitespace,
}

impl TokenKind {
    /// Opens a block that nests children.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            TokenKind::DeclarationFailover | TokenKind::DeclarationGeneral
        )
    }

    /// A semicolon-terminated leaf statement.
    pub fn is_property(&self) -> bool {
        matches!(
            self,
            TokenKind::EventGeneral
                | TokenKind::FormulaGeneral
                | TokenKind::ParameterBoolean
                | TokenKind::ParameterSingleKey
                | TokenKind::ParameterSingleValue
                | TokenKind::ParameterMultiValue
                | TokenKind::ParameterOption
                | TokenKind::ParameterFailover
                | TokenKind::ParameterGeneral
        )
    }

    /// Only meaningful to the zone-file model.
    pub fn is_zone_statement(&self) -> bool {
        matches!(self, TokenKind::Directive(_) | TokenKind::Record(_))
    }
}

/// Zone-file control entries (`$ORIGIN`, `$TTL`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Directive {
    Origin,
    Ttl,
    Include,
    Generate,
}

impl Directive {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "$ORIGIN" => Some(Directive::Origin),
            "$TTL" => Some(Directive::Ttl),
            "$INCLUDE" => Some(Directive::Include),
            "$GENERATE" => Some(Directive::Generate),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::Origin => "$ORIGIN",
            Directive::Ttl => "$TTL",
            Directive::Include => "$INCLUDE",
            Directive::Generate => "$GENERATE",
        }
    }
}

macro_rules! record_types {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Resource record types the zone lexer recognizes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum RecordType {
            $($variant),+
        }

        impl RecordType {
            /// Every recognized type, longest mnemonic first.
            pub const ALL: &'static [RecordType] = &[$(RecordType::$variant),+];

            pub fn mnemonic(&self) -> &'static str {
                match self {
                    $(RecordType::$variant => $name),+
                }
            }

            /// Case-insensitive lookup of a type mnemonic.
            pub fn from_mnemonic(word: &str) -> Option<Self> {
                let upper = word.to_ascii_uppercase();
                match upper.as_str() {
                    $($name => Some(RecordType::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

record_types! {
    Nsec3Param => "NSEC3PARAM",
    OpenPgpKey => "OPENPGPKEY",
    IpSecKey => "IPSECKEY",
    CdnsKey => "CDNSKEY",
    DnsKey => "DNSKEY",
    SmimeA => "SMIMEA",
    ZoneMd => "ZONEMD",
    Afsdb => "AFSDB",
    Cname => "CNAME",
    Csync => "CSYNC",
    Dhcid => "DHCID",
    Dname => "DNAME",
    Eui48 => "EUI48",
    Eui64 => "EUI64",
    Hinfo => "HINFO",
    Https => "HTTPS",
    Naptr => "NAPTR",
    Nsec3 => "NSEC3",
    Rrsig => "RRSIG",
    Sshfp => "SSHFP",
    Aaaa => "AAAA",
    Cert => "CERT",
    Nsec => "NSEC",
    Svcb => "SVCB",
    Tkey => "TKEY",
    Tlsa => "TLSA",
    Tsig => "TSIG",
    Apl => "APL",
    Caa => "CAA",
    Cds => "CDS",
    Dlv => "DLV",
    Hip => "HIP",
    Key => "KEY",
    Loc => "LOC",
    Ptr => "PTR",
    Sig => "SIG",
    Soa => "SOA",
    Srv => "SRV",
    Txt => "TXT",
    Uri => "URI",
    Ds => "DS",
    Kx => "KX",
    Mx => "MX",
    Ns => "NS",
    Rp => "RP",
    Ta => "TA",
    A => "A",
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_lookup_ignores_case() {
        assert_eq!(RecordType::from_mnemonic("cname"), Some(RecordType::Cname));
        assert_eq!(RecordType::from_mnemonic("AAAA"), Some(RecordType::Aaaa));
        assert_eq!(RecordType::from_mnemonic("example"), None);
    }

    #[test]
    fn test_mnemonics_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for rtype in RecordType::ALL {
            assert!(seen.insert(rtype.mnemonic()), "{} twice", rtype);
        }
        assert_eq!(seen.len(), 47);
    }

    #[test]
    fn test_directive_keywords() {
        assert_eq!(Directive::from_keyword("$origin"), Some(Directive::Origin));
        assert_eq!(Directive::from_keyword("$TTL"), Some(Directive::Ttl));
        assert_eq!(Directive::from_keyword("$FOO"), None);
        assert_eq!(Directive::Generate.keyword(), "$GENERATE");
    }

    #[test]
    fn test_kind_families() {
        assert!(TokenKind::DeclarationFailover.is_declaration());
        assert!(TokenKind::ParameterBoolean.is_property());
        assert!(!TokenKind::SectionEnd.is_property());
        assert!(TokenKind::Record(RecordType::A).is_zone_statement());
    }
}
