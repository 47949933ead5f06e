//! Zone tokens to [Zone]

use super::records::{RecordData, ResourceRecord};
use super::Zone;
use crate::isc::classify::split_record;
use crate::isc::error::{ConstructionError, IscError, UnknownStatementError};
use crate::isc::lexing::split_words;
use crate::isc::token::{Directive, Token, TokenKind};
use tracing::{debug, warn};

fn directive_argument(directive: Directive, token: &Token) -> Result<String, ConstructionError> {
    let words = split_words(&token.text);
    if words.len() < 2 {
        return Err(ConstructionError::invalid("directive argument", token.text.trim()));
    }
    match directive {
        Directive::Include => Ok(words[1..].join(" ")),
        _ => Ok(words[1].clone()),
    }
}

fn apply(zone: &mut Zone, token: &Token) -> Result<(), IscError> {
    match token.kind {
        TokenKind::Comment | TokenKind::Whitespace | TokenKind::Newline => {}
        TokenKind::Directive(
            directive @ (Directive::Origin | Directive::Ttl | Directive::Include),
        ) => {
            let argument = directive_argument(directive, token)?;
            let header = zone.is_header_open();
            match directive {
                Directive::Origin if header && zone.origin.is_none() => zone.origin = Some(argument),
                Directive::Ttl if header && zone.ttl.is_none() => zone.ttl = Some(argument),
                Directive::Include if header => zone.includes.push(argument),
                _ => {
                    debug!(line = token.line, directive = directive.keyword(), "placed between records");
                    zone.place_directive(directive, argument);
                }
            }
        }
        TokenKind::Record(rtype) => {
            let parts = split_record(token)?;
            let record = ResourceRecord {
                label: parts.label,
                ttl: parts.ttl,
                class: parts.class,
                data: RecordData::parse(rtype, &parts.rdata)?,
            };
            if let Some(replaced) = zone.add_record(record) {
                warn!(line = token.line, replaced = ?replaced.label, "second SOA replaces the first");
            }
        }
        _ => {
            return Err(UnknownStatementError {
                statement: token.text.trim().to_string(),
                scope: "zone".to_string(),
                line: token.line,
            }
            .into())
        }
    }
    Ok(())
}

/// Build a [Zone] from zone tokens.
pub fn construct(tokens: &[Token]) -> Result<Zone, IscError> {
    let mut zone = Zone::new();
    for token in tokens {
        apply(&mut zone, token)?;
    }
    debug!(records = zone.records.len(), has_soa = zone.soa.is_some(), "constructed zone");
    Ok(zone)
}
