// Copyright 2023 rust-dns-sdk authors
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Structured record data for the compound RR types.
//!
//! Each compound type has exactly one canonical textual form, produced by `Display` and accepted
//! (along with looser spellings) by [`RecordData::parse`].

use std::fmt;
use std::str::FromStr;

use crate::error::DnsError;
use crate::record::RecordType;

/// Type-specific fields of a record.
///
/// `Plain` covers the types whose `parameter` alone is authoritative
/// (A, AAAA, CNAME, NS, PTR, SPF, TXT).
#[derive(Debug, Clone, PartialEq)]
pub enum RecordData {
    Plain,
    Mx {
        priority: u16,
        exchange: String,
    },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    Caa {
        flags: u8,
        tag: String,
        value: String,
    },
    Cert {
        cert_type: u16,
        key_tag: u16,
        algorithm: u8,
        certificate: String,
    },
    Dnskey {
        flags: u16,
        protocol: u8,
        algorithm: u8,
        public_key: String,
    },
    Ds {
        key_tag: u16,
        algorithm: u8,
        digest_type: u8,
        digest: String,
    },
    Loc(Location),
    Naptr {
        order: u16,
        preference: u16,
        flags: String,
        service: String,
        regex: String,
        replacement: String,
    },
    Smimea(Association),
    Sshfp {
        algorithm: u8,
        fp_type: u8,
        fingerprint: String,
    },
    Tlsa(Association),
    Uri {
        priority: u16,
        weight: u16,
        target: String,
    },
}

/// Certificate association shared by TLSA and SMIMEA.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    pub usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub certificate: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub lat_degrees: u8,
    pub lat_minutes: u8,
    pub lat_seconds: u8,
    pub lat_direction: String,
    pub long_degrees: u8,
    pub long_minutes: u8,
    pub long_seconds: u8,
    pub long_direction: String,
    pub altitude: f64,
    pub size: u32,
    pub precision_horz: f64,
    pub precision_vert: f64,
}

impl RecordData {
    /// Parses `parameter` into the structured fields for `rr`.
    pub fn parse(rr: RecordType, parameter: &str) -> Result<RecordData, DnsError> {
        let mut fields = Fields::new(rr, parameter);
        let data = match rr {
            RecordType::Mx => RecordData::Mx {
                priority: fields.int("priority")?,
                exchange: fields.token("target")?,
            },
            RecordType::Srv => RecordData::Srv {
                priority: fields.int("priority")?,
                weight: fields.int("weight")?,
                port: fields.int("port")?,
                target: fields.token("target")?,
            },
            RecordType::Caa => RecordData::Caa {
                flags: fields.int("flags")?,
                tag: fields.token("tag")?,
                value: fields.remainder("value")?,
            },
            RecordType::Cert => RecordData::Cert {
                cert_type: fields.int("type")?,
                key_tag: fields.int("key tag")?,
                algorithm: fields.int("algorithm")?,
                certificate: fields.remainder("certificate")?,
            },
            RecordType::Dnskey => RecordData::Dnskey {
                flags: fields.int("flags")?,
                protocol: fields.int("protocol")?,
                algorithm: fields.int("algorithm")?,
                public_key: fields.remainder("public key")?,
            },
            RecordType::Ds => RecordData::Ds {
                key_tag: fields.int("key tag")?,
                algorithm: fields.int("algorithm")?,
                digest_type: fields.int("digest type")?,
                digest: fields.remainder("digest")?,
            },
            RecordType::Loc => RecordData::Loc(Location {
                lat_degrees: fields.int("latitude degrees")?,
                lat_minutes: fields.int("latitude minutes")?,
                lat_seconds: fields.int("latitude seconds")?,
                lat_direction: fields.direction("latitude direction", ["N", "S"])?,
                long_degrees: fields.int("longitude degrees")?,
                long_minutes: fields.int("longitude minutes")?,
                long_seconds: fields.int("longitude seconds")?,
                long_direction: fields.direction("longitude direction", ["E", "W"])?,
                altitude: fields.meters("altitude")?,
                size: fields.meters("size")?,
                precision_horz: fields.meters("horizontal precision")?,
                precision_vert: fields.meters("vertical precision")?,
            }),
            RecordType::Naptr => RecordData::Naptr {
                order: fields.int("order")?,
                preference: fields.int("preference")?,
                flags: fields.token("flags")?,
                service: fields.token("service")?,
                regex: fields.token("regex")?,
                replacement: fields.token("replacement")?,
            },
            RecordType::Smimea => RecordData::Smimea(fields.association()?),
            RecordType::Tlsa => RecordData::Tlsa(fields.association()?),
            RecordType::Sshfp => RecordData::Sshfp {
                algorithm: fields.int("algorithm")?,
                fp_type: fields.int("fingerprint type")?,
                fingerprint: fields.remainder("fingerprint")?,
            },
            RecordType::Uri => RecordData::Uri {
                priority: fields.int("priority")?,
                weight: fields.int("weight")?,
                target: fields.remainder("target")?,
            },
            _ => return Ok(RecordData::Plain),
        };
        fields.finish()?;
        Ok(data)
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, RecordData::Plain)
    }

    /// Priority carried by the record data, if the type has one.
    pub fn priority(&self) -> Option<u16> {
        match self {
            RecordData::Mx { priority, .. }
            | RecordData::Srv { priority, .. }
            | RecordData::Uri { priority, .. } => Some(*priority),
            _ => None,
        }
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::Plain => Ok(()),
            RecordData::Mx { priority, exchange } => write!(f, "{priority} {exchange}"),
            RecordData::Srv {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{priority} {weight} {port} {target}"),
            RecordData::Caa { flags, tag, value } => write!(f, "{flags} {tag} \"{value}\""),
            RecordData::Cert {
                cert_type,
                key_tag,
                algorithm,
                certificate,
            } => write!(f, "{cert_type} {key_tag} {algorithm} {certificate}"),
            RecordData::Dnskey {
                flags,
                protocol,
                algorithm,
                public_key,
            } => write!(f, "{flags} {protocol} {algorithm} {public_key}"),
            RecordData::Ds {
                key_tag,
                algorithm,
                digest_type,
                digest,
            } => write!(f, "{key_tag} {algorithm} {digest_type} {digest}"),
            RecordData::Loc(loc) => write!(
                f,
                "{} {} {} {} {} {} {} {} {}m {}m {}m {}m",
                loc.lat_degrees,
                loc.lat_minutes,
                loc.lat_seconds,
                loc.lat_direction,
                loc.long_degrees,
                loc.long_minutes,
                loc.long_seconds,
                loc.long_direction,
                loc.altitude,
                loc.size,
                loc.precision_horz,
                loc.precision_vert
            ),
            RecordData::Naptr {
                order,
                preference,
                flags,
                service,
                regex,
                replacement,
            } => write!(
                f,
                "{order} {preference} \"{flags}\" \"{service}\" \"{regex}\" {replacement}"
            ),
            RecordData::Smimea(assoc) | RecordData::Tlsa(assoc) => write!(
                f,
                "{} {} {} {}",
                assoc.usage, assoc.selector, assoc.matching_type, assoc.certificate
            ),
            RecordData::Sshfp {
                algorithm,
                fp_type,
                fingerprint,
            } => write!(f, "{algorithm} {fp_type} {fingerprint}"),
            RecordData::Uri {
                priority,
                weight,
                target,
            } => write!(f, "{priority} {weight} \"{target}\""),
        }
    }
}

/// Strips one or more layers of surrounding double quotes and whitespace.
pub(crate) fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"').trim()
}

/// Cursor over the whitespace separated fields of a parameter.
struct Fields<'a> {
    rr: RecordType,
    raw: &'a str,
    rest: &'a str,
}

impl<'a> Fields<'a> {
    fn new(rr: RecordType, raw: &'a str) -> Self {
        Self {
            rr,
            raw,
            rest: raw.trim(),
        }
    }

    fn malformed(&self, field: &str) -> DnsError {
        DnsError::validation(format!(
            "malformed {} record `{}': bad or missing {}",
            self.rr, self.raw, field
        ))
    }

    /// Next field; a double-quoted field may contain whitespace and is returned unquoted.
    fn token(&mut self, field: &str) -> Result<String, DnsError> {
        let rest = self.rest;
        if rest.is_empty() {
            return Err(self.malformed(field));
        }
        let (token, tail) = match rest.strip_prefix('"') {
            Some(quoted) => {
                let end = quoted.find('"').ok_or_else(|| self.malformed(field))?;
                (&quoted[..end], &quoted[end + 1..])
            }
            None => {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                (&rest[..end], &rest[end..])
            }
        };
        self.rest = tail.trim_start();
        Ok(token.trim().to_string())
    }

    fn int<T: FromStr>(&mut self, field: &str) -> Result<T, DnsError> {
        let token = self.token(field)?;
        token.parse().map_err(|_| self.malformed(field))
    }

    fn meters<T: FromStr>(&mut self, field: &str) -> Result<T, DnsError> {
        let token = self.token(field)?;
        token
            .strip_suffix('m')
            .unwrap_or(token.as_str())
            .parse()
            .map_err(|_| self.malformed(field))
    }

    fn direction(&mut self, field: &str, allowed: [&str; 2]) -> Result<String, DnsError> {
        let token = self.token(field)?.to_ascii_uppercase();
        if allowed.contains(&token.as_str()) {
            Ok(token)
        } else {
            Err(self.malformed(field))
        }
    }

    /// Everything left, unquoted. Consumes the cursor's remaining input.
    fn remainder(&mut self, field: &str) -> Result<String, DnsError> {
        let value = unquote(self.rest);
        if value.is_empty() {
            return Err(self.malformed(field));
        }
        self.rest = "";
        Ok(value.to_string())
    }

    fn association(&mut self) -> Result<Association, DnsError> {
        Ok(Association {
            usage: self.int("usage")?,
            selector: self.int("selector")?,
            matching_type: self.int("matching type")?,
            certificate: self.remainder("certificate")?,
        })
    }

    fn finish(self) -> Result<(), DnsError> {
        if self.rest.is_empty() {
            Ok(())
        } else {
            Err(DnsError::validation(format!(
                "malformed {} record `{}': unexpected trailing data `{}'",
                self.rr, self.raw, self.rest
            )))
        }
    }
}
