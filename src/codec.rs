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

//! Translation between canonical records and Cloudflare's record payloads.
//!
//! - [`canonicalize`] turns a raw `(zone, name, rr, parameter, ttl)` tuple into a [`Record`].
//! - [`encode`] spreads a record into the fields a create/update call expects.
//! - [`decode`] rebuilds a record from a listed provider record.
//!
//! For every compound type `decode` is the inverse of `encode`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::DnsError;
use crate::rdata::{Association, Location, RecordData, unquote};
use crate::record::{APEX, DEFAULT_TTL, MAX_TTL, Record, RecordType, srv_labels};
use crate::utils::serde_utils::{is_null_or_none, null_as_default, option_is_empty};

/// Normalizes a loosely-typed record description.
///
/// - MX and CNAME parameters lose their trailing dot.
/// - TXT parameters are stored unquoted.
/// - A missing or zero TTL becomes [`DEFAULT_TTL`]; anything else must lie in `[1, 2^31-1]`.
pub fn canonicalize(
    zone: &str,
    name: &str,
    rr: &str,
    parameter: &str,
    ttl: Option<u32>,
) -> Result<Record, DnsError> {
    let rr: RecordType = rr.parse()?;
    let parameter = match rr {
        RecordType::Mx | RecordType::Cname => parameter.trim().trim_end_matches('.'),
        RecordType::Txt => unquote(parameter),
        _ => parameter.trim(),
    };
    let ttl = match ttl {
        None | Some(0) => DEFAULT_TTL,
        Some(ttl) if ttl <= MAX_TTL => ttl,
        Some(ttl) => {
            return Err(DnsError::validation(format!(
                "ttl out of range: {ttl} not within [1, {MAX_TTL}]"
            )));
        }
    };

    Record::builder(zone)
        .name(name)
        .rr(rr)
        .parameter(parameter)
        .ttl(Some(ttl))
        .build()
}

/// Payload of a record create or update call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireFields {
    #[serde(rename = "type")]
    pub rr: RecordType,
    pub name: String,
    pub content: String,
    #[serde(skip_serializing_if = "option_is_empty")]
    pub ttl: Option<u32>,
    pub proxied: bool,
    #[serde(skip_serializing_if = "option_is_empty")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "option_is_empty")]
    pub data: Option<WireData>,
}

impl WireFields {
    /// Lifts a priority held inside the structured data to the top level.
    pub fn with_data_priority(mut self) -> Self {
        if self.priority.is_none() {
            self.priority = self.data.as_ref().and_then(WireData::priority);
        }
        self
    }
}

/// Structured `data` object sent for compound types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireData {
    Srv(SrvData),
    Caa(CaaData),
    Cert(CertData),
    Dnskey(DnskeyData),
    Ds(DsData),
    Loc(LocData),
    Naptr(NaptrData),
    Smimea(AssociationData),
    Sshfp(SshfpData),
    Tlsa(AssociationData),
    Uri(UriData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrvData {
    /// Cloudflare lists SRV data without the name labels.
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub proto: String,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaaData {
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertData {
    pub certificate: String,
    #[serde(rename = "type")]
    pub cert_type: u16,
    pub key_tag: u16,
    pub algorithm: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnskeyData {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsData {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocData {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaptrData {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub service: String,
    pub regex: String,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationData {
    pub usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub certificate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshfpData {
    pub algorithm: u8,
    #[serde(rename = "type")]
    pub fp_type: u8,
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UriData {
    pub priority: u16,
    pub weight: u16,
    pub content: String,
}

impl WireData {
    /// Reads the provider's `data` object for a record of type `rr`.
    ///
    /// Returns `None` for types that carry no structured data (including MX, whose priority
    /// travels at the top level).
    pub fn from_value(rr: RecordType, value: Value) -> Result<Option<WireData>, DnsError> {
        let data = match rr {
            RecordType::Srv => WireData::Srv(serde_json::from_value(value)?),
            RecordType::Caa => WireData::Caa(serde_json::from_value(value)?),
            RecordType::Cert => WireData::Cert(serde_json::from_value(value)?),
            RecordType::Dnskey => WireData::Dnskey(serde_json::from_value(value)?),
            RecordType::Ds => WireData::Ds(serde_json::from_value(value)?),
            RecordType::Loc => WireData::Loc(serde_json::from_value(value)?),
            RecordType::Naptr => WireData::Naptr(serde_json::from_value(value)?),
            RecordType::Smimea => WireData::Smimea(serde_json::from_value(value)?),
            RecordType::Sshfp => WireData::Sshfp(serde_json::from_value(value)?),
            RecordType::Tlsa => WireData::Tlsa(serde_json::from_value(value)?),
            RecordType::Uri => WireData::Uri(serde_json::from_value(value)?),
            _ => return Ok(None),
        };
        Ok(Some(data))
    }

    pub fn priority(&self) -> Option<u16> {
        match self {
            WireData::Srv(srv) => Some(srv.priority),
            WireData::Uri(uri) => Some(uri.priority),
            _ => None,
        }
    }

    fn into_record_data(self) -> RecordData {
        match self {
            WireData::Srv(srv) => RecordData::Srv {
                priority: srv.priority,
                weight: srv.weight,
                port: srv.port,
                target: srv.target,
            },
            WireData::Caa(caa) => RecordData::Caa {
                flags: caa.flags,
                tag: caa.tag,
                value: caa.value,
            },
            WireData::Cert(cert) => RecordData::Cert {
                cert_type: cert.cert_type,
                key_tag: cert.key_tag,
                algorithm: cert.algorithm,
                certificate: cert.certificate,
            },
            WireData::Dnskey(key) => RecordData::Dnskey {
                flags: key.flags,
                protocol: key.protocol,
                algorithm: key.algorithm,
                public_key: key.public_key,
            },
            WireData::Ds(ds) => RecordData::Ds {
                key_tag: ds.key_tag,
                algorithm: ds.algorithm,
                digest_type: ds.digest_type,
                digest: ds.digest,
            },
            WireData::Loc(loc) => RecordData::Loc(Location {
                lat_degrees: loc.lat_degrees,
                lat_minutes: loc.lat_minutes,
                lat_seconds: loc.lat_seconds,
                lat_direction: loc.lat_direction,
                long_degrees: loc.long_degrees,
                long_minutes: loc.long_minutes,
                long_seconds: loc.long_seconds,
                long_direction: loc.long_direction,
                altitude: loc.altitude,
                size: loc.size,
                precision_horz: loc.precision_horz,
                precision_vert: loc.precision_vert,
            }),
            WireData::Naptr(naptr) => RecordData::Naptr {
                order: naptr.order,
                preference: naptr.preference,
                flags: naptr.flags,
                service: naptr.service,
                regex: naptr.regex,
                replacement: naptr.replacement,
            },
            WireData::Smimea(assoc) => RecordData::Smimea(assoc.into()),
            WireData::Sshfp(sshfp) => RecordData::Sshfp {
                algorithm: sshfp.algorithm,
                fp_type: sshfp.fp_type,
                fingerprint: sshfp.fingerprint,
            },
            WireData::Tlsa(assoc) => RecordData::Tlsa(assoc.into()),
            WireData::Uri(uri) => RecordData::Uri {
                priority: uri.priority,
                weight: uri.weight,
                target: uri.content,
            },
        }
    }
}

impl From<AssociationData> for Association {
    fn from(data: AssociationData) -> Self {
        Association {
            usage: data.usage,
            selector: data.selector,
            matching_type: data.matching_type,
            certificate: data.certificate,
        }
    }
}

impl From<&Association> for AssociationData {
    fn from(assoc: &Association) -> Self {
        AssociationData {
            usage: assoc.usage,
            selector: assoc.selector,
            matching_type: assoc.matching_type,
            certificate: assoc.certificate.clone(),
        }
    }
}

/// Spreads a record into create/update fields.
///
/// MX sends its exchange as `content` with a top-level priority, SRV sends its target, and the
/// remaining compound types send an empty `content` with everything in `data`. `proxied` is
/// left off; the engine decides it.
pub fn encode(record: &Record) -> Result<WireFields, DnsError> {
    let mut fields = WireFields {
        rr: record.rr(),
        name: record.name().to_string(),
        content: String::new(),
        ttl: record.ttl(),
        proxied: false,
        priority: None,
        data: None,
    };

    let data = match record.data() {
        RecordData::Plain => {
            fields.content = record.parameter().to_string();
            return Ok(fields);
        }
        RecordData::Mx { priority, exchange } => {
            fields.content = exchange.clone();
            fields.priority = Some(*priority);
            return Ok(fields);
        }
        RecordData::Srv {
            priority,
            weight,
            port,
            target,
        } => {
            let (service, proto) = srv_labels(record.name())?;
            fields.content = target.clone();
            WireData::Srv(SrvData {
                service,
                proto,
                priority: *priority,
                weight: *weight,
                port: *port,
                target: target.clone(),
            })
        }
        RecordData::Caa { flags, tag, value } => WireData::Caa(CaaData {
            flags: *flags,
            tag: tag.clone(),
            value: value.clone(),
        }),
        RecordData::Cert {
            cert_type,
            key_tag,
            algorithm,
            certificate,
        } => WireData::Cert(CertData {
            certificate: certificate.clone(),
            cert_type: *cert_type,
            key_tag: *key_tag,
            algorithm: *algorithm,
        }),
        RecordData::Dnskey {
            flags,
            protocol,
            algorithm,
            public_key,
        } => WireData::Dnskey(DnskeyData {
            flags: *flags,
            protocol: *protocol,
            algorithm: *algorithm,
            public_key: public_key.clone(),
        }),
        RecordData::Ds {
            key_tag,
            algorithm,
            digest_type,
            digest,
        } => WireData::Ds(DsData {
            key_tag: *key_tag,
            algorithm: *algorithm,
            digest_type: *digest_type,
            digest: digest.clone(),
        }),
        RecordData::Loc(loc) => WireData::Loc(LocData {
            lat_degrees: loc.lat_degrees,
            lat_minutes: loc.lat_minutes,
            lat_seconds: loc.lat_seconds,
            lat_direction: loc.lat_direction.clone(),
            long_degrees: loc.long_degrees,
            long_minutes: loc.long_minutes,
            long_seconds: loc.long_seconds,
            long_direction: loc.long_direction.clone(),
            altitude: loc.altitude,
            size: loc.size,
            precision_horz: loc.precision_horz,
            precision_vert: loc.precision_vert,
        }),
        RecordData::Naptr {
            order,
            preference,
            flags,
            service,
            regex,
            replacement,
        } => WireData::Naptr(NaptrData {
            order: *order,
            preference: *preference,
            flags: unquote(flags).to_string(),
            service: unquote(service).to_string(),
            regex: unquote(regex).to_string(),
            replacement: unquote(replacement).to_string(),
        }),
        RecordData::Smimea(assoc) => WireData::Smimea(assoc.into()),
        RecordData::Sshfp {
            algorithm,
            fp_type,
            fingerprint,
        } => WireData::Sshfp(SshfpData {
            algorithm: *algorithm,
            fp_type: *fp_type,
            fingerprint: fingerprint.clone(),
        }),
        RecordData::Tlsa(assoc) => WireData::Tlsa(assoc.into()),
        RecordData::Uri {
            priority,
            weight,
            target,
        } => WireData::Uri(UriData {
            priority: *priority,
            weight: *weight,
            content: unquote(target).to_string(),
        }),
    };

    fields.data = Some(data);
    Ok(fields)
}

fn default_wire_ttl() -> u32 {
    1
}

/// A record as listed by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "option_is_empty")]
    pub zone_id: Option<String>,
    #[serde(default, skip_serializing_if = "option_is_empty")]
    pub zone_name: Option<String>,
    /// Fully qualified name.
    pub name: String,
    #[serde(rename = "type")]
    pub rr: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default = "default_wire_ttl")]
    pub ttl: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proxied: bool,
    #[serde(default, skip_serializing_if = "option_is_empty")]
    pub priority: Option<u16>,
    #[serde(default, skip_serializing_if = "is_null_or_none")]
    pub data: Option<Value>,
}

/// Name of `wire` relative to `zone`, with the apex rendered as `@`.
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let fqdn = fqdn.trim_end_matches('.');
    let zone = zone.trim_end_matches('.');
    if fqdn.eq_ignore_ascii_case(zone) {
        return APEX.to_string();
    }
    let suffix = format!(".{zone}");
    match fqdn.len().checked_sub(suffix.len()) {
        Some(split) if fqdn.get(split..).is_some_and(|tail| tail.eq_ignore_ascii_case(&suffix)) => {
            fqdn[..split].to_string()
        }
        _ => fqdn.to_string(),
    }
}

/// Display parameter of a listed record.
///
/// Structured `data` wins when present and readable; otherwise MX, SRV and URI get their
/// priority put in front of `content`. Tabs become spaces.
pub fn wire_parameter(wire: &WireRecord) -> Result<String, DnsError> {
    let rr: RecordType = wire.rr.parse()?;
    let structured = match wire.data.clone() {
        Some(value) if !value.is_null() => match WireData::from_value(rr, value) {
            Ok(data) => data,
            Err(e) => {
                debug!(id = %wire.id, %rr, error = %e, "unreadable record data, using content");
                None
            }
        },
        _ => None,
    };
    let parameter = match (structured, rr, wire.priority) {
        (Some(data), _, _) => data.into_record_data().to_string(),
        (None, RecordType::Mx | RecordType::Srv | RecordType::Uri, Some(priority)) => {
            format!("{priority} {}", wire.content)
        }
        _ => wire.content.clone(),
    };
    Ok(parameter.replace('\t', " "))
}

/// Rebuilds the canonical record for a listed provider record, carrying its id.
pub fn decode(wire: &WireRecord, zone: &str) -> Result<Record, DnsError> {
    let rr: RecordType = wire.rr.parse()?;
    let parameter = wire_parameter(wire)?;
    let parameter = if rr == RecordType::Txt {
        unquote(&parameter).to_string()
    } else {
        parameter
    };

    Record::builder(zone)
        .name(relative_name(&wire.name, zone))
        .rr(rr)
        .parameter(parameter)
        .ttl(Some(wire.ttl).filter(|ttl| (1..=MAX_TTL).contains(ttl)))
        .id(wire.id.clone())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str, rr: RecordType, parameter: &str) -> Record {
        Record::builder("example.com")
            .name(name)
            .rr(rr)
            .parameter(parameter)
            .ttl(Some(3600))
            .build()
            .unwrap()
    }

    /// What the provider would list back after accepting `fields`.
    fn listed(fields: &WireFields, zone: &str, id: &str) -> WireRecord {
        WireRecord {
            id: id.to_string(),
            zone_id: Some("zone-1".into()),
            zone_name: Some(zone.to_string()),
            name: crate::record::fqdn(&fields.name, zone),
            rr: fields.rr.to_string(),
            content: fields.content.clone(),
            ttl: fields.ttl.unwrap_or(1),
            proxied: fields.proxied,
            priority: fields.priority,
            data: fields
                .data
                .as_ref()
                .map(|data| serde_json::to_value(data).unwrap()),
        }
    }

    #[test]
    fn canonicalize_substitutes_default_ttl() {
        let r = canonicalize("example.com", "www", "A", "203.0.113.5", Some(0)).unwrap();
        assert_eq!(r.ttl(), Some(DEFAULT_TTL));
        let r = canonicalize("example.com", "www", "A", "203.0.113.5", None).unwrap();
        assert_eq!(r.ttl(), Some(1800));
    }

    #[test]
    fn canonicalize_ttl_bounds() {
        assert!(canonicalize("example.com", "www", "A", "203.0.113.5", Some(1)).is_ok());
        assert!(canonicalize("example.com", "www", "A", "203.0.113.5", Some(MAX_TTL)).is_ok());
        let err = canonicalize("example.com", "www", "A", "203.0.113.5", Some(MAX_TTL + 1))
            .unwrap_err();
        assert!(matches!(err, DnsError::Validation(ref m) if m.contains("ttl out of range")));
    }

    #[test]
    fn canonicalize_rejects_unsupported_types() {
        let err = canonicalize("example.com", "www", "SOA", "x", None).unwrap_err();
        assert!(matches!(err, DnsError::Validation(ref m) if m.contains("unsupported record type")));
    }

    #[test]
    fn canonicalize_trims_dots_and_quotes() {
        let mx = canonicalize("example.com", "", "mx", "10 mail.example.com.", None).unwrap();
        assert_eq!(mx.parameter(), "10 mail.example.com");
        assert_eq!(mx.name(), "@");
        let cname = canonicalize("example.com", "www", "CNAME", "example.com.", None).unwrap();
        assert_eq!(cname.parameter(), "example.com");
        let txt = canonicalize("example.com", "@", "TXT", "\"v=spf1 -all\"", None).unwrap();
        assert_eq!(txt.parameter(), "v=spf1 -all");
        let again = canonicalize("example.com", "@", "TXT", txt.parameter(), None).unwrap();
        assert_eq!(again.parameter(), "v=spf1 -all");
    }

    #[test]
    fn plain_types_send_parameter_untouched() {
        let fields = encode(&record("www", RecordType::A, "203.0.113.5")).unwrap();
        assert_eq!(fields.content, "203.0.113.5");
        assert_eq!(fields.priority, None);
        assert_eq!(fields.data, None);
        let body = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            body,
            json!({"type": "A", "name": "www", "content": "203.0.113.5", "ttl": 3600, "proxied": false})
        );
    }

    #[test]
    fn mx_sends_exchange_and_priority() {
        let fields = encode(&record("@", RecordType::Mx, "10 mail.example.com")).unwrap();
        assert_eq!(fields.content, "mail.example.com");
        assert_eq!(fields.priority, Some(10));
        assert_eq!(fields.data, None);
    }

    #[test]
    fn srv_sends_target_and_labels() {
        let fields = encode(&record("_sip._tcp", RecordType::Srv, "10 60 5060 sip.example.com")).unwrap();
        assert_eq!(fields.content, "sip.example.com");
        assert_eq!(
            serde_json::to_value(fields.data.as_ref().unwrap()).unwrap(),
            json!({
                "service": "_sip", "proto": "_tcp", "priority": 10,
                "weight": 60, "port": 5060, "target": "sip.example.com"
            })
        );
        assert_eq!(fields.with_data_priority().priority, Some(10));
    }

    #[test]
    fn compound_payload_shapes() {
        let cases = [
            (
                record("@", RecordType::Caa, "0 issue \"letsencrypt.org\""),
                json!({"flags": 0, "tag": "issue", "value": "letsencrypt.org"}),
            ),
            (
                record("@", RecordType::Cert, "1 12345 8 MIIBCgKCAQEA"),
                json!({"certificate": "MIIBCgKCAQEA", "type": 1, "key_tag": 12345, "algorithm": 8}),
            ),
            (
                record("@", RecordType::Dnskey, "257 3 13 mdsswUyr3DPW132mOi8V9xESWE8jTo0d"),
                json!({"flags": 257, "protocol": 3, "algorithm": 13, "public_key": "mdsswUyr3DPW132mOi8V9xESWE8jTo0d"}),
            ),
            (
                record("@", RecordType::Ds, "2371 13 2 1F987CC6583E9286"),
                json!({"key_tag": 2371, "algorithm": 13, "digest_type": 2, "digest": "1F987CC6583E9286"}),
            ),
            (
                record("@", RecordType::Sshfp, "4 2 123456789abcdef"),
                json!({"algorithm": 4, "type": 2, "fingerprint": "123456789abcdef"}),
            ),
            (
                record("_443._tcp", RecordType::Tlsa, "3 1 1 0C72AC70B745AC19998811B131D662C9"),
                json!({"usage": 3, "selector": 1, "matching_type": 1, "certificate": "0C72AC70B745AC19998811B131D662C9"}),
            ),
            (
                record("_ftp._tcp", RecordType::Uri, "10 1 \"ftp://ftp1.example.com/public\""),
                json!({"priority": 10, "weight": 1, "content": "ftp://ftp1.example.com/public"}),
            ),
            (
                record("@", RecordType::Naptr, "100 10 \"U\" \"E2U+sip\" \"!^.*$!sip:info@example.com!\" ."),
                json!({
                    "order": 100, "preference": 10, "flags": "U", "service": "E2U+sip",
                    "regex": "!^.*$!sip:info@example.com!", "replacement": "."
                }),
            ),
            (
                record("@", RecordType::Loc, "52 22 23 N 4 53 32 E -2m 0m 10000m 10m"),
                json!({
                    "lat_degrees": 52, "lat_minutes": 22, "lat_seconds": 23, "lat_direction": "N",
                    "long_degrees": 4, "long_minutes": 53, "long_seconds": 32, "long_direction": "E",
                    "altitude": -2.0, "size": 0, "precision_horz": 10000.0, "precision_vert": 10.0
                }),
            ),
        ];

        for (record, expected) in cases {
            let fields = encode(&record).unwrap();
            assert_eq!(fields.content, "", "{} content should be cleared", record.rr());
            let data = serde_json::to_value(fields.data.as_ref().unwrap()).unwrap();
            assert_eq!(data, expected, "{} data", record.rr());
        }
    }

    #[test]
    fn decode_inverts_encode_for_compound_types() {
        let records = [
            record("@", RecordType::Mx, "10 mail.example.com"),
            record("_sip._tcp", RecordType::Srv, "10 60 5060 sip.example.com"),
            record("@", RecordType::Caa, "128 iodef \"mailto:ops@example.com\""),
            record("@", RecordType::Cert, "1 12345 8 MIIBCgKCAQEA"),
            record("@", RecordType::Dnskey, "257 3 13 mdsswUyr3DPW132mOi8V9xESWE8jTo0d"),
            record("@", RecordType::Ds, "2371 13 2 1F987CC6583E9286"),
            record("geo", RecordType::Loc, "52 22 23 N 4 53 32 E -2.5m 1m 10000m 10m"),
            record("@", RecordType::Naptr, "100 10 \"S\" \"SIP+D2U\" \"\" _sip._udp.example.com"),
            record("smime", RecordType::Smimea, "3 0 1 abcdef0123456789"),
            record("@", RecordType::Sshfp, "4 2 123456789abcdef"),
            record("_443._tcp", RecordType::Tlsa, "3 1 1 0C72AC70B745AC19"),
            record("_ftp._tcp", RecordType::Uri, "10 1 \"ftp://ftp1.example.com/public\""),
        ];

        for original in records {
            let wire = listed(&encode(&original).unwrap(), "example.com", "rec-1");
            let decoded = decode(&wire, "example.com").unwrap();
            assert_eq!(decoded, original.clone().with_id("rec-1"), "{}", original.rr());
        }
    }

    #[test]
    fn decode_falls_back_to_content_rules() {
        let wire: WireRecord = serde_json::from_value(json!({
            "id": "abc",
            "zone_name": "example.com",
            "name": "example.com",
            "type": "MX",
            "content": "mail.example.com",
            "priority": 5,
            "ttl": 300,
            "proxied": false
        }))
        .unwrap();
        let record = decode(&wire, "example.com").unwrap();
        assert_eq!(record.name(), "@");
        assert_eq!(record.parameter(), "5 mail.example.com");
        assert_eq!(record.ttl(), Some(300));
        assert_eq!(record.id(), Some("abc"));
    }

    #[test]
    fn decode_reads_srv_data_without_labels() {
        let wire: WireRecord = serde_json::from_value(json!({
            "id": "srv1",
            "name": "_sip._tcp.example.com",
            "type": "SRV",
            "content": "60 5060 sip.example.com",
            "priority": 10,
            "ttl": 300,
            "data": {"priority": 10, "weight": 60, "port": 5060, "target": "sip.example.com"}
        }))
        .unwrap();
        let record = decode(&wire, "example.com").unwrap();
        assert_eq!(record.name(), "_sip._tcp");
        assert_eq!(record.parameter(), "10 60 5060 sip.example.com");
    }

    #[test]
    fn decode_uses_content_when_data_is_unreadable() {
        let wire: WireRecord = serde_json::from_value(json!({
            "id": "srv2",
            "name": "_sip._tcp.example.com",
            "type": "SRV",
            "content": "60 5060 sip.example.com",
            "priority": 10,
            "ttl": 300,
            "data": {"weight": "heavy"}
        }))
        .unwrap();
        let record = decode(&wire, "example.com").unwrap();
        assert_eq!(record.parameter(), "10 60 5060 sip.example.com");
    }

    #[test]
    fn decode_normalizes_tabs_and_txt_quotes() {
        let wire: WireRecord = serde_json::from_value(json!({
            "id": "t1",
            "name": "www.example.com",
            "type": "TXT",
            "content": "\"hello\tworld\"",
            "ttl": 1,
            "data": null
        }))
        .unwrap();
        let record = decode(&wire, "example.com.").unwrap();
        assert_eq!(record.name(), "www");
        assert_eq!(record.parameter(), "hello world");
    }

    #[test]
    fn relative_name_strips_zone_suffix() {
        assert_eq!(relative_name("example.com.", "example.com"), "@");
        assert_eq!(relative_name("a.b.example.com", "example.com"), "a.b");
        assert_eq!(relative_name("otherexample.com", "example.com"), "otherexample.com");
    }
}
