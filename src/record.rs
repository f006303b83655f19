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

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DnsError;
use crate::rdata::{RecordData, unquote};

/// TTL applied when a record is added without one.
pub const DEFAULT_TTL: u32 = 1800;
/// Largest TTL a record may carry (2^31 - 1).
pub const MAX_TTL: u32 = 2_147_483_647;
/// Marker used for the zone apex in every user-facing name.
pub const APEX: &str = "@";

/// Resource record types this provider accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Loc,
    Srv,
    Spf,
    Txt,
    Ns,
    Caa,
    Ptr,
    Cert,
    Dnskey,
    Ds,
    Naptr,
    Smimea,
    Sshfp,
    Tlsa,
    Uri,
}

impl RecordType {
    pub const ALL: [RecordType; 19] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Loc,
        RecordType::Srv,
        RecordType::Spf,
        RecordType::Txt,
        RecordType::Ns,
        RecordType::Caa,
        RecordType::Ptr,
        RecordType::Cert,
        RecordType::Dnskey,
        RecordType::Ds,
        RecordType::Naptr,
        RecordType::Smimea,
        RecordType::Sshfp,
        RecordType::Tlsa,
        RecordType::Uri,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Loc => "LOC",
            RecordType::Srv => "SRV",
            RecordType::Spf => "SPF",
            RecordType::Txt => "TXT",
            RecordType::Ns => "NS",
            RecordType::Caa => "CAA",
            RecordType::Ptr => "PTR",
            RecordType::Cert => "CERT",
            RecordType::Dnskey => "DNSKEY",
            RecordType::Ds => "DS",
            RecordType::Naptr => "NAPTR",
            RecordType::Smimea => "SMIMEA",
            RecordType::Sshfp => "SSHFP",
            RecordType::Tlsa => "TLSA",
            RecordType::Uri => "URI",
        }
    }

    /// Only these types can sit behind Cloudflare's proxy.
    pub fn is_proxiable(&self) -> bool {
        matches!(self, RecordType::A | RecordType::Aaaa | RecordType::Cname)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = DnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        RecordType::ALL
            .into_iter()
            .find(|rr| rr.as_str() == upper)
            .ok_or_else(|| DnsError::validation(format!("unsupported record type `{s}'")))
    }
}

/// A canonical resource record.
///
/// Records are immutable once built: changes such as attaching the provider id produce a new
/// value, so a record held in a cache never aliases one still being sent to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    zone: String,
    name: String,
    rr: RecordType,
    parameter: String,
    ttl: Option<u32>,
    data: RecordData,
    id: Option<String>,
}

/// Cache identity of a record within its zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub name: String,
    pub rr: RecordType,
    pub parameter: String,
}

impl Record {
    pub fn builder(zone: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            zone: zone.into(),
            ..Default::default()
        }
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Name relative to the zone; the apex is always `@`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rr(&self) -> RecordType {
        self.rr
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn data(&self) -> &RecordData {
        &self.data
    }

    /// Provider-assigned identifier, once known.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Fully qualified name without the trailing dot.
    pub fn fqdn(&self) -> String {
        fqdn(&self.name, &self.zone)
    }

    pub fn with_id(self, id: impl Into<String>) -> Record {
        Record {
            id: Some(id.into()),
            ..self
        }
    }

    pub fn without_ttl(self) -> Record {
        Record { ttl: None, ..self }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            rr: self.rr,
            parameter: comparable_parameter(self.rr, &self.parameter).to_string(),
        }
    }

    /// Record identity: zone, name, type and parameter must agree, and the TTLs must too unless
    /// either side leaves it unspecified. TXT parameters are compared without surrounding quotes
    /// when the exact comparison fails, since the provider returns them either way.
    pub fn matches(&self, other: &Record) -> bool {
        if self.zone != other.zone || self.name != other.name || self.rr != other.rr {
            return false;
        }
        if let (Some(a), Some(b)) = (self.ttl, other.ttl) {
            if a != b {
                return false;
            }
        }
        if self.parameter == other.parameter {
            return true;
        }
        self.rr == RecordType::Txt && unquote(&self.parameter) == unquote(&other.parameter)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} `{}'", self.fqdn(), self.rr, self.parameter)
    }
}

/// Free-function form of [`Record::matches`].
pub fn matches(a: &Record, b: &Record) -> bool {
    a.matches(b)
}

/// Builds `name.zone`, or just `zone` at the apex.
pub fn fqdn(name: &str, zone: &str) -> String {
    if name.is_empty() || name == APEX {
        zone.to_string()
    } else {
        format!("{name}.{zone}")
    }
}

fn comparable_parameter(rr: RecordType, parameter: &str) -> &str {
    if rr == RecordType::Txt {
        unquote(parameter)
    } else {
        parameter
    }
}

/// Validating constructor for [`Record`].
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    zone: String,
    name: Option<String>,
    rr: Option<RecordType>,
    parameter: Option<String>,
    ttl: Option<u32>,
    id: Option<String>,
}

impl RecordBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn rr(mut self, rr: RecordType) -> Self {
        self.rr = Some(rr);
        self
    }

    pub fn parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    pub fn ttl(mut self, ttl: Option<u32>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Validates the fields and renders compound parameters in their canonical form.
    pub fn build(self) -> Result<Record, DnsError> {
        let zone = normalize_zone(&self.zone)?;
        let name = normalize_name(self.name.as_deref().unwrap_or(""), &zone)?;
        let rr = self
            .rr
            .ok_or_else(|| DnsError::validation("record type is required"))?;

        if let Some(ttl) = self.ttl {
            if !(1..=MAX_TTL).contains(&ttl) {
                return Err(DnsError::validation(format!(
                    "ttl out of range: {ttl} not within [1, {MAX_TTL}]"
                )));
            }
        }

        if rr == RecordType::Srv {
            srv_labels(&name)?;
        }

        let parameter = self.parameter.unwrap_or_default().trim().to_string();
        let data = RecordData::parse(rr, &parameter)?;
        let parameter = if data.is_plain() {
            parameter
        } else {
            data.to_string()
        };

        Ok(Record {
            zone,
            name,
            rr,
            parameter,
            ttl: self.ttl,
            data,
            id: self.id,
        })
    }
}

/// `_service._proto` labels that lead every SRV name.
pub(crate) fn srv_labels(name: &str) -> Result<(String, String), DnsError> {
    let mut labels = name.split('.');
    match (labels.next(), labels.next()) {
        (Some(service), Some(proto)) if service.starts_with('_') && proto.starts_with('_') => {
            Ok((service.to_string(), proto.to_string()))
        }
        _ => Err(DnsError::validation(format!(
            "SRV record name `{name}' must begin with _service._proto"
        ))),
    }
}

pub(crate) fn normalize_zone(zone: &str) -> Result<String, DnsError> {
    let zone = zone.trim().trim_end_matches('.').to_ascii_lowercase();
    if zone.is_empty() || zone.contains(char::is_whitespace) {
        return Err(DnsError::validation(format!("invalid zone `{zone}'")));
    }
    Ok(zone)
}

pub(crate) fn normalize_name(name: &str, zone: &str) -> Result<String, DnsError> {
    let name = name.trim().trim_end_matches('.');
    if name.contains(char::is_whitespace) {
        return Err(DnsError::validation(format!("invalid record name `{name}'")));
    }
    if name.is_empty() || name == APEX || name.eq_ignore_ascii_case(zone) {
        return Ok(APEX.to_string());
    }
    let suffix = format!(".{zone}");
    let relative = match name.len().checked_sub(suffix.len()) {
        Some(split) if name.get(split..).is_some_and(|tail| tail.eq_ignore_ascii_case(&suffix)) => {
            &name[..split]
        }
        _ => name,
    };
    Ok(relative.to_ascii_lowercase())
}
