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

use async_trait::async_trait;
use dns_sync_macros::extract_params;
use tracing::debug;

use crate::codec::canonicalize;
use crate::error::DnsError;
use crate::record::Record;

/// Operations a hosting platform drives against a DNS provider.
///
/// Every method takes `&mut self`: an adapter owns its caches and runs one operation at a time.
#[async_trait]
pub trait DnsProviderAdapter: Send {
    fn provider_name(&self) -> &'static str;

    /// Adds a record and returns it in canonical form with its provider id.
    async fn add_record(
        &mut self,
        zone: &str,
        name: &str,
        rr: &str,
        parameter: &str,
        ttl: Option<u32>,
    ) -> Result<Record, DnsError>;

    async fn remove_record(
        &mut self,
        zone: &str,
        name: &str,
        rr: &str,
        parameter: &str,
    ) -> Result<(), DnsError>;

    /// Replaces `old` with `new`. Fields left unset on `new` keep `old`'s values, except the
    /// TTL, which falls back to the provider default.
    async fn update_record(
        &mut self,
        zone: &str,
        old: &RecordOperationBuilder,
        new: &RecordOperationBuilder,
    ) -> Result<Record, DnsError>;

    /// Provider id of a record. With `rr` set to `ANY` the parameter is ignored and the id of
    /// any record under `name` is returned.
    async fn record_id(
        &mut self,
        zone: &str,
        name: &str,
        rr: &str,
        parameter: &str,
    ) -> Result<Option<String>, DnsError>;

    async fn add_zone(&mut self, domain: &str) -> Result<(), DnsError>;

    async fn remove_zone(&mut self, domain: &str) -> Result<(), DnsError>;

    /// Zone-file text of `domain`, preceded by an SOA line built from `soa` and one NS line per
    /// nameserver. `None` when no nameservers are known.
    async fn zone_axfr(
        &mut self,
        domain: &str,
        soa: &str,
        nameservers: &[String],
    ) -> Result<Option<String>, DnsError>;

    async fn get_hosting_nameservers(&mut self, domain: &str) -> Result<Vec<String>, DnsError>;
}

/// Configures and constructs a provider adapter from string parameters.
pub trait DnsProviderBuilder: Sized {
    type Output: DnsProviderAdapter;

    /// Sets one configuration parameter. Unknown keys are rejected.
    fn set_param(self, key: &str, value: &str) -> Result<Self, DnsError>;

    fn build(self) -> Result<Self::Output, DnsError>;
}

/// Loosely-typed record description, as a host hands it over.
///
/// Every field is optional so the same type can describe a complete record or a partial
/// update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordOperationBuilder {
    pub subdomain: Option<String>,
    pub record_type: Option<String>,
    pub value: Option<String>,
    pub ttl: Option<u32>,
}

impl RecordOperationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = Some(subdomain.into());
        self
    }

    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Canonical record in `zone`. Type and value are required, a missing subdomain means the
    /// apex.
    pub fn canonicalize(&self, zone: &str) -> Result<Record, DnsError> {
        let params = extract_params!(self, RecordParams, {
            required record_type: String => "rr",
            required value: String => "parameter",
            optional subdomain: String = "" => "name",
            optional ttl: u32 = 0u32 => "ttl"
        });
        debug!(zone, ?params, "canonicalizing record");

        canonicalize(
            zone,
            &params.subdomain,
            &params.record_type,
            &params.value,
            Some(params.ttl),
        )
    }

    /// `self` laid over `base`: each field unset here takes `base`'s value, apart from the TTL,
    /// which stays unset.
    pub fn merged_over(&self, base: &Record) -> RecordOperationBuilder {
        RecordOperationBuilder {
            subdomain: self
                .subdomain
                .clone()
                .or_else(|| Some(base.name().to_string())),
            record_type: self
                .record_type
                .clone()
                .or_else(|| Some(base.rr().to_string())),
            value: self
                .value
                .clone()
                .or_else(|| Some(base.parameter().to_string())),
            ttl: self.ttl,
        }
    }
}

impl From<&Record> for RecordOperationBuilder {
    fn from(record: &Record) -> Self {
        RecordOperationBuilder {
            subdomain: Some(record.name().to_string()),
            record_type: Some(record.rr().to_string()),
            value: Some(record.parameter().to_string()),
            ttl: record.ttl(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DEFAULT_TTL, RecordType};

    #[test]
    fn canonicalize_requires_type_and_value() {
        let err = RecordOperationBuilder::new()
            .value("192.0.2.1")
            .canonicalize("example.com")
            .unwrap_err();
        assert_eq!(err, DnsError::Validation("rr is required".into()));

        let err = RecordOperationBuilder::new()
            .record_type("A")
            .canonicalize("example.com")
            .unwrap_err();
        assert_eq!(err, DnsError::Validation("parameter is required".into()));
    }

    #[test]
    fn canonicalize_defaults_name_and_ttl() {
        let record = RecordOperationBuilder::new()
            .record_type("cname")
            .value("target.example.net.")
            .canonicalize("example.com")
            .unwrap();
        assert_eq!(record.name(), "@");
        assert_eq!(record.rr(), RecordType::Cname);
        assert_eq!(record.parameter(), "target.example.net");
        assert_eq!(record.ttl(), Some(DEFAULT_TTL));
    }

    #[test]
    fn merge_inherits_everything_but_ttl() {
        let old = RecordOperationBuilder::new()
            .subdomain("www")
            .record_type("A")
            .value("203.0.113.5")
            .ttl(1800)
            .canonicalize("example.com")
            .unwrap();
        let merged = RecordOperationBuilder::new()
            .value("203.0.113.6")
            .merged_over(&old);
        assert_eq!(
            merged,
            RecordOperationBuilder {
                subdomain: Some("www".into()),
                record_type: Some("A".into()),
                value: Some("203.0.113.6".into()),
                ttl: None,
            }
        );
        assert_eq!(RecordOperationBuilder::from(&old).ttl, Some(1800));
    }
}
