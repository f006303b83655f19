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
use tracing::{debug, info, warn};

use crate::cache::{ZoneMetaCache, ZoneRecordCache};
use crate::client::{DnsProviderAdapter, DnsProviderBuilder, RecordOperationBuilder};
use crate::codec::{WireFields, canonicalize, decode, encode};
use crate::error::DnsError;
use crate::providers::api::{CloudflareApi, DEFAULT_API, HttpCloudflareApi, ZONE_EXISTS_CODE};
use crate::providers::utils::Credentials;
use crate::record::{Record, normalize_name, normalize_zone};
use crate::utils::request::{DefaultDnsClient, DnsHttpClient, TryDefault};
use crate::zonefile::ZoneFile;

/// Record type accepted by [`DnsProviderAdapter::record_id`] to match any type.
pub const ANY: &str = "ANY";

/// Builder for creating CloudFlare DNS client instances.
pub struct CloudFlareDnsBuilder<T: DnsHttpClient + TryDefault = DefaultDnsClient> {
    key: Option<String>,
    email: Option<String>,
    proxy: Option<bool>,
    jump_start: Option<bool>,
    api: Option<String>,
    _marker: std::marker::PhantomData<T>,
}

impl<T: DnsHttpClient + TryDefault> Default for CloudFlareDnsBuilder<T> {
    fn default() -> Self {
        Self {
            key: None,
            email: None,
            proxy: None,
            jump_start: None,
            api: None,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: DnsHttpClient + TryDefault + 'static> DnsProviderBuilder for CloudFlareDnsBuilder<T> {
    type Output = CloudFlareDns<HttpCloudflareApi<T>>;

    /// Sets configuration parameters for the DNS provider builder.
    ///
    /// Supported keys:
    /// - "key": API token, or global API key when paired with "email"
    /// - "email"
    /// - "proxy": proxy A/AAAA/CNAME records through Cloudflare
    /// - "jump_start": import existing records when adding a zone
    /// - "api": endpoint override
    fn set_param(mut self, key: &str, value: &str) -> Result<Self, DnsError> {
        match key {
            "key" => self.key = Some(value.into()),
            "email" => self.email = Some(value.into()),
            "proxy" => self.proxy = Some(parse_flag(key, value)?),
            "jump_start" => self.jump_start = Some(parse_flag(key, value)?),
            "api" => self.api = Some(value.into()),
            _ => return Err(DnsError::validation(format!("invalid parameter: {key}"))),
        }
        Ok(self)
    }

    /// Constructs a new CloudFlare client instance using configured parameters.
    fn build(self) -> Result<Self::Output, DnsError> {
        let params = extract_params!(self, ClientParams, {
            required key: String => "key",
            optional email: String = "" => "email",
            optional proxy: bool = false => "proxy",
            optional jump_start: bool = true => "jump_start",
            optional api: String = DEFAULT_API => "api"
        });

        let credentials = Credentials::new(Some(&params.email), &params.key);
        debug!(?credentials, api = %params.api, "building cloudflare client");
        let api = HttpCloudflareApi::new(T::try_default()?, params.api, &credentials)?;

        Ok(CloudFlareDns::new(api)
            .proxied(params.proxy)
            .jump_start(params.jump_start))
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, DnsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(DnsError::validation(format!(
            "invalid value `{value}' for {key}, expected a boolean"
        ))),
    }
}

/// Keeps a hosting platform's records in step with a Cloudflare account.
///
/// Zone metadata and records are cached per engine; one engine serves one set of credentials.
pub struct CloudFlareDns<A: CloudflareApi> {
    api: A,
    meta: ZoneMetaCache,
    records: ZoneRecordCache,
    /// Proxy flag sent when creating or updating proxiable records
    proxied: bool,
    /// Whether new zones import their existing records
    jump_start: bool,
}

impl<A: CloudflareApi> CloudFlareDns<A> {
    pub fn new(api: A) -> Self {
        Self::with_caches(api, ZoneMetaCache::new(), ZoneRecordCache::new())
    }

    /// Engine seeded with existing caches.
    pub fn with_caches(api: A, meta: ZoneMetaCache, records: ZoneRecordCache) -> Self {
        CloudFlareDns {
            api,
            meta,
            records,
            proxied: false,
            jump_start: true,
        }
    }

    pub fn proxied(mut self, proxied: bool) -> Self {
        self.proxied = proxied;
        self
    }

    pub fn jump_start(mut self, jump_start: bool) -> Self {
        self.jump_start = jump_start;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn meta_cache(&self) -> &ZoneMetaCache {
        &self.meta
    }

    pub fn record_cache(&self) -> &ZoneRecordCache {
        &self.records
    }

    async fn require_zone_id(&mut self, domain: &str) -> Result<String, DnsError> {
        self.meta
            .zone_id(&self.api, domain)
            .await?
            .ok_or_else(|| DnsError::not_found(format!("zone `{domain}' not properly provisioned")))
    }

    fn wire_fields(&self, record: &Record) -> Result<WireFields, DnsError> {
        let mut fields = encode(record)?.with_data_priority();
        fields.proxied = self.proxied && record.rr().is_proxiable();
        Ok(fields)
    }

    /// Provider id of the cached record with `record`'s identity.
    ///
    /// A miss loads the zone's full record listing once; later misses are answered from the
    /// cache.
    pub async fn get_record_id(&mut self, record: &Record) -> Result<Option<String>, DnsError> {
        let key = record.key();
        if let Some(cached) = self.records.get(record.zone(), &key) {
            return Ok(cached.id().map(str::to_string));
        }
        if self.records.is_populated(record.zone()) {
            return Ok(None);
        }

        let zone_id = self.require_zone_id(record.zone()).await?;
        self.records
            .populate(&self.api, record.zone(), &zone_id)
            .await?;
        Ok(self
            .records
            .get(record.zone(), &key)
            .and_then(|cached| cached.id().map(str::to_string)))
    }

    /// Id of the first cached record named `name`, of any type.
    ///
    /// Cloudflare cannot query by "any type", so this loads the zone's records and takes the
    /// first one cached under that name.
    pub async fn resolve_any(&mut self, zone: &str, name: &str) -> Result<Option<String>, DnsError> {
        let zone = normalize_zone(zone)?;
        let name = normalize_name(name, &zone)?;
        if !self.records.is_populated(&zone) {
            let zone_id = self.require_zone_id(&zone).await?;
            self.records.populate(&self.api, &zone, &zone_id).await?;
        }
        let id = self
            .records
            .first_named(&zone, &name)
            .and_then(|record| record.id().map(str::to_string));
        debug!(zone = %zone, name = %name, ?id, "resolved ANY record");
        Ok(id)
    }
}

#[async_trait]
impl<A: CloudflareApi> DnsProviderAdapter for CloudFlareDns<A> {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    /// Canonicalizes, creates and caches a DNS record.
    async fn add_record(
        &mut self,
        zone: &str,
        name: &str,
        rr: &str,
        parameter: &str,
        ttl: Option<u32>,
    ) -> Result<Record, DnsError> {
        let record = canonicalize(zone, name, rr, parameter, ttl)?;
        let fields = self.wire_fields(&record)?;
        let zone_id = self.require_zone_id(record.zone()).await?;

        debug!(zone = record.zone(), name = record.name(), rr = %record.rr(), "creating record");
        let id = self
            .api
            .add_record(&zone_id, &fields)
            .await
            .map_err(|e| {
                warn!(record = %record, error = %e, "failed to create record");
                e.context(format!(
                    "failed to create record `{}' type {}",
                    record.fqdn(),
                    record.rr()
                ))
            })?;

        let record = record.with_id(id);
        self.records.insert(record.clone());
        Ok(record)
    }

    /// Deletes the record with the given identity, whatever its TTL.
    async fn remove_record(
        &mut self,
        zone: &str,
        name: &str,
        rr: &str,
        parameter: &str,
    ) -> Result<(), DnsError> {
        let lookup = canonicalize(zone, name, rr, parameter, None)?.without_ttl();
        let Some(id) = self.get_record_id(&lookup).await? else {
            return Err(DnsError::not_found(format!(
                "record `{}' (rr: `{}', param: `{}') does not exist",
                lookup.fqdn(),
                lookup.rr(),
                lookup.parameter()
            )));
        };
        let zone_id = self.require_zone_id(lookup.zone()).await?;

        debug!(zone = lookup.zone(), name = lookup.name(), rr = %lookup.rr(), id = %id, "deleting record");
        self.api
            .delete_record(&zone_id, &id)
            .await
            .map_err(|e| {
                warn!(record = %lookup, error = %e, "failed to delete record");
                e.context(format!(
                    "failed to delete record `{}' type {}",
                    lookup.fqdn(),
                    lookup.rr()
                ))
            })?;

        self.records.evict(lookup.zone(), &lookup.key());
        Ok(())
    }

    /// Replaces `old` with `new` laid over it and swaps the cache entry.
    async fn update_record(
        &mut self,
        zone: &str,
        old: &RecordOperationBuilder,
        new: &RecordOperationBuilder,
    ) -> Result<Record, DnsError> {
        let old = old.canonicalize(zone)?;
        let merged = new.merged_over(&old).canonicalize(zone)?;
        let merged = if new.ttl.is_none() {
            merged.without_ttl()
        } else {
            merged
        };
        let fields = self.wire_fields(&merged)?;

        let Some(old_id) = self.get_record_id(&old).await? else {
            return Err(DnsError::not_found(format!(
                "failed to find record ID in zone `{}' - does `{}' (rr: `{}', parameter: `{}') exist?",
                old.zone(),
                old.name(),
                old.rr(),
                old.parameter()
            )));
        };
        let zone_id = self.require_zone_id(old.zone()).await?;

        debug!(zone = old.zone(), from = %old, to = %merged, id = %old_id, "updating record");
        let id = self
            .api
            .update_record(&zone_id, &old_id, &fields)
            .await
            .map_err(|e| {
                warn!(from = %old, to = %merged, error = %e, "failed to update record");
                e.context(format!(
                    "failed to update record `{}' on zone `{}' (old - name: `{}', rr: `{}', param: `{}'; new - name: `{}', rr: `{}', param: `{}')",
                    old.name(),
                    old.zone(),
                    old.name(),
                    old.rr(),
                    old.parameter(),
                    merged.name(),
                    merged.rr(),
                    merged.parameter()
                ))
            })?;

        self.records.evict(old.zone(), &old.key());
        let merged = merged.with_id(id);
        self.records.insert(merged.clone());
        Ok(merged)
    }

    async fn record_id(
        &mut self,
        zone: &str,
        name: &str,
        rr: &str,
        parameter: &str,
    ) -> Result<Option<String>, DnsError> {
        if rr.trim().eq_ignore_ascii_case(ANY) {
            return self.resolve_any(zone, name).await;
        }
        let lookup = canonicalize(zone, name, rr, parameter, None)?;
        self.get_record_id(&lookup).await
    }

    /// Adds a zone to the account. A zone that is already there counts as added.
    async fn add_zone(&mut self, domain: &str) -> Result<(), DnsError> {
        let domain = normalize_zone(domain)?;
        match self.api.add_zone(&domain, self.jump_start).await {
            Ok(zone) => {
                info!(domain = %domain, id = %zone.id, "zone added");
                self.meta.merge(zone);
                Ok(())
            }
            Err(e) if e.code() == Some(ZONE_EXISTS_CODE) => {
                info!(domain = %domain, "zone present in Cloudflare - not overwriting");
                Ok(())
            }
            Err(e) => {
                warn!(domain = %domain, error = %e, "failed to add zone");
                Err(e.context(format!("failed to add zone `{domain}'")))
            }
        }
    }

    async fn remove_zone(&mut self, domain: &str) -> Result<(), DnsError> {
        let domain = normalize_zone(domain)?;
        let zone_id = self.require_zone_id(&domain).await?;
        self.api.delete_zone(&zone_id).await.map_err(|e| {
            warn!(domain = %domain, error = %e, "failed to remove zone");
            e.context(format!("failed to remove zone `{domain}'"))
        })?;

        info!(domain = %domain, id = %zone_id, "zone removed");
        self.meta.evict(&domain);
        self.records.evict_zone(&domain);
        Ok(())
    }

    /// Rebuilds the zone from a full record listing and refreshes the record cache with it.
    async fn zone_axfr(
        &mut self,
        domain: &str,
        soa: &str,
        nameservers: &[String],
    ) -> Result<Option<String>, DnsError> {
        let domain = normalize_zone(domain)?;
        if nameservers.is_empty() {
            debug!(domain = %domain, "no nameservers known, skipping zone transfer");
            return Ok(None);
        }
        let zone_id = self.require_zone_id(&domain).await?;

        let listed = self
            .records
            .populate(&self.api, &domain, &zone_id)
            .await
            .map_err(|e| {
                warn!(domain = %domain, error = %e, "failed to transfer DNS records - try again later");
                e.context(format!("failed to transfer zone `{domain}'"))
            })?;

        let mut zone = ZoneFile::with_preamble(&domain, soa, nameservers);
        for wire in &listed {
            match decode(wire, &domain) {
                Ok(record) => zone.push_record(&record, wire.ttl),
                Err(_) => zone.push(&wire.name, wire.ttl, &wire.rr, &wire.content.replace('\t', " ")),
            }
        }
        debug!(domain = %domain, records = listed.len(), "zone transferred");
        Ok(Some(zone.to_string()))
    }

    /// Nameservers Cloudflare assigned to `domain`, empty when the zone is unknown.
    async fn get_hosting_nameservers(&mut self, domain: &str) -> Result<Vec<String>, DnsError> {
        if domain.trim().is_empty() {
            return Err(DnsError::validation(
                "Cloudflare DNS provider requires the domain parameter",
            ));
        }
        self.meta.name_servers(&self.api, domain).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::WireRecord;
    use crate::providers::api::{Page, RecordFilter, ResultInfo, ZoneAttrs};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// One zone, no records, every write accepted.
    #[derive(Default)]
    struct StubApi {
        created: Mutex<Vec<WireFields>>,
        reject_with: Option<DnsError>,
    }

    impl CloudflareApi for StubApi {
        async fn list_zones(&self, page: u32, _per_page: u32) -> Result<Page<ZoneAttrs>, DnsError> {
            Ok(Page {
                result: vec![ZoneAttrs {
                    id: "z1".into(),
                    name: "example.com".into(),
                    name_servers: vec!["ana.ns.cloudflare.com".into()],
                    status: Some("active".into()),
                    extra: HashMap::new(),
                }],
                paging: ResultInfo {
                    page,
                    total_pages: 1,
                    ..Default::default()
                },
            })
        }

        async fn add_zone(&self, _name: &str, _jump_start: bool) -> Result<ZoneAttrs, DnsError> {
            Err(self.reject_with.clone().unwrap_or(DnsError::Transport("down".into())))
        }

        async fn delete_zone(&self, _zone_id: &str) -> Result<(), DnsError> {
            Ok(())
        }

        async fn list_records(
            &self,
            _zone_id: &str,
            _filter: &RecordFilter,
            page: u32,
            _per_page: u32,
        ) -> Result<Page<WireRecord>, DnsError> {
            Ok(Page {
                result: vec![],
                paging: ResultInfo {
                    page,
                    total_pages: 1,
                    ..Default::default()
                },
            })
        }

        async fn add_record(&self, _zone_id: &str, fields: &WireFields) -> Result<String, DnsError> {
            if let Some(e) = &self.reject_with {
                return Err(e.clone());
            }
            self.created.lock().unwrap().push(fields.clone());
            Ok("rec-1".into())
        }

        async fn update_record(
            &self,
            _zone_id: &str,
            record_id: &str,
            _fields: &WireFields,
        ) -> Result<String, DnsError> {
            Ok(record_id.to_string())
        }

        async fn delete_record(&self, _zone_id: &str, _record_id: &str) -> Result<(), DnsError> {
            Ok(())
        }
    }

    #[test]
    fn builder_rejects_unknown_keys_and_bad_flags() {
        let builder = CloudFlareDnsBuilder::<DefaultDnsClient>::default();
        assert!(matches!(
            builder.set_param("secret_id", "x"),
            Err(DnsError::Validation(_))
        ));
        let builder = CloudFlareDnsBuilder::<DefaultDnsClient>::default();
        assert!(matches!(
            builder.set_param("proxy", "maybe"),
            Err(DnsError::Validation(_))
        ));
    }

    #[test]
    fn builder_requires_key() {
        let err = CloudFlareDnsBuilder::<DefaultDnsClient>::default()
            .set_param("email", "ops@example.com")
            .unwrap()
            .build()
            .err()
            .unwrap();
        assert_eq!(err, DnsError::Validation("key is required".into()));
    }

    #[test]
    fn builder_applies_flags() {
        let dns = CloudFlareDnsBuilder::<DefaultDnsClient>::default()
            .set_param("key", "token")
            .unwrap()
            .set_param("proxy", "true")
            .unwrap()
            .set_param("jump_start", "no")
            .unwrap()
            .build()
            .unwrap();
        assert!(dns.proxied);
        assert!(!dns.jump_start);
        assert_eq!(dns.provider_name(), "cloudflare");
    }

    #[tokio::test]
    async fn proxy_flag_only_applies_to_proxiable_types() {
        let mut dns = CloudFlareDns::new(StubApi::default()).proxied(true);
        dns.add_record("example.com", "www", "A", "192.0.2.1", None)
            .await
            .unwrap();
        dns.add_record("example.com", "@", "TXT", "\"hello\"", None)
            .await
            .unwrap();
        let created = dns.api().created.lock().unwrap();
        assert!(created[0].proxied);
        assert!(!created[1].proxied);
        assert_eq!(created[1].content, "hello");
    }

    #[tokio::test]
    async fn create_rejections_name_the_record() {
        let api = StubApi {
            reject_with: Some(DnsError::ProviderRejection {
                message: "Content for A record is invalid.".into(),
                code: Some(9005),
            }),
            ..Default::default()
        };
        let mut dns = CloudFlareDns::new(api);
        let err = dns
            .add_record("example.com", "www", "A", "192.0.2.1", None)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to create record `www.example.com' type A: Content for A record is invalid."
        );
        assert_eq!(dns.record_cache().len("example.com"), 0);
    }

    #[tokio::test]
    async fn validation_happens_before_any_call() {
        let mut dns = CloudFlareDns::new(StubApi::default());
        let err = dns
            .add_record("example.com", "www", "A", "192.0.2.1", Some(u32::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, DnsError::Validation(_)));
        assert!(dns.meta_cache().is_empty());
    }

    #[tokio::test]
    async fn add_zone_failures_are_reported() {
        let mut dns = CloudFlareDns::new(StubApi::default());
        let err = dns.add_zone("example.org").await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn nameservers_need_a_domain() {
        let mut dns = CloudFlareDns::new(StubApi::default());
        assert!(matches!(
            dns.get_hosting_nameservers(" ").await,
            Err(DnsError::Validation(_))
        ));
        assert_eq!(
            dns.get_hosting_nameservers("example.com").await.unwrap(),
            vec!["ana.ns.cloudflare.com"]
        );
        assert!(dns.get_hosting_nameservers("unknown.test").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_zone_evicts_caches() {
        let mut dns = CloudFlareDns::new(StubApi::default());
        dns.add_record("example.com", "www", "A", "192.0.2.1", None)
            .await
            .unwrap();
        dns.remove_zone("example.com").await.unwrap();
        assert!(dns.meta_cache().get("example.com").is_none());
        assert_eq!(dns.record_cache().len("example.com"), 0);
    }
}
