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

//! Per-engine caches of provider state.
//!
//! Both caches are plain owned maps. The engine that owns them runs one operation at a time,
//! so nothing here locks.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::codec::{WireRecord, decode};
use crate::error::DnsError;
use crate::providers::api::{
    CloudflareApi, RECORD_PAGE_SIZE, RecordFilter, ZONE_PAGE_SIZE, ZoneAttrs,
};
use crate::record::{Record, RecordKey};

fn zone_key(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Zone attributes keyed by zone name.
#[derive(Debug, Clone, Default)]
pub struct ZoneMetaCache {
    zones: HashMap<String, ZoneAttrs>,
}

impl ZoneMetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, domain: &str) -> Option<&ZoneAttrs> {
        self.zones.get(&zone_key(domain))
    }

    /// Inserts or overwrites one zone, leaving every other entry in place.
    pub fn merge(&mut self, zone: ZoneAttrs) {
        self.zones.insert(zone_key(&zone.name), zone);
    }

    pub fn evict(&mut self, domain: &str) -> Option<ZoneAttrs> {
        self.zones.remove(&zone_key(domain))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Lists every zone on the account and merges each into the cache.
    ///
    /// Zones cached earlier but missing from this listing are kept. Returns the number of zones
    /// listed.
    pub async fn populate<A: CloudflareApi>(&mut self, api: &A) -> Result<usize, DnsError> {
        let mut page = 1;
        let mut listed = 0;
        loop {
            debug!(page, "listing zones");
            let zones = api.list_zones(page, ZONE_PAGE_SIZE).await?;
            let last = zones.is_last(page);
            listed += zones.result.len();
            for zone in zones.result {
                self.merge(zone);
            }
            if last {
                break;
            }
            page += 1;
        }
        debug!(listed, cached = self.zones.len(), "zone metadata populated");
        Ok(listed)
    }

    /// Cached attributes of `domain`, listing zones first when it is not cached yet.
    pub async fn lookup<A: CloudflareApi>(
        &mut self,
        api: &A,
        domain: &str,
    ) -> Result<Option<&ZoneAttrs>, DnsError> {
        let key = zone_key(domain);
        if !self.zones.contains_key(&key) {
            self.populate(api).await?;
        }
        Ok(self.zones.get(&key))
    }

    pub async fn zone_id<A: CloudflareApi>(
        &mut self,
        api: &A,
        domain: &str,
    ) -> Result<Option<String>, DnsError> {
        Ok(self.lookup(api, domain).await?.map(|zone| zone.id.clone()))
    }

    /// Nameservers the provider delegated to `domain`; empty for unknown zones.
    pub async fn name_servers<A: CloudflareApi>(
        &mut self,
        api: &A,
        domain: &str,
    ) -> Result<Vec<String>, DnsError> {
        Ok(self
            .lookup(api, domain)
            .await?
            .map(|zone| zone.name_servers.clone())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default)]
struct ZoneRecords {
    /// Set once the zone's full listing has been loaded.
    populated: bool,
    order: Vec<RecordKey>,
    records: HashMap<RecordKey, Record>,
}

impl ZoneRecords {
    fn insert(&mut self, record: Record) {
        let key = record.key();
        if self.records.insert(key.clone(), record).is_none() {
            self.order.push(key);
        }
    }

    fn remove(&mut self, key: &RecordKey) -> Option<Record> {
        let removed = self.records.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }
}

/// Records of each zone, indexed by `(name, rr, parameter)`.
#[derive(Debug, Clone, Default)]
pub struct ZoneRecordCache {
    zones: HashMap<String, ZoneRecords>,
}

impl ZoneRecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, zone: &str, key: &RecordKey) -> Option<&Record> {
        self.zones.get(&zone_key(zone))?.records.get(key)
    }

    /// Inserts `record`, replacing any cached record with the same identity.
    pub fn insert(&mut self, record: Record) {
        self.zones
            .entry(zone_key(record.zone()))
            .or_default()
            .insert(record);
    }

    pub fn evict(&mut self, zone: &str, key: &RecordKey) -> Option<Record> {
        self.zones.get_mut(&zone_key(zone))?.remove(key)
    }

    /// Swaps the whole record set of `zone` for `records` and marks it populated.
    pub fn replace(&mut self, zone: &str, records: impl IntoIterator<Item = Record>) {
        let mut fresh = ZoneRecords {
            populated: true,
            ..Default::default()
        };
        for record in records {
            fresh.insert(record);
        }
        self.zones.insert(zone_key(zone), fresh);
    }

    pub fn evict_zone(&mut self, zone: &str) {
        self.zones.remove(&zone_key(zone));
    }

    pub fn is_populated(&self, zone: &str) -> bool {
        self.zones
            .get(&zone_key(zone))
            .is_some_and(|records| records.populated)
    }

    /// Records cached for `zone`, in the order they were first cached.
    pub fn records<'a>(&'a self, zone: &str) -> impl Iterator<Item = &'a Record> + 'a {
        self.zones
            .get(&zone_key(zone))
            .into_iter()
            .flat_map(|zone| zone.order.iter().filter_map(move |key| zone.records.get(key)))
    }

    /// First cached record named `name` in `zone`, whatever its type.
    pub fn first_named(&self, zone: &str, name: &str) -> Option<&Record> {
        self.records(zone).find(|record| record.name() == name)
    }

    pub fn len(&self, zone: &str) -> usize {
        self.zones
            .get(&zone_key(zone))
            .map_or(0, |records| records.records.len())
    }

    /// Lists every record of `zone` (provider id `zone_id`) and replaces the cached set with it.
    ///
    /// The cache is only touched once the whole listing succeeded. Listed records that do not
    /// decode are left out of the cache but still returned, so callers can render them as-is.
    pub async fn populate<A: CloudflareApi>(
        &mut self,
        api: &A,
        zone: &str,
        zone_id: &str,
    ) -> Result<Vec<WireRecord>, DnsError> {
        let listed = list_all_records(api, zone_id).await?;
        let mut records = Vec::with_capacity(listed.len());
        for wire in &listed {
            match decode(wire, zone) {
                Ok(record) => records.push(record),
                Err(e) => warn!(zone, id = %wire.id, rr = %wire.rr, error = %e, "skipping undecodable record"),
            }
        }
        debug!(zone, listed = listed.len(), cached = records.len(), "record cache populated");
        self.replace(zone, records);
        Ok(listed)
    }
}

/// Pages through a zone's record listing, one request at a time.
pub async fn list_all_records<A: CloudflareApi>(
    api: &A,
    zone_id: &str,
) -> Result<Vec<WireRecord>, DnsError> {
    let filter = RecordFilter::default();
    let mut page = 1;
    let mut records = Vec::new();
    loop {
        debug!(zone_id, page, "listing records");
        let listing = api
            .list_records(zone_id, &filter, page, RECORD_PAGE_SIZE)
            .await?;
        let last = listing.is_last(page);
        records.extend(listing.result);
        if last {
            break;
        }
        page += 1;
    }
    Ok(records)
}
