#![allow(dead_code)]

use cloudflare_dns_sync::DnsError;
use cloudflare_dns_sync::codec::{WireFields, WireRecord};
use cloudflare_dns_sync::providers::api::{
    CloudflareApi, Page, RecordFilter, ResultInfo, ZONE_EXISTS_CODE, ZoneAttrs,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

pub fn zone(name: &str, id: &str, name_servers: &[&str]) -> ZoneAttrs {
    ZoneAttrs {
        id: id.to_string(),
        name: name.to_string(),
        name_servers: name_servers.iter().map(|ns| ns.to_string()).collect(),
        status: Some("active".to_string()),
        extra: HashMap::new(),
    }
}

pub fn wire(id: &str, name: &str, rr: &str, content: &str, ttl: u32) -> WireRecord {
    WireRecord {
        id: id.to_string(),
        zone_id: Some("zone-1".to_string()),
        zone_name: Some("example.com".to_string()),
        name: name.to_string(),
        rr: rr.to_string(),
        content: content.to_string(),
        ttl,
        proxied: false,
        priority: None,
        data: None,
    }
}

/// In-memory Cloudflare account that records every call made against it.
pub struct MockCloudflareApi {
    zones: Mutex<Vec<ZoneAttrs>>,
    record_pages: Mutex<Vec<Vec<WireRecord>>>,
    fail_on_page: Mutex<Option<(u32, DnsError)>>,
    zone_error: Mutex<Option<DnsError>>,
    write_error: Mutex<Option<DnsError>>,
    next_id: AtomicU64,
    pub list_zones_calls: AtomicU64,
    pub list_records_calls: AtomicU64,
    pub created: Mutex<Vec<(String, WireFields)>>,
    pub updated: Mutex<Vec<(String, String, WireFields)>>,
    pub deleted: Mutex<Vec<(String, String)>>,
    pub added_zones: Mutex<Vec<(String, bool)>>,
}

impl MockCloudflareApi {
    pub fn new() -> Self {
        Self::with_zones(vec![zone(
            "example.com",
            "zone-1",
            &["ana.ns.cloudflare.com", "bob.ns.cloudflare.com"],
        )])
    }

    pub fn with_zones(zones: Vec<ZoneAttrs>) -> Self {
        Self {
            zones: Mutex::new(zones),
            record_pages: Mutex::new(vec![]),
            fail_on_page: Mutex::new(None),
            zone_error: Mutex::new(None),
            write_error: Mutex::new(None),
            next_id: AtomicU64::new(1),
            list_zones_calls: AtomicU64::new(0),
            list_records_calls: AtomicU64::new(0),
            created: Mutex::new(vec![]),
            updated: Mutex::new(vec![]),
            deleted: Mutex::new(vec![]),
            added_zones: Mutex::new(vec![]),
        }
    }

    /// Records served by listRecords, one inner vector per page.
    pub fn with_record_pages(self, pages: Vec<Vec<WireRecord>>) -> Self {
        *self.record_pages.lock().unwrap() = pages;
        self
    }

    pub fn fail_listing_on_page(self, page: u32, error: DnsError) -> Self {
        *self.fail_on_page.lock().unwrap() = Some((page, error));
        self
    }

    /// Makes every zone call fail with `error`.
    pub fn fail_zone_calls(self, error: DnsError) -> Self {
        *self.zone_error.lock().unwrap() = Some(error);
        self
    }

    /// Makes every record update and delete fail with `error`.
    pub fn fail_record_writes(self, error: DnsError) -> Self {
        *self.write_error.lock().unwrap() = Some(error);
        self
    }

    pub fn list_zones_calls(&self) -> u64 {
        self.list_zones_calls.load(Ordering::Relaxed)
    }

    pub fn list_records_calls(&self) -> u64 {
        self.list_records_calls.load(Ordering::Relaxed)
    }

    pub fn created(&self) -> Vec<(String, WireFields)> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<(String, String, WireFields)> {
        self.updated.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.lock().unwrap().clone()
    }

    fn zone_error(&self) -> Option<DnsError> {
        self.zone_error.lock().unwrap().clone()
    }

    fn write_error(&self) -> Option<DnsError> {
        self.write_error.lock().unwrap().clone()
    }
}

impl CloudflareApi for MockCloudflareApi {
    async fn list_zones(&self, page: u32, per_page: u32) -> Result<Page<ZoneAttrs>, DnsError> {
        self.list_zones_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(e) = self.zone_error() {
            return Err(e);
        }
        let zones = self.zones.lock().unwrap();
        let per_page = per_page.max(1) as usize;
        let total_pages = zones.len().div_ceil(per_page).max(1) as u32;
        let result = zones
            .iter()
            .skip((page as usize - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();
        Ok(Page {
            result,
            paging: ResultInfo {
                page,
                per_page: per_page as u32,
                total_pages,
                total_count: zones.len() as u32,
                ..Default::default()
            },
        })
    }

    async fn add_zone(&self, name: &str, jump_start: bool) -> Result<ZoneAttrs, DnsError> {
        self.added_zones
            .lock()
            .unwrap()
            .push((name.to_string(), jump_start));
        if let Some(e) = self.zone_error() {
            return Err(e);
        }
        let mut zones = self.zones.lock().unwrap();
        if zones.iter().any(|zone| zone.name == name) {
            return Err(DnsError::ProviderRejection {
                message: format!("{name} already exists"),
                code: Some(ZONE_EXISTS_CODE),
            });
        }
        let added = zone(
            name,
            &format!("zone-{}", zones.len() + 1),
            &["kim.ns.cloudflare.com", "lee.ns.cloudflare.com"],
        );
        zones.push(added.clone());
        Ok(added)
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<(), DnsError> {
        self.zones.lock().unwrap().retain(|zone| zone.id != zone_id);
        Ok(())
    }

    async fn list_records(
        &self,
        _zone_id: &str,
        _filter: &RecordFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Page<WireRecord>, DnsError> {
        self.list_records_calls.fetch_add(1, Ordering::Relaxed);
        if let Some((failing, e)) = self.fail_on_page.lock().unwrap().clone() {
            if failing == page {
                return Err(e);
            }
        }
        let pages = self.record_pages.lock().unwrap();
        let result = pages.get(page as usize - 1).cloned().unwrap_or_default();
        Ok(Page {
            result,
            paging: ResultInfo {
                page,
                per_page,
                total_pages: pages.len() as u32,
                total_count: pages.iter().map(Vec::len).sum::<usize>() as u32,
                ..Default::default()
            },
        })
    }

    async fn add_record(&self, zone_id: &str, fields: &WireFields) -> Result<String, DnsError> {
        self.created
            .lock()
            .unwrap()
            .push((zone_id.to_string(), fields.clone()));
        Ok(format!("rec-{}", self.next_id.fetch_add(1, Ordering::Relaxed)))
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        fields: &WireFields,
    ) -> Result<String, DnsError> {
        if let Some(e) = self.write_error() {
            return Err(e);
        }
        self.updated.lock().unwrap().push((
            zone_id.to_string(),
            record_id.to_string(),
            fields.clone(),
        ));
        Ok(record_id.to_string())
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), DnsError> {
        if let Some(e) = self.write_error() {
            return Err(e);
        }
        self.deleted
            .lock()
            .unwrap()
            .push((zone_id.to_string(), record_id.to_string()));
        Ok(())
    }
}
