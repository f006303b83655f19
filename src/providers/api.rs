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

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::codec::{WireFields, WireRecord};
use crate::error::DnsError;
use crate::providers::utils::Credentials;
use crate::record::RecordType;
use crate::utils::request::DnsHttpClient;
use crate::utils::serde_utils::{null_as_default, option_is_empty, vec_is_empty};

pub const DEFAULT_API: &str = "https://api.cloudflare.com/client/v4";
/// Largest page Cloudflare serves for zone listings.
pub const ZONE_PAGE_SIZE: u32 = 50;
pub const RECORD_PAGE_SIZE: u32 = 100;
/// Provider error code for adding a zone that is already present.
pub const ZONE_EXISTS_CODE: i64 = 1061;

/// Zone attributes as listed by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAttrs {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "vec_is_empty")]
    pub name_servers: Vec<String>,
    #[serde(default, skip_serializing_if = "option_is_empty")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Paging block of a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub result: Vec<T>,
    pub paging: ResultInfo,
}

impl<T> Page<T> {
    /// True when `page` is the last one the provider reported.
    pub fn is_last(&self, page: u32) -> bool {
        page >= self.paging.total_pages
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Fully qualified name.
    pub name: Option<String>,
    pub rr: Option<RecordType>,
}

/// The provider operations the engine depends on.
///
/// Every call either succeeds or reports a [`DnsError`]: transport failures as
/// `TransportTimeout`/`Transport`, refused requests as `ProviderRejection`.
pub trait CloudflareApi: Send + Sync {
    fn list_zones(
        &self,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Page<ZoneAttrs>, DnsError>> + Send;

    fn add_zone(
        &self,
        name: &str,
        jump_start: bool,
    ) -> impl Future<Output = Result<ZoneAttrs, DnsError>> + Send;

    fn delete_zone(&self, zone_id: &str) -> impl Future<Output = Result<(), DnsError>> + Send;

    fn list_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Page<WireRecord>, DnsError>> + Send;

    /// Creates a record and returns its provider id.
    fn add_record(
        &self,
        zone_id: &str,
        fields: &WireFields,
    ) -> impl Future<Output = Result<String, DnsError>> + Send;

    /// Replaces a record's details and returns its (possibly new) provider id.
    fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        fields: &WireFields,
    ) -> impl Future<Output = Result<String, DnsError>> + Send;

    fn delete_record(
        &self,
        zone_id: &str,
        record_id: &str,
    ) -> impl Future<Output = Result<(), DnsError>> + Send;
}

/// [`CloudflareApi`] over the v4 REST endpoints.
pub struct HttpCloudflareApi<T: DnsHttpClient> {
    /// HTTP client for making requests
    http_client: T,
    /// API endpoint
    api: String,
    /// Auth and content headers sent with every request
    headers: HeaderMap,
}

impl<T: DnsHttpClient> HttpCloudflareApi<T> {
    pub fn new(http_client: T, api: impl Into<String>, credentials: &Credentials) -> Result<Self, DnsError> {
        Ok(Self {
            http_client,
            api: api.into().trim_end_matches('/').to_string(),
            headers: credentials.build_headers()?,
        })
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<String, DnsError> {
        let url = Url::parse_with_params(&format!("{}/{}", self.api, path), query)
            .map_err(|e| DnsError::validation(format!("invalid API url: {e}")))?;
        Ok(url.to_string())
    }

    async fn call(&self, method: Method, url: String, body: Option<Value>) -> Result<Value, DnsError> {
        let body = body.map(|b| b.to_string());
        self.http_client
            .request(method, url, self.headers.clone(), body)
            .await
    }

    async fn page<R: DeserializeOwned>(&self, url: String) -> Result<Page<R>, DnsError> {
        let response = self.call(Method::GET, url, None).await?;
        let result = response
            .get("result")
            .cloned()
            .ok_or_else(|| DnsError::Transport("missing 'result' array in response".into()))?;
        let paging = match response.get("result_info") {
            Some(info) => ResultInfo::deserialize(info)?,
            None => ResultInfo::default(),
        };
        Ok(Page {
            result: serde_json::from_value(result)?,
            paging,
        })
    }
}

fn result_id(response: &Value) -> Result<String, DnsError> {
    response["result"]["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DnsError::Transport("missing result id in response".into()))
}

impl<T: DnsHttpClient> CloudflareApi for HttpCloudflareApi<T> {
    async fn list_zones(&self, page: u32, per_page: u32) -> Result<Page<ZoneAttrs>, DnsError> {
        let url = self.url(
            "zones",
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
        )?;
        self.page(url).await
    }

    async fn add_zone(&self, name: &str, jump_start: bool) -> Result<ZoneAttrs, DnsError> {
        let url = self.url("zones", &[])?;
        let body = json!({ "name": name, "jump_start": jump_start });
        let response = self.call(Method::POST, url, Some(body)).await?;
        Ok(ZoneAttrs::deserialize(&response["result"])?)
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<(), DnsError> {
        let url = self.url(&format!("zones/{zone_id}"), &[])?;
        self.call(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn list_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Page<WireRecord>, DnsError> {
        let mut query = vec![("page", page.to_string()), ("per_page", per_page.to_string())];
        if let Some(name) = &filter.name {
            query.push(("name", name.clone()));
        }
        if let Some(rr) = filter.rr {
            query.push(("type", rr.to_string()));
        }
        let url = self.url(&format!("zones/{zone_id}/dns_records"), &query)?;
        self.page(url).await
    }

    async fn add_record(&self, zone_id: &str, fields: &WireFields) -> Result<String, DnsError> {
        let url = self.url(&format!("zones/{zone_id}/dns_records"), &[])?;
        let response = self
            .call(Method::POST, url, Some(serde_json::to_value(fields)?))
            .await?;
        result_id(&response)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        fields: &WireFields,
    ) -> Result<String, DnsError> {
        let url = self.url(&format!("zones/{zone_id}/dns_records/{record_id}"), &[])?;
        let response = self
            .call(Method::PUT, url, Some(serde_json::to_value(fields)?))
            .await?;
        result_id(&response)
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), DnsError> {
        let url = self.url(&format!("zones/{zone_id}/dns_records/{record_id}"), &[])?;
        self.call(Method::DELETE, url, None).await?;
        Ok(())
    }
}
