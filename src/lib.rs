//! Cloudflare DNS synchronisation for hosting platforms
//!
//! Supported features:
//! - Canonical records for every record type Cloudflare serves
//! - Encoding to and from Cloudflare's structured record payloads
//! - Cached zone metadata and record ids
//! - Add, remove and merge-update of records, zone lifecycle and zone transfers
//!
//! # Example
//! ```no_run
//! use cloudflare_dns_sync::client::{DnsProviderAdapter, DnsProviderBuilder};
//! use cloudflare_dns_sync::providers::cloudflare::CloudFlareDnsBuilder;
//!
//! # async fn run() -> Result<(), cloudflare_dns_sync::DnsError> {
//! let mut dns = CloudFlareDnsBuilder::<cloudflare_dns_sync::DefaultDnsClient>::default()
//!     .set_param("key", "your_api_token")?
//!     .build()?;
//!
//! dns.add_record("example.com", "www", "A", "203.0.113.5", None).await?;
//! # Ok(())
//! # }
//! ```

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

pub mod cache;
pub mod client;
pub mod codec;
pub mod error;
pub mod providers;
pub mod rdata;
pub mod record;
pub mod utils;
pub mod zonefile;

pub use error::DnsError;
pub use record::{Record, RecordKey, RecordType};
pub use utils::request::DefaultDnsClient;
