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

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::error::DnsError;

/// Cloudflare credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Global API key paired with the account email.
    ApiKey { email: String, key: String },
    /// Scoped API token.
    ApiToken(String),
}

impl Credentials {
    /// Picks the auth scheme for a key.
    ///
    /// A master key is always hexadecimal and needs the account email; anything else is
    /// treated as a scoped token and the email, if any, is dropped.
    pub fn new(email: Option<&str>, key: &str) -> Self {
        let key = key.trim();
        match email.map(str::trim).filter(|email| !email.is_empty()) {
            Some(email) if !key.is_empty() && key.chars().all(|c| c.is_ascii_hexdigit()) => {
                Credentials::ApiKey {
                    email: email.to_string(),
                    key: key.to_string(),
                }
            }
            _ => Credentials::ApiToken(key.to_string()),
        }
    }

    /// Builds the request headers carrying these credentials.
    ///
    /// # Arguments
    ///
    /// * `self` - The credentials to encode.
    ///
    /// # Returns
    ///
    /// A HeaderMap with JSON content negotiation plus either `X-Auth-Email`/`X-Auth-Key`
    /// or a bearer `Authorization` header.
    pub fn build_headers(&self) -> Result<HeaderMap, DnsError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        match self {
            Credentials::ApiKey { email, key } => {
                headers.insert("X-Auth-Email", header_value(email)?);
                headers.insert("X-Auth-Key", header_value(key)?);
            }
            Credentials::ApiToken(token) => {
                headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
            }
        }
        Ok(headers)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey { email, .. } => f
                .debug_struct("ApiKey")
                .field("email", email)
                .field("key", &"<redacted>")
                .finish(),
            Credentials::ApiToken(_) => f.debug_tuple("ApiToken").field(&"<redacted>").finish(),
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue, DnsError> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| DnsError::validation("credentials contain characters not allowed in headers"))?;
    value.set_sensitive(true);
    Ok(value)
}
