use std::time::Duration;

use reqwest::{Client, Method, header::HeaderMap};
use serde::Deserialize;
use serde_json::Value;

use crate::error::DnsError;
use crate::utils::serde_utils::null_as_default;

/// Connect timeout applied to every provider request.
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub trait DnsHttpClient: Send + Sync {
    fn request(
        &self,
        method: Method,
        url: String,
        headers: HeaderMap,
        body: Option<String>,
    ) -> impl Future<Output = Result<Value, DnsError>> + Send;
}

pub struct DefaultDnsClient {
    inner: Client,
}

/// Clients a provider builder can construct without outside configuration.
pub trait TryDefault: Sized {
    fn try_default() -> Result<Self, DnsError>;
}

impl DefaultDnsClient {
    pub fn new() -> Result<Self, DnsError> {
        let inner = Client::builder()
            .connect_timeout(CONNECTION_TIMEOUT)
            .build()
            .map_err(|e| DnsError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }
}

impl TryDefault for DefaultDnsClient {
    fn try_default() -> Result<Self, DnsError> {
        Self::new()
    }
}

impl DnsHttpClient for DefaultDnsClient {
    async fn request(
        &self,
        method: Method,
        url: String,
        headers: HeaderMap,
        body: Option<String>,
    ) -> Result<Value, DnsError> {
        tracing::debug!(%method, %url, "cloudflare request");
        let mut req = self.inner.request(method, url).headers(headers);
        if let Some(body) = body {
            req = req.body(body);
        }
        let text = req
            .send()
            .await
            .map_err(classify)?
            .text()
            .await
            .map_err(classify)?;

        let json_value: Value = serde_json::from_str(&text)?;

        check_envelope(json_value)
    }
}

fn classify(err: reqwest::Error) -> DnsError {
    if err.is_timeout() {
        DnsError::TransportTimeout {
            seconds: CONNECTION_TIMEOUT.as_secs(),
        }
    } else {
        DnsError::Transport(err.to_string())
    }
}

/// One entry of a response's `errors` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_chain: Vec<ApiMessage>,
}

impl ApiMessage {
    /// Deepest message along the first `error_chain`, else this entry's own.
    pub fn deepest_message(&self) -> &str {
        match self.error_chain.first() {
            Some(inner) if !inner.deepest_message().is_empty() => inner.deepest_message(),
            _ => &self.message,
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    errors: Vec<ApiMessage>,
}

/// Turns a Cloudflare response body into a rejection when it reports errors or
/// `success: false`; otherwise hands the body back.
pub fn check_envelope(value: Value) -> Result<Value, DnsError> {
    let envelope = Envelope::deserialize(&value)?;
    if let Some(first) = envelope.errors.first() {
        return Err(DnsError::ProviderRejection {
            message: first.deepest_message().to_string(),
            code: first.code,
        });
    }
    if envelope.success == Some(false) {
        return Err(DnsError::ProviderRejection {
            message: "Request was unsuccessful.".to_string(),
            code: None,
        });
    }
    Ok(value)
}
