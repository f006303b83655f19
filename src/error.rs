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

/// Every failure an engine operation can report.
///
/// None of these are fatal; each operation can be retried by the caller, although only the
/// transport variants are worth retrying without changing the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DnsError {
    /// Malformed input, rejected before any provider call.
    #[error("{0}")]
    Validation(String),

    /// The referenced record or zone is absent.
    #[error("{0}")]
    NotFound(String),

    /// The provider answered, but refused the request.
    #[error("{message}")]
    ProviderRejection { message: String, code: Option<i64> },

    #[error(
        "unable to connect to Cloudflare's API after {seconds} second timeout, try again later \
         (see https://cloudflarestatus.com for more details)"
    )]
    TransportTimeout { seconds: u64 },

    #[error("transport error: {0}")]
    Transport(String),
}

impl DnsError {
    pub fn validation(message: impl Into<String>) -> Self {
        DnsError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DnsError::NotFound(message.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DnsError::TransportTimeout { .. } | DnsError::Transport(_)
        )
    }

    /// Provider error code, for rejections that carried one.
    pub fn code(&self) -> Option<i64> {
        match self {
            DnsError::ProviderRejection { code, .. } => *code,
            _ => None,
        }
    }

    /// Prefixes a rejection message with operation context, leaving other variants alone.
    pub(crate) fn context(self, prefix: impl std::fmt::Display) -> Self {
        match self {
            DnsError::ProviderRejection { message, code } => DnsError::ProviderRejection {
                message: format!("{prefix}: {message}"),
                code,
            },
            other => other,
        }
    }
}

/// Missing required builder fields surface through `extract_params!` as plain strings.
impl From<String> for DnsError {
    fn from(message: String) -> Self {
        DnsError::Validation(message)
    }
}

impl From<serde_json::Error> for DnsError {
    fn from(err: serde_json::Error) -> Self {
        DnsError::Transport(format!("malformed provider response: {err}"))
    }
}
