//! Supabase-related errors.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when interacting with Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed before a response arrived.
    #[error("Request failed: {0}")]
    Request(String),

    /// Failed to read or parse a response body.
    #[error("Response error: {0}")]
    Response(String),

    /// PostgREST or Storage rejected the request.
    ///
    /// Displays the backend's message verbatim so it can be shown to the admin.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// PostgREST/Postgres error code (e.g. `23505`), if provided.
        code: Option<String>,
        /// Human readable message from the backend.
        message: String,
    },

    /// A row that was expected to exist was not returned.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error body returned by PostgREST and the Storage API.
///
/// PostgREST uses `message`/`code`/`details`; Storage uses
/// `message`/`error`/`statusCode`. Other fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SupabaseError {
    /// Build an [`SupabaseError::Api`] from a status code and raw body.
    #[must_use]
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();

        let message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.to_string()
                }
            });

        let message = match parsed.details.filter(|d| !d.is_empty()) {
            Some(details) => format!("{message} ({details})"),
            None => message,
        };

        Self::Api {
            status,
            code: parsed.code,
            message,
        }
    }

    /// Whether the backend reported a unique-key conflict (an existing
    /// storage object or duplicate row).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => {
                *status == 409 || code.as_deref() == Some("23505")
            }
            _ => false,
        }
    }
}
