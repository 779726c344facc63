//! Unified error handling for fleet admin.

use thiserror::Error;

use crate::config::ConfigError;
use crate::listing::ValidationError;
use crate::services::{ImageError, SubmitError};
use crate::supabase::SupabaseError;

/// Application-level error type for fleet admin front ends.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Supabase request failed.
    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Photo preparation or upload failed.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Form did not pass validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Listing write aborted.
    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),

    /// A stored row the user asked for does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this error comes from a backend or infrastructure failure
    /// rather than user input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Supabase(_) | Self::Image(_) | Self::Submit(_) | Self::Config(_)
        )
    }

    /// Log the error, sending server-side failures to Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Fleet admin error"
            );
        } else {
            tracing::warn!(error = %self, "Fleet admin request rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("vehicle 12".to_string());
        assert_eq!(err.to_string(), "Not found: vehicle 12");

        let err = AppError::from(ValidationError::NoVariants);
        assert_eq!(err.to_string(), "Please add at least one color variant");
    }

    #[test]
    fn test_server_error_classification() {
        assert!(AppError::from(SupabaseError::Request("timeout".to_string())).is_server_error());
        assert!(AppError::from(SubmitError::VehicleWrite(SupabaseError::NotFound(
            "row".to_string()
        )))
        .is_server_error());
        assert!(!AppError::from(ValidationError::MissingRequired).is_server_error());
        assert!(!AppError::NotFound("vehicle 3".to_string()).is_server_error());
    }
}
