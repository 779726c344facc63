//! CLI subcommands.

use thiserror::Error;

use fleet_admin::AppError;

use crate::listing_file::ListingFileError;

pub mod owners;
pub mod vehicle;

/// Errors returned by a subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    ListingFile(#[from] ListingFileError),

    /// Reading the confirmation answer failed.
    #[error("Failed to read answer: {0}")]
    Prompt(#[source] std::io::Error),

    /// The submission ran and failed; the message is the one shown to the user.
    #[error("{0}")]
    SubmitFailed(String),
}

impl CommandError {
    /// Log the error, sending backend failures to Sentry.
    pub fn report(&self) {
        match self {
            Self::App(e) => e.report(),
            Self::SubmitFailed(message) => {
                let event_id = sentry::capture_message(message, sentry::Level::Error);
                tracing::error!(error = %message, sentry_event_id = %event_id, "Submission failed");
            }
            Self::ListingFile(_) | Self::Prompt(_) => {
                tracing::warn!(error = %self, "Command failed");
            }
        }
    }
}

impl From<fleet_admin::SupabaseError> for CommandError {
    fn from(e: fleet_admin::SupabaseError) -> Self {
        Self::App(AppError::from(e))
    }
}
