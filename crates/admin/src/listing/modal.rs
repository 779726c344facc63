//! Modal descriptions for the listing screen.
//!
//! The screen never renders anything itself; it exposes a [`ModalSpec`] that
//! a front end draws however it likes.

use serde::Serialize;

/// Visual style of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    Success,
    Error,
    Confirm,
    Delete,
}

/// Everything needed to draw one modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalSpec {
    pub visible: bool,
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
    pub confirm_text: String,
}

impl ModalSpec {
    /// A closed modal.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            kind: ModalKind::Confirm,
            title: String::new(),
            message: String::new(),
            confirm_text: String::new(),
        }
    }

    /// Confirmation shown before a listing is written.
    #[must_use]
    pub fn submit_confirmation(is_update: bool) -> Self {
        let (title, message, confirm) = if is_update {
            (
                "Update Vehicle",
                "Are you sure you want to update this vehicle with the changes you made?",
                "Update",
            )
        } else {
            (
                "Add Vehicle",
                "Are you sure you want to add this vehicle to your fleet?",
                "Add",
            )
        };
        Self::shown(ModalKind::Confirm, title, message, confirm)
    }

    /// Confirmation shown before a color variant is removed.
    #[must_use]
    pub fn variant_removal() -> Self {
        Self::shown(
            ModalKind::Delete,
            "Remove Color Variant",
            "Are you sure you want to remove this color variant? This action cannot be undone.",
            "Remove",
        )
    }

    /// Outcome of a submission.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::shown(ModalKind::Success, "Success", message, "OK")
    }

    /// Failure of a submission.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::shown(ModalKind::Error, "Error", message, "OK")
    }

    fn shown(
        kind: ModalKind,
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_text: impl Into<String>,
    ) -> Self {
        Self {
            visible: true,
            kind,
            title: title.into(),
            message: message.into(),
            confirm_text: confirm_text.into(),
        }
    }
}

impl Default for ModalSpec {
    fn default() -> Self {
        Self::hidden()
    }
}
