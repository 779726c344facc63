//! Add/edit vehicle screen.
//!
//! Headless controller for the listing screen. It owns the form snapshot, the
//! owner picker and the submit state machine:
//!
//! ```text
//! Idle -> Validating -> Confirming -> Submitting -> Succeeded | Failed -> Idle
//!             |              |
//!             +-> Idle       +-> Idle (cancelled)
//! ```
//!
//! A front end renders [`ListingScreen::modal`] and the form, and forwards user
//! actions to the methods below.

use tracing::{error, info, instrument, warn};

use fleet_core::{OwnerId, VehicleId};

use crate::backend::{FleetBackend, ObjectStorage};
use crate::error::AppError;
use crate::models::Vehicle;
use crate::services::images::{ImageUploader, Transcoder};
use crate::services::submit::submit_listing;
use crate::supabase::SupabaseError;

use super::form::{ListingEdit, ListingForm};
use super::modal::ModalSpec;
use super::owner_picker::OwnerPicker;
use super::validation::{ValidListing, ValidationError, validate};
use super::variants::{VariantEdit, VariantKey};

/// Where the front end should go after a modal closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Back,
}

/// Observable phase of the submit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    Confirming,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
enum SubmitState {
    Idle,
    Validating,
    Confirming(ValidListing),
    Submitting,
    Succeeded(String),
    Failed(String),
}

/// State behind the add/edit vehicle screen.
#[derive(Debug, Clone)]
pub struct ListingScreen {
    form: ListingForm,
    owners: OwnerPicker,
    state: SubmitState,
    pending_removal: Option<VariantKey>,
}

impl Default for ListingScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingScreen {
    /// Screen for a new listing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_form(ListingForm::new_listing())
    }

    /// Screen editing a stored vehicle.
    #[must_use]
    pub fn editing(vehicle: &Vehicle) -> Self {
        Self::with_form(ListingForm::for_vehicle(vehicle))
    }

    /// Fetch a stored vehicle and mount a screen editing it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no vehicle has this id, or
    /// [`AppError::Supabase`] if the fetch fails.
    #[instrument(skip(backend))]
    pub async fn open_vehicle<B: FleetBackend>(
        backend: &B,
        id: VehicleId,
    ) -> Result<Self, AppError> {
        let vehicle = backend.vehicle(id).await.map_err(|e| match e {
            SupabaseError::NotFound(_) => AppError::NotFound(format!("vehicle {id}")),
            other => AppError::Supabase(other),
        })?;
        info!(vehicle_id = %id, make = %vehicle.make, model = %vehicle.model, "Editing vehicle");

        let mut screen = Self::editing(&vehicle);
        screen.mount(backend).await;
        Ok(screen)
    }

    fn with_form(form: ListingForm) -> Self {
        Self {
            form,
            owners: OwnerPicker::default(),
            state: SubmitState::Idle,
            pending_removal: None,
        }
    }

    /// Load owners and, when editing, the stored variants. Failures are
    /// logged and leave the defaults in place.
    #[instrument(skip_all, fields(vehicle_id = ?self.form.editing))]
    pub async fn mount<B: FleetBackend>(&mut self, backend: &B) {
        self.owners = OwnerPicker::load(backend).await;

        let Some(vehicle_id) = self.form.editing else {
            return;
        };

        match backend.variants_for_vehicle(vehicle_id).await {
            Ok(rows) if rows.is_empty() => {
                warn!(vehicle_id = %vehicle_id, "Vehicle has no stored variants");
            }
            Ok(rows) => {
                info!(vehicle_id = %vehicle_id, count = rows.len(), "Loaded variants");
                self.form = std::mem::take(&mut self.form).with_variant_rows(&rows);
            }
            Err(e) => {
                error!(vehicle_id = %vehicle_id, error = %e, "Failed to load variants");
            }
        }
    }

    #[must_use]
    pub const fn form(&self) -> &ListingForm {
        &self.form
    }

    #[must_use]
    pub const fn owners(&self) -> &OwnerPicker {
        &self.owners
    }

    pub const fn owners_mut(&mut self) -> &mut OwnerPicker {
        &mut self.owners
    }

    /// Apply a form edit.
    pub fn edit(&mut self, edit: impl Into<ListingEdit>) {
        self.form = std::mem::take(&mut self.form).apply(edit);
    }

    /// Pick an owner from the picker. Unknown ids are ignored.
    pub fn choose_owner(&mut self, id: OwnerId) {
        if let Some(id) = self.owners.choose(id) {
            self.edit(ListingEdit::SelectOwner(id));
        }
    }

    /// Text on the owner picker button.
    #[must_use]
    pub fn owner_label(&self) -> &str {
        self.owners.label(self.form.owner_id)
    }

    /// Ask to remove a variant. Returns `false` when the variant is the last
    /// one, in which case nothing is asked.
    pub fn request_variant_removal(&mut self, key: VariantKey) -> bool {
        if !self.form.variants.can_remove() || self.form.variants.get(key).is_none() {
            return false;
        }
        self.pending_removal = Some(key);
        true
    }

    pub fn confirm_variant_removal(&mut self) {
        if let Some(key) = self.pending_removal.take() {
            self.edit(VariantEdit::Remove(key));
        }
    }

    pub const fn cancel_variant_removal(&mut self) {
        self.pending_removal = None;
    }

    #[must_use]
    pub const fn phase(&self) -> SubmitPhase {
        match self.state {
            SubmitState::Idle => SubmitPhase::Idle,
            SubmitState::Validating => SubmitPhase::Validating,
            SubmitState::Confirming(_) => SubmitPhase::Confirming,
            SubmitState::Submitting => SubmitPhase::Submitting,
            SubmitState::Succeeded(_) => SubmitPhase::Succeeded,
            SubmitState::Failed(_) => SubmitPhase::Failed,
        }
    }

    /// Validate the form and ask for confirmation.
    ///
    /// Ignored unless the screen is idle.
    ///
    /// # Errors
    ///
    /// Returns the failed rule; its `Display` is the alert text. The screen
    /// stays idle.
    pub fn press_submit(&mut self) -> Result<(), ValidationError> {
        if !matches!(self.state, SubmitState::Idle) {
            return Ok(());
        }

        self.state = SubmitState::Validating;
        match validate(&self.form) {
            Ok(valid) => {
                self.state = SubmitState::Confirming(valid);
                Ok(())
            }
            Err(e) => {
                self.state = SubmitState::Idle;
                Err(e)
            }
        }
    }

    pub fn cancel_confirmation(&mut self) {
        if matches!(self.state, SubmitState::Confirming(_)) {
            self.state = SubmitState::Idle;
        }
    }

    /// Run the confirmed submission and move to the feedback state.
    ///
    /// Does nothing unless a confirmation is pending.
    pub async fn confirm_submit<B, T>(
        &mut self,
        backend: &B,
        uploader: &ImageUploader<T>,
    ) -> SubmitPhase
    where
        B: FleetBackend + ObjectStorage,
        T: Transcoder,
    {
        let listing = match std::mem::replace(&mut self.state, SubmitState::Submitting) {
            SubmitState::Confirming(listing) => listing,
            other => {
                self.state = other;
                return self.phase();
            }
        };

        self.state = match submit_listing(backend, uploader, &listing).await {
            Ok(outcome) => SubmitState::Succeeded(outcome.message().to_string()),
            Err(e) => {
                let verb = if listing.is_update() { "update" } else { "save" };
                error!(error = %e, "Listing submission failed");
                SubmitState::Failed(format!("Failed to {verb} vehicle: {e}"))
            }
        };
        self.phase()
    }

    /// Close the feedback modal. A success sends the user back.
    pub fn dismiss_feedback(&mut self) -> Navigation {
        match self.state {
            SubmitState::Succeeded(_) => {
                self.state = SubmitState::Idle;
                Navigation::Back
            }
            SubmitState::Failed(_) => {
                self.state = SubmitState::Idle;
                Navigation::Stay
            }
            _ => Navigation::Stay,
        }
    }

    /// The modal currently shown, if any.
    #[must_use]
    pub fn modal(&self) -> ModalSpec {
        match &self.state {
            SubmitState::Confirming(listing) => ModalSpec::submit_confirmation(listing.is_update()),
            SubmitState::Succeeded(message) => ModalSpec::success(message.clone()),
            SubmitState::Failed(message) => ModalSpec::error(message.clone()),
            SubmitState::Idle | SubmitState::Validating | SubmitState::Submitting => {
                if self.pending_removal.is_some() {
                    ModalSpec::variant_removal()
                } else {
                    ModalSpec::hidden()
                }
            }
        }
    }

    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        match self.state {
            SubmitState::Submitting => "Saving...",
            _ if self.form.is_editing() => "Update Vehicle",
            _ => "Add Vehicle",
        }
    }

    #[must_use]
    pub const fn submit_enabled(&self) -> bool {
        !matches!(self.state, SubmitState::Submitting)
    }
}
