//! Vehicle listing workflow.
//!
//! Form state, validation, the variant editor, the owner picker and the
//! screen controller tying them to the submit service.

pub mod form;
pub mod modal;
pub mod owner_picker;
pub mod screen;
pub mod validation;
pub mod variants;

pub use form::{FieldEdit, ListingEdit, ListingForm, VehicleForm};
pub use modal::{ModalKind, ModalSpec};
pub use owner_picker::OwnerPicker;
pub use screen::{ListingScreen, Navigation, SubmitPhase};
pub use validation::{SEATS_RANGE, ValidListing, ValidationError, validate};
pub use variants::{ColorVariant, VariantEdit, VariantKey, VariantList};
