//! Business logic services for the listing workflow.
//!
//! # Services
//!
//! - `images` - Variant photo normalization and upload
//! - `submit` - Vehicle and variant writes for a validated listing

pub mod images;
pub mod submit;

pub use images::{ImageError, ImageUploader, JpegTranscoder, PreparedImage, Transcoder};
pub use submit::{Aggregates, SubmitError, SubmitOutcome, submit_listing};
