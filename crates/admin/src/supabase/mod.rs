//! Supabase integration for the fleet tables and photo storage.
//!
//! This module provides:
//! - [`SupabaseClient`] for PostgREST table access and Storage uploads
//! - [`SupabaseError`] covering transport and API failures
//!
//! The client implements [`FleetBackend`](crate::backend::FleetBackend) and
//! [`ObjectStorage`](crate::backend::ObjectStorage), which is how the listing
//! workflow reaches it.

mod client;
mod error;
mod storage;
mod tables;

pub use client::SupabaseClient;
pub use error::{ApiErrorBody, SupabaseError};
