//! Fleet Admin library.
//!
//! Headless add/edit workflow for rental fleet listings, backed by Supabase:
//! the listing form and its validation, the color variant editor, photo
//! upload to Supabase Storage, and the vehicle/variant writes.
//!
//! # Security
//!
//! This crate uses the Supabase **service role** key, which bypasses row
//! level security. Only run it from trusted operator machines.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod services;
pub mod supabase;

pub use backend::{FleetBackend, ObjectStorage};
pub use config::{ConfigError, FleetConfig, SupabaseConfig};
pub use error::AppError;
pub use supabase::{SupabaseClient, SupabaseError};
