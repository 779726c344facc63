//! Fleet Admin Core - Shared types library.
//!
//! This crate provides common types used across all Fleet Admin components:
//! - `admin` - Vehicle listing editor and Supabase backend client
//! - `cli` - Command-line front end for the listing editor
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, daily rates, and vehicle enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
