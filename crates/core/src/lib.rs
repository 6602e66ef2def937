//! Kifaru Core - Shared types library.
//!
//! This crate provides common types used across all Kifaru Motors components:
//! - `api` - JSON REST API serving the storefront and the admin dashboard
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and the listing
//!   vocabulary enums (status, condition, engine type, transmission, body type)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
