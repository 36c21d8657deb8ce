//! Vitrine Core - Shared catalog types.
//!
//! This crate provides the types used across all Vitrine components:
//! - `storefront` - Route table and products API client
//! - `cli` - Command-line driver for the client and route table
//!
//! # Architecture
//!
//! The core crate contains only types and pure lookups - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, the category registry, and product payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
