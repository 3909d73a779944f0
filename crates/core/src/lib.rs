//! Screw Plus Core - Shared domain types.
//!
//! This crate provides the types used across all Screw Plus components:
//! - `storefront` - Cart/wishlist state, browsing, catalog access
//! - `cli` - Command-line tools for browsing and seeding the catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no network
//! clients. Field names serialize in the camelCase document shape used by the
//! catalog backend.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, statuses, products, orders, addresses and profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
