//! Screw Plus storefront library.
//!
//! Client-side state and data access for the Screw Plus fashion storefront:
//! the shared cart and wishlist, list filtering, price helpers, catalog and
//! profile documents, and local preferences. Screens hold an
//! [`AppState`](state::AppState) and read everything through it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address_book;
pub mod browse;
pub mod catalog;
pub mod config;
pub mod error;
pub mod persistence;
pub mod pricing;
pub mod scope;
pub mod state;
pub mod store;

pub use error::{AppError, Result};
