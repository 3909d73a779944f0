//! Core types for Screw Plus.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod profile;
pub mod status;

pub use address::Address;
pub use id::*;
pub use order::{Order, OrderItem, OrderSummary};
pub use price::{Price, PriceError};
pub use product::{Banner, Category, Product, ProductVariant};
pub use profile::{ProfileUpdate, UserProfile};
pub use status::*;
