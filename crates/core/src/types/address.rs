//! Saved delivery addresses.

use serde::{Deserialize, Serialize};

use super::id::AddressId;
use super::status::AddressType;

/// A delivery address in the shopper's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    #[serde(rename = "type")]
    pub kind: AddressType,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Single-line form used on order screens:
    /// `"{address}, {city}, {state} - {pincode}"`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format!(
            "{}, {}, {} - {}",
            self.address, self.city, self.state, self.pincode
        )
    }
}
