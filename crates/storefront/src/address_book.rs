//! The shopper's saved delivery addresses.

use screw_plus_core::Address;

/// Ordered address list with exactly one default whenever it is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            addresses: Vec::new(),
        }
    }

    /// Build from stored addresses, repairing the default flag if needed.
    /// Later entries with an already-seen id are dropped.
    #[must_use]
    pub fn from_addresses(mut addresses: Vec<Address>) -> Self {
        let mut seen = std::collections::HashSet::new();
        addresses.retain(|a| seen.insert(a.id.clone()));
        let mut book = Self { addresses };
        let default_id = book
            .addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| book.addresses.first())
            .map(|a| a.id.clone());
        if let Some(id) = default_id {
            book.set_default(id.as_str());
        }
        book
    }

    /// Add an address, replacing any saved address with the same id in
    /// place. The first address, or one flagged as default, becomes the
    /// default; replacing the current default keeps it the default.
    pub fn add(&mut self, mut address: Address) {
        let id = address.id.clone();
        let existing = self.addresses.iter().position(|a| a.id == id);
        let was_default = existing
            .and_then(|pos| self.addresses.get(pos))
            .is_some_and(|a| a.is_default);
        let make_default = self.addresses.is_empty() || address.is_default || was_default;

        address.is_default = false;
        match existing.and_then(|pos| self.addresses.get_mut(pos)) {
            Some(slot) => *slot = address,
            None => self.addresses.push(address),
        }

        if make_default {
            self.set_default(id.as_str());
        }
    }

    /// Remove an address. If it was the default, the first remaining address
    /// takes over.
    pub fn remove(&mut self, id: &str) -> Option<Address> {
        let pos = self.addresses.iter().position(|a| a.id.as_str() == id)?;
        let removed = self.addresses.remove(pos);
        if removed.is_default
            && let Some(first) = self.addresses.first_mut()
        {
            first.is_default = true;
        }
        Some(removed)
    }

    /// Make `id` the only default. Returns `false` if no such address exists.
    pub fn set_default(&mut self, id: &str) -> bool {
        let Some(pos) = self.addresses.iter().position(|a| a.id.as_str() == id) else {
            return false;
        };
        for (i, address) in self.addresses.iter_mut().enumerate() {
            address.is_default = i == pos;
        }
        true
    }

    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id.as_str() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
