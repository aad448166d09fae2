//! Item × quantity collections.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered item → quantity collection. Zero quantities are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemBank {
    items: BTreeMap<String, u32>,
}

impl ItemBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style add, convenient for fixtures and static tables.
    #[must_use]
    pub fn with(mut self, item: &str, quantity: u32) -> Self {
        self.add(item, quantity);
        self
    }

    pub fn add(&mut self, item: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.items.entry(item.to_string()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    pub fn add_bank(&mut self, other: &Self) {
        for (item, quantity) in other.iter() {
            self.add(item, quantity);
        }
    }

    #[must_use]
    pub fn amount(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn has(&self, item: &str) -> bool {
        self.amount(item) > 0
    }

    /// True when every entry of `other` is covered in full.
    #[must_use]
    pub fn has_all(&self, other: &Self) -> bool {
        other
            .iter()
            .all(|(item, quantity)| self.amount(item) >= quantity)
    }

    /// Entries of `required` this bank cannot cover, with the missing amounts.
    #[must_use]
    pub fn shortfall(&self, required: &Self) -> Self {
        let mut missing = Self::new();
        for (item, quantity) in required.iter() {
            missing.add(item, quantity.saturating_sub(self.amount(item)));
        }
        missing
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.items.iter().map(|(item, quantity)| (item.as_str(), *quantity))
    }
}

impl fmt::Display for ItemBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("No items");
        }
        let mut first = true;
        for (item, quantity) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{quantity}x {item}")?;
        }
        Ok(())
    }
}
