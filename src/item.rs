//! Item definitions
//!
//! The unit of work flowing through the pipeline. An item is immutable once
//! created and is moved, never shared, across queue boundaries: exactly one
//! stage owns an item at any time.

/// A single unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Identity/ordering tag, opaque to the pipeline
    pub key: u64,

    /// Numeric payload the transforms operate on
    pub value: u64,

    /// Selects which transform variant to apply
    pub opcode: u8,
}

impl Item {
    /// Create a new item
    pub fn new(key: u64, value: u64, opcode: u8) -> Self {
        Self { key, value, opcode }
    }

    /// Rebuild this item with a transformed value, preserving key and opcode
    pub(crate) fn with_value(&self, value: u64) -> Self {
        Self { key: self.key, value, opcode: self.opcode }
    }
}
