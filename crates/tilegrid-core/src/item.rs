#![forbid(unsafe_code)]

//! Catalog items shown in grid cells.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an [`Item`].
///
/// Serialized as a bare integer so persisted selections keep the
/// `{ "id": n, "name": "..." }` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// The reserved sentinel id. Always present in the selected section,
    /// never removable, never draggable, never a drop target.
    pub const SENTINEL: Self = Self(0);

    /// Whether this is the sentinel id.
    #[inline]
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        self.0 == Self::SENTINEL.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
}

impl Item {
    /// Create an item.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Whether this item is the sentinel.
    #[inline]
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        self.id.is_sentinel()
    }
}
