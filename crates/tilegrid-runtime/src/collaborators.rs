#![forbid(unsafe_code)]

//! Seams to the outside world: catalog source, selection storage, and the
//! active-item observer.
//!
//! The editor never propagates a [`CollaboratorError`]. Every failure is
//! logged under `tilegrid.persist` and the operation continues with empty or
//! default data. Writes are not retried.

use std::fmt;

use tilegrid_core::item::{Item, ItemId};

/// Failure reported by an external collaborator.
#[derive(Debug)]
pub enum CollaboratorError {
    /// Reading or writing the backing medium failed.
    Io(std::io::Error),
    /// Stored or fetched data could not be decoded.
    Parse(String),
    /// The collaborator is not reachable right now.
    Unavailable(String),
}

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Unavailable(msg) => write!(f, "unavailable: {msg}"),
        }
    }
}

impl std::error::Error for CollaboratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for CollaboratorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Source of every item that may appear in the grid.
pub trait Catalog {
    /// Fetch the full catalog.
    fn fetch(&mut self) -> Result<Vec<Item>, CollaboratorError>;
}

/// Externally owned storage for the selected list and the active id.
pub trait SelectionStore {
    /// Persisted selection, or `None` if nothing was ever saved.
    fn load_selection(&mut self) -> Result<Option<Vec<Item>>, CollaboratorError>;

    /// Persisted active id, or `None` if nothing was ever saved.
    fn load_active_id(&mut self) -> Result<Option<ItemId>, CollaboratorError>;

    fn save_selection(&mut self, items: &[Item]) -> Result<(), CollaboratorError>;

    fn save_active_id(&mut self, id: ItemId) -> Result<(), CollaboratorError>;
}

/// Notified when the user picks a different active item.
pub trait SelectionObserver {
    /// Called once the new active id has been persisted.
    fn on_active_item_changed(&mut self, id: ItemId);
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {
    fn on_active_item_changed(&mut self, _id: ItemId) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_errors_keep_their_source() {
        let err = CollaboratorError::from(std::io::Error::other("disk gone"));
        assert!(err.to_string().contains("disk gone"));
        assert!(err.source().is_some());
    }

    #[test]
    fn parse_errors_have_no_source() {
        let err = CollaboratorError::Parse("bad json".into());
        assert_eq!(err.to_string(), "parse error: bad json");
        assert!(err.source().is_none());
    }
}
