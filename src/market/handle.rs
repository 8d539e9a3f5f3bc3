//! Relinkable indirection cells for market inputs.
//!
//! A [`RelinkableHandle`] owns a cell that points at the currently active
//! object. Consumers hold a read-only [`Handle`] onto the same cell and
//! dereference it on every use, so relinking is visible to all of them
//! without rebuilding anything.
//!
//! Relinking is serialized by the cell's write lock. Readers get an `Arc`
//! to whatever was linked at the moment of the read; two different cells
//! are not read atomically with respect to each other.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

type Cell<T> = Arc<RwLock<Arc<T>>>;

/// Read-only view onto a relinkable cell.
pub struct Handle<T: ?Sized> {
    link: Cell<T>,
}

impl<T: ?Sized> Handle<T> {
    /// Currently linked object.
    pub fn current(&self) -> Arc<T> {
        let guard = self.link.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle {
            link: Arc::clone(&self.link),
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.current()).finish()
    }
}

/// Owning side of a cell: the only side that can relink it.
pub struct RelinkableHandle<T: ?Sized> {
    link: Cell<T>,
}

impl<T: ?Sized> RelinkableHandle<T> {
    pub fn new(initial: Arc<T>) -> Self {
        RelinkableHandle {
            link: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn link_to(&self, target: Arc<T>) {
        let mut guard = self.link.write().unwrap_or_else(PoisonError::into_inner);
        *guard = target;
    }

    pub fn current(&self) -> Arc<T> {
        self.handle().current()
    }

    /// Read-only handle sharing this cell.
    pub fn handle(&self) -> Handle<T> {
        Handle {
            link: Arc::clone(&self.link),
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for RelinkableHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelinkableHandle").field(&self.current()).finish()
    }
}
