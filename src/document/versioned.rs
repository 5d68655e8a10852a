//! Revision-stamped values.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// A process-unique stamp that changes every time a [`Versioned`] value may
/// have been mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(u64);

impl Revision {
    fn next() -> Self {
        Revision(NEXT_REVISION.fetch_add(1, Ordering::Relaxed))
    }
}

/// A value paired with the [`Revision`] of its last mutable access.
///
/// Reads go through `Deref` and never change the revision. [`Versioned::get_mut`]
/// and [`Versioned::set`] always stamp a fresh one, even if the caller ends up
/// writing the same value, so equal revisions imply equal values but not the
/// reverse. Clones keep the revision of the original.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    value: T,
    revision: Revision,
}

impl<T> Versioned<T> {
    pub fn new(value: T) -> Self {
        Versioned {
            value,
            revision: Revision::next(),
        }
    }

    #[inline]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Mutable access; bumps the revision.
    pub fn get_mut(&mut self) -> &mut T {
        self.revision = Revision::next();
        &mut self.value
    }

    /// Replace the value; bumps the revision.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.revision = Revision::next();
    }
}

impl<T> Deref for Versioned<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Default> Default for Versioned<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Versioned<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Compares values only; revisions are bookkeeping.
impl<T: PartialEq> PartialEq for Versioned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
