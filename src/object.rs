use std::ffi::c_void;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Anything a host can use to identify one of its objects.
pub trait ObjectKey: Hash + Eq + Clone + Debug {}

impl<T: Hash + Eq + Clone + Debug> ObjectKey for T {}

/// Opaque handle for a caller object.
///
/// The collector only compares and hashes it. A handle built from a pointer
/// keeps the address as a plain integer and is never turned back into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub id: usize,
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectId {
    /// Allocates a fresh, process-unique handle.
    pub fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(1);
        Self {
            id: COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub const fn from_raw(id: usize) -> Self {
        Self { id }
    }

    pub fn from_ptr(ptr: *const c_void) -> Self {
        Self { id: ptr as usize }
    }

    pub fn as_usize(&self) -> usize {
        self.id
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.id as *mut c_void
    }
}

impl From<usize> for ObjectId {
    fn from(id: usize) -> Self {
        Self::from_raw(id)
    }
}

/// Bookkeeping record for one registered object.
///
/// `dependencies` holds arena indices of the items this one references, one
/// entry per edge, so parallel edges stay distinct.
#[derive(Debug, Clone)]
pub struct TrackedItem<K> {
    pub key: K,
    pub ref_count: usize,
    pub dependencies: Vec<usize>,
}

impl<K: ObjectKey> TrackedItem<K> {
    pub fn new(key: K, ref_count: usize) -> Self {
        Self {
            key,
            ref_count,
            dependencies: Vec::new(),
        }
    }

    pub fn get_ref_count(&self) -> usize {
        self.ref_count
    }

    pub fn depends_on(&self, index: usize) -> bool {
        self.dependencies.contains(&index)
    }
}
