//! Cycle-isolating dependency collector
//!
//! Given a set of caller objects, the external references holding each of them
//! and the references they hold on one another, the collector works out which
//! objects can be released by plain reference counting (and in which order)
//! and which ones are kept alive only by reference cycles. It stores opaque
//! identifiers and never touches the objects themselves.

pub mod collector;
pub mod error;
pub mod ffi;
pub mod gc;
pub mod graph;
pub mod object;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GCStats {
    pub total_tracked: usize,
    pub dependencies: usize,
    pub external_refs: usize,
    pub regular: usize,
    pub cycled: usize,
    pub passes: usize,
    pub collections: usize,
}

pub use collector::ItemState;
pub use error::GCError;
pub use gc::{DEBUG_CYCLED, DEBUG_STATS, GarbageCollector};
pub use object::{ObjectId, ObjectKey};

pub type GCResult<T> = Result<T, GCError>;
