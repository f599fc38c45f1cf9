use crate::collector::{Classification, Collector, ItemState};
use crate::graph::DependencyGraph;
use crate::object::{ObjectId, ObjectKey};
use crate::{GCResult, GCStats};
use log::info;

/// Log a summary after every arrange.
pub const DEBUG_STATS: u32 = 1 << 0;
/// Log every object that ends up cycled.
pub const DEBUG_CYCLED: u32 = 1 << 1;

/// Classifies caller objects into freeable ones and ones stuck in reference
/// cycles.
///
/// Objects are registered with [`add_object`](Self::add_object), references
/// between them with [`add_dependency`](Self::add_dependency). After
/// [`arrange_collection`](Self::arrange_collection) every registered object
/// is either in [`regular_objects`](Self::regular_objects) or in
/// [`cycled_objects`](Self::cycled_objects). The collector never touches the
/// objects themselves.
#[derive(Debug)]
pub struct GarbageCollector<K = ObjectId> {
    graph: DependencyGraph<K>,
    classification: Option<Classification>,
    regular: Vec<K>,
    cycled: Vec<K>,
    collections: usize,
    debug_flags: u32,
}

impl<K: ObjectKey> GarbageCollector<K> {
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::new(),
            classification: None,
            regular: Vec::new(),
            cycled: Vec::new(),
            collections: 0,
            debug_flags: 0,
        }
    }

    /// Registers an object held by one external reference.
    pub fn add_object(&mut self, key: K) -> GCResult<()> {
        self.add_object_with_ref_count(key, 1)
    }

    pub fn add_object_with_ref_count(&mut self, key: K, ref_count: usize) -> GCResult<()> {
        self.graph.add_object(key, ref_count)?;
        self.invalidate();
        Ok(())
    }

    /// Records that `from` holds one reference to `to`. Repeating the call
    /// records another, separate reference.
    pub fn add_dependency(&mut self, from: &K, to: &K) -> GCResult<()> {
        self.graph.add_dependency(from, to)?;
        self.invalidate();
        Ok(())
    }

    /// Classifies every registered object and returns the number of
    /// resolution passes it took.
    pub fn arrange_collection(&mut self) -> usize {
        let classification = Collector::new(&self.graph).run();

        self.regular = classification
            .regular
            .iter()
            .map(|&idx| self.graph.key(idx).clone())
            .collect();
        self.cycled = classification
            .cycled
            .iter()
            .map(|&idx| self.graph.key(idx).clone())
            .collect();

        let passes = classification.passes;
        self.classification = Some(classification);
        self.collections += 1;

        self.report();
        passes
    }

    /// Freeable objects in a valid free order: each object is listed before
    /// the objects it references.
    pub fn regular_objects(&self) -> &[K] {
        &self.regular
    }

    pub fn cycled_objects(&self) -> &[K] {
        &self.cycled
    }

    /// The cycled objects grouped into islands that only reference each
    /// other.
    pub fn cycle_islands(&self) -> Vec<Vec<K>> {
        let Some(classification) = &self.classification else {
            return Vec::new();
        };

        let selected: Vec<bool> = classification
            .states
            .iter()
            .map(|state| *state == ItemState::Cycled)
            .collect();

        self.graph
            .islands(&selected)
            .into_iter()
            .map(|island| {
                island
                    .into_iter()
                    .map(|idx| self.graph.key(idx).clone())
                    .collect()
            })
            .collect()
    }

    pub fn state(&self, key: &K) -> Option<ItemState> {
        let idx = self.graph.index_of(key)?;
        Some(
            self.classification
                .as_ref()
                .map(|c| c.state(idx))
                .unwrap_or(ItemState::Unclassified),
        )
    }

    pub fn is_regular(&self, key: &K) -> bool {
        self.state(key) == Some(ItemState::Regular)
    }

    pub fn is_cycled(&self, key: &K) -> bool {
        self.state(key) == Some(ItemState::Cycled)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.graph.contains(key)
    }

    pub fn ref_count(&self, key: &K) -> Option<usize> {
        self.graph.get_object(key).map(|item| item.get_ref_count())
    }

    pub fn dependencies(&self, key: &K) -> Option<Vec<&K>> {
        self.graph.get_references(key)
    }

    pub fn len(&self) -> usize {
        self.graph.object_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.reference_count()
    }

    /// Forgets every object, dependency and result.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.invalidate();
        self.collections = 0;
    }

    pub fn get_stats(&self) -> GCStats {
        GCStats {
            total_tracked: self.graph.object_count(),
            dependencies: self.graph.reference_count(),
            external_refs: self.graph.total_ref_count(),
            regular: self.regular.len(),
            cycled: self.cycled.len(),
            passes: self.classification.as_ref().map_or(0, |c| c.passes),
            collections: self.collections,
        }
    }

    pub fn set_debug(&mut self, flags: u32) {
        self.debug_flags = flags;
    }

    pub fn get_debug(&self) -> u32 {
        self.debug_flags
    }

    fn invalidate(&mut self) {
        self.classification = None;
        self.regular.clear();
        self.cycled.clear();
    }

    fn report(&self) {
        if self.debug_flags & DEBUG_STATS != 0 {
            let stats = self.get_stats();
            info!(
                "collection {}: {} objects, {} dependencies, {} regular, {} cycled, {} passes",
                stats.collections,
                stats.total_tracked,
                stats.dependencies,
                stats.regular,
                stats.cycled,
                stats.passes
            );
        }

        if self.debug_flags & DEBUG_CYCLED != 0 {
            for key in &self.cycled {
                info!("cycled: {key:?}");
            }
        }
    }
}

impl<K: ObjectKey> Default for GarbageCollector<K> {
    fn default() -> Self {
        Self::new()
    }
}
