use crate::graph::DependencyGraph;
use crate::object::ObjectKey;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Unclassified,
    Regular,
    Cycled,
}

/// Outcome of one run over a graph, expressed in arena indices.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Freeable items in the order they were resolved. Every item comes
    /// before the items it references.
    pub regular: Vec<usize>,
    /// Items left on or behind a cycle, in registration order.
    pub cycled: Vec<usize>,
    pub states: Vec<ItemState>,
    pub passes: usize,
}

impl Classification {
    pub fn state(&self, index: usize) -> ItemState {
        self.states
            .get(index)
            .copied()
            .unwrap_or(ItemState::Unclassified)
    }
}

/// Working state of a single classification run.
///
/// `pending[i]` is the number of edges into item `i` whose source has not
/// been resolved yet. An item resolves once that reaches zero.
#[derive(Debug)]
pub struct Collector<'g, K> {
    graph: &'g DependencyGraph<K>,
    pending: Vec<usize>,
    states: Vec<ItemState>,
    regular: Vec<usize>,
    passes: usize,
}

impl<'g, K: ObjectKey> Collector<'g, K> {
    pub fn new(graph: &'g DependencyGraph<K>) -> Self {
        let count = graph.object_count();
        Self {
            graph,
            pending: Vec::with_capacity(count),
            states: vec![ItemState::Unclassified; count],
            regular: Vec::with_capacity(count),
            passes: 0,
        }
    }

    pub fn run(mut self) -> Classification {
        debug!(
            "arranging {} objects with {} dependencies",
            self.graph.object_count(),
            self.graph.reference_count()
        );

        self.seed_pending();

        let mut frontier = self.initial_frontier();
        while !frontier.is_empty() {
            self.passes += 1;
            frontier = self.resolve_pass(frontier);
        }

        let cycled = self.move_cycled();

        debug!(
            "arranged in {} passes: {} regular, {} cycled",
            self.passes,
            self.regular.len(),
            cycled.len()
        );

        Classification {
            regular: self.regular,
            cycled,
            states: self.states,
            passes: self.passes,
        }
    }

    fn seed_pending(&mut self) {
        self.pending = self.graph.incoming_counts();
    }

    fn initial_frontier(&self) -> Vec<usize> {
        (0..self.pending.len())
            .filter(|&idx| self.pending[idx] == 0)
            .collect()
    }

    /// Resolves every item in `frontier` and returns the items that became
    /// unblocked as a result, in registration order.
    fn resolve_pass(&mut self, frontier: Vec<usize>) -> Vec<usize> {
        let graph = self.graph;
        let mut next = Vec::new();

        for idx in frontier {
            debug_assert_eq!(self.pending[idx], 0);
            self.states[idx] = ItemState::Regular;
            self.regular.push(idx);
            trace!("resolved {:?} in pass {}", graph.key(idx), self.passes);

            let Some(item) = graph.get(idx) else {
                continue;
            };

            for &target in &item.dependencies {
                if self.states[target] != ItemState::Unclassified {
                    continue;
                }

                self.pending[target] -= 1;
                if self.pending[target] == 0 {
                    next.push(target);
                }
            }
        }

        next.sort_unstable();
        next
    }

    fn move_cycled(&mut self) -> Vec<usize> {
        let mut cycled = Vec::new();

        for (idx, state) in self.states.iter_mut().enumerate() {
            if *state == ItemState::Unclassified {
                *state = ItemState::Cycled;
                cycled.push(idx);
            }
        }

        cycled
    }
}
