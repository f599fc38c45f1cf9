use crate::GCResult;
use crate::error::GCError;
use crate::object::{ObjectKey, TrackedItem};
use std::collections::{HashMap, VecDeque};

/// Arena of tracked items plus their reference edges.
///
/// Items are addressed by their position in `items`; `index` maps caller keys
/// to positions. `referrers` is the reverse adjacency, one entry per edge.
#[derive(Debug, Clone)]
pub struct DependencyGraph<K> {
    items: Vec<TrackedItem<K>>,
    index: HashMap<K, usize>,
    referrers: Vec<Vec<usize>>,
    edge_count: usize,
}

impl<K: ObjectKey> DependencyGraph<K> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            referrers: Vec::new(),
            edge_count: 0,
        }
    }

    pub fn add_object(&mut self, key: K, ref_count: usize) -> GCResult<usize> {
        if self.index.contains_key(&key) {
            return Err(GCError::duplicate(&key));
        }

        let position = self.items.len();
        self.index.insert(key.clone(), position);
        self.items.push(TrackedItem::new(key, ref_count));
        self.referrers.push(Vec::new());

        Ok(position)
    }

    pub fn add_dependency(&mut self, from: &K, to: &K) -> GCResult<()> {
        let from_idx = self.index_of(from).ok_or_else(|| GCError::unknown(from))?;
        let to_idx = self.index_of(to).ok_or_else(|| GCError::unknown(to))?;

        self.items[from_idx].dependencies.push(to_idx);
        self.referrers[to_idx].push(from_idx);
        self.edge_count += 1;

        Ok(())
    }

    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn get(&self, index: usize) -> Option<&TrackedItem<K>> {
        self.items.get(index)
    }

    pub fn get_object(&self, key: &K) -> Option<&TrackedItem<K>> {
        self.index_of(key).and_then(|idx| self.items.get(idx))
    }

    pub fn key(&self, index: usize) -> &K {
        &self.items[index].key
    }

    pub fn get_references(&self, key: &K) -> Option<Vec<&K>> {
        self.get_object(key).map(|item| {
            item.dependencies
                .iter()
                .map(|&to| &self.items[to].key)
                .collect()
        })
    }

    pub fn get_referrers(&self, key: &K) -> Option<Vec<&K>> {
        self.index_of(key).map(|idx| {
            self.referrers[idx]
                .iter()
                .map(|&from| &self.items[from].key)
                .collect()
        })
    }

    /// Number of incoming edges for every item, indexed like `items`.
    pub fn incoming_counts(&self) -> Vec<usize> {
        self.referrers.iter().map(Vec::len).collect()
    }

    /// Splits the selected items into weakly connected groups, following
    /// edges in both directions but never leaving the selection.
    pub fn islands(&self, selected: &[bool]) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.items.len()];
        let mut islands = Vec::new();

        for start in 0..self.items.len() {
            if !selected[start] || seen[start] {
                continue;
            }

            let mut island = Vec::new();
            let mut queue = VecDeque::new();
            seen[start] = true;
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                island.push(current);

                let neighbours = self.items[current]
                    .dependencies
                    .iter()
                    .chain(self.referrers[current].iter());

                for &next in neighbours {
                    if selected[next] && !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }

            island.sort_unstable();
            islands.push(island);
        }

        islands
    }

    pub fn object_count(&self) -> usize {
        self.items.len()
    }

    pub fn reference_count(&self) -> usize {
        self.edge_count
    }

    pub fn total_ref_count(&self) -> usize {
        self.items.iter().map(TrackedItem::get_ref_count).sum()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.referrers.clear();
        self.edge_count = 0;
    }
}

impl<K: ObjectKey> Default for DependencyGraph<K> {
    fn default() -> Self {
        Self::new()
    }
}
