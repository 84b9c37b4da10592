use std::collections::HashSet;

use super::store::{NodeId, NodeStore};

/// Node ids whose children are disclosed. Shared by both projections.
///
/// Flags are independent per node: collapsing a folder leaves the flags of its
/// descendants alone so they re-apply when the folder is opened again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<NodeId>,
}

impl ExpansionState {
    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: &NodeId) {
        self.expanded.insert(id.clone());
    }

    pub fn collapse(&mut self, id: &NodeId) {
        self.expanded.remove(id);
    }

    pub fn toggle(&mut self, id: &NodeId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    /// Opens every strict ancestor of `index` so the node is disclosed without a filter.
    pub fn reveal(&mut self, store: &NodeStore, index: usize) {
        for ancestor in store.ancestors(index) {
            if let Some(node) = store.by_index(ancestor) {
                self.expanded.insert(node.id.clone());
            }
        }
    }

    pub fn expand_all(&mut self, store: &NodeStore) {
        for (index, node) in store.nodes().iter().enumerate() {
            if !store.children_of(index).is_empty() {
                self.expanded.insert(node.id.clone());
            }
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Sorted snapshot, so exported documents are stable.
    pub fn to_sorted_ids(&self) -> Vec<NodeId> {
        let mut ids = self.expanded.iter().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }
}

impl FromIterator<NodeId> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().collect(),
        }
    }
}
