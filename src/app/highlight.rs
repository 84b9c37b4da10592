use std::collections::HashSet;

use fwmap::map::{NodeId, NodeStore};

/// Emphasis around the selected node: its chain up to the root and its direct children.
#[derive(Debug, Default)]
pub(super) struct HighlightState {
    pub(super) root_path_nodes: HashSet<usize>,
    pub(super) root_path_edges: HashSet<(usize, usize)>,
    pub(super) child_edges: HashSet<(usize, usize)>,
}

impl HighlightState {
    pub(super) fn edge_emphasis(&self, parent: usize, child: usize) -> Option<EdgeEmphasis> {
        if self.root_path_edges.contains(&(parent, child)) {
            Some(EdgeEmphasis::RootPath)
        } else if self.child_edges.contains(&(parent, child)) {
            Some(EdgeEmphasis::Child)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum EdgeEmphasis {
    RootPath,
    Child,
}

pub(super) fn build_highlight_state(store: &NodeStore, selected: &NodeId) -> Option<HighlightState> {
    let selected_index = store.index_of(selected)?;
    let mut state = HighlightState::default();

    state.root_path_nodes.insert(selected_index);
    let mut cursor = selected_index;
    for ancestor in store.ancestors(selected_index) {
        state.root_path_nodes.insert(ancestor);
        state.root_path_edges.insert((ancestor, cursor));
        cursor = ancestor;
    }

    for &child in store.children_of(selected_index) {
        state.child_edges.insert((selected_index, child));
    }

    Some(state)
}

#[cfg(test)]
mod tests {
    use fwmap::map::ingest::{Entry, ingest};

    use super::*;

    #[test]
    fn root_path_runs_from_selection_to_root() {
        let state = ingest(&[Entry::new("a/b.txt", 1), Entry::new("a/c/d.txt", 1)]);
        let d = state.store.nodes()[3].id.clone();
        let highlight = build_highlight_state(&state.store, &d).unwrap();

        assert_eq!(highlight.root_path_nodes, HashSet::from([0, 2, 3]));
        assert_eq!(highlight.root_path_edges, HashSet::from([(0, 2), (2, 3)]));
        assert!(highlight.child_edges.is_empty());
        assert_eq!(highlight.edge_emphasis(2, 3), Some(EdgeEmphasis::RootPath));
        assert_eq!(highlight.edge_emphasis(0, 1), None);
    }

    #[test]
    fn folders_emphasise_their_children() {
        let state = ingest(&[Entry::new("a/b.txt", 1), Entry::new("a/c/d.txt", 1)]);
        let a = state.store.nodes()[0].id.clone();
        let highlight = build_highlight_state(&state.store, &a).unwrap();
        assert_eq!(highlight.edge_emphasis(0, 1), Some(EdgeEmphasis::Child));
        assert!(build_highlight_state(&state.store, &"missing".into()).is_none());
    }
}
