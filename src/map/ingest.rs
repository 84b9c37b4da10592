use std::collections::HashMap;

use tracing::{debug, info};

use crate::layout::{ORIGIN, band_positions};

use super::classification::Classification;
use super::expansion::ExpansionState;
use super::spatial::Positions;
use super::state::MapState;
use super::store::{EntryKind, Node, NodeId, NodeStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub path: String,
    pub size_bytes: u64,
}

impl Entry {
    pub fn new(path: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
        }
    }
}

/// Path segment grouping. Children keep first-seen order.
#[derive(Default)]
struct Group {
    name: String,
    kind: Option<EntryKind>,
    size_bytes: u64,
    children: Vec<Group>,
    slot_by_name: HashMap<String, usize>,
}

impl Group {
    fn child(&mut self, name: &str) -> &mut Group {
        let slot = match self.slot_by_name.get(name) {
            Some(&slot) => slot,
            None => {
                self.children.push(Group {
                    name: name.to_owned(),
                    ..Group::default()
                });
                let slot = self.children.len() - 1;
                self.slot_by_name.insert(name.to_owned(), slot);
                slot
            }
        };
        &mut self.children[slot]
    }

    fn mark_folder(&mut self) {
        self.kind = Some(EntryKind::Folder);
        self.size_bytes = 0;
    }

    /// Leaf write. A segment that is already a prefix of other paths stays a folder.
    fn mark_file(&mut self, size_bytes: u64) {
        if self.children.is_empty() {
            self.kind = Some(EntryKind::File);
            self.size_bytes = size_bytes;
        } else {
            debug!(name = %self.name, "leaf entry shadows a folder, keeping folder");
        }
    }
}

/// Converts discovered files into a fresh map: nodes in depth-first pre-order with
/// sequential ids, band layout positions, and roots plus their children expanded.
pub fn ingest(entries: &[Entry]) -> MapState {
    let mut top = Group::default();
    for entry in entries {
        let segments = entry
            .path
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>();
        let Some((leaf, prefix)) = segments.split_last() else {
            debug!(path = %entry.path, "skipping entry without path segments");
            continue;
        };

        let mut current = &mut top;
        for segment in prefix {
            current = current.child(segment);
            current.mark_folder();
        }
        current.child(leaf).mark_file(entry.size_bytes);
    }

    let mut nodes = Vec::new();
    let mut positions = Positions::default();
    emit_children(&top, None, ORIGIN.x, 0, &mut nodes, &mut positions);

    let store = NodeStore::from_forest(nodes);
    let mut expanded = ExpansionState::default();
    for &root in store.root_indices() {
        expanded.expand(&store.nodes()[root].id);
        for &child in store.children_of(root) {
            expanded.expand(&store.nodes()[child].id);
        }
    }

    info!(
        entries = entries.len(),
        nodes = store.len(),
        roots = store.root_indices().len(),
        "ingested filesystem tree"
    );

    MapState {
        store,
        positions,
        expanded,
    }
}

fn emit_children(
    group: &Group,
    parent_id: Option<&NodeId>,
    center_x: f64,
    depth: usize,
    nodes: &mut Vec<Node>,
    positions: &mut Positions,
) {
    let slots = band_positions(center_x, depth, group.children.len());
    for (child, position) in group.children.iter().zip(slots) {
        let id = NodeId::sequential(nodes.len() + 1);
        positions.set(id.clone(), position);
        nodes.push(Node {
            id: id.clone(),
            name: child.name.clone(),
            kind: child.kind.unwrap_or(EntryKind::Folder),
            classification: Classification::Unknown,
            parent_id: parent_id.cloned(),
            size_bytes: child.size_bytes,
            notes: String::new(),
            depth,
        });

        if !child.children.is_empty() {
            emit_children(child, Some(&id), position.x, depth + 1, nodes, positions);
        }
    }
}
