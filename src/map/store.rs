use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::classification::Classification;
use super::error::StoreError;

/// Opaque node identity. Ingested maps use `n<counter>`; imported maps keep whatever
/// strings the document carried.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn sequential(counter: usize) -> Self {
        Self(format!("n{counter}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// One filesystem entry. Field names follow the `.fmap` document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(rename = "nodeType", default)]
    pub classification: Classification,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub depth: usize,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapStats {
    pub total: usize,
    pub folders: usize,
    pub files: usize,
    pub classified: usize,
}

/// Flat node collection plus the indexes derived from it.
///
/// Membership only changes wholesale (construction or [`NodeStore::clear`]), and every
/// constructor goes through `assemble`, so the connections always equal the parent links.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStore {
    nodes: Vec<Node>,
    index_by_id: HashMap<NodeId, usize>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    connections: Vec<Connection>,
}

impl NodeStore {
    /// Builds the store, rejecting duplicate ids and parent cycles. A parent id that
    /// names no node is dropped and the node becomes a root.
    pub fn from_nodes(mut nodes: Vec<Node>) -> Result<Self, StoreError> {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if index_by_id.insert(node.id.clone(), index).is_some() {
                return Err(StoreError::DuplicateId(node.id.clone()));
            }
        }

        for node in &mut nodes {
            if let Some(parent_id) = &node.parent_id
                && !index_by_id.contains_key(parent_id)
            {
                warn!(node = %node.id, parent = %parent_id, "detaching node from unknown parent");
                node.parent_id = None;
            }
        }

        let store = Self::assemble(nodes, index_by_id);

        // Every node has at most one parent, so anything unreachable from a root
        // sits on (or hangs off) a cycle.
        let mut reached = vec![false; store.nodes.len()];
        let mut queue = store.roots.iter().copied().collect::<VecDeque<_>>();
        while let Some(index) = queue.pop_front() {
            reached[index] = true;
            queue.extend(store.children[index].iter().copied());
        }
        if let Some(index) = reached.iter().position(|seen| !seen) {
            return Err(StoreError::ParentCycle(store.nodes[index].id.clone()));
        }

        Ok(store)
    }

    /// Ingester output: unique ids and a forest by construction.
    pub(crate) fn from_forest(nodes: Vec<Node>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        Self::assemble(nodes, index_by_id)
    }

    fn assemble(nodes: Vec<Node>, index_by_id: HashMap<NodeId, usize>) -> Self {
        let mut children = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            match node.parent_id.as_ref().and_then(|id| index_by_id.get(id)) {
                Some(&parent) => children[parent].push(index),
                None => roots.push(index),
            }
        }

        let connections = nodes
            .iter()
            .filter_map(|node| {
                node.parent_id.as_ref().map(|parent| Connection {
                    from: parent.clone(),
                    to: node.id.clone(),
                })
            })
            .collect();

        Self {
            nodes,
            index_by_id,
            children,
            roots,
            connections,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn by_index(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn root_indices(&self) -> &[usize] {
        &self.roots
    }

    pub fn children_of(&self, index: usize) -> &[usize] {
        self.children.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn child_count(&self, id: &NodeId) -> usize {
        self.index_of(id)
            .map(|index| self.children_of(index).len())
            .unwrap_or(0)
    }

    pub fn has_children(&self, id: &NodeId) -> bool {
        self.child_count(id) > 0
    }

    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.nodes
            .get(index)?
            .parent_id
            .as_ref()
            .and_then(|id| self.index_of(id))
    }

    /// Strict ancestors of `index`, nearest first.
    pub fn ancestors(&self, index: usize) -> Ancestors<'_> {
        Ancestors {
            store: self,
            cursor: self.parent_index(index),
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn set_classification(&mut self, id: &NodeId, classification: Classification) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.nodes[index].classification = classification;
        true
    }

    pub fn set_notes(&mut self, id: &NodeId, notes: impl Into<String>) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.nodes[index].notes = notes.into();
        true
    }

    pub fn stats(&self) -> MapStats {
        let folders = self.nodes.iter().filter(|node| node.is_folder()).count();
        MapStats {
            total: self.nodes.len(),
            folders,
            files: self.nodes.len() - folders,
            classified: self
                .nodes
                .iter()
                .filter(|node| node.classification != Classification::Unknown)
                .count(),
        }
    }
}

pub struct Ancestors<'a> {
    store: &'a NodeStore,
    cursor: Option<usize>,
}

impl Iterator for Ancestors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.cursor?;
        self.cursor = self.store.parent_index(current);
        Some(current)
    }
}

#[cfg(test)]
pub(crate) fn node(id: &str, name: &str, kind: EntryKind, parent: Option<&str>) -> Node {
    Node {
        id: NodeId::from(id),
        name: name.to_owned(),
        kind,
        classification: Classification::Unknown,
        parent_id: parent.map(NodeId::from),
        size_bytes: 0,
        notes: String::new(),
        depth: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NodeStore {
        NodeStore::from_nodes(vec![
            node("a", "etc", EntryKind::Folder, None),
            node("b", "passwd", EntryKind::File, Some("a")),
            node("c", "init.d", EntryKind::Folder, Some("a")),
            node("d", "rcS", EntryKind::File, Some("c")),
            node("e", "bin", EntryKind::Folder, None),
        ])
        .unwrap()
    }

    #[test]
    fn adjacency_and_connections_follow_parent_links() {
        let store = sample();
        assert_eq!(store.root_indices(), &[0, 4]);
        assert_eq!(store.children_of(0), &[1, 2]);
        assert_eq!(store.child_count(&"c".into()), 1);
        assert!(!store.has_children(&"b".into()));

        let edges = store
            .connections()
            .iter()
            .map(|edge| (edge.from.as_str(), edge.to.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(edges, vec![("a", "b"), ("a", "c"), ("c", "d")]);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let store = sample();
        let d = store.index_of(&"d".into()).unwrap();
        assert_eq!(store.ancestors(d).collect::<Vec<_>>(), vec![2, 0]);
        assert_eq!(store.ancestors(0).count(), 0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = NodeStore::from_nodes(vec![
            node("a", "x", EntryKind::Folder, None),
            node("a", "y", EntryKind::File, None),
        ]);
        assert_eq!(result, Err(StoreError::DuplicateId("a".into())));
    }

    #[test]
    fn cycles_are_rejected() {
        let result = NodeStore::from_nodes(vec![
            node("root", "r", EntryKind::Folder, None),
            node("x", "x", EntryKind::Folder, Some("y")),
            node("y", "y", EntryKind::Folder, Some("x")),
        ]);
        assert_eq!(result, Err(StoreError::ParentCycle("x".into())));

        let self_loop = NodeStore::from_nodes(vec![node("s", "s", EntryKind::Folder, Some("s"))]);
        assert_eq!(self_loop, Err(StoreError::ParentCycle("s".into())));
    }

    #[test]
    fn unknown_parent_becomes_root() {
        let store = NodeStore::from_nodes(vec![
            node("a", "a", EntryKind::Folder, None),
            node("b", "b", EntryKind::File, Some("missing")),
        ])
        .unwrap();
        assert!(store.get(&"b".into()).unwrap().is_root());
        assert_eq!(store.root_indices(), &[0, 1]);
        assert!(store.connections().is_empty());
    }

    #[test]
    fn in_place_edits_and_stats() {
        let mut store = sample();
        assert!(store.set_classification(&"d".into(), Classification::Bootrun));
        assert!(store.set_notes(&"d".into(), "starts telnetd"));
        assert!(!store.set_notes(&"zzz".into(), "nothing"));

        let d = store.get(&"d".into()).unwrap();
        assert_eq!(d.classification, Classification::Bootrun);
        assert_eq!(d.notes, "starts telnetd");

        let stats = store.stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.folders, 3);
        assert_eq!(stats.files, 2);
        assert_eq!(stats.classified, 1);

        store.clear();
        assert!(store.is_empty());
        assert!(store.connections().is_empty());
    }
}
