use crate::layout::connection_anchors;

use super::classification::{ClassFilter, Classification};
use super::expansion::ExpansionState;
use super::spatial::{Point, Positions};
use super::store::{Node, NodeId, NodeStore};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    Tree,
    Graph,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub search: String,
    pub classification: ClassFilter,
}

impl Filter {
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.classification.is_all()
    }

    pub fn matches_search(&self, node: &Node) -> bool {
        self.search.is_empty()
            || node
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    pub fn matches_type(&self, node: &Node) -> bool {
        self.classification.matches(node.classification)
    }

    pub fn matches(&self, node: &Node) -> bool {
        self.matches_search(node) && self.matches_type(node)
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.classification = ClassFilter::All;
    }
}

/// Nodes a projection must draw. Membership is identical for both projections;
/// the tree projection gets depth-first order, the graph projection store order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSet {
    mask: Vec<bool>,
    order: Vec<usize>,
}

impl VisibleSet {
    pub fn contains_index(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    pub fn contains(&self, store: &NodeStore, id: &NodeId) -> bool {
        store
            .index_of(id)
            .is_some_and(|index| self.contains_index(index))
    }

    pub fn indices(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Without an active filter a node is visible when it is a root, or when its parent
/// is both visible and expanded. With a filter the expansion flags are ignored: a
/// node is visible when it matches or when it is a strict ancestor of a match.
pub fn visible_nodes(
    projection: Projection,
    store: &NodeStore,
    expanded: &ExpansionState,
    filter: &Filter,
) -> VisibleSet {
    let mask = if filter.is_active() {
        filtered_mask(store, filter)
    } else {
        expansion_mask(store, expanded)
    };

    let order = match projection {
        Projection::Tree => {
            let mut order = Vec::new();
            let mut stack = store
                .root_indices()
                .iter()
                .rev()
                .copied()
                .filter(|&index| mask[index])
                .collect::<Vec<_>>();
            while let Some(index) = stack.pop() {
                order.push(index);
                stack.extend(
                    store
                        .children_of(index)
                        .iter()
                        .rev()
                        .copied()
                        .filter(|&child| mask[child]),
                );
            }
            order
        }
        Projection::Graph => mask
            .iter()
            .enumerate()
            .filter_map(|(index, &visible)| visible.then_some(index))
            .collect(),
    };

    VisibleSet { mask, order }
}

fn expansion_mask(store: &NodeStore, expanded: &ExpansionState) -> Vec<bool> {
    let mut mask = vec![false; store.len()];
    let mut stack = store.root_indices().to_vec();
    while let Some(index) = stack.pop() {
        mask[index] = true;
        if expanded.is_expanded(&store.nodes()[index].id) {
            stack.extend_from_slice(store.children_of(index));
        }
    }
    mask
}

fn filtered_mask(store: &NodeStore, filter: &Filter) -> Vec<bool> {
    let matches = store
        .nodes()
        .iter()
        .map(|node| filter.matches(node))
        .collect::<Vec<_>>();
    let mut mask = matches.clone();

    // `climbed[i]` means every ancestor of `i` is already in the mask.
    let mut climbed = vec![false; store.len()];
    for (index, _) in matches.iter().enumerate().filter(|&(_, &is_match)| is_match) {
        let mut cursor = index;
        while !climbed[cursor] {
            climbed[cursor] = true;
            let Some(parent) = store.parent_index(cursor) else {
                break;
            };
            mask[parent] = true;
            cursor = parent;
        }
    }
    mask
}

fn visible_child_count(store: &NodeStore, visible: &VisibleSet, index: usize) -> usize {
    store
        .children_of(index)
        .iter()
        .filter(|&&child| visible.contains_index(child))
        .count()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeRow<'a> {
    pub index: usize,
    pub node: &'a Node,
    /// Nesting level among the rendered rows.
    pub indent: usize,
    pub has_children: bool,
    pub is_expanded: bool,
    pub child_count: usize,
    pub visible_child_count: usize,
    /// Total child count, shown on a collapsed folder whose children are not all drawn.
    pub badge: Option<usize>,
    /// False for ancestors drawn only to keep a match reachable.
    pub matches_filter: bool,
    pub is_selected: bool,
}

/// Nested rendering of a tree-ordered visible set, flattened depth-first.
pub fn tree_rows<'a>(
    store: &'a NodeStore,
    expanded: &ExpansionState,
    filter: &Filter,
    visible: &VisibleSet,
    selected: Option<&NodeId>,
) -> Vec<TreeRow<'a>> {
    let filtering = filter.is_active();
    let mut rows = Vec::with_capacity(visible.len());
    let mut stack = store
        .root_indices()
        .iter()
        .rev()
        .filter(|&&index| visible.contains_index(index))
        .map(|&index| (index, 0usize))
        .collect::<Vec<_>>();

    while let Some((index, indent)) = stack.pop() {
        let node = &store.nodes()[index];
        let child_count = store.children_of(index).len();
        let visible_children = visible_child_count(store, visible, index);
        let is_expanded = expanded.is_expanded(&node.id);

        rows.push(TreeRow {
            index,
            node,
            indent,
            has_children: child_count > 0,
            is_expanded,
            child_count,
            visible_child_count: visible_children,
            badge: (!is_expanded && visible_children < child_count).then_some(child_count),
            matches_filter: !filtering || filter.matches(node),
            is_selected: selected == Some(&node.id),
        });

        stack.extend(
            store
                .children_of(index)
                .iter()
                .rev()
                .filter(|&&child| visible.contains_index(child))
                .map(|&child| (child, indent + 1)),
        );
    }

    rows
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNodeView<'a> {
    pub index: usize,
    pub node: &'a Node,
    /// Content-space top-left of the card.
    pub position: Point,
    pub has_children: bool,
    pub is_expanded: bool,
    pub child_count: usize,
    pub visible_child_count: usize,
    pub matches_filter: bool,
    pub is_selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionView {
    pub from: NodeId,
    pub to: NodeId,
    pub from_position: Point,
    pub to_position: Point,
    pub color_key: Classification,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphScene<'a> {
    pub nodes: Vec<GraphNodeView<'a>>,
    pub connections: Vec<ConnectionView>,
}

/// Cards and edges for the graph projection. An edge is drawn only when both ends
/// are visible.
pub fn graph_scene<'a>(
    store: &'a NodeStore,
    expanded: &ExpansionState,
    filter: &Filter,
    visible: &VisibleSet,
    positions: &Positions,
    selected: Option<&NodeId>,
) -> GraphScene<'a> {
    let filtering = filter.is_active();
    let nodes = visible
        .indices()
        .iter()
        .map(|&index| {
            let node = &store.nodes()[index];
            let child_count = store.children_of(index).len();
            GraphNodeView {
                index,
                node,
                position: positions.resolve(&node.id),
                has_children: child_count > 0,
                is_expanded: expanded.is_expanded(&node.id),
                child_count,
                visible_child_count: visible_child_count(store, visible, index),
                matches_filter: !filtering || filter.matches(node),
                is_selected: selected == Some(&node.id),
            }
        })
        .collect();

    let connections = store
        .connections()
        .iter()
        .filter_map(|edge| {
            let from = store.index_of(&edge.from)?;
            let to = store.index_of(&edge.to)?;
            if !visible.contains_index(from) || !visible.contains_index(to) {
                return None;
            }
            let (from_position, to_position) =
                connection_anchors(positions.resolve(&edge.from), positions.resolve(&edge.to));
            Some(ConnectionView {
                from: edge.from.clone(),
                to: edge.to.clone(),
                from_position,
                to_position,
                color_key: store.nodes()[from].classification,
            })
        })
        .collect();

    GraphScene { nodes, connections }
}
