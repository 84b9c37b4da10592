//! The in-memory map as one unit: nodes, expansion, graph space, filter, selection.
//!
//! Every user-level operation goes through [`Session`]. Bulk replacement (ingest,
//! import, clear) swaps the whole map at once, so a projection never observes
//! nodes from one map with positions or expansion flags from another.

use tracing::{debug, info};

use super::classification::{ClassFilter, Classification};
use super::codec::{self, MapDocument};
use super::error::CodecError;
use super::expansion::ExpansionState;
use super::ingest::{Entry, ingest};
use super::search::{QuickFindHit, quick_find};
use super::spatial::{Point, PointerTarget, SpatialView, ViewTransform};
use super::state::MapState;
use super::store::{MapStats, Node, NodeId, NodeStore};
use super::visibility::{
    Filter, GraphScene, Projection, TreeRow, VisibleSet, graph_scene, tree_rows, visible_nodes,
};

#[derive(Clone, Debug, Default)]
pub struct Session {
    store: NodeStore,
    expanded: ExpansionState,
    spatial: SpatialView,
    filter: Filter,
    selected: Option<NodeId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn replace(&mut self, state: MapState) {
        self.store = state.store;
        self.expanded = state.expanded;
        self.spatial.replace_positions(state.positions);
        self.selected = None;
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn spatial(&self) -> &SpatialView {
        &self.spatial
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.spatial.transform
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_ref().and_then(|id| self.store.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // Bulk replacement

    pub fn ingest_entries(&mut self, entries: &[Entry]) {
        self.replace(ingest(entries));
    }

    /// Replaces the map with a parsed document. On error nothing changes.
    pub fn import_json(&mut self, raw: &str) -> Result<(), CodecError> {
        let state = codec::import(raw)?;
        self.replace(state);
        Ok(())
    }

    /// Swaps in a state that was loaded elsewhere (for example on a worker thread).
    pub fn load(&mut self, state: MapState) {
        info!(nodes = state.store.len(), "loaded map");
        self.replace(state);
    }

    pub fn export(&self) -> MapDocument {
        codec::export_parts(&self.store, &self.spatial.positions, &self.expanded)
    }

    pub fn to_state(&self) -> MapState {
        MapState {
            store: self.store.clone(),
            positions: self.spatial.positions.clone(),
            expanded: self.expanded.clone(),
        }
    }

    /// Drops the map. Filter and view transform are kept.
    pub fn clear(&mut self) {
        info!(nodes = self.store.len(), "cleared map");
        self.replace(MapState::default());
    }

    // Per-node edits

    pub fn classify(&mut self, id: &NodeId, classification: Classification) -> bool {
        let changed = self.store.set_classification(id, classification);
        debug!(node = %id, %classification, changed, "classified node");
        changed
    }

    pub fn annotate(&mut self, id: &NodeId, notes: impl Into<String>) -> bool {
        let changed = self.store.set_notes(id, notes);
        debug!(node = %id, changed, "annotated node");
        changed
    }

    // Expansion

    pub fn toggle_expanded(&mut self, id: &NodeId) -> bool {
        let expanded = self.expanded.toggle(id);
        debug!(node = %id, expanded, "toggled expansion");
        expanded
    }

    pub fn expand_all(&mut self) {
        self.expanded.expand_all(&self.store);
        debug!(expanded = self.expanded.len(), "expanded all");
    }

    pub fn collapse_all(&mut self) {
        self.expanded.collapse_all();
        debug!("collapsed all");
    }

    // Selection

    /// Selects `id`, or clears the selection for `None` or an id not in the map.
    pub fn select(&mut self, id: Option<NodeId>) {
        self.selected = id.filter(|id| self.store.get(id).is_some());
        debug!(selected = ?self.selected, "selection changed");
    }

    /// Selects `id`, opens its ancestors and centres the graph on it.
    pub fn reveal(&mut self, id: &NodeId, canvas_size: Point) -> bool {
        let Some(index) = self.store.index_of(id) else {
            return false;
        };
        self.expanded.reveal(&self.store, index);
        let position = self.spatial.positions.resolve(id);
        self.spatial.transform.center_on(position, canvas_size);
        self.selected = Some(id.clone());
        debug!(node = %id, "revealed node");
        true
    }

    // Filter

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        debug!(search = %self.filter.search, "search changed");
    }

    pub fn set_class_filter(&mut self, classification: ClassFilter) {
        self.filter.classification = classification;
        debug!(filter = %classification, "classification filter changed");
    }

    pub fn toggle_legend(&mut self, classification: Classification) {
        self.set_class_filter(self.filter.classification.toggled(classification));
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        debug!("filters cleared");
    }

    pub fn quick_find(&self, query: &str, limit: usize) -> Vec<QuickFindHit> {
        quick_find(&self.store, query, limit)
    }

    // Projections

    pub fn visible(&self, projection: Projection) -> VisibleSet {
        visible_nodes(projection, &self.store, &self.expanded, &self.filter)
    }

    pub fn tree_rows(&self) -> Vec<TreeRow<'_>> {
        let visible = self.visible(Projection::Tree);
        tree_rows(
            &self.store,
            &self.expanded,
            &self.filter,
            &visible,
            self.selected.as_ref(),
        )
    }

    pub fn graph_scene(&self) -> GraphScene<'_> {
        let visible = self.visible(Projection::Graph);
        graph_scene(
            &self.store,
            &self.expanded,
            &self.filter,
            &visible,
            &self.spatial.positions,
            self.selected.as_ref(),
        )
    }

    pub fn stats(&self) -> MapStats {
        self.store.stats()
    }

    pub fn visible_count(&self) -> usize {
        self.visible(Projection::Graph).len()
    }

    // Graph gestures, in canvas-relative screen coordinates

    pub fn pointer_down(&mut self, target: PointerTarget, pointer: Point) -> bool {
        let target = match target {
            PointerTarget::Node(id) if self.store.get(&id).is_none() => PointerTarget::Canvas,
            other => other,
        };
        self.spatial.begin(target, pointer)
    }

    pub fn pointer_moved(&mut self, pointer: Point) {
        self.spatial.update(pointer);
    }

    pub fn pointer_up(&mut self) {
        self.spatial.end();
    }

    pub fn pointer_left_canvas(&mut self) {
        self.spatial.pointer_left_canvas();
    }

    pub fn cancel_gesture(&mut self) {
        self.spatial.cancel();
    }

    pub fn wheel(&mut self, pointer: Point, delta_y: f64) {
        self.spatial.wheel(pointer, delta_y);
    }

    pub fn zoom_in(&mut self, canvas_size: Point) {
        self.spatial.transform.zoom_in_centered(canvas_size);
    }

    pub fn zoom_out(&mut self, canvas_size: Point) {
        self.spatial.transform.zoom_out_centered(canvas_size);
    }

    pub fn reset_view(&mut self) {
        self.spatial.transform.reset();
        debug!("view reset");
    }
}
