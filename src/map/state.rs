use super::expansion::ExpansionState;
use super::spatial::Positions;
use super::store::NodeStore;

/// Everything that is replaced as a unit by ingestion, import and clear.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapState {
    pub store: NodeStore,
    pub positions: Positions,
    pub expanded: ExpansionState,
}

impl MapState {
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
