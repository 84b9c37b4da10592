//! `.fmap` interchange documents.
//!
//! A document is a JSON object carrying the nodes, their connections, the graph
//! positions and the expanded ids. Missing or `null` collections read as empty.
//! Parsing builds a complete [`MapState`] before anything is handed back, so a
//! failed import never leaves a half-applied map behind.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::error::CodecError;
use super::expansion::ExpansionState;
use super::spatial::{Point, Positions};
use super::state::MapState;
use super::store::{Connection, Node, NodeId, NodeStore};

pub const FORMAT_VERSION: &str = "1.0";
pub const FILE_EXTENSION: &str = "fmap";

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub export_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: Vec<Connection>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_positions: BTreeMap<NodeId, Point>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expanded_nodes: Vec<NodeId>,
}

/// Snapshot of `state` stamped with the current time.
pub fn export(state: &MapState) -> MapDocument {
    export_parts(&state.store, &state.positions, &state.expanded)
}

pub fn export_parts(
    store: &NodeStore,
    positions: &Positions,
    expanded: &ExpansionState,
) -> MapDocument {
    MapDocument {
        version: FORMAT_VERSION.to_owned(),
        export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        nodes: store.nodes().to_vec(),
        connections: store.connections().to_vec(),
        node_positions: positions
            .iter()
            .map(|(id, position)| (id.clone(), *position))
            .collect(),
        expanded_nodes: expanded.to_sorted_ids(),
    }
}

pub fn to_json(document: &MapDocument) -> Result<String, CodecError> {
    serde_json::to_string_pretty(document).map_err(CodecError::Shape)
}

pub fn import(raw: &str) -> Result<MapState, CodecError> {
    let parsed: Value = serde_json::from_str(raw).map_err(CodecError::Malformed)?;
    if !parsed.is_object() {
        return Err(CodecError::NotAnObject);
    }
    let document = MapDocument::deserialize(parsed).map_err(CodecError::Shape)?;
    from_document(document)
}

pub fn from_document(document: MapDocument) -> Result<MapState, CodecError> {
    let declared = document.connections.iter().cloned().collect::<BTreeSet<_>>();
    let store = NodeStore::from_nodes(document.nodes)?;

    let derived = store.connections().iter().cloned().collect::<BTreeSet<_>>();
    if declared != derived {
        warn!(
            declared = declared.len(),
            derived = derived.len(),
            "document connections disagree with parent links, using parent links"
        );
    }

    let positions = document.node_positions.into_iter().collect();
    let expanded = document.expanded_nodes.into_iter().collect::<ExpansionState>();

    info!(
        version = %document.version,
        nodes = store.len(),
        "imported map document"
    );

    Ok(MapState {
        store,
        positions,
        expanded,
    })
}

pub fn write_file(path: &Path, state: &MapState) -> Result<(), CodecError> {
    write_document(path, &export(state))
}

pub fn write_document(path: &Path, document: &MapDocument) -> Result<(), CodecError> {
    let json = to_json(document)?;
    fs::write(path, json).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), nodes = document.nodes.len(), "exported map document");
    Ok(())
}

pub fn read_file(path: &Path) -> Result<MapState, CodecError> {
    let raw = fs::read_to_string(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    import(&raw)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::map::classification::Classification;
    use crate::map::error::StoreError;
    use crate::map::ingest::{Entry, ingest};

    fn scenario() -> MapState {
        ingest(&[Entry::new("a/b.txt", 10), Entry::new("a/c/d.txt", 2048)])
    }

    fn round_trip(state: &MapState) -> MapState {
        let json = to_json(&export(state)).unwrap();
        import(&json).unwrap()
    }

    #[test]
    fn export_carries_version_and_timestamp() {
        let document = export(&scenario());
        assert_eq!(document.version, FORMAT_VERSION);
        assert!(chrono::DateTime::parse_from_rfc3339(&document.export_date).is_ok());
        assert_eq!(document.connections.len(), 3);
        assert_eq!(document.expanded_nodes.len(), 3);
    }

    #[test]
    fn wire_names_match_the_document_format() {
        let json = to_json(&export(&scenario())).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        for key in ["version", "exportDate", "nodes", "connections", "nodePositions", "expandedNodes"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        let first = &value["nodes"][0];
        assert_eq!(first["type"], "folder");
        assert_eq!(first["nodeType"], "unknown");
        assert!(first["parentId"].is_null());
        assert_eq!(value["nodes"][3]["size"], 2048);
        assert!(value["nodePositions"]["n1"]["x"].is_number());
    }

    #[test]
    fn classification_survives_clear_and_import() {
        let mut state = scenario();
        let d = state.store.nodes()[3].id.clone();
        state.store.set_classification(&d, Classification::Vulnerable);
        let json = to_json(&export(&state)).unwrap();

        state = MapState::default();
        assert!(state.is_empty());

        state = import(&json).unwrap();
        assert_eq!(state.store.get(&d).unwrap().classification, Classification::Vulnerable);
    }

    #[test]
    fn missing_and_null_fields_default_to_empty() {
        let state = import("{}").unwrap();
        assert!(state.is_empty());
        assert!(state.positions.is_empty());
        assert!(state.expanded.is_empty());

        let state = import(r#"{"nodes": null, "nodePositions": null, "expandedNodes": null}"#).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn documents_from_the_browser_tool_load() {
        let raw = r#"{
            "version": "1.0",
            "exportDate": "2024-05-01T10:00:00.000Z",
            "nodes": [
                {"id": "k2j4h1a9z", "name": "squashfs-root", "type": "folder", "nodeType": "unknown", "parentId": null, "size": 0, "notes": "", "depth": 0},
                {"id": "p0q8w7e6r", "name": "telnetd", "type": "file", "nodeType": "bootrun", "parentId": "k2j4h1a9z", "size": 51234, "notes": "started from rcS", "depth": 1}
            ],
            "connections": [{"from": "k2j4h1a9z", "to": "p0q8w7e6r"}],
            "nodePositions": {"k2j4h1a9z": {"x": 510, "y": 80}, "p0q8w7e6r": {"x": 510, "y": 220}},
            "expandedNodes": ["k2j4h1a9z"]
        }"#;
        let state = import(raw).unwrap();
        let telnetd = state.store.get(&"p0q8w7e6r".into()).unwrap();
        assert_eq!(telnetd.classification, Classification::Bootrun);
        assert_eq!(telnetd.notes, "started from rcS");
        assert_eq!(state.positions.get(&"k2j4h1a9z".into()), Some(Point::new(510.0, 80.0)));
        assert!(state.expanded.is_expanded(&"k2j4h1a9z".into()));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(import("not json"), Err(CodecError::Malformed(_))));
        assert!(matches!(import("[1, 2]"), Err(CodecError::NotAnObject)));
        assert!(matches!(import("\"text\""), Err(CodecError::NotAnObject)));
        assert!(matches!(import(r#"{"nodes": 7}"#), Err(CodecError::Shape(_))));
        assert!(matches!(
            import(r#"{"nodes": [{"id": "x", "name": "x", "type": "socket"}]}"#),
            Err(CodecError::Shape(_))
        ));
    }

    #[test]
    fn cyclic_documents_are_rejected() {
        let raw = r#"{"nodes": [
            {"id": "a", "name": "a", "type": "folder", "parentId": "b"},
            {"id": "b", "name": "b", "type": "folder", "parentId": "a"}
        ]}"#;
        assert!(matches!(
            import(raw),
            Err(CodecError::Store(StoreError::ParentCycle(_)))
        ));
    }

    #[test]
    fn connections_are_rebuilt_from_parent_links() {
        let raw = r#"{
            "nodes": [
                {"id": "a", "name": "a", "type": "folder"},
                {"id": "b", "name": "b", "type": "file", "parentId": "a"},
                {"id": "c", "name": "c", "type": "file", "parentId": "gone"}
            ],
            "connections": [{"from": "zzz", "to": "b"}]
        }"#;
        let state = import(raw).unwrap();
        assert_eq!(
            state.store.connections(),
            &[Connection { from: "a".into(), to: "b".into() }]
        );
        assert!(state.store.get(&"c".into()).unwrap().is_root());
    }

    #[test]
    fn files_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("firmware-map.fmap");
        let state = scenario();
        write_file(&path, &state).unwrap();
        assert_eq!(read_file(&path).unwrap(), state);

        let missing = dir.path().join("absent.fmap");
        assert!(matches!(read_file(&missing), Err(CodecError::Io { .. })));
    }

    fn arbitrary_state() -> impl Strategy<Value = MapState> {
        let entry = (
            proptest::collection::vec("[a-e]{1,3}", 1..4),
            0u64..100_000,
        )
            .prop_map(|(segments, size)| Entry::new(segments.join("/"), size));
        (
            proptest::collection::vec(entry, 0..20),
            proptest::collection::vec((any::<prop::sample::Index>(), 0usize..9), 0..6),
            proptest::collection::vec((any::<prop::sample::Index>(), -1e6f64..1e6, -1e6f64..1e6), 0..6),
            proptest::collection::vec(any::<prop::sample::Index>(), 0..6),
        )
            .prop_map(|(entries, classes, moves, toggles)| {
                let mut state = ingest(&entries);
                if state.is_empty() {
                    return state;
                }
                let len = state.store.len();
                for (pick, class) in classes {
                    let id = state.store.nodes()[pick.index(len)].id.clone();
                    state.store.set_classification(&id, Classification::ALL[class]);
                    state.store.set_notes(&id, format!("note {class}"));
                }
                for (pick, x, y) in moves {
                    let id = state.store.nodes()[pick.index(len)].id.clone();
                    state.positions.set(id, Point::new(x, y));
                }
                for pick in toggles {
                    let id = state.store.nodes()[pick.index(len)].id.clone();
                    state.expanded.toggle(&id);
                }
                state
            })
    }

    proptest! {
        #[test]
        fn import_of_export_is_identity(state in arbitrary_state()) {
            prop_assert_eq!(round_trip(&state), state);
        }

        #[test]
        fn connections_match_parent_links_after_import(state in arbitrary_state()) {
            let imported = round_trip(&state);
            let expected = imported
                .store
                .nodes()
                .iter()
                .filter_map(|node| {
                    node.parent_id.clone().map(|from| Connection { from, to: node.id.clone() })
                })
                .collect::<BTreeSet<_>>();
            let actual = imported.store.connections().iter().cloned().collect::<BTreeSet<_>>();
            prop_assert_eq!(actual, expected);
        }
    }
}
