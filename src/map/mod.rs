pub mod classification;
pub mod codec;
pub mod error;
pub mod expansion;
pub mod ingest;
pub mod search;
pub mod session;
pub mod spatial;
pub mod state;
pub mod store;
pub mod visibility;

pub use classification::{ClassFilter, Classification};
pub use error::{CodecError, StoreError};
pub use ingest::Entry;
pub use session::Session;
pub use spatial::{Point, PointerTarget};
pub use state::MapState;
pub use store::{EntryKind, Node, NodeId, NodeStore};
pub use visibility::{Filter, Projection};
