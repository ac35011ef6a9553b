//! # Attack Graph Model
//!
//! Clean DTOs that define the directed, labeled attack graph.
//! These types cross every boundary: graph view ↔ search engine ↔ user.
//!
//! Design rule: this module is pure data — no I/O, no locks, no async.

pub mod vertex;
pub mod edge;
pub mod path;
pub mod value;
pub mod property_map;

pub use vertex::{Vertex, VertexId, CRITICAL_PROPERTY};
pub use edge::{Edge, EdgeId};
pub use path::AttackPath;
pub use value::Value;
pub use property_map::PropertyMap;
