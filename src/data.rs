pub mod osm;
pub mod records;

pub use self::osm::{Attributes, ChildElement, ElementKind, OsmElement};
pub use self::records::{EntityBundle, NodeRecord, TagRecord, WayNodeRecord, WayRecord};
