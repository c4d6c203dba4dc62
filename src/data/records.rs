//! Flat records emitted by the shaper. Field order is the column order of the
//! output tables.

use serde::Serialize;

pub const NODE_FIELDS: &[&str] = &["id", "lat", "lon", "user", "uid", "version", "changeset", "timestamp"];
pub const NODE_TAGS_FIELDS: &[&str] = &["id", "key", "value", "type"];
pub const WAY_FIELDS: &[&str] = &["id", "user", "uid", "version", "changeset", "timestamp"];
pub const WAY_TAGS_FIELDS: &[&str] = &["id", "key", "value", "type"];
pub const WAY_NODES_FIELDS: &[&str] = &["id", "node_id", "position"];

/// Tag type used for keys without a namespace.
pub const REGULAR_TAG_TYPE: &str = "regular";

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub user: Option<String>,
    pub uid: Option<String>,
    pub version: Option<String>,
    pub changeset: Option<String>,
    pub timestamp: Option<String>,
}

impl NodeRecord {
    /// Stores `value` if `name` is on the node allow-list. Returns whether it was kept.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "id" => &mut self.id,
            "lat" => &mut self.lat,
            "lon" => &mut self.lon,
            "user" => &mut self.user,
            "uid" => &mut self.uid,
            "version" => &mut self.version,
            "changeset" => &mut self.changeset,
            "timestamp" => &mut self.timestamp,
            _ => return false,
        };
        *slot = Some(value.to_string());
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "lat" => self.lat.as_deref(),
            "lon" => self.lon.as_deref(),
            "user" => self.user.as_deref(),
            "uid" => self.uid.as_deref(),
            "version" => self.version.as_deref(),
            "changeset" => self.changeset.as_deref(),
            "timestamp" => self.timestamp.as_deref(),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct WayRecord {
    pub id: Option<String>,
    pub user: Option<String>,
    pub uid: Option<String>,
    pub version: Option<String>,
    pub changeset: Option<String>,
    pub timestamp: Option<String>,
}

impl WayRecord {
    /// Stores `value` if `name` is on the way allow-list. Returns whether it was kept.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "id" => &mut self.id,
            "user" => &mut self.user,
            "uid" => &mut self.uid,
            "version" => &mut self.version,
            "changeset" => &mut self.changeset,
            "timestamp" => &mut self.timestamp,
            _ => return false,
        };
        *slot = Some(value.to_string());
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "user" => self.user.as_deref(),
            "uid" => self.uid.as_deref(),
            "version" => self.version.as_deref(),
            "changeset" => self.changeset.as_deref(),
            "timestamp" => self.timestamp.as_deref(),
            _ => None,
        }
    }
}

/// A tag attached to a node or a way. `tag_type` is either the key namespace
/// or [`REGULAR_TAG_TYPE`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub tag_type: String,
}

impl TagRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "key" => Some(&self.key),
            "value" => Some(&self.value),
            "type" => Some(&self.tag_type),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WayNodeRecord {
    pub id: String,
    pub node_id: String,
    pub position: usize,
}

/// Everything shaped out of one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityBundle {
    Node {
        node: NodeRecord,
        tags: Vec<TagRecord>,
    },
    Way {
        way: WayRecord,
        way_nodes: Vec<WayNodeRecord>,
        tags: Vec<TagRecord>,
    },
}

impl EntityBundle {
    pub fn tags(&self) -> &[TagRecord] {
        match self {
            EntityBundle::Node { tags, .. } => tags,
            EntityBundle::Way { tags, .. } => tags,
        }
    }
}
