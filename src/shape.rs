//! Turns one raw entity into flat records.

use crate::cleaning::{classify, KeyClass, StreetNormalizer};
use crate::data::records::REGULAR_TAG_TYPE;
use crate::data::{ElementKind, EntityBundle, NodeRecord, OsmElement, TagRecord, WayNodeRecord, WayRecord};

/// The only tag whose value is rewritten during shaping.
pub const STREET_KEY: &str = "addr:street";

/// `None` for relations. Never fails: rejected tag keys and children missing
/// their defining attributes are dropped.
pub fn shape_element(element: &OsmElement, normalizer: &StreetNormalizer) -> Option<EntityBundle> {
    match element.kind {
        ElementKind::Node => Some(shape_node(element, normalizer)),
        ElementKind::Way => Some(shape_way(element, normalizer)),
        ElementKind::Relation => None,
    }
}

fn shape_node(element: &OsmElement, normalizer: &StreetNormalizer) -> EntityBundle {
    let mut node = NodeRecord::default();
    for (name, value) in element.attributes.iter() {
        node.set(name, value);
    }
    let id = element.id().unwrap_or_default();
    let tags = element.tags()
        .filter_map(|(key, value)| shape_tag(id, key, value, normalizer))
        .collect();

    EntityBundle::Node { node, tags }
}

fn shape_way(element: &OsmElement, normalizer: &StreetNormalizer) -> EntityBundle {
    let mut way = WayRecord::default();
    for (name, value) in element.attributes.iter() {
        way.set(name, value);
    }
    let id = element.id().unwrap_or_default();

    let mut way_nodes = Vec::new();
    let mut tags = Vec::new();
    for child in &element.children {
        if child.is_tag() {
            if let (Some(key), Some(value)) = (child.attributes.get("k"), child.attributes.get("v")) {
                tags.extend(shape_tag(id, key, value, normalizer));
            }
        } else if child.is_node_ref() {
            if let Some(node_id) = child.attributes.get("ref") {
                way_nodes.push(WayNodeRecord {
                    id: id.to_string(),
                    node_id: node_id.to_string(),
                    position: way_nodes.len(),
                });
            }
        }
    }

    EntityBundle::Way { way, way_nodes, tags }
}

fn shape_tag(entity_id: &str, key: &str, value: &str, normalizer: &StreetNormalizer) -> Option<TagRecord> {
    let (tag_type, local_key) = match classify(key) {
        KeyClass::Namespaced { namespace, key } => (namespace, key),
        KeyClass::Plain => (REGULAR_TAG_TYPE, key),
        KeyClass::Rejected => return None,
    };
    let value = if key == STREET_KEY {
        normalizer.normalize(value)
    } else {
        value.to_string()
    };

    Some(TagRecord {
        id: entity_id.to_string(),
        key: local_key.to_string(),
        value,
        tag_type: tag_type.to_string(),
    })
}
