//! Raw elements as they come out of the .osm document, before any shaping.

use std::fmt;

/// Top-level entity kinds recognised by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl ElementKind {
    pub fn from_name(name: &[u8]) -> Option<ElementKind> {
        match name {
            b"node" => Some(ElementKind::Node),
            b"way" => Some(ElementKind::Way),
            b"relation" => Some(ElementKind::Relation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes in document order. Values are already unescaped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Attributes(Vec::new())
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Attributes(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A direct child of an entity, e.g. `<tag k=".." v=".."/>` or `<nd ref=".."/>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildElement {
    pub name: String,
    pub attributes: Attributes,
}

impl ChildElement {
    pub fn is_tag(&self) -> bool {
        self.name == "tag"
    }

    pub fn is_node_ref(&self) -> bool {
        self.name == "nd"
    }
}

/// One complete top-level entity with all of its direct children.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmElement {
    pub kind: ElementKind,
    pub attributes: Attributes,
    pub children: Vec<ChildElement>,
}

impl OsmElement {
    pub fn new(kind: ElementKind) -> Self {
        OsmElement {
            kind,
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id")
    }

    /// `(k, v)` pairs of all `<tag>` children, in document order.
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.children.iter()
            .filter(|child| child.is_tag())
            .filter_map(|child| Some((child.attributes.get("k")?, child.attributes.get("v")?)))
    }
}
