//! Declared schema for shaped records, checked before records reach a sink.
//!
//! Each record kind has a JSON Schema. Records are serialized with
//! `serde_json`, absent fields are dropped, and the result is checked with
//! `jsonschema`. Numeric attributes arrive from the XML as strings, so their
//! schemas constrain the text with a pattern instead of a JSON number type.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Value};

use crate::data::records::{NODE_FIELDS, NODE_TAGS_FIELDS, WAY_FIELDS, WAY_NODES_FIELDS};
use crate::data::{ElementKind, EntityBundle, NodeRecord, TagRecord, WayNodeRecord, WayRecord};
use crate::errors::{Error, ErrorKind};

const INTEGER_PATTERN: &str = r"^-?[0-9]+$";
const FLOAT_PATTERN: &str = r"^[-+]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][-+]?[0-9]+)?$";

fn integer_text() -> Value {
    json!({ "type": "string", "pattern": INTEGER_PATTERN })
}

fn float_text() -> Value {
    json!({ "type": "string", "pattern": FLOAT_PATTERN })
}

fn text() -> Value {
    json!({ "type": "string" })
}

fn object_schema(fields: &[&str], properties: Value) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": fields,
        "additionalProperties": false,
    })
}

static NODE_SCHEMA_JSON: Lazy<Value> = Lazy::new(|| object_schema(NODE_FIELDS, json!({
    "id": integer_text(),
    "lat": float_text(),
    "lon": float_text(),
    "user": text(),
    "uid": integer_text(),
    "version": text(),
    "changeset": integer_text(),
    "timestamp": text(),
})));

static WAY_SCHEMA_JSON: Lazy<Value> = Lazy::new(|| object_schema(WAY_FIELDS, json!({
    "id": integer_text(),
    "user": text(),
    "uid": integer_text(),
    "version": text(),
    "changeset": integer_text(),
    "timestamp": text(),
})));

static TAG_SCHEMA_JSON: Lazy<Value> = Lazy::new(|| object_schema(NODE_TAGS_FIELDS, json!({
    "id": integer_text(),
    "key": text(),
    "value": text(),
    "type": text(),
})));

static WAY_NODE_SCHEMA_JSON: Lazy<Value> = Lazy::new(|| object_schema(WAY_NODES_FIELDS, json!({
    "id": integer_text(),
    "node_id": integer_text(),
    "position": { "type": "integer", "minimum": 0 },
})));

fn compile(schema: &'static Value) -> JSONSchema {
    JSONSchema::options()
        .compile(schema)
        .expect("record schemas are constant and compile")
}

static NODE_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| compile(&NODE_SCHEMA_JSON));
static WAY_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| compile(&WAY_SCHEMA_JSON));
static TAG_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| compile(&TAG_SCHEMA_JSON));
static WAY_NODE_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| compile(&WAY_NODE_SCHEMA_JSON));

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Record kind, e.g. `node` or `way_tags`.
    pub record: &'static str,
    pub field: &'static str,
    pub detail: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element of type '{}' has an error in field '{}': {}", self.record, self.field, self.detail)
    }
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Error::new(ErrorKind::Validation, value.to_string())
    }
}

/// Typed identity of an entity whose records passed the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityIdentity {
    pub kind: ElementKind,
    pub id: i64,
    pub uid: i64,
    pub changeset: i64,
}

fn static_field(fields: &[&'static str], name: &str) -> &'static str {
    fields.iter().copied().find(|field| *field == name).unwrap_or("")
}

/// Serializes `record` without its absent fields.
fn instance_of<T: Serialize>(record_name: &'static str, record: &T) -> Result<Value, ValidationError> {
    let value = serde_json::to_value(record)
        .map_err(|e| ValidationError { record: record_name, field: "", detail: e.to_string() })?;
    Ok(match value {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => other,
    })
}

/// Reports the first violation `jsonschema` finds.
fn check_record<T: Serialize>(
    record_name: &'static str,
    schema: &JSONSchema,
    fields: &[&'static str],
    record: &T,
) -> Result<(), ValidationError> {
    let instance = instance_of(record_name, record)?;
    let Err(mut errors) = schema.validate(&instance) else {
        return Ok(());
    };
    let Some(error) = errors.next() else {
        return Ok(());
    };
    let (field, detail) = match &error.kind {
        ValidationErrorKind::Required { property } => {
            (static_field(fields, property.as_str().unwrap_or_default()), "required field".to_string())
        },
        _ => {
            let path = error.instance_path.to_string();
            (static_field(fields, path.trim_start_matches('/')), error.to_string())
        },
    };
    Err(ValidationError { record: record_name, field, detail })
}

fn parse_id(record: &'static str, field: &'static str, value: Option<&str>) -> Result<i64, ValidationError> {
    let value = value.unwrap_or_default();
    value.parse::<i64>()
        .map_err(|e| ValidationError { record, field, detail: format!("{value:?} is out of range: {e}") })
}

fn identity<'a>(
    kind: ElementKind,
    record: &'static str,
    get: impl Fn(&str) -> Option<&'a str>,
) -> Result<EntityIdentity, ValidationError> {
    Ok(EntityIdentity {
        kind,
        id: parse_id(record, "id", get("id"))?,
        uid: parse_id(record, "uid", get("uid"))?,
        changeset: parse_id(record, "changeset", get("changeset"))?,
    })
}

pub fn validate_node(node: &NodeRecord) -> Result<EntityIdentity, ValidationError> {
    check_record("node", &NODE_SCHEMA, NODE_FIELDS, node)?;
    identity(ElementKind::Node, "node", |field| node.get(field))
}

pub fn validate_way(way: &WayRecord) -> Result<EntityIdentity, ValidationError> {
    check_record("way", &WAY_SCHEMA, WAY_FIELDS, way)?;
    identity(ElementKind::Way, "way", |field| way.get(field))
}

pub fn validate_tag(record: &'static str, tag: &TagRecord) -> Result<(), ValidationError> {
    check_record(record, &TAG_SCHEMA, NODE_TAGS_FIELDS, tag)
}

pub fn validate_way_node(way_node: &WayNodeRecord) -> Result<(), ValidationError> {
    check_record("way_nodes", &WAY_NODE_SCHEMA, WAY_NODES_FIELDS, way_node)
}

/// Stops at the first failing record.
pub fn validate_bundle(bundle: &EntityBundle) -> Result<EntityIdentity, ValidationError> {
    match bundle {
        EntityBundle::Node { node, tags } => {
            let identity = validate_node(node)?;
            tags.iter().try_for_each(|tag| validate_tag("node_tags", tag))?;
            Ok(identity)
        },
        EntityBundle::Way { way, way_nodes, tags } => {
            let identity = validate_way(way)?;
            way_nodes.iter().try_for_each(validate_way_node)?;
            tags.iter().try_for_each(|tag| validate_tag("way_tags", tag))?;
            Ok(identity)
        },
    }
}
