//! Audits OpenStreetMap XML extracts and flattens them into five relational
//! tables: nodes, node tags, ways, way node references and way tags.
//!
//! The document is read one entity at a time ([`osm_reader::ElementReader`]),
//! shaped into records ([`shape::shape_element`]) and appended to a
//! [`sink::RecordSink`] by [`pipeline::run`]. The audits in [`audit`] make
//! their own passes over the same reader.

pub mod audit;
pub mod cleaning;
pub mod config;
pub mod data;
pub mod errors;
pub mod etl;
pub mod osm_reader;
pub mod pipeline;
pub mod shape;
pub mod sink;
pub mod validate;
