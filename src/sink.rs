//! Output channels for shaped records. One channel per record kind, each an
//! append-only sequence.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::data::records::{NODE_FIELDS, NODE_TAGS_FIELDS, WAY_FIELDS, WAY_NODES_FIELDS, WAY_TAGS_FIELDS};
use crate::data::{NodeRecord, TagRecord, WayNodeRecord, WayRecord};
use crate::errors::{Error, Result};

pub const NODES_PATH: &str = "nodes.csv";
pub const NODE_TAGS_PATH: &str = "nodes_tags.csv";
pub const WAYS_PATH: &str = "ways.csv";
pub const WAY_NODES_PATH: &str = "ways_nodes.csv";
pub const WAY_TAGS_PATH: &str = "ways_tags.csv";

/// Records appended per channel during one run.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordCounts {
    pub nodes: usize,
    pub node_tags: usize,
    pub ways: usize,
    pub way_nodes: usize,
    pub way_tags: usize,
    pub skipped_relations: usize,
}

pub trait RecordSink {
    fn write_node(&mut self, node: &NodeRecord) -> Result<()>;
    fn write_node_tag(&mut self, tag: &TagRecord) -> Result<()>;
    fn write_way(&mut self, way: &WayRecord) -> Result<()>;
    fn write_way_node(&mut self, way_node: &WayNodeRecord) -> Result<()>;
    fn write_way_tag(&mut self, tag: &TagRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Five CSV tables with a header row each, columns in record field order.
pub struct CsvSink<W: Write> {
    nodes: csv::Writer<W>,
    node_tags: csv::Writer<W>,
    ways: csv::Writer<W>,
    way_nodes: csv::Writer<W>,
    way_tags: csv::Writer<W>,
}

fn csv_writer<W: Write>(inner: W, header: &[&str]) -> Result<csv::Writer<W>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(inner);
    writer.write_record(header)?;
    Ok(writer)
}

impl CsvSink<File> {
    pub fn output_paths(dir: &Path) -> [PathBuf; 5] {
        [NODES_PATH, NODE_TAGS_PATH, WAYS_PATH, WAY_NODES_PATH, WAY_TAGS_PATH].map(|name| dir.join(name))
    }

    /// Creates (or truncates) the five tables in `dir`.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let [nodes, node_tags, ways, way_nodes, way_tags] = Self::output_paths(dir);
        CsvSink::from_writers(
            File::create(nodes)?,
            File::create(node_tags)?,
            File::create(ways)?,
            File::create(way_nodes)?,
            File::create(way_tags)?,
        )
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writers(nodes: W, node_tags: W, ways: W, way_nodes: W, way_tags: W) -> Result<Self> {
        Ok(CsvSink {
            nodes: csv_writer(nodes, NODE_FIELDS)?,
            node_tags: csv_writer(node_tags, NODE_TAGS_FIELDS)?,
            ways: csv_writer(ways, WAY_FIELDS)?,
            way_nodes: csv_writer(way_nodes, WAY_NODES_FIELDS)?,
            way_tags: csv_writer(way_tags, WAY_TAGS_FIELDS)?,
        })
    }

    /// Flushes and hands back the writers in channel order.
    pub fn into_inner(self) -> Result<[W; 5]> {
        let finish = |writer: csv::Writer<W>| writer.into_inner().map_err(|err| Error::from(err.to_string()));
        Ok([
            finish(self.nodes)?,
            finish(self.node_tags)?,
            finish(self.ways)?,
            finish(self.way_nodes)?,
            finish(self.way_tags)?,
        ])
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_node(&mut self, node: &NodeRecord) -> Result<()> {
        Ok(self.nodes.serialize(node)?)
    }

    fn write_node_tag(&mut self, tag: &TagRecord) -> Result<()> {
        Ok(self.node_tags.serialize(tag)?)
    }

    fn write_way(&mut self, way: &WayRecord) -> Result<()> {
        Ok(self.ways.serialize(way)?)
    }

    fn write_way_node(&mut self, way_node: &WayNodeRecord) -> Result<()> {
        Ok(self.way_nodes.serialize(way_node)?)
    }

    fn write_way_tag(&mut self, tag: &TagRecord) -> Result<()> {
        Ok(self.way_tags.serialize(tag)?)
    }

    fn flush(&mut self) -> Result<()> {
        self.nodes.flush()?;
        self.node_tags.flush()?;
        self.ways.flush()?;
        self.way_nodes.flush()?;
        self.way_tags.flush()?;
        Ok(())
    }
}

/// Keeps everything in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub nodes: Vec<NodeRecord>,
    pub node_tags: Vec<TagRecord>,
    pub ways: Vec<WayRecord>,
    pub way_nodes: Vec<WayNodeRecord>,
    pub way_tags: Vec<TagRecord>,
}

impl RecordSink for MemorySink {
    fn write_node(&mut self, node: &NodeRecord) -> Result<()> {
        self.nodes.push(node.clone());
        Ok(())
    }

    fn write_node_tag(&mut self, tag: &TagRecord) -> Result<()> {
        self.node_tags.push(tag.clone());
        Ok(())
    }

    fn write_way(&mut self, way: &WayRecord) -> Result<()> {
        self.ways.push(way.clone());
        Ok(())
    }

    fn write_way_node(&mut self, way_node: &WayNodeRecord) -> Result<()> {
        self.way_nodes.push(way_node.clone());
        Ok(())
    }

    fn write_way_tag(&mut self, tag: &TagRecord) -> Result<()> {
        self.way_tags.push(tag.clone());
        Ok(())
    }
}

/// Drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RecordSink for NullSink {
    fn write_node(&mut self, _node: &NodeRecord) -> Result<()> {
        Ok(())
    }

    fn write_node_tag(&mut self, _tag: &TagRecord) -> Result<()> {
        Ok(())
    }

    fn write_way(&mut self, _way: &WayRecord) -> Result<()> {
        Ok(())
    }

    fn write_way_node(&mut self, _way_node: &WayNodeRecord) -> Result<()> {
        Ok(())
    }

    fn write_way_tag(&mut self, _tag: &TagRecord) -> Result<()> {
        Ok(())
    }
}
