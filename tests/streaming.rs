use std::io::{BufReader, Read};

use osm_wrangle::cleaning::StreetNormalizer;
use osm_wrangle::osm_reader::ElementReader;
use osm_wrangle::pipeline;
use osm_wrangle::sink::NullSink;

/// Generates an `<osm>` document with `total` nodes and ways on the fly,
/// without ever holding the whole text.
struct SyntheticOsm {
    total: usize,
    next: usize,
    pending: Vec<u8>,
    pos: usize,
    closed: bool,
}

impl SyntheticOsm {
    fn new(total: usize) -> Self {
        SyntheticOsm {
            total,
            next: 0,
            pending: b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<osm version=\"0.6\">\n".to_vec(),
            pos: 0,
            closed: false,
        }
    }

    fn refill(&mut self) {
        self.pending.clear();
        self.pos = 0;
        if self.next < self.total {
            let id = self.next + 1;
            let entity = if id % 10 == 0 {
                format!(
                    "<way id=\"{id}\" user=\"u\" uid=\"1\" version=\"1\" changeset=\"1\" timestamp=\"t\"><nd ref=\"{}\"/><nd ref=\"{}\"/><tag k=\"highway\" v=\"residential\"/></way>\n",
                    id - 1,
                    id - 2
                )
            } else {
                format!(
                    "<node id=\"{id}\" lat=\"32.8\" lon=\"-96.9\" user=\"u\" uid=\"1\" version=\"1\" changeset=\"1\" timestamp=\"t\"><tag k=\"addr:street\" v=\"{id} Main Ave\"/></node>\n"
                )
            };
            self.pending.extend_from_slice(entity.as_bytes());
            self.next += 1;
        } else if !self.closed {
            self.pending.extend_from_slice(b"</osm>\n");
            self.closed = true;
        }
    }
}

impl Read for SyntheticOsm {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        if self.pos >= self.pending.len() {
            self.refill();
        }
        let n = out.len().min(self.pending.len() - self.pos);
        out[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[test]
#[allow(clippy::while_let_on_iterator)]
fn reader_buffer_does_not_grow_with_document_size() {
    let total = 200_000;
    let mut reader = ElementReader::new(BufReader::new(SyntheticOsm::new(total)));
    let mut seen = 0;
    let mut max_capacity = 0;
    while let Some(element) = reader.next() {
        let element = element.unwrap();
        assert!(!element.children.is_empty());
        seen += 1;
        max_capacity = max_capacity.max(reader.buffer_capacity());
    }
    assert_eq!(seen, total);
    assert!(max_capacity < 1024, "event buffer grew to {max_capacity} bytes");
}

#[test]
fn pipeline_streams_large_documents() {
    let total = 200_000;
    let reader = ElementReader::new(BufReader::new(SyntheticOsm::new(total)));
    let counts = pipeline::run(reader, &mut NullSink, &StreetNormalizer::default(), true).unwrap();

    assert_eq!(counts.ways, total / 10);
    assert_eq!(counts.nodes, total - total / 10);
    assert_eq!(counts.node_tags, counts.nodes);
    assert_eq!(counts.way_nodes, 2 * counts.ways);
    assert_eq!(counts.way_tags, counts.ways);
}
