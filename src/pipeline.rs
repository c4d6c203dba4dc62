//! Drives reader, shaper and sink over a whole document.

use log::{debug, info, trace};

use crate::cleaning::StreetNormalizer;
use crate::data::{EntityBundle, OsmElement};
use crate::errors::Result;
use crate::shape::shape_element;
use crate::sink::{RecordCounts, RecordSink};
use crate::validate::validate_bundle;

/// Shapes every entity and appends its records to `sink`.
///
/// A parse error or, with `validate` set, the first schema violation aborts
/// the run. Whatever was already appended to the sink should be discarded.
pub fn run<I, S>(elements: I, sink: &mut S, normalizer: &StreetNormalizer, validate: bool) -> Result<RecordCounts>
where
    I: IntoIterator<Item = Result<OsmElement>>,
    S: RecordSink + ?Sized,
{
    let mut counts = RecordCounts::default();

    for element in elements {
        let element = element?;
        let Some(bundle) = shape_element(&element, normalizer) else {
            debug!(kind = element.kind.as_str(), id = element.id().unwrap_or_default(); "Skipping entity");
            counts.skipped_relations += 1;
            continue;
        };
        if validate {
            let identity = validate_bundle(&bundle)?;
            trace!(kind = identity.kind.as_str(), id = identity.id, changeset = identity.changeset; "Validated entity");
        }
        write_bundle(&bundle, sink, &mut counts)?;
    }
    sink.flush()?;

    info!(
        nodes = counts.nodes,
        node_tags = counts.node_tags,
        ways = counts.ways,
        way_nodes = counts.way_nodes,
        way_tags = counts.way_tags,
        skipped_relations = counts.skipped_relations;
        "Shaped all entities"
    );
    Ok(counts)
}

fn write_bundle<S: RecordSink + ?Sized>(bundle: &EntityBundle, sink: &mut S, counts: &mut RecordCounts) -> Result<()> {
    match bundle {
        EntityBundle::Node { node, tags } => {
            sink.write_node(node)?;
            counts.nodes += 1;
            for tag in tags {
                sink.write_node_tag(tag)?;
            }
            counts.node_tags += tags.len();
        },
        EntityBundle::Way { way, way_nodes, tags } => {
            sink.write_way(way)?;
            counts.ways += 1;
            for way_node in way_nodes {
                sink.write_way_node(way_node)?;
            }
            counts.way_nodes += way_nodes.len();
            for tag in tags {
                sink.write_way_tag(tag)?;
            }
            counts.way_tags += tags.len();
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::errors::ErrorKind;
    use crate::osm_reader::ElementReader;
    use crate::sink::MemorySink;

    const OSM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm>
  <node id="1" lat="32.85" lon="-96.95" user="Zoë" uid="7" version="2" changeset="11" timestamp="2017-01-01T00:00:00Z">
    <tag k="addr:street" v="N MacArthur Blvd"/>
    <tag k="addr:postcode" v="75063"/>
    <tag k="name" v="N MacArthur Blvd"/>
    <tag k="note;x" v="dropped"/>
  </node>
  <node id="2" lat="32.86" lon="-96.94" user="ann" uid="8" version="1" changeset="12" timestamp="2017-01-02T00:00:00Z"/>
  <way id="10" user="ann" uid="8" version="1" changeset="12" timestamp="2017-01-02T00:00:00Z">
    <nd ref="1"/>
    <tag k="highway" v="residential"/>
    <nd ref="2"/>
    <nd ref="1"/>
  </way>
  <relation id="100" user="ann" uid="8" version="1" changeset="12" timestamp="2017-01-02T00:00:00Z">
    <member type="way" ref="10" role="outer"/>
  </relation>
</osm>
"#;

    fn reader(xml: &str) -> ElementReader<Cursor<&[u8]>> {
        ElementReader::new(Cursor::new(xml.as_bytes()))
    }

    #[test]
    fn fills_all_five_channels() {
        let mut sink = MemorySink::default();
        let counts = run(reader(OSM), &mut sink, &StreetNormalizer::default(), true).unwrap();

        assert_eq!(counts, RecordCounts {
            nodes: 2,
            node_tags: 3,
            ways: 1,
            way_nodes: 3,
            way_tags: 1,
            skipped_relations: 1,
        });
        assert_eq!(sink.nodes[0].user.as_deref(), Some("Zoë"));
        assert_eq!(sink.node_tags[0].value, "N MacArthur Boulevard");
        assert_eq!(sink.node_tags[2].value, "N MacArthur Blvd");
        assert!(sink.node_tags.iter().all(|tag| tag.id == "1"));
        let positions: Vec<(&str, usize)> = sink.way_nodes.iter().map(|n| (n.node_id.as_str(), n.position)).collect();
        assert_eq!(positions, vec![("1", 0), ("2", 1), ("1", 2)]);
        assert_eq!(sink.way_tags[0].tag_type, "regular");
    }

    #[test]
    fn validation_failure_aborts_the_run() {
        let xml = r#"<osm>
  <node id="1" lat="1" lon="2" user="a" uid="1" version="1" changeset="1" timestamp="t"/>
  <node id="2" lat="1" lon="2" user="a" version="1" changeset="1" timestamp="t"/>
  <node id="3" lat="1" lon="2" user="a" uid="1" version="1" changeset="1" timestamp="t"/>
</osm>"#;
        let mut sink = MemorySink::default();
        let err = run(reader(xml), &mut sink, &StreetNormalizer::default(), true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("uid"), "{}", err.message);
        assert_eq!(sink.nodes.len(), 1);
    }

    #[test]
    fn without_validation_incomplete_records_pass_through() {
        let xml = r#"<osm><node id="2" lat="1" lon="2"/></osm>"#;
        let mut sink = MemorySink::default();
        let counts = run(reader(xml), &mut sink, &StreetNormalizer::default(), false).unwrap();
        assert_eq!(counts.nodes, 1);
        assert_eq!(sink.nodes[0].uid, None);
    }

    #[test]
    fn malformed_document_is_fatal() {
        let mut sink = MemorySink::default();
        let err = run(reader("<osm><node id=\"1\">"), &mut sink, &StreetNormalizer::default(), false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Xml);
        assert!(sink.nodes.is_empty());
    }
}
