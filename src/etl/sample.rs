use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use log::info;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::writer::Writer;
use serde::Serialize;

use crate::config::UserConfig;
use crate::data::{Attributes, OsmElement};
use crate::errors::{Error, Result};
use crate::osm_reader::{ElementReader, OsmSource};

use super::{file_size, open_elements, Etl};

pub const ETL_NAME: &str = "sample";
pub const OUTPUT_FILE_NAME: &str = "sample.osm";

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SampleSummary {
    pub read: usize,
    pub written: usize,
}

fn start_tag<'a>(name: &'a str, attributes: &'a Attributes) -> BytesStart<'a> {
    let mut el = BytesStart::new(name);
    for attribute in attributes.iter() {
        el.push_attribute(attribute);
    }
    el
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &OsmElement) -> Result<()> {
    let name = element.kind.as_str();
    let start = start_tag(name, &element.attributes);
    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        writer.write_event(Event::Empty(start_tag(&child.name, &child.attributes)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Writes every `every`-th top-level entity, starting with the first, as a
/// standalone UTF-8 .osm document.
pub fn write_sample<I, W>(elements: I, out: W, every: usize) -> Result<SampleSummary>
where
    I: IntoIterator<Item = Result<OsmElement>>,
    W: Write,
{
    if every == 0 {
        return Err(Error::config("Sample rate must be at least 1"));
    }
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    let mut summary = SampleSummary::default();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("osm")))?;
    for (idx, element) in elements.into_iter().enumerate() {
        let element = element?;
        summary.read += 1;
        if idx % every == 0 {
            write_element(&mut writer, &element)?;
            summary.written += 1;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("osm")))?;
    writer.into_inner().flush()?;
    Ok(summary)
}

pub struct SampleEtl<'a> {
    config: &'a UserConfig,
}

impl SampleEtl<'_> {
    pub fn new(config: &UserConfig) -> SampleEtl {
        SampleEtl { config }
    }

    fn output_path(&self) -> PathBuf {
        self.config.output_dir.join(OUTPUT_FILE_NAME)
    }
}

impl Etl for SampleEtl<'_> {
    type Input = ElementReader<OsmSource>;
    type Output = SampleSummary;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn extract(&mut self) -> Result<Self::Input> {
        open_elements(self.config)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        fs::create_dir_all(&self.config.output_dir)?;
        let file = File::create(self.output_path())?;
        write_sample(input, BufWriter::new(file), self.config.sample_every)
    }

    fn load(&mut self, output: &Self::Output) -> Result<()> {
        info!(
            etl_name = ETL_NAME,
            read = output.read,
            written = output.written,
            every = self.config.sample_every,
            size = file_size(&self.output_path())?.as_str();
            "Wrote sample"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::data::ElementKind;

    const OSM: &str = r#"<osm>
  <node id="1" lat="1" lon="2" user="Zoë"><tag k="name" v="Tom &amp; Jerry"/></node>
  <node id="2" lat="1" lon="2"/>
  <node id="3" lat="1" lon="2"/>
  <way id="4"><nd ref="1"/><nd ref="3"/><tag k="highway" v="service"/></way>
  <node id="5" lat="1" lon="2"/>
  <relation id="6"><member type="node" ref="1" role=""/></relation>
</osm>"#;

    #[test]
    fn keeps_every_kth_element_and_reads_back() {
        let mut out = Vec::new();
        let elements = ElementReader::new(Cursor::new(OSM.as_bytes()));
        let summary = write_sample(elements, &mut out, 3).unwrap();
        assert_eq!(summary, SampleSummary { read: 6, written: 2 });

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));

        let sampled: Vec<OsmElement> = ElementReader::new(Cursor::new(text.as_bytes()))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(sampled.len(), 2);
        assert_eq!(sampled[0].id(), Some("1"));
        assert_eq!(sampled[0].attributes.get("user"), Some("Zoë"));
        assert_eq!(sampled[0].tags().collect::<Vec<_>>(), vec![("name", "Tom & Jerry")]);
        assert_eq!(sampled[1].kind, ElementKind::Way);
        assert_eq!(sampled[1].children.len(), 3);
    }

    #[test]
    fn every_one_copies_everything() {
        let mut out = Vec::new();
        let elements = ElementReader::new(Cursor::new(OSM.as_bytes()));
        let summary = write_sample(elements, &mut out, 1).unwrap();
        assert_eq!(summary.written, 6);
    }

    #[test]
    fn zero_rate_is_rejected() {
        let elements = ElementReader::new(Cursor::new(OSM.as_bytes()));
        assert!(write_sample(elements, Vec::new(), 0).is_err());
    }
}
