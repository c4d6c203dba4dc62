//! Streaming access to .osm documents.
//!
//! [`ElementReader`] walks the document once and yields complete top-level
//! entities (`node`, `way`, `relation`) with their direct children. Only the
//! entity being assembled is held in memory; the event buffer is cleared
//! before every read.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use xz::bufread::XzDecoder;

use crate::data::{Attributes, ChildElement, ElementKind, OsmElement};
use crate::errors::{Error, ErrorKind, Result};

pub type OsmSource = Box<dyn BufRead + Send>;

/// Opens an .osm file, decompressing on the fly if it ends in `.xz`.
pub fn open_source(path: &Path) -> Result<OsmSource> {
    let file = fs::File::open(path)
        .map_err(|err| Error::new(ErrorKind::Io, format!("Could not open {}: {}", path.display(), err)))?;
    let file_reader = BufReader::new(file);
    if path.extension().map_or(false, |ext| ext == "xz") {
        debug!(path = &*path.to_string_lossy(); "Reading xz compressed input");
        Ok(Box::new(BufReader::new(XzDecoder::new(file_reader))))
    } else {
        Ok(Box::new(file_reader))
    }
}

fn create_xml_reader<R: BufRead>(source: R) -> Reader<R> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);
    reader
}

fn read_attributes(el: &BytesStart) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for attribute_res in el.attributes() {
        let attribute = attribute_res?;
        let key = str::from_utf8(attribute.key.as_ref())?;
        let value = attribute.unescape_value()?;
        attributes.push(key, value.into_owned());
    }
    Ok(attributes)
}

fn read_child(el: &BytesStart) -> Result<ChildElement> {
    Ok(ChildElement {
        name: str::from_utf8(el.name().as_ref())?.to_string(),
        attributes: read_attributes(el)?,
    })
}

fn read_entity(kind: ElementKind, el: &BytesStart) -> Result<OsmElement> {
    let mut entity = OsmElement::new(kind);
    entity.attributes = read_attributes(el)?;
    Ok(entity)
}

/// Single pass, not restartable. After the first error it yields nothing more.
pub struct ElementReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Open elements outside of any entity, e.g. the `<osm>` root.
    depth: usize,
    done: bool,
}

impl<R: BufRead> ElementReader<R> {
    pub fn new(source: R) -> Self {
        ElementReader {
            reader: create_xml_reader(source),
            buf: Vec::new(),
            depth: 0,
            done: false,
        }
    }

    /// Capacity of the event buffer. It tracks the largest single XML event,
    /// never the document.
    pub fn buffer_capacity(&self) -> usize {
        self.buf.capacity()
    }

    fn next_element(&mut self) -> Result<Option<OsmElement>> {
        let mut current: Option<OsmElement> = None;
        // Depth below the entity being assembled; children live at 0.
        let mut child_depth: usize = 0;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Eof => {
                    if let Some(entity) = current {
                        return Err(Error::xml(format!(
                            "Unexpected end of document inside <{}> at byte {}",
                            entity.kind,
                            self.reader.buffer_position()
                        )));
                    }
                    if self.depth > 0 {
                        return Err(Error::xml("Unexpected end of document, root element is not closed"));
                    }
                    return Ok(None);
                },
                Event::Start(e) => match current.as_mut() {
                    None => match ElementKind::from_name(e.name().as_ref()) {
                        Some(kind) => {
                            current = Some(read_entity(kind, &e)?);
                            child_depth = 0;
                        },
                        None => self.depth += 1,
                    },
                    Some(entity) => {
                        if child_depth == 0 {
                            entity.children.push(read_child(&e)?);
                        }
                        child_depth += 1;
                    },
                },
                Event::Empty(e) => match current.as_mut() {
                    None => {
                        if let Some(kind) = ElementKind::from_name(e.name().as_ref()) {
                            return Ok(Some(read_entity(kind, &e)?));
                        }
                    },
                    Some(entity) => {
                        if child_depth == 0 {
                            entity.children.push(read_child(&e)?);
                        }
                    },
                },
                Event::End(_) => {
                    if current.is_none() {
                        self.depth = self.depth.saturating_sub(1);
                    } else if child_depth == 0 {
                        return Ok(current);
                    } else {
                        child_depth -= 1;
                    }
                },
                Event::Text(_) | Event::CData(_) => {
                    return Err(Error::xml(format!(
                        "Didn't expect to see text in OSM file at byte {}",
                        self.reader.buffer_position()
                    )));
                },
                // Declarations, comments, processing instructions and doctypes carry no data.
                _ => (),
            }
        }
    }
}

impl<R: BufRead> Iterator for ElementReader<R> {
    type Item = Result<OsmElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_element() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(err) => {
                self.done = true;
                Some(Err(err))
            },
        }
    }
}

/// Counts every element name in the document, entities and children alike.
pub fn count_element_names<R: BufRead>(source: R) -> Result<BTreeMap<String, usize>> {
    let mut reader = create_xml_reader(source);
    let mut buf = Vec::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) => {
                let qname = e.name();
                let name = str::from_utf8(qname.as_ref())?;
                *counts.entry(name.to_string()).or_insert(0) += 1;
            },
            _ => (),
        }
        buf.clear();
    }
    Ok(counts)
}
