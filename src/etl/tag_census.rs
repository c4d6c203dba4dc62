use std::collections::BTreeMap;

use log::info;

use crate::config::UserConfig;
use crate::errors::Result;
use crate::osm_reader::{count_element_names, open_source, OsmSource};

use super::{write_json_report, Etl};

pub const ETL_NAME: &str = "tag_census";
pub const OUTPUT_FILE_NAME: &str = "tag_census.json";

/// How often each element name occurs in the document.
pub struct TagCensusEtl<'a> {
    config: &'a UserConfig,
}

impl TagCensusEtl<'_> {
    pub fn new(config: &UserConfig) -> TagCensusEtl {
        TagCensusEtl { config }
    }
}

impl Etl for TagCensusEtl<'_> {
    type Input = OsmSource;
    type Output = BTreeMap<String, usize>;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn extract(&mut self) -> Result<Self::Input> {
        open_source(&self.config.data_path)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        count_element_names(input)
    }

    fn load(&mut self, output: &Self::Output) -> Result<()> {
        for (name, count) in output {
            info!(etl_name = ETL_NAME, element = name.as_str(), count = *count; "Element count");
        }
        write_json_report(&self.config.output_dir, OUTPUT_FILE_NAME, output)?;
        Ok(())
    }
}
