use log::info;
use tqdm::tqdm;

use crate::cleaning::StreetNormalizer;
use crate::config::UserConfig;
use crate::errors::Result;
use crate::osm_reader::{ElementReader, OsmSource};
use crate::pipeline;
use crate::sink::{CsvSink, RecordCounts};

use super::{file_size, open_elements, write_json_report, Etl};

pub const ETL_NAME: &str = "shape_csv";
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Flattens the document into the five CSV tables.
pub struct ShapeCsvEtl<'a> {
    config: &'a UserConfig,
    normalizer: StreetNormalizer,
}

impl ShapeCsvEtl<'_> {
    pub fn new(config: &UserConfig) -> ShapeCsvEtl {
        ShapeCsvEtl {
            config,
            normalizer: config.street_normalizer(),
        }
    }
}

impl Etl for ShapeCsvEtl<'_> {
    type Input = ElementReader<OsmSource>;
    type Output = RecordCounts;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn extract(&mut self) -> Result<Self::Input> {
        open_elements(self.config)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        let mut sink = CsvSink::create(&self.config.output_dir)?;
        if self.config.progress {
            pipeline::run(tqdm(input), &mut sink, &self.normalizer, self.config.validate)
        } else {
            pipeline::run(input, &mut sink, &self.normalizer, self.config.validate)
        }
    }

    fn load(&mut self, output: &Self::Output) -> Result<()> {
        let summary_path = write_json_report(&self.config.output_dir, SUMMARY_FILE_NAME, output)?;
        info!(etl_name = ETL_NAME, path = &*summary_path.to_string_lossy(); "Wrote summary");

        info!(
            etl_name = ETL_NAME,
            path = &*self.config.data_path.to_string_lossy(),
            size = file_size(&self.config.data_path)?.as_str();
            "Input file size"
        );
        for path in CsvSink::output_paths(&self.config.output_dir) {
            info!(
                etl_name = ETL_NAME,
                path = &*path.to_string_lossy(),
                size = file_size(&path)?.as_str();
                "Output file size"
            );
        }
        Ok(())
    }
}
