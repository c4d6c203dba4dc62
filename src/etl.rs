pub mod audit_postcodes;
pub mod audit_streets;
pub mod sample;
pub mod shape_csv;
pub mod tag_census;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::Serialize;

use crate::config::UserConfig;
use crate::errors::Result;
use crate::osm_reader::{open_source, ElementReader, OsmSource};

pub trait Etl {
    type Input;
    type Output;

    fn etl_name(&self) -> &str;

    fn extract(&mut self) -> Result<Self::Input>;
    fn transform(&mut self, input: Self::Input) -> Result<Self::Output>;
    fn load(&mut self, output: &Self::Output) -> Result<()>;

    fn process(&mut self) -> Result<Self::Output> {
        info!(etl_name = self.etl_name(); "Starting ETL process");

        info!(etl_name = self.etl_name(); "Extracting");
        let input = match self.extract() {
            Ok(input) => Ok(input),
            Err(err) => {
                error!(etl_name = self.etl_name(), err = err.message.as_str(); "Extraction failed with error");
                Err(err)
            },
        }?;

        info!(etl_name = self.etl_name(); "Transforming");
        let output = match self.transform(input) {
            Ok(output) => Ok(output),
            Err(err) => {
                error!(etl_name = self.etl_name(), err = err.message.as_str(); "Transformation failed with error");
                Err(err)
            },
        }?;

        info!(etl_name = self.etl_name(); "Loading");
        match self.load(&output) {
            Ok(_) => Ok(()),
            Err(err) => {
                error!(etl_name = self.etl_name(), err = err.message.as_str(); "Loading failed with error");
                Err(err)
            },
        }?;

        info!(etl_name = self.etl_name(); "Process finished");
        Ok(output)
    }
}

fn open_elements(config: &UserConfig) -> Result<ElementReader<OsmSource>> {
    Ok(ElementReader::new(open_source(&config.data_path)?))
}

fn write_json_report<T: Serialize>(dir: &Path, file_name: &str, report: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(path)
}

/// Size in base 1024 units with one decimal, e.g. `50.1 MB`.
pub fn human_size(bytes: u64) -> String {
    let mut num = bytes as f64;
    for unit in ["bytes", "KB", "MB", "GB"] {
        if num < 1024.0 {
            return format!("{:.1} {}", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1} TB", num)
}

fn file_size(path: &Path) -> Result<String> {
    Ok(human_size(fs::metadata(path)?.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_sizes() {
        assert_eq!(human_size(0), "0.0 bytes");
        assert_eq!(human_size(1023), "1023.0 bytes");
        assert_eq!(human_size(1024), "1.0 KB");
        assert_eq!(human_size(52_533_658), "50.1 MB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0 GB");
        assert_eq!(human_size(5 * 1024u64.pow(4)), "5.0 TB");
    }
}
