use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cleaning::postcode::DEFAULT_EXPECTED_POSTCODES;
use crate::cleaning::{StreetNormalizer, SuffixVocabulary};
use crate::errors::{Error, Result};

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_sample_every() -> usize {
    50
}

/// JSON user config. Only `data_path` is required; the tables default to the
/// built-in Irving, TX ones.
#[derive(Deserialize, Debug, Clone)]
pub struct UserConfig {
    pub data_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub validate: bool,
    #[serde(default)]
    pub progress: bool,
    /// Keep every k-th top-level element when sampling.
    #[serde(default = "default_sample_every")]
    pub sample_every: usize,
    /// Ordered `[problem, replacement]` pairs.
    #[serde(default)]
    pub street_mapping: Option<Vec<(String, String)>>,
    #[serde(default)]
    pub expected_street_suffixes: Option<Vec<String>>,
    #[serde(default)]
    pub expected_postcodes: Option<Vec<String>>,
}

impl UserConfig {
    pub fn new(data_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        UserConfig {
            data_path: data_path.into(),
            output_dir: output_dir.into(),
            validate: false,
            progress: false,
            sample_every: default_sample_every(),
            street_mapping: None,
            expected_street_suffixes: None,
            expected_postcodes: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|err| Error::config(format!("Could not open config file {}: {}", path.display(), err)))?;
        let config: UserConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| Error::config(format!("Could not parse config {}: {}", path.display(), err)))?;
        config.check()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: UserConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.sample_every == 0 {
            return Err(Error::config("sample_every must be at least 1"));
        }
        Ok(())
    }

    pub fn street_normalizer(&self) -> StreetNormalizer {
        match &self.street_mapping {
            Some(mapping) => StreetNormalizer::new(mapping.iter().map(|(k, v)| (k, v))),
            None => StreetNormalizer::default(),
        }
    }

    pub fn suffix_vocabulary(&self) -> SuffixVocabulary {
        match &self.expected_street_suffixes {
            Some(words) => SuffixVocabulary::new(words.iter().cloned()),
            None => SuffixVocabulary::default(),
        }
    }

    pub fn expected_postcodes(&self) -> HashSet<String> {
        match &self.expected_postcodes {
            Some(codes) => codes.iter().cloned().collect(),
            None => DEFAULT_EXPECTED_POSTCODES.iter().map(|code| code.to_string()).collect(),
        }
    }
}
