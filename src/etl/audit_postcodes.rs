use log::{info, warn};

use crate::audit::{audit_postcodes, PostcodeAudit};
use crate::config::UserConfig;
use crate::errors::Result;
use crate::osm_reader::{ElementReader, OsmSource};

use super::{open_elements, write_json_report, Etl};

pub const ETL_NAME: &str = "audit_postcodes";
pub const OUTPUT_FILE_NAME: &str = "postcode_audit.json";

pub struct PostcodeAuditEtl<'a> {
    config: &'a UserConfig,
}

impl PostcodeAuditEtl<'_> {
    pub fn new(config: &UserConfig) -> PostcodeAuditEtl {
        PostcodeAuditEtl { config }
    }
}

impl Etl for PostcodeAuditEtl<'_> {
    type Input = ElementReader<OsmSource>;
    type Output = PostcodeAudit;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn extract(&mut self) -> Result<Self::Input> {
        open_elements(self.config)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        audit_postcodes(input, &self.config.expected_postcodes())
    }

    fn load(&mut self, output: &Self::Output) -> Result<()> {
        for value in &output.malformed {
            warn!(etl_name = ETL_NAME, value = value.as_str(); "Malformed postcode");
        }
        for (code, count) in &output.out_of_region {
            warn!(etl_name = ETL_NAME, postcode = code.as_str(), count = *count; "Postcode outside the expected region");
        }
        let path = write_json_report(&self.config.output_dir, OUTPUT_FILE_NAME, output)?;
        info!(
            etl_name = ETL_NAME,
            checked = output.checked,
            malformed = output.malformed.len(),
            out_of_region = output.out_of_region.len(),
            path = &*path.to_string_lossy();
            "Wrote postcode audit"
        );
        Ok(())
    }
}
