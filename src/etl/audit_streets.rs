use log::{info, warn};
use serde::Serialize;

use crate::audit::{audit_street_types, StreetAudit, StreetFix};
use crate::config::UserConfig;
use crate::errors::Result;
use crate::osm_reader::{ElementReader, OsmSource};

use super::{open_elements, write_json_report, Etl};

pub const ETL_NAME: &str = "audit_streets";
pub const OUTPUT_FILE_NAME: &str = "street_audit.json";

#[derive(Serialize, Debug, Clone)]
pub struct StreetAuditReport {
    #[serde(flatten)]
    pub audit: StreetAudit,
    pub suggestions: Vec<StreetFix>,
}

pub struct StreetAuditEtl<'a> {
    config: &'a UserConfig,
}

impl StreetAuditEtl<'_> {
    pub fn new(config: &UserConfig) -> StreetAuditEtl {
        StreetAuditEtl { config }
    }
}

impl Etl for StreetAuditEtl<'_> {
    type Input = ElementReader<OsmSource>;
    type Output = StreetAuditReport;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn extract(&mut self) -> Result<Self::Input> {
        open_elements(self.config)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        let audit = audit_street_types(input, &self.config.suffix_vocabulary())?;
        let suggestions = audit.suggestions(&self.config.street_normalizer());
        Ok(StreetAuditReport { audit, suggestions })
    }

    fn load(&mut self, output: &Self::Output) -> Result<()> {
        for (suffix, names) in &output.audit.unexpected {
            warn!(etl_name = ETL_NAME, suffix = suffix.as_str(), names = names.len(); "Unexpected street suffix");
        }
        for fix in output.suggestions.iter().filter(|fix| fix.original != fix.normalized) {
            info!(original = fix.original.as_str(), normalized = fix.normalized.as_str(); "Street name fix");
        }
        let path = write_json_report(&self.config.output_dir, OUTPUT_FILE_NAME, output)?;
        info!(
            etl_name = ETL_NAME,
            suffixes = output.audit.unexpected.len(),
            values = output.audit.value_count(),
            path = &*path.to_string_lossy();
            "Wrote street audit"
        );
        Ok(())
    }
}
