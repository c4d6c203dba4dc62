//! Read-only passes that collect suspicious values for a human to look at.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::cleaning::postcode::{base_code, is_postcode_key, is_well_formed};
use crate::cleaning::{classify, KeyClass, StreetNormalizer, SuffixVocabulary};
use crate::data::{ElementKind, OsmElement};
use crate::errors::Result;

/// Street names whose trailing token is not a known suffix, grouped by that token.
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct StreetAudit {
    pub unexpected: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StreetFix {
    pub original: String,
    pub normalized: String,
}

impl StreetAudit {
    pub fn value_count(&self) -> usize {
        self.unexpected.values().map(BTreeSet::len).sum()
    }

    /// What the shaper would store for each flagged value.
    pub fn suggestions(&self, normalizer: &StreetNormalizer) -> Vec<StreetFix> {
        self.unexpected.values()
            .flatten()
            .map(|original| StreetFix {
                original: original.clone(),
                normalized: normalizer.normalize(original),
            })
            .collect()
    }
}

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct PostcodeAudit {
    /// Values of postcode tags that aren't `12345` or `12345-6789`.
    pub malformed: BTreeSet<String>,
    /// Well formed `addr:postcode` values outside the expected list, keyed by
    /// their five digit base, with occurrence counts.
    pub out_of_region: BTreeMap<String, usize>,
    pub checked: usize,
}

fn is_street_key(key: &str) -> bool {
    matches!(classify(key), KeyClass::Namespaced { namespace: "addr", key: "street" })
}

fn tagged_entities<I>(elements: I) -> impl Iterator<Item = Result<OsmElement>>
where
    I: IntoIterator<Item = Result<OsmElement>>,
{
    elements.into_iter()
        .filter(|element| !matches!(element, Ok(el) if el.kind == ElementKind::Relation))
}

pub fn audit_street_types<I>(elements: I, vocabulary: &SuffixVocabulary) -> Result<StreetAudit>
where
    I: IntoIterator<Item = Result<OsmElement>>,
{
    let mut audit = StreetAudit::default();
    for element in tagged_entities(elements) {
        let element = element?;
        for (key, value) in element.tags() {
            if !is_street_key(key) {
                continue;
            }
            if let Some(suffix) = vocabulary.unexpected_suffix(value) {
                audit.unexpected
                    .entry(suffix.to_string())
                    .or_default()
                    .insert(value.to_string());
            }
        }
    }
    Ok(audit)
}

pub fn audit_postcodes<I, S>(elements: I, expected: &HashSet<S>) -> Result<PostcodeAudit>
where
    I: IntoIterator<Item = Result<OsmElement>>,
    S: std::borrow::Borrow<str> + std::hash::Hash + Eq,
{
    let mut audit = PostcodeAudit::default();
    for element in tagged_entities(elements) {
        let element = element?;
        for (key, value) in element.tags() {
            if !is_postcode_key(key) {
                continue;
            }
            audit.checked += 1;
            if !is_well_formed(value) {
                audit.malformed.insert(value.to_string());
                continue;
            }
            if key != "addr:postcode" {
                continue;
            }
            if let Some(base) = base_code(value) {
                if !expected.contains(base) {
                    *audit.out_of_region.entry(base.to_string()).or_insert(0) += 1;
                }
            }
        }
    }
    Ok(audit)
}
