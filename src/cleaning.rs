//! Value level cleaning rules: tag key classification, street name
//! normalization and postal code checks. Everything in here is pure.

pub mod postcode;
pub mod street_name;
pub mod tag_key;

pub use self::street_name::{classify_suffix, StreetNormalizer, SuffixVocabulary};
pub use self::tag_key::{classify, KeyClass};
