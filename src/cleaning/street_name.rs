//! Street name normalization and suffix classification.
//!
//! The correction table is an ordered list of `(problem, replacement)` pairs.
//! Single token keys (`"Ave"`, `" Rd"`, `"St."`) expand the trailing token of a
//! street name. Keys made of several tokens are whole phrase corrections for
//! addresses that don't follow a general rule. Phrases are tried longest
//! first and at most one rewrite is applied per value.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

static STREET_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b\S+\.?$").unwrap());

pub const DEFAULT_STREET_MAPPING: &[(&str, &str)] = &[
    ("St", "Street"),
    ("St.", "Street"),
    ("Ave", "Avenue"),
    ("Ave.", "Avenue"),
    ("Blvd.", "Boulevard"),
    ("Blvd", "Boulevard"),
    ("Dr.", "Drive"),
    (" Dr", " Drive"),
    ("Ln", "Lane"),
    ("Pkwy", "Parkway"),
    ("Rd.", "Road"),
    (" Rd", " Road"),
    ("I-635", "I-635 Interstate Highway"),
    ("Las Colinas Blvd E", "E Las Colinas Boulevard"),
    ("W Pioneer Dr", "W Pioneer Drive"),
    ("Golden Gate Dr.", "Golden Gate Drive"),
    ("1421 Golden Gate Dr.", "1421 Golden Gate Drive"),
    ("Francis St", "Francis Street"),
    ("North Loop 12", "US 12 Highway"),
    ("North Highway 121", "US 121 Highway"),
    ("State Hwy 121", "US 121 Highway"),
    ("Business 121", "US 121 Highway"),
    ("E Sandy Lake Rd #140", "#140 E Sandy Lake Road"),
    ("N Interstate 35E #207", "#207 I-35 Highway"),
    ("S Interstate 35E", "I-35 Highway"),
    ("Luna Road #700", "#700 Luna Road"),
    ("East Technology Boulevard;Technology Boulevard East", "E Technology Boulevard"),
    ("Technology Boulevard East", "E Technology Boulevard"),
    ("Valley Ranch Parkway East", "E Valley Ranch Parkway"),
    ("Valley Ranch Parkway South", "S Valley Ranch Parkway"),
    ("Backbay Drive West", "W Backbay Drive"),
    ("East Technology Boulevard;Technology Boulevard West", "Technology Boulevard"),
    ("East Technology Boulevard;E Technology Boulevard", "Technology Boulevard"),
    ("Lago Vista West", "W Lago Vista"),
    ("Story Road West", "W Story Road"),
];

/// USPS street suffixes, singular and plural, plus "Tollway".
pub const DEFAULT_EXPECTED_SUFFIXES: &[&str] = &[
    "Alley", "Annex", "Arcade", "Avenue", "Bayou", "Beach", "Bend", "Bluff", "Bluffs", "Bottom",
    "Boulevard", "Branch", "Bridge", "Brook", "Brooks", "Burg", "Burgs", "Bypass", "Camp", "Canyon",
    "Cape", "Causeway", "Center", "Centers", "Circle", "Circles", "Cliff", "Cliffs", "Club", "Common",
    "Commons", "Corner", "Corners", "Course", "Court", "Courts", "Cove", "Coves", "Creek", "Crescent",
    "Crest", "Crossing", "Crossroad", "Crossroads", "Curve", "Dale", "Dam", "Divide", "Drive", "Drives",
    "Estate", "Estates", "Expressway", "Extension", "Extensions", "Fall", "Falls", "Ferry", "Field", "Fields",
    "Flat", "Flats", "Ford", "Fords", "Forest", "Forge", "Forges", "Fork", "Forks", "Fort",
    "Freeway", "Garden", "Gardens", "Gateway", "Glen", "Glens", "Green", "Greens", "Grove", "Groves",
    "Harbor", "Harbors", "Haven", "Heights", "Highway", "Hill", "Hills", "Hollow", "Inlet", "Island",
    "Islands", "Isle", "Junction", "Junctions", "Key", "Keys", "Knoll", "Knolls", "Lake", "Lakes",
    "Land", "Landing", "Lane", "Light", "Lights", "Loaf", "Lock", "Locks", "Lodge", "Loop",
    "Mall", "Manor", "Manors", "Meadow", "Meadows", "Mews", "Mill", "Mills", "Mission", "Motorway",
    "Mount", "Mountain", "Mountains", "Neck", "Orchard", "Oval", "Overpass", "Park", "Parks", "Parkway",
    "Parkways", "Pass", "Passage", "Path", "Pike", "Pine", "Pines", "Place", "Plain", "Plains",
    "Plaza", "Point", "Points", "Port", "Ports", "Prairie", "Radial", "Ramp", "Ranch", "Rapid",
    "Rapids", "Rest", "Ridge", "Ridges", "River", "Road", "Roads", "Route", "Row", "Rue",
    "Run", "Shoal", "Shoals", "Shore", "Shores", "Skyway", "Spring", "Springs", "Spur", "Square",
    "Squares", "Station", "Stravenue", "Stream", "Street", "Streets", "Summit", "Terrace", "Throughway", "Trace",
    "Track", "Trafficway", "Trail", "Trailer", "Tunnel", "Turnpike", "Underpass", "Union", "Unions", "Valley",
    "Valleys", "Viaduct", "View", "Views", "Village", "Villages", "Ville", "Vista", "Walk", "Wall",
    "Way", "Ways", "Well", "Wells", "Tollway",
];

/// Trailing token of a street name, e.g. `"Ave."` for `"100 Main Ave."`.
pub fn classify_suffix(value: &str) -> Option<&str> {
    STREET_TYPE.find(value).map(|m| m.as_str())
}

#[derive(Debug, Clone)]
pub struct SuffixVocabulary {
    words: HashSet<String>,
}

impl SuffixVocabulary {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SuffixVocabulary {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, suffix: &str) -> bool {
        self.words.contains(suffix)
    }

    /// The trailing token of `value` if it is not a recognised suffix.
    pub fn unexpected_suffix<'a>(&self, value: &'a str) -> Option<&'a str> {
        classify_suffix(value).filter(|suffix| !self.contains(suffix))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for SuffixVocabulary {
    fn default() -> Self {
        SuffixVocabulary::new(DEFAULT_EXPECTED_SUFFIXES.iter().copied())
    }
}

#[derive(Debug, Clone)]
pub struct StreetNormalizer {
    /// Sorted by key length, longest first. Ties keep table order.
    phrases: Vec<(String, String)>,
    tokens: HashMap<String, String>,
}

impl StreetNormalizer {
    pub fn new<I, K, V>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut phrases = Vec::new();
        let mut tokens = HashMap::new();
        for (problem, replacement) in mapping {
            let problem = problem.as_ref().trim();
            let replacement = replacement.as_ref().trim();
            if problem.is_empty() {
                continue;
            }
            if problem.split_whitespace().nth(1).is_some() || problem.contains(';') {
                phrases.push((problem.to_string(), replacement.to_string()));
            } else {
                // First entry for a token wins, like a table scan would.
                tokens.entry(problem.to_string()).or_insert_with(|| replacement.to_string());
            }
        }
        phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        StreetNormalizer { phrases, tokens }
    }

    /// Applies at most one phrase correction, then expands the trailing token.
    pub fn normalize(&self, value: &str) -> String {
        match self.rewrite_phrase(value) {
            Some(fixed) => self.rewrite_trailing_token(&fixed).unwrap_or(fixed),
            None => self.rewrite_trailing_token(value).unwrap_or_else(|| value.to_string()),
        }
    }

    fn rewrite_phrase(&self, value: &str) -> Option<String> {
        for (problem, replacement) in &self.phrases {
            if let Some(start) = find_bounded(value, problem) {
                let end = start + problem.len();
                return Some(format!("{}{}{}", &value[..start], replacement, &value[end..]));
            }
        }
        None
    }

    fn rewrite_trailing_token(&self, value: &str) -> Option<String> {
        let trimmed = value.trim_end();
        let start = trimmed.rfind(char::is_whitespace).map_or(0, |idx| {
            idx + trimmed[idx..].chars().next().map_or(1, char::len_utf8)
        });
        let replacement = self.tokens.get(&trimmed[start..])?;
        Some(format!("{}{}", &trimmed[..start], replacement))
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

impl Default for StreetNormalizer {
    fn default() -> Self {
        StreetNormalizer::new(DEFAULT_STREET_MAPPING.iter().copied())
    }
}

/// First occurrence of `needle` delimited by whitespace or the ends of `haystack`.
fn find_bounded(haystack: &str, needle: &str) -> Option<usize> {
    haystack.match_indices(needle)
        .map(|(start, _)| start)
        .find(|&start| {
            let end = start + needle.len();
            let before_ok = haystack[..start].chars().next_back().map_or(true, char::is_whitespace);
            let after_ok = haystack[end..].chars().next().map_or(true, char::is_whitespace);
            before_ok && after_ok
        })
}
