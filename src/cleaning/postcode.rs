use once_cell::sync::Lazy;
use regex::Regex;

static POSTCODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").unwrap());

/// Postal codes of Irving, TX.
pub const DEFAULT_EXPECTED_POSTCODES: &[&str] = &[
    "75014", "75015", "75016", "75017", "75038", "75039", "75060", "75061", "75062",
    "75063", "75220", "75229", "75261", "75326", "75368", "76155",
];

pub fn is_postcode_key(key: &str) -> bool {
    key == "addr:postcode" || key == "postal_code"
}

/// Five digits, optionally followed by a hyphen and four more digits.
///
/// The hyphen is required: a bare nine digit run such as `750631234` is
/// reported as malformed rather than read as ZIP+4.
pub fn is_well_formed(value: &str) -> bool {
    POSTCODE.is_match(value)
}

/// The five digit part of a well formed code.
pub fn base_code(value: &str) -> Option<&str> {
    if is_well_formed(value) {
        Some(&value[..5])
    } else {
        None
    }
}
