use once_cell::sync::Lazy;
use regex::Regex;

static LOWER_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_]+:[a-z_]+").unwrap());
static PROBLEM_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[=+/&<>;'"?%#$@,. \t\r\n]"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass<'a> {
    /// `namespace:key`, split at the first colon. Anything after a second
    /// colon stays part of `key`.
    Namespaced { namespace: &'a str, key: &'a str },
    Plain,
    Rejected,
}

/// The namespace check runs first, so `addr:street:extra` is namespaced as
/// (`addr`, `street:extra`) rather than rejected or plain.
pub fn classify(key: &str) -> KeyClass<'_> {
    if LOWER_COLON.is_match(key) {
        if let Some((namespace, local)) = key.split_once(':') {
            return KeyClass::Namespaced { namespace, key: local };
        }
    }
    if PROBLEM_CHARS.is_match(key) {
        KeyClass::Rejected
    } else {
        KeyClass::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_namespaced_key_at_first_colon() {
        assert_eq!(
            classify("addr:street"),
            KeyClass::Namespaced { namespace: "addr", key: "street" }
        );
        assert_eq!(
            classify("is_in:country_code"),
            KeyClass::Namespaced { namespace: "is_in", key: "country_code" }
        );
    }

    #[test]
    fn three_part_key_is_namespaced_at_first_colon() {
        assert_eq!(
            classify("addr:street:extra"),
            KeyClass::Namespaced { namespace: "addr", key: "street:extra" }
        );
    }

    #[test]
    fn plain_keys() {
        for key in ["name", "highway", "building", "tiger_cfcc", "Name", "source_ref2", "FIXME"] {
            assert_eq!(classify(key), KeyClass::Plain, "{key}");
        }
    }

    #[test]
    fn uppercase_namespace_is_not_namespaced() {
        assert_eq!(classify("Addr:street"), KeyClass::Plain);
        assert_eq!(classify("name:1"), KeyClass::Plain);
    }

    #[test]
    fn every_problem_char_rejects() {
        let chars = ['=', '+', '/', '&', '<', '>', ';', '\'', '"', '?', '%', '#', '$', '@', ',', '.', '\t', '\n', '\r', ' '];
        for c in chars {
            let key = format!("bad{c}key");
            assert_eq!(classify(&key), KeyClass::Rejected, "{key:?}");
        }
    }

    #[test]
    fn problem_char_anywhere_rejects() {
        assert_eq!(classify("=start"), KeyClass::Rejected);
        assert_eq!(classify("end."), KeyClass::Rejected);
        assert_eq!(classify("Addr:street name"), KeyClass::Rejected);
    }

    #[test]
    fn namespace_check_takes_priority() {
        // Matches the namespace prefix, the tail is ignored by the prefix match.
        assert_eq!(
            classify("addr:street.x"),
            KeyClass::Namespaced { namespace: "addr", key: "street.x" }
        );
    }
}
