use once_cell::sync::Lazy;
use regex::Regex;

/// Plain decimal number, optionally signed. No exponent, no "inf"/"NaN"
pub static RE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)$").expect("Invalid regex pattern"));

/// UTM zone designator, e.g. "33U"; the band letter excludes I and O
pub static RE_UTM_ZONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<zone>\d{1,2})(?P<band>[C-HJ-NP-X])$").expect("Invalid regex pattern")
});

/// BMN meridian stripe, e.g. "M28"
pub static RE_BMN_MERIDIAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^M(?P<meridian>\d{2})$").expect("Invalid regex pattern"));

/// Labelled Swiss grid value, e.g. "y:600000" or "N:1200000"
pub static RE_SWISS_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(?P<label>[yxen]):(?P<value>.+)$").expect("Invalid regex pattern")
});

/// OSGB36 grid reference with or without digits, e.g. "NN166712"
pub static RE_OSGB36_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<zone>[A-HJ-Z]{2})(?P<digits>\d*)$").expect("Invalid regex pattern")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number() {
        for ok in ["1", "-1", "+1.5", "1.", ".5", "592270"] {
            assert!(RE_NUMBER.is_match(ok), "{ok}");
        }
        for bad in ["", "-", ".", "1e5", "inf", "NaN", "1.2.3", "12a"] {
            assert!(!RE_NUMBER.is_match(bad), "{bad}");
        }
    }

    #[test]
    fn test_utm_zone() {
        let caps = RE_UTM_ZONE.captures("33U").unwrap();
        assert_eq!(&caps["zone"], "33");
        assert_eq!(&caps["band"], "U");
        assert!(!RE_UTM_ZONE.is_match("33I"));
        assert!(!RE_UTM_ZONE.is_match("33O"));
        assert!(!RE_UTM_ZONE.is_match("133U"));
    }

    #[test]
    fn test_swiss_value() {
        let caps = RE_SWISS_VALUE.captures("Y:600000.5").unwrap();
        assert_eq!(&caps["label"], "Y");
        assert_eq!(&caps["value"], "600000.5");
        assert!(RE_SWISS_VALUE.is_match("n:1200000"));
        assert!(!RE_SWISS_VALUE.is_match("z:1"));
        assert!(!RE_SWISS_VALUE.is_match("y:"));
    }

    #[test]
    fn test_osgb36_reference() {
        let caps = RE_OSGB36_REFERENCE.captures("NN166712").unwrap();
        assert_eq!(&caps["zone"], "NN");
        assert_eq!(&caps["digits"], "166712");
        assert!(RE_OSGB36_REFERENCE.is_match("TQ"));
        assert!(!RE_OSGB36_REFERENCE.is_match("IN1234"));
    }
}
