//! Device-id extraction from semi-structured cookie payloads.
//!
//! A payload carries `key=value` pairs separated by `|`, either literally
//! or percent-encoded (`%3D` / `%7C`), and may mix both styles in one
//! value. The `di` pairs hold device ids shaped
//! `<decimal-timestamp>.<uuid>` and may repeat.

use std::sync::LazyLock;

use regex::Regex;

/// One tolerant pattern for both separator styles. The `+`-quantified
/// group only ever reports the last repetition per match; ids are
/// collected through the global scan, which preserves the historical
/// behavior for directly adjacent ids.
static DEVICE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"di(?:=|%3D)([0-9]+\.[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})+",
    )
    .unwrap()
});

/// All device ids embedded in `raw`, in order of appearance, duplicates
/// preserved. Returns an empty vec when nothing matches; never errors.
pub fn extract_device_ids(raw: &str) -> Vec<String> {
    DEVICE_ID_RE
        .captures_iter(raw)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "1447859209.11111111-1111-1111-aaaa-111111111111";
    const ID_B: &str = "1447344866.44444444-4444-4444-bbbb-444444444444";

    #[test]
    fn literal_separator() {
        let value = format!("ls=1447859209770|v=1|di={ID_A}");
        assert_eq!(extract_device_ids(&value), vec![ID_A.to_string()]);
    }

    #[test]
    fn percent_encoded_separator() {
        let value = format!("ls%3D1447859209000%7Cv%3D1%7Cdi%3D{ID_A}");
        assert_eq!(extract_device_ids(&value), vec![ID_A.to_string()]);
    }

    #[test]
    fn mixed_styles_in_one_value_keep_order() {
        let value = format!("di={ID_A}|x=1|di%3D{ID_B}");
        assert_eq!(
            extract_device_ids(&value),
            vec![ID_A.to_string(), ID_B.to_string()]
        );
    }

    #[test]
    fn duplicates_are_preserved() {
        let value = format!("di={ID_A}|di={ID_A}");
        assert_eq!(
            extract_device_ids(&value),
            vec![ID_A.to_string(), ID_A.to_string()]
        );
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(extract_device_ids("").is_empty());
        assert!(extract_device_ids("ls=1447859209770|v=1").is_empty());
        // Wrong shape: uuid segment too short.
        assert!(extract_device_ids("di=123.abcd-12-34-56-78").is_empty());
    }

    #[test]
    fn uppercase_hex_does_not_match() {
        let value = "di=1.AAAAAAAA-1111-1111-1111-111111111111";
        assert!(extract_device_ids(value).is_empty());
    }
}
