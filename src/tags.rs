use std::collections::BTreeMap;

use crate::error::Error;

/// Tag query parsed from the command line, e.g. `{"app": "zumba"}`.
pub type TagSet = BTreeMap<String, String>;

/// Parse a `"k1:v1,k2:v2"` string into a [`TagSet`].
///
/// Empty input yields an empty set. Values may themselves contain
/// colons; only the first colon separates key from value. When the same
/// key appears twice the first occurrence wins.
pub fn parse_tags(input: &str) -> Result<TagSet, Error> {
    let mut tags = TagSet::new();

    for pair in input.split(',').filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once(':')
            .ok_or_else(|| Error::MalformedTagPair(pair.to_string()))?;
        if key.is_empty() {
            return Err(Error::MalformedTagPair(pair.to_string()));
        }
        tags.entry(key.to_string()).or_insert_with(|| value.to_string());
    }

    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs() {
        let tags = parse_tags("a:1,b:2").unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags["a"], "1");
        assert_eq!(tags["b"], "2");
    }

    #[test]
    fn empty_input_is_empty_set() {
        assert!(parse_tags("").unwrap().is_empty());
    }

    #[test]
    fn trailing_comma_is_ignored() {
        let tags = parse_tags("a:1,").unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags["a"], "1");
    }

    #[test]
    fn value_may_contain_colons() {
        let tags = parse_tags("url:http://example.com").unwrap();
        assert_eq!(tags["url"], "http://example.com");
    }

    #[test]
    fn empty_value_is_allowed() {
        let tags = parse_tags("flag:").unwrap();
        assert_eq!(tags["flag"], "");
    }

    #[test]
    fn first_occurrence_of_a_key_wins() {
        let tags = parse_tags("a:1,a:2").unwrap();
        assert_eq!(tags["a"], "1");
    }

    #[test]
    fn pair_without_colon_is_an_error() {
        let err = parse_tags("a:1,oops").unwrap_err();
        assert!(matches!(err, Error::MalformedTagPair(p) if p == "oops"));
    }

    #[test]
    fn pair_with_empty_key_is_an_error() {
        assert!(parse_tags(":1").is_err());
    }
}
