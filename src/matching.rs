//! The two match strategies the providers use.
//!
//! EC2 instances are matched by exact tag-set equality, while Rackspace
//! servers are matched by tag values appearing in the server name. The
//! two are intentionally kept as separate, named functions rather than
//! unified behind one predicate.

use crate::tags::TagSet;

/// Exact tag-set equality: same keys, same values, no extras, no
/// missing. An instance carrying any tag beyond the query does not
/// match. An empty query matches only untagged instances.
pub fn exact_tag_match(instance_tags: &TagSet, query: &TagSet) -> bool {
    instance_tags == query
}

/// True when any tag VALUE of the query is a substring of the server
/// name. Keys are ignored. An empty query matches nothing.
pub fn name_substring_match(name: &str, query: &TagSet) -> bool {
    query.values().any(|value| name.contains(value.as_str()))
}
