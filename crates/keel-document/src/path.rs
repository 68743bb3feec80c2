//! Dotted property-path resolution
//!
//! Paths are plain `.`-separated map keys (`Code.S3Bucket`). Only literal
//! mappings are walked; list indexing is not supported.

use crate::expression::is_dynamic;
use crate::node::{Node, NodeValue};

/// Split a dotted path into its segments
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.')
}

/// Resolve `path` against a property tree.
///
/// Returns the terminal node whatever its shape, including a dynamic
/// expression. Returns `None` when a key is missing or when an intermediate
/// node is not a literal mapping, since nothing deeper can be confirmed.
pub fn resolve<'a>(properties: &'a Node, path: &str) -> Option<&'a Node> {
    let mut current = properties;
    for segment in split_path(path) {
        if segment.is_empty() || is_dynamic(current) {
            return None;
        }
        current = match &current.value {
            NodeValue::Mapping(entries) => entries.get(segment)?,
            NodeValue::Scalar(_) | NodeValue::Sequence(_) | NodeValue::Expression(_) => {
                return None
            }
        };
    }
    Some(current)
}

/// Whether `path` is present in the property tree
pub fn exists(properties: &Node, path: &str) -> bool {
    resolve(properties, path).is_some()
}
