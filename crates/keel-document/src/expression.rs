//! Dynamic-expression classification
//!
//! Any property value in a template may be replaced by a function call whose
//! result is only known at deploy time. Rules that look at the shape or count
//! of a value must check `is_dynamic` first and abstain when it returns true.

use crate::node::{Node, NodeValue};

/// Short-form reference marker
pub const REF_MARKER: &str = "Ref";

const FN_PREFIX: &str = "Fn::";

/// Check whether a mapping key names a template function
pub fn is_function_marker(key: &str) -> bool {
    key == REF_MARKER || (key.len() > FN_PREFIX.len() && key.starts_with(FN_PREFIX))
}

/// Whether the node is a dynamic expression: either already tagged by the
/// loader, or a single-key mapping whose key is a function marker
pub fn is_dynamic(node: &Node) -> bool {
    match &node.value {
        NodeValue::Expression(_) => true,
        NodeValue::Mapping(entries) => {
            entries.len() == 1 && entries.keys().all(|k| is_function_marker(k))
        }
        NodeValue::Scalar(_) | NodeValue::Sequence(_) => false,
    }
}
