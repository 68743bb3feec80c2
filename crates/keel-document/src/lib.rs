//! Keel Document - Position-tracked template model
//!
//! Turns a parsed template into a tree that separates literal data from
//! dynamic expressions (`Ref`, `Fn::*`) while keeping the source position of
//! every node.

mod document;
mod expression;
mod loader;
mod node;
mod path;

pub use document::{Document, Resource};
pub use expression::{is_dynamic, is_function_marker, REF_MARKER};
pub use loader::{load_document, load_document_string};
pub use node::{Expression, Node, NodeValue, Scalar};
pub use path::{exists, resolve, split_path};
