//! Template loading from TOML files
//!
//! Uses `toml_edit::ImDocument` rather than `toml::Value` because only the
//! former keeps byte spans, which become node positions.

use crate::document::{Document, Resource};
use crate::expression::is_function_marker;
use crate::node::{Node, NodeValue, Scalar};
use keel_core::{KeelError, LineIndex, Position, Result};
use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::Path;
use toml_edit::{ImDocument, Item, Key, TableLike, Value};

/// Load a template from a TOML file
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let content = fs::read_to_string(path)?;
    load_document_string(&content)
}

/// Load a template from a TOML string
pub fn load_document_string(content: &str) -> Result<Document> {
    let parsed = ImDocument::parse(content)?;
    let builder = TreeBuilder {
        index: LineIndex::new(content),
    };

    let (resources_key, resources_item) = parsed
        .as_table()
        .get_key_value("Resources")
        .ok_or_else(|| KeelError::Document("missing [Resources] table".to_string()))?;
    let resources = resources_item
        .as_table_like()
        .ok_or_else(|| KeelError::Document("Resources must be a table".to_string()))?;
    let resources_position = builder.key_position(resources_key, Position::START);

    let mut document = Document::new();
    for (name, _) in resources.iter() {
        if let Some((key, item)) = resources.get_key_value(name) {
            let position = builder.key_position(key, resources_position);
            document.insert(builder.resource(name, item, position)?)?;
        }
    }

    tracing::debug!(resources = document.len(), "loaded template");
    Ok(document)
}

struct TreeBuilder<'a> {
    index: LineIndex<'a>,
}

impl TreeBuilder<'_> {
    fn resource(&self, name: &str, item: &Item, position: Position) -> Result<Resource> {
        let table = item
            .as_table_like()
            .ok_or_else(|| KeelError::Document(format!("resource '{}' must be a table", name)))?;

        let resource_type = table
            .get("Type")
            .and_then(Item::as_str)
            .ok_or_else(|| {
                KeelError::Document(format!("resource '{}' is missing a string Type", name))
            })?;

        let properties = match table.get_key_value("Properties") {
            None => Node::empty_mapping(position),
            Some((key, item)) => {
                let node = self.item(item, self.key_position(key, position));
                match node.value {
                    NodeValue::Mapping(_) | NodeValue::Expression(_) => node,
                    NodeValue::Scalar(_) | NodeValue::Sequence(_) => {
                        return Err(KeelError::Document(format!(
                            "Properties of resource '{}' must be a table, got a {}",
                            name,
                            node.kind()
                        )))
                    }
                }
            }
        };

        Ok(Resource::new(name, resource_type, properties, position))
    }

    fn item(&self, item: &Item, position: Position) -> Node {
        match item {
            Item::None => Node::empty_mapping(position),
            Item::Value(value) => self.value(value, position),
            Item::Table(table) => self.table_like(table, position),
            Item::ArrayOfTables(tables) => {
                let items = tables
                    .iter()
                    .map(|table| self.table_like(table, self.span_position(table.span(), position)))
                    .collect();
                Node::sequence(items, position)
            }
        }
    }

    fn value(&self, value: &Value, position: Position) -> Node {
        match value {
            Value::String(s) => Node::string(s.value().clone(), position),
            Value::Integer(i) => Node::scalar(Scalar::Integer(*i.value()), position),
            Value::Float(f) => Node::scalar(Scalar::Float(*f.value()), position),
            Value::Boolean(b) => Node::scalar(Scalar::Bool(*b.value()), position),
            Value::Datetime(d) => Node::string(d.value().to_string(), position),
            Value::Array(array) => {
                let items = array
                    .iter()
                    .map(|v| self.value(v, self.span_position(v.span(), position)))
                    .collect();
                Node::sequence(items, position)
            }
            Value::InlineTable(table) => self.table_like(table, position),
        }
    }

    fn table_like(&self, table: &dyn TableLike, position: Position) -> Node {
        let mut entries = BTreeMap::new();
        for (name, _) in table.iter() {
            if let Some((key, item)) = table.get_key_value(name) {
                let node = self.item(item, self.key_position(key, position));
                entries.insert(name.to_string(), node);
            }
        }
        tag_function_call(entries, position)
    }

    fn key_position(&self, key: &Key, fallback: Position) -> Position {
        self.span_position(key.span(), fallback)
    }

    fn span_position(&self, span: Option<Range<usize>>, fallback: Position) -> Position {
        span.map(|s| self.index.position(s.start))
            .unwrap_or(fallback)
    }
}

/// Turn a single-key `{ Ref = .. }` / `{ "Fn::*" = .. }` mapping into an
/// expression node
fn tag_function_call(mut entries: BTreeMap<String, Node>, position: Position) -> Node {
    if entries.len() == 1 && entries.keys().all(|k| is_function_marker(k)) {
        if let Some((function, argument)) = entries.pop_first() {
            return Node::expression(function, argument, position);
        }
    }
    Node::mapping(entries, position)
}
