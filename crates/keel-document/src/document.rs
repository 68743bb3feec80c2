//! Template document model

use crate::expression::is_dynamic;
use crate::node::Node;
use keel_core::{KeelError, Position, Result};
use std::collections::HashMap;

/// One named, typed entry in a template
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub resource_type: String,
    /// Property tree; an empty mapping when the template omits `Properties`
    pub properties: Node,
    pub position: Position,
}

impl Resource {
    pub fn new(
        name: impl Into<String>,
        resource_type: impl Into<String>,
        properties: Node,
        position: Position,
    ) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            properties,
            position,
        }
    }

    /// Whether the property tree is literal at its root. When the whole
    /// `Properties` block is an expression nothing can be said about it.
    pub fn has_static_properties(&self) -> bool {
        !is_dynamic(&self.properties)
    }
}

/// A fully parsed template, immutable once built
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Resources in declaration order
    resources: Vec<Resource>,
    /// Resource name -> index into `resources`
    name_map: HashMap<String, usize>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, rejecting duplicate names
    pub fn insert(&mut self, resource: Resource) -> Result<()> {
        if self.name_map.contains_key(&resource.name) {
            return Err(KeelError::DuplicateResource(resource.name));
        }
        self.name_map
            .insert(resource.name.clone(), self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.name_map.get(name).map(|&i| &self.resources[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_map.contains_key(name)
    }

    /// Iterate resources in declaration order
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Resources of a given type, in declaration order
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a Resource> + 'a {
        self.resources
            .iter()
            .filter(move |r| r.resource_type == resource_type)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, resource_type: &str) -> Resource {
        Resource::new(name, resource_type, Node::empty_mapping(Position::START), Position::START)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut doc = Document::new();
        doc.insert(resource("Bucket", "AWS::S3::Bucket")).unwrap();
        doc.insert(resource("Queue", "AWS::SQS::Queue")).unwrap();

        assert_eq!(doc.len(), 2);
        assert!(doc.contains("Bucket"));
        assert_eq!(doc.get("Queue").unwrap().resource_type, "AWS::SQS::Queue");
        assert!(doc.get("Topic").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut doc = Document::new();
        doc.insert(resource("Bucket", "AWS::S3::Bucket")).unwrap();
        let err = doc.insert(resource("Bucket", "AWS::SQS::Queue")).unwrap_err();
        assert!(matches!(err, KeelError::DuplicateResource(name) if name == "Bucket"));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let mut doc = Document::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            doc.insert(resource(name, "AWS::S3::Bucket")).unwrap();
        }
        let names: Vec<&str> = doc.resources().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_resources_of_type() {
        let mut doc = Document::new();
        doc.insert(resource("A", "AWS::S3::Bucket")).unwrap();
        doc.insert(resource("B", "AWS::SQS::Queue")).unwrap();
        doc.insert(resource("C", "AWS::S3::Bucket")).unwrap();
        let buckets: Vec<&str> = doc
            .resources_of_type("AWS::S3::Bucket")
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(buckets, vec!["A", "C"]);
    }

    #[test]
    fn test_dynamic_properties_root() {
        let props = Node::expression("Fn::If", Node::string("x", Position::START), Position::START);
        let r = Resource::new("A", "AWS::S3::Bucket", props, Position::START);
        assert!(!r.has_static_properties());
        assert!(resource("B", "AWS::S3::Bucket").has_static_properties());
    }
}
