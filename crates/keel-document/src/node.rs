//! Position-tracked value tree

use keel_core::Position;
use std::collections::BTreeMap;
use std::fmt;

/// A literal scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A function call that cannot be evaluated statically, such as
/// `{ Ref = "Bucket" }` or `{ "Fn::GetAtt" = ["Role", "Arn"] }`
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// The function marker, e.g. `Ref` or `Fn::If`
    pub function: String,
    pub argument: Box<Node>,
}

/// The shape of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(BTreeMap<String, Node>),
    Expression(Expression),
}

/// A value in the template tree with the position it was declared at
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub value: NodeValue,
    pub position: Position,
}

impl Node {
    pub fn new(value: NodeValue, position: Position) -> Self {
        Self { value, position }
    }

    pub fn scalar(scalar: Scalar, position: Position) -> Self {
        Self::new(NodeValue::Scalar(scalar), position)
    }

    pub fn string(value: impl Into<String>, position: Position) -> Self {
        Self::scalar(Scalar::String(value.into()), position)
    }

    pub fn sequence(items: Vec<Node>, position: Position) -> Self {
        Self::new(NodeValue::Sequence(items), position)
    }

    pub fn mapping(entries: BTreeMap<String, Node>, position: Position) -> Self {
        Self::new(NodeValue::Mapping(entries), position)
    }

    pub fn empty_mapping(position: Position) -> Self {
        Self::mapping(BTreeMap::new(), position)
    }

    pub fn expression(function: impl Into<String>, argument: Node, position: Position) -> Self {
        Self::new(
            NodeValue::Expression(Expression {
                function: function.into(),
                argument: Box::new(argument),
            }),
            position,
        )
    }

    /// True when the node holds literal data all the way down to this level
    /// (i.e. it is not a dynamic expression)
    pub fn is_literal(&self) -> bool {
        !crate::expression::is_dynamic(self)
    }

    pub fn as_literal_scalar(&self) -> Option<&Scalar> {
        match &self.value {
            NodeValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_literal_str(&self) -> Option<&str> {
        self.as_literal_scalar().and_then(Scalar::as_str)
    }

    pub fn as_literal_sequence(&self) -> Option<&[Node]> {
        match &self.value {
            NodeValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The entries of a literal mapping. Function-shaped mappings that were
    /// never tagged as expressions are not literal and return `None`.
    pub fn as_literal_mapping(&self) -> Option<&BTreeMap<String, Node>> {
        match &self.value {
            NodeValue::Mapping(entries) if self.is_literal() => Some(entries),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match &self.value {
            NodeValue::Scalar(_) => "scalar",
            NodeValue::Sequence(_) => "sequence",
            NodeValue::Mapping(_) => "mapping",
            NodeValue::Expression(_) => "expression",
        }
    }
}
