//! Runtime values and requested result shapes.
//!
//! Callers say what they want back with a [`ValueShape`], and properties
//! answer with a [`Value`]. Leaf text is coerced through [`convert_leaf_value`],
//! a total function over [`LeafType`].

use crate::bean::ConfigBean;
use crate::dom::Dom;
use crate::error::{ConfigError, Result};
use crate::view::ElementView;
use std::fmt;

/// Literals that read as `true`. Everything else, including absent, is `false`.
pub const BOOLEAN_TRUE: &[&str] = &["true", "yes", "on", "1"];

/// Primitive type a leaf can be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafType {
    Text,
    Integer,
    Boolean,
}

impl LeafType {
    pub fn name(self) -> &'static str {
        match self {
            LeafType::Text => "text",
            LeafType::Integer => "integer",
            LeafType::Boolean => "boolean",
        }
    }
}

/// Shape of a single item of a requested list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemShape {
    Leaf(LeafType),
    /// The raw document node.
    Dom,
    /// A [`ConfigBean`] over the node.
    Bean,
}

/// Shape a caller asks a property to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    Leaf(LeafType),
    Dom,
    Bean,
    List(ItemShape),
}

impl ValueShape {
    pub const TEXT: ValueShape = ValueShape::Leaf(LeafType::Text);
    pub const INTEGER: ValueShape = ValueShape::Leaf(LeafType::Integer);
    pub const BOOLEAN: ValueShape = ValueShape::Leaf(LeafType::Boolean);
}

impl fmt::Display for ItemShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemShape::Leaf(t) => f.write_str(t.name()),
            ItemShape::Dom => f.write_str("dom"),
            ItemShape::Bean => f.write_str("bean"),
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Leaf(t) => f.write_str(t.name()),
            ValueShape::Dom => f.write_str("dom"),
            ValueShape::Bean => f.write_str("bean"),
            ValueShape::List(item) => write!(f, "list of {}", item),
        }
    }
}

/// A value read from, or written to, a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<D: Dom> {
    /// Absent value. Writing it removes.
    Null,
    Text(String),
    Integer(i32),
    Boolean(bool),
    /// A raw document node.
    Node(D),
    /// A typed wrapper over a document node.
    Bean(ConfigBean<D>),
    /// An ordered snapshot.
    List(Vec<Value<D>>),
    /// A live list backed by the document.
    View(ElementView<D>),
}

impl<D: Dom> Value<D> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&D> {
        match self {
            Value::Node(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_bean(&self) -> Option<&ConfigBean<D>> {
        match self {
            Value::Bean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value<D>]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_view(self) -> Option<ElementView<D>> {
        match self {
            Value::View(v) => Some(v),
            _ => None,
        }
    }

    /// Text form of a scalar, as stored in the document.
    pub fn to_leaf_text(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(v) => Some(v.to_string()),
            Value::Boolean(v) => Some(v.to_string()),
            _ => None,
        }
    }

    /// The underlying document node of a node or bean.
    pub fn to_dom(&self) -> Option<D> {
        match self {
            Value::Node(d) => Some(d.clone()),
            Value::Bean(b) => Some(b.dom().clone()),
            _ => None,
        }
    }

    /// Short name of this value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Node(_) => "dom",
            Value::Bean(_) => "bean",
            Value::List(_) => "list",
            Value::View(_) => "view",
        }
    }
}

impl<D: Dom> From<&str> for Value<D> {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<D: Dom> From<String> for Value<D> {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<D: Dom> From<i32> for Value<D> {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl<D: Dom> From<bool> for Value<D> {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl<D: Dom> From<ConfigBean<D>> for Value<D> {
    fn from(value: ConfigBean<D>) -> Self {
        Value::Bean(value)
    }
}

impl<D: Dom, T: Into<Value<D>>> From<Vec<T>> for Value<D> {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// Converts raw leaf text of `xml_name` to `target`.
///
/// Absent text is `Null` for text and integer, `false` for boolean.
pub fn convert_leaf_value<D: Dom>(
    xml_name: &str,
    target: LeafType,
    raw: Option<&str>,
) -> Result<Value<D>> {
    match (target, raw) {
        (LeafType::Boolean, raw) => Ok(Value::Boolean(
            raw.is_some_and(|v| BOOLEAN_TRUE.contains(&v)),
        )),
        (_, None) => Ok(Value::Null),
        (LeafType::Text, Some(v)) => Ok(Value::Text(v.to_string())),
        (LeafType::Integer, Some(v)) => {
            v.parse::<i32>()
                .map(Value::Integer)
                .map_err(|_| ConfigError::TypeCoercion {
                    xml_name: xml_name.to_string(),
                    value: v.to_string(),
                    target: LeafType::Integer.name(),
                })
        }
    }
}
