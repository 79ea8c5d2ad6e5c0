//! # Properties
//!
//! A [`Property`] is the binding rule for one field of a model: where it lives
//! in the document and how values move in and out of it.
//!
//! ## Shapes
//!
//! | Variant | Document form | Value form |
//! |---------|---------------|------------|
//! | `AttributeLeaf` | `<x port="8080"/>` | text / integer / boolean, optional default |
//! | `SingleLeaf` | `<x><port>8080</port></x>` | text / integer / boolean |
//! | `CollectionLeaf` | `<x><opt>a</opt><opt>b</opt></x>` | list of text / integer / boolean |
//! | `SingleNode` | `<x><pool .../></x>` | raw node or bean |
//! | `CollectionNode` | `<x><l .../><l .../></x>` | list of nodes, or live view of beans |
//!
//! Writing `Null` removes. Collection writes replace every child of that name.
//! A collection node named [`WILDCARD`] selects children by nested type
//! instead of by element name.

use crate::bean::ConfigBean;
use crate::dom::Dom;
use crate::error::{ConfigError, Result};
use crate::registry::ModelId;
use crate::value::{convert_leaf_value, ItemShape, Value, ValueShape};
use crate::view::ElementView;

/// Element name that matches every child of the nested type.
pub const WILDCARD: &str = "*";

/// Binding rule for one attribute or element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    AttributeLeaf {
        xml_name: String,
        default: Option<String>,
    },
    SingleLeaf {
        xml_name: String,
    },
    CollectionLeaf {
        xml_name: String,
    },
    SingleNode {
        xml_name: String,
        model: ModelId,
        type_name: String,
    },
    CollectionNode {
        xml_name: String,
        model: ModelId,
        type_name: String,
    },
}

impl Property {
    pub fn attribute(xml_name: impl Into<String>, default: Option<String>) -> Self {
        Property::AttributeLeaf {
            xml_name: xml_name.into(),
            default,
        }
    }

    pub fn leaf(xml_name: impl Into<String>, collection: bool) -> Self {
        let xml_name = xml_name.into();
        if collection {
            Property::CollectionLeaf { xml_name }
        } else {
            Property::SingleLeaf { xml_name }
        }
    }

    pub fn node(
        xml_name: impl Into<String>,
        model: ModelId,
        type_name: impl Into<String>,
        collection: bool,
    ) -> Self {
        let (xml_name, type_name) = (xml_name.into(), type_name.into());
        if collection {
            Property::CollectionNode {
                xml_name,
                model,
                type_name,
            }
        } else {
            Property::SingleNode {
                xml_name,
                model,
                type_name,
            }
        }
    }

    /// Name of the property in the document, like `"http-listener"`.
    pub fn xml_name(&self) -> &str {
        match self {
            Property::AttributeLeaf { xml_name, .. }
            | Property::SingleLeaf { xml_name }
            | Property::CollectionLeaf { xml_name }
            | Property::SingleNode { xml_name, .. }
            | Property::CollectionNode { xml_name, .. } => xml_name,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Property::AttributeLeaf { .. }
                | Property::SingleLeaf { .. }
                | Property::CollectionLeaf { .. }
        )
    }

    /// Whether multiple values are allowed.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Property::CollectionLeaf { .. } | Property::CollectionNode { .. }
        )
    }

    pub fn default_value(&self) -> Option<&str> {
        match self {
            Property::AttributeLeaf { default, .. } => default.as_deref(),
            _ => None,
        }
    }

    /// Model of the nested shape, for node properties.
    pub fn model(&self) -> Option<ModelId> {
        match self {
            Property::SingleNode { model, .. } | Property::CollectionNode { model, .. } => {
                Some(*model)
            }
            _ => None,
        }
    }

    /// Gets the value from `dom` in the requested shape.
    pub fn get<D: Dom>(&self, dom: &D, shape: ValueShape) -> Result<Value<D>> {
        match self {
            Property::AttributeLeaf { xml_name, default } => {
                let ValueShape::Leaf(target) = shape else {
                    return Err(self.unsupported_result(shape));
                };
                let raw = dom.attribute(xml_name).or_else(|| default.clone());
                convert_leaf_value(xml_name, target, raw.as_deref())
            }
            Property::SingleLeaf { xml_name } => {
                let ValueShape::Leaf(target) = shape else {
                    return Err(self.unsupported_result(shape));
                };
                let raw = dom.leaf_element(xml_name);
                convert_leaf_value(xml_name, target, raw.as_deref())
            }
            Property::CollectionLeaf { xml_name } => {
                let target = match shape {
                    ValueShape::List(ItemShape::Leaf(target)) => target,
                    ValueShape::List(item) => return Err(self.unsupported_item(item)),
                    other => return Err(self.unsupported_result(other)),
                };
                dom.leaf_elements(xml_name)
                    .iter()
                    .map(|raw| convert_leaf_value(xml_name, target, Some(raw)))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List)
            }
            Property::SingleNode {
                xml_name, model, ..
            } => {
                if !matches!(shape, ValueShape::Dom | ValueShape::Bean) {
                    return Err(self.unsupported_result(shape));
                }
                let Some(child) = dom.node_element(xml_name) else {
                    return Ok(Value::Null);
                };
                Ok(match shape {
                    ValueShape::Bean => Value::Bean(ConfigBean::new(child, *model)),
                    _ => Value::Node(child),
                })
            }
            Property::CollectionNode {
                xml_name,
                model,
                type_name,
            } => {
                let item = match shape {
                    ValueShape::List(item @ (ItemShape::Dom | ItemShape::Bean)) => item,
                    ValueShape::List(item) => return Err(self.unsupported_item(item)),
                    other => return Err(self.unsupported_result(other)),
                };
                let nodes = if xml_name == WILDCARD {
                    dom.node_elements_by_type(type_name)
                } else {
                    dom.node_elements(xml_name)
                };
                Ok(match item {
                    ItemShape::Bean => {
                        Value::View(ElementView::new(dom.clone(), xml_name, *model, nodes))
                    }
                    _ => Value::List(nodes.into_iter().map(Value::Node).collect()),
                })
            }
        }
    }

    /// Sets the value in `dom`.
    ///
    /// `Null` removes the attribute or the children of this name.
    pub fn set<D: Dom>(&self, dom: &D, value: Value<D>) -> Result<()> {
        match self {
            Property::AttributeLeaf { xml_name, .. } => match value {
                Value::Null => {
                    dom.remove_attribute(xml_name);
                    Ok(())
                }
                other => {
                    let text = self.leaf_text(&other)?;
                    dom.set_attribute(xml_name, &text);
                    Ok(())
                }
            },
            Property::SingleLeaf { xml_name } => {
                let values = match value {
                    Value::Null => Vec::new(),
                    other => vec![self.leaf_text(&other)?],
                };
                dom.set_leaf_elements(xml_name, &values);
                Ok(())
            }
            Property::CollectionLeaf { xml_name } => {
                let Value::List(items) = value else {
                    return Err(self.invalid_argument("list", value.kind()));
                };
                let values = items
                    .iter()
                    .map(|item| self.leaf_text(item))
                    .collect::<Result<Vec<_>>>()?;
                dom.set_leaf_elements(xml_name, &values);
                Ok(())
            }
            Property::SingleNode { xml_name, .. } => {
                let children = match value {
                    Value::Null => Vec::new(),
                    other => vec![self.to_dom(&other)?],
                };
                dom.set_node_elements(xml_name, &children);
                Ok(())
            }
            Property::CollectionNode { xml_name, .. } => {
                // Coerce everything before touching the document.
                let children = match value {
                    Value::List(items) => items
                        .iter()
                        .map(|item| self.to_dom(item))
                        .collect::<Result<Vec<_>>>()?,
                    Value::View(view) => view.nodes().to_vec(),
                    other => return Err(self.invalid_argument("list", other.kind())),
                };
                dom.set_node_elements(xml_name, &children);
                Ok(())
            }
        }
    }

    fn leaf_text<D: Dom>(&self, value: &Value<D>) -> Result<String> {
        value
            .to_leaf_text()
            .ok_or_else(|| self.invalid_argument("text, integer or boolean", value.kind()))
    }

    /// Coerce a value accepted by [`set`](Self::set) to a document node.
    fn to_dom<D: Dom>(&self, value: &Value<D>) -> Result<D> {
        value
            .to_dom()
            .ok_or_else(|| self.invalid_argument("dom or bean", value.kind()))
    }

    fn invalid_argument(&self, expected: &'static str, found: &'static str) -> ConfigError {
        ConfigError::InvalidArgumentShape {
            xml_name: self.xml_name().to_string(),
            expected,
            found,
        }
    }

    fn unsupported_result(&self, shape: ValueShape) -> ConfigError {
        ConfigError::UnsupportedResultShape {
            xml_name: self.xml_name().to_string(),
            requested: shape.to_string(),
        }
    }

    fn unsupported_item(&self, item: ItemShape) -> ConfigError {
        ConfigError::UnsupportedItemShape {
            xml_name: self.xml_name().to_string(),
            requested: item.to_string(),
        }
    }
}
