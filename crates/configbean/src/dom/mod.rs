//! # Document Layer
//!
//! The binding engine never owns document storage. It talks to a document
//! through the [`Dom`] trait, which describes a mutable tree node with named
//! attributes and ordered, named children. A child is either a *leaf* (text
//! only, e.g. `<jvm-option>-Xmx1g</jvm-option>`) or a *node* (a nested element
//! that is itself a [`Dom`]).
//!
//! A `Dom` value is a handle: cloning it yields another reference to the same
//! node, equality is node identity, and mutation goes through `&self`. This
//! lets live views hold on to the nodes they expose while the parent keeps
//! changing underneath.
//!
//! ## Implementations
//!
//! - [`mem::MemDom`]: in-memory tree, used by tests and by callers that build
//!   documents programmatically.
//!
//! Parsers for real document formats live outside this crate and provide
//! their own implementation.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod mem;

/// Position of a node in its source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub system_id: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(system_id: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            system_id: system_id.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.system_id, self.line, self.column)
    }
}

/// Contract a document node must fulfil to be bound by a model.
pub trait Dom: Clone + PartialEq + fmt::Debug {
    // --- Attributes ---

    /// Text of the attribute `name`, if set.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set the attribute `name`.
    fn set_attribute(&self, name: &str, value: &str);

    /// Remove the attribute `name`. Removing a missing attribute is a no-op.
    fn remove_attribute(&self, name: &str);

    // --- Leaf elements ---

    /// Text of the first leaf child called `name`.
    fn leaf_element(&self, name: &str) -> Option<String>;

    /// Texts of all leaf children called `name`, in document order.
    fn leaf_elements(&self, name: &str) -> Vec<String>;

    /// Replace every leaf child called `name` with `values`, in order.
    fn set_leaf_elements(&self, name: &str, values: &[String]);

    // --- Node elements ---

    /// First node child called `name`.
    fn node_element(&self, name: &str) -> Option<Self>;

    /// All node children called `name`, in document order.
    fn node_elements(&self, name: &str) -> Vec<Self>;

    /// All node children bound to `type_name`, whatever their element name.
    fn node_elements_by_type(&self, type_name: &str) -> Vec<Self>;

    /// Replace every node child called `name` with `values`, in order.
    fn set_node_elements(&self, name: &str, values: &[Self]);

    /// Insert `child` under `name` right after `reference`, or before the
    /// first child called `name` when `reference` is `None`.
    ///
    /// With a `name` of `*`, the child takes the element name of `reference`.
    /// Fails when `reference` is not a child of this node.
    fn insert_after(&self, reference: Option<&Self>, name: &str, child: Self) -> Result<()>;

    /// Insert `child` under `name` right before `reference`.
    ///
    /// With a `name` of `*`, the child takes the element name of `reference`.
    /// Fails when `reference` is not a child of this node.
    fn insert_before(&self, reference: &Self, name: &str, child: Self) -> Result<()>;

    /// Remove `child`, stored under `name`, from this node.
    fn remove_child(&self, name: &str, child: &Self) -> Result<()>;

    /// Replace `old` with `new` at the same position, stored under `name`.
    ///
    /// With a `name` of `*`, `new` keeps the element name of `old`.
    fn replace_child(&self, old: &Self, name: &str, new: Self) -> Result<()>;

    // --- Diagnostics ---

    /// Where this node came from, for error reporting.
    fn location(&self) -> Option<Location>;
}
