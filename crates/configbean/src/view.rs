//! # Live Element Views
//!
//! Reading a node collection as beans returns an [`ElementView`]: a list whose
//! reads and writes go straight to the document. The view keeps its own
//! ordered index of the nodes it exposes, so positions stay stable while the
//! parent holds other children in between.
//!
//! ## Mutation Order
//!
//! Every mutation updates the document first, then the cached index. If the
//! document rejects the change, the index is left untouched. The two steps are
//! not atomic for other readers of the same document: callers sharing a
//! document must hold their own lock around a read-modify sequence.
//!
//! ## Wildcard Views
//!
//! A view over the `*` element holds children of the nested type under
//! whatever element names they have. Inserted and replacing nodes take the
//! element name of the neighbour they are placed against, so a replaced
//! `<http-listener>` stays an `<http-listener>`. Only a push into an empty
//! wildcard view has no neighbour and stores the node under `*`.

use crate::bean::ConfigBean;
use crate::dom::Dom;
use crate::error::{ConfigError, Result};
use crate::registry::ModelId;

/// Live list of beans over the children called `xml_name` of `parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView<D: Dom> {
    parent: D,
    xml_name: String,
    model: ModelId,
    nodes: Vec<D>,
}

impl<D: Dom> ElementView<D> {
    pub fn new(parent: D, xml_name: impl Into<String>, model: ModelId, nodes: Vec<D>) -> Self {
        Self {
            parent,
            xml_name: xml_name.into(),
            model,
            nodes,
        }
    }

    pub fn xml_name(&self) -> &str {
        &self.xml_name
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bean over the node at `index`.
    pub fn get(&self, index: usize) -> Option<ConfigBean<D>> {
        self.nodes.get(index).map(|n| self.wrap(n.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = ConfigBean<D>> + '_ {
        self.nodes.iter().map(|n| self.wrap(n.clone()))
    }

    /// The nodes currently exposed, in view order.
    pub fn nodes(&self) -> &[D] {
        &self.nodes
    }

    /// Insert `bean` at `index`, right before the node currently at `index`
    /// in the document, or after the last node of the view when appending.
    pub fn insert(&mut self, index: usize, bean: ConfigBean<D>) -> Result<()> {
        if index > self.nodes.len() {
            return Err(self.out_of_bounds(index));
        }
        let child = bean.into_dom();
        match self.nodes.get(index) {
            Some(next) => self
                .parent
                .insert_before(next, &self.xml_name, child.clone())?,
            None => self
                .parent
                .insert_after(self.nodes.last(), &self.xml_name, child.clone())?,
        }
        self.nodes.insert(index, child);
        tracing::debug!(element = %self.xml_name, index, "inserted into live view");
        Ok(())
    }

    /// Append `bean` after the last node of the view.
    pub fn push(&mut self, bean: ConfigBean<D>) -> Result<()> {
        self.insert(self.nodes.len(), bean)
    }

    /// Remove the node at `index` from the document, returning a bean over it.
    pub fn remove(&mut self, index: usize) -> Result<ConfigBean<D>> {
        let child = self
            .nodes
            .get(index)
            .cloned()
            .ok_or_else(|| self.out_of_bounds(index))?;
        self.parent.remove_child(&self.xml_name, &child)?;
        self.nodes.remove(index);
        tracing::debug!(element = %self.xml_name, index, "removed from live view");
        Ok(self.wrap(child))
    }

    /// Replace the node at `index` in place, returning a bean over the old one.
    pub fn set(&mut self, index: usize, bean: ConfigBean<D>) -> Result<ConfigBean<D>> {
        let old = self
            .nodes
            .get(index)
            .cloned()
            .ok_or_else(|| self.out_of_bounds(index))?;
        let child = bean.into_dom();
        self.parent
            .replace_child(&old, &self.xml_name, child.clone())?;
        self.nodes[index] = child;
        tracing::debug!(element = %self.xml_name, index, "replaced in live view");
        Ok(self.wrap(old))
    }

    fn wrap(&self, node: D) -> ConfigBean<D> {
        ConfigBean::new(node, self.model)
    }

    fn out_of_bounds(&self, index: usize) -> ConfigError {
        ConfigError::IndexOutOfBounds {
            xml_name: self.xml_name.clone(),
            index,
            len: self.nodes.len(),
        }
    }
}
