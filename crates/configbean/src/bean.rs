//! Typed wrapper over a document node.

use crate::dom::Dom;
use crate::error::Result;
use crate::registry::{InjectorCatalog, ModelId, ModelRegistry};
use crate::value::{Value, ValueShape};

/// A document node viewed through the model that describes it.
///
/// The bean owns no data: every read and write goes to the node.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigBean<D: Dom> {
    dom: D,
    model: ModelId,
}

impl<D: Dom> ConfigBean<D> {
    pub fn new(dom: D, model: ModelId) -> Self {
        Self { dom, model }
    }

    /// The node behind this bean.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn into_dom(self) -> D {
        self.dom
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Read the property `name` in the requested shape.
    pub fn get<C: InjectorCatalog>(
        &self,
        registry: &ModelRegistry<C>,
        name: &str,
        shape: ValueShape,
    ) -> Result<Value<D>> {
        registry.ready_model(self.model)?.get(&self.dom, name, shape)
    }

    /// Write the property `name`.
    pub fn set<C: InjectorCatalog>(
        &self,
        registry: &ModelRegistry<C>,
        name: &str,
        value: Value<D>,
    ) -> Result<()> {
        registry.ready_model(self.model)?.set(&self.dom, name, value)
    }
}
