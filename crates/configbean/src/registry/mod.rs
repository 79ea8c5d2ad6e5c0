//! # Model Registry
//!
//! The registry is an arena of [`ConfigModel`]s keyed by injector identity.
//! Properties refer to nested models by [`ModelId`], an index into the arena,
//! so models can reference each other in cycles without shared ownership.
//!
//! ## Two-Phase Construction
//!
//! Building a model first allocates its slot in state
//! [`ModelState::Registering`] and maps the injector to the new id. Only then
//! is the metadata parsed. A nested reference back to a model still being
//! built finds the mapping and gets the id, instead of recursing:
//!
//! ```text
//! build(P) ─┬─ slot #0 = P (registering)
//!           ├─ <q> → build(Q) ─┬─ slot #1 = Q (registering)
//!           │                  ├─ <p> → lookup(P) = #0
//!           │                  └─ slot #1 ready
//!           └─ slot #0 ready
//! ```
//!
//! If parsing fails, every slot allocated since the failing build started is
//! dropped along with its mapping. Nested models that succeeded in the
//! meantime go too, since they may point at the failed slot.
//!
//! ## Concurrency
//!
//! Construction takes `&mut self`, so the check-and-insert on the identity map
//! can never interleave. Share a registry across threads behind a lock.

pub mod catalog;

pub use catalog::{InjectorCatalog, InjectorDescriptor, MemCatalog};

use crate::config::BinderConfig;
use crate::error::{ConfigError, Result};
use crate::model::ConfigModel;
use std::collections::HashMap;

/// Index of a model in a [`ModelRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(usize);

impl ModelId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// Allocated, metadata not parsed yet.
    Registering,
    Ready,
}

#[derive(Debug)]
struct ModelSlot {
    injector: String,
    state: ModelState,
    model: Option<ConfigModel>,
}

/// Identity-keyed cache of built models.
#[derive(Debug)]
pub struct ModelRegistry<C: InjectorCatalog> {
    catalog: C,
    config: BinderConfig,
    slots: Vec<ModelSlot>,
    by_injector: HashMap<String, ModelId>,
}

impl<C: InjectorCatalog> ModelRegistry<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_config(catalog, BinderConfig::default())
    }

    pub fn with_config(catalog: C, config: BinderConfig) -> Self {
        Self {
            catalog,
            config,
            slots: Vec::new(),
            by_injector: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Builds, or returns the cached, model for the injector of `type_name`.
    pub fn build_model(&mut self, type_name: &str) -> Result<ModelId> {
        let descriptor = self
            .catalog
            .resolve(type_name)
            .ok_or_else(|| ConfigError::UnknownType(type_name.to_string()))?;
        self.build_model_for(&descriptor)
    }

    /// Builds, or returns the cached, model for `descriptor`.
    pub fn build_model_for(&mut self, descriptor: &InjectorDescriptor) -> Result<ModelId> {
        if let Some(id) = self.by_injector.get(&descriptor.name) {
            return Ok(*id);
        }
        let metadata = match &descriptor.metadata {
            Some(metadata) if !metadata.is_empty() => metadata,
            _ => {
                return Err(ConfigError::MissingMetadata {
                    injector: descriptor.name.clone(),
                })
            }
        };

        let id = ModelId(self.slots.len());
        self.slots.push(ModelSlot {
            injector: descriptor.name.clone(),
            state: ModelState::Registering,
            model: None,
        });
        self.by_injector.insert(descriptor.name.clone(), id);
        tracing::debug!(injector = %descriptor.name, id = id.0, "registering config model");

        match ConfigModel::parse(self, id, &descriptor.name, metadata) {
            Ok(model) => {
                let slot = &mut self.slots[id.0];
                slot.state = ModelState::Ready;
                slot.model = Some(model);
                tracing::debug!(injector = %descriptor.name, id = id.0, "config model ready");
                Ok(id)
            }
            Err(err) => {
                let dropped = self.rollback(id);
                tracing::warn!(
                    injector = %descriptor.name,
                    dropped,
                    error = %err,
                    "config model construction failed"
                );
                Err(err)
            }
        }
    }

    /// Drops every slot from `mark` on. Returns how many were dropped.
    fn rollback(&mut self, mark: ModelId) -> usize {
        let dropped: Vec<ModelSlot> = self.slots.drain(mark.0..).collect();
        for slot in &dropped {
            self.by_injector.remove(&slot.injector);
        }
        dropped.len()
    }

    /// The model at `id`, if it is ready.
    pub fn model(&self, id: ModelId) -> Option<&ConfigModel> {
        self.slots
            .get(id.0)
            .filter(|slot| slot.state == ModelState::Ready)
            .and_then(|slot| slot.model.as_ref())
    }

    pub fn ready_model(&self, id: ModelId) -> Result<&ConfigModel> {
        self.model(id)
            .ok_or(ConfigError::ModelNotReady { id: id.0 })
    }

    pub fn state(&self, id: ModelId) -> Option<ModelState> {
        self.slots.get(id.0).map(|slot| slot.state)
    }

    /// The id registered for an injector name.
    pub fn lookup(&self, injector: &str) -> Option<ModelId> {
        self.by_injector.get(injector).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
