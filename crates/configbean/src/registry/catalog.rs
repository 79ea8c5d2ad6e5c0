//! Resolution of type names to injectors.

use crate::metadata::ConfigMetadata;
use std::collections::HashMap;

/// Identity and metadata of the injector responsible for one shape.
///
/// `name` is the cache key of the built model: two type names resolving to
/// the same injector name share one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectorDescriptor {
    pub name: String,
    pub metadata: Option<ConfigMetadata>,
}

impl InjectorDescriptor {
    pub fn new(name: impl Into<String>, metadata: ConfigMetadata) -> Self {
        Self {
            name: name.into(),
            metadata: Some(metadata),
        }
    }

    /// A descriptor for an injector that ships no metadata.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: None,
        }
    }
}

/// Looks up the injector for a type name.
pub trait InjectorCatalog {
    fn resolve(&self, type_name: &str) -> Option<InjectorDescriptor>;
}

/// In-memory catalog keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct MemCatalog {
    descriptors: HashMap<String, InjectorDescriptor>,
}

impl MemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, type_name: impl Into<String>, descriptor: InjectorDescriptor) {
        self.descriptors.insert(type_name.into(), descriptor);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, type_name: impl Into<String>, descriptor: InjectorDescriptor) -> Self {
        self.register(type_name, descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl InjectorCatalog for MemCatalog {
    fn resolve(&self, type_name: &str) -> Option<InjectorDescriptor> {
        self.descriptors.get(type_name).cloned()
    }
}
