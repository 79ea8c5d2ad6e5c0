//! # configbean Architecture
//!
//! configbean binds **typed configuration shapes** to a generic, mutable
//! document tree. It does not parse documents and does not build objects: it
//! sits between a document (anything implementing [`Dom`]) and the injectors
//! that fill typed instances, and answers "what is field `x` of this node, as
//! an integer?" or "replace the third listener of this server".
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry (registry/)                                       │
//! │  - Resolves type names through an InjectorCatalog           │
//! │  - Builds one ConfigModel per injector, cycles included     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model (model.rs, property.rs)                              │
//! │  - Name resolution, exact then case-insensitive             │
//! │  - Typed get/set per property shape                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Values (value.rs, bean.rs, view.rs)                        │
//! │  - Leaf coercion, ConfigBean wrappers, live ElementViews    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Document (dom/)                                            │
//! │  - Abstract Dom trait                                       │
//! │  - MemDom (in-memory reference implementation)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use configbean::{
//!     ConfigMetadata, Dom, InjectorDescriptor, MemCatalog, MemDom, ModelRegistry, Value,
//!     ValueShape,
//! };
//!
//! let metadata = ConfigMetadata::new()
//!     .with("target", "com.acme.Server")
//!     .with("@port", "default:8080");
//! let catalog = MemCatalog::new().with(
//!     "Server",
//!     InjectorDescriptor::new("ServerInjector", metadata),
//! );
//! let mut registry = ModelRegistry::new(catalog);
//! let id = registry.build_model("Server")?;
//! let model = registry.ready_model(id)?;
//!
//! let server = MemDom::typed("Server");
//! assert_eq!(model.get(&server, "port", ValueShape::INTEGER)?, Value::Integer(8080));
//!
//! model.set(&server, "port", Value::from(9090i32))?;
//! assert_eq!(server.attribute("port").as_deref(), Some("9090"));
//! # Ok::<(), configbean::ConfigError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`registry`]: Model arena, construction and rollback, injector catalog
//! - [`model`]: Parsed shape description and name resolution
//! - [`property`]: The five property shapes and their get/set rules
//! - [`value`]: Values, requested shapes and leaf coercion
//! - [`bean`]: Typed wrapper over a node
//! - [`view`]: Live list of beans over a node's children
//! - [`dom`]: Document contract and the in-memory document
//! - [`metadata`]: Metadata records describing a shape
//! - [`injector`]: Boundary to typed-instance injectors
//! - [`config`]: Binding policy
//! - [`error`]: Error types

pub mod bean;
pub mod config;
pub mod dom;
pub mod error;
pub mod injector;
pub mod metadata;
pub mod model;
pub mod property;
pub mod registry;
pub mod value;
pub mod view;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use bean::ConfigBean;
pub use config::{BinderConfig, LeafRemoval};
pub use dom::mem::MemDom;
pub use dom::{Dom, Location};
pub use error::{ConfigError, Result};
pub use injector::ConfigInjector;
pub use metadata::ConfigMetadata;
pub use model::ConfigModel;
pub use property::Property;
pub use registry::{
    InjectorCatalog, InjectorDescriptor, MemCatalog, ModelId, ModelRegistry, ModelState,
};
pub use value::{ItemShape, LeafType, Value, ValueShape};
pub use view::ElementView;
