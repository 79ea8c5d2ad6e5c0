//! Fixtures shared by unit and integration tests.
//!
//! The fixture domain is a small application-server config:
//!
//! ```text
//! domain ── <server>* ── @name @port=8080 <description> <jvm-option>*
//!                      ├─ <listener>* ── @name @port @enabled
//!                      └─ <pool> ── @size=8
//! ```

use crate::dom::mem::MemDom;
use crate::dom::Dom;
use crate::metadata::{ConfigMetadata, INDEX_KEY, KEY, KEYED_AS, TARGET};
use crate::registry::{InjectorDescriptor, MemCatalog, ModelId, ModelRegistry};

pub fn domain_metadata() -> ConfigMetadata {
    ConfigMetadata::new()
        .with(TARGET, "com.acme.Domain")
        .with("@version", "optional")
        .with("<server>", "collection:Server")
}

pub fn server_metadata() -> ConfigMetadata {
    ConfigMetadata::new()
        .with(TARGET, "com.acme.Server")
        .with(KEY, "@name")
        .with(KEYED_AS, "com.acme.Server")
        .with(INDEX_KEY, "ConfigInjector:server")
        .with("@name", "required")
        .with("@port", "default:8080")
        .with("<description>", "leaf")
        .with("<jvm-option>", "collection:leaf")
        .with("<listener>", "collection:Listener")
        .with("<pool>", "Pool")
}

pub fn listener_metadata() -> ConfigMetadata {
    ConfigMetadata::new()
        .with(TARGET, "com.acme.Listener")
        .with("@name", "required")
        .with("@port", "optional")
        .with("@enabled", "default:true")
}

pub fn pool_metadata() -> ConfigMetadata {
    ConfigMetadata::new()
        .with(TARGET, "com.acme.Pool")
        .with("@size", "default:8")
}

/// Catalog of the fixture domain, keyed by short type name.
pub fn domain_catalog() -> MemCatalog {
    MemCatalog::new()
        .with("Domain", InjectorDescriptor::new("DomainInjector", domain_metadata()))
        .with("Server", InjectorDescriptor::new("ServerInjector", server_metadata()))
        .with("Listener", InjectorDescriptor::new("ListenerInjector", listener_metadata()))
        .with("Pool", InjectorDescriptor::new("PoolInjector", pool_metadata()))
}

pub fn listener(name: &str) -> MemDom {
    MemDom::typed("Listener").with_attribute("name", name)
}

/// Names of the `name` attributes of `nodes`, in order.
pub fn names_of(nodes: &[MemDom]) -> Vec<String> {
    nodes.iter().filter_map(|n| n.attribute("name")).collect()
}

pub struct TestEnv {
    pub registry: ModelRegistry<MemCatalog>,
    pub server_model: ModelId,
    pub server: MemDom,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    /// A registry with the server model built, and an empty server node.
    pub fn new() -> Self {
        let mut registry = ModelRegistry::new(domain_catalog());
        let server_model = registry
            .build_model("Server")
            .expect("fixture metadata builds");
        Self {
            registry,
            server_model,
            server: MemDom::typed("Server").with_attribute("name", "das"),
        }
    }

    /// The server node with listeners `names` appended.
    pub fn with_listeners(self, names: &[&str]) -> Self {
        for name in names {
            self.server.append_child("listener", listener(name));
        }
        self
    }
}
