//! The parsed description of one configurable shape.
//!
//! A [`ConfigModel`] is built from a [`ConfigMetadata`] record by the
//! [`ModelRegistry`] and is immutable afterwards. It maps document names to
//! [`Property`] rules and carries the shape's identity data (target type,
//! key indexing, contracts, element name).

use crate::config::BinderConfig;
use crate::dom::Dom;
use crate::error::{ConfigError, Result};
use crate::injector::ConfigInjector;
use crate::metadata::{
    self, ConfigMetadata, ATTRIBUTE_PREFIX, COLLECTION_PREFIX, ELEMENT_NAME_PREFIX, INDEX_KEY,
    KEY, KEYED_AS, LEAF, SYMBOL_SPACES, TARGET, TARGET_CONTRACTS,
};
use crate::property::Property;
use crate::registry::{InjectorCatalog, ModelId, ModelRegistry};
use crate::value::{Value, ValueShape};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigModel {
    id: ModelId,
    injector: String,
    attributes: Vec<Property>,
    elements: Vec<Property>,
    contracts: Vec<String>,
    symbol_spaces: BTreeSet<String>,
    tag_name: Option<String>,
    target_type_name: String,
    keyed_as: Option<String>,
    key: Option<String>,
    config: BinderConfig,
}

impl ConfigModel {
    /// Parses `metadata` into the model for slot `id`.
    ///
    /// Nested types are built through `registry`, which already maps
    /// `injector` to `id`.
    pub(crate) fn parse<C: InjectorCatalog>(
        registry: &mut ModelRegistry<C>,
        id: ModelId,
        injector: &str,
        metadata: &ConfigMetadata,
    ) -> Result<Self> {
        let mut attributes = Vec::new();
        let mut elements = Vec::new();
        let mut target_type_name = None;
        let mut keyed_as = None;
        let mut key = None;

        for (name, values) in metadata.iter() {
            let value = values.first().map(String::as_str);
            if let Some(attribute) = name.strip_prefix(ATTRIBUTE_PREFIX) {
                let default = metadata::default_value(values);
                put(&mut attributes, Property::attribute(attribute, default));
            } else if name.starts_with('<') {
                let element = element_name(name)?;
                let value = value.ok_or_else(|| ConfigError::MalformedMetadata {
                    key: name.to_string(),
                    reason: "element entry has no value".to_string(),
                })?;
                put(&mut elements, parse_element(registry, element, value)?);
            } else if name == TARGET {
                target_type_name = value.map(str::to_string);
            } else if name == KEYED_AS {
                keyed_as = value.map(str::to_string);
            } else if name == KEY {
                key = value.map(str::to_string);
            }
        }

        let target_type_name = target_type_name.ok_or_else(|| ConfigError::MissingMandatoryField {
            injector: injector.to_string(),
            field: TARGET,
        })?;
        if key.is_some() != keyed_as.is_some() {
            return Err(ConfigError::InconsistentKeyMetadata {
                injector: injector.to_string(),
                key,
                keyed_as,
            });
        }

        let tag_name = metadata
            .get(INDEX_KEY)
            .iter()
            .filter_map(|v| v.strip_prefix(ELEMENT_NAME_PREFIX))
            .last()
            .map(str::to_string);

        Ok(Self {
            id,
            injector: injector.to_string(),
            attributes,
            elements,
            contracts: metadata.get(TARGET_CONTRACTS).to_vec(),
            symbol_spaces: metadata.get(SYMBOL_SPACES).iter().cloned().collect(),
            tag_name,
            target_type_name,
            keyed_as,
            key,
            config: registry.config().clone(),
        })
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Name of the injector this model was built for.
    pub fn injector(&self) -> &str {
        &self.injector
    }

    pub fn target_type_name(&self) -> &str {
        &self.target_type_name
    }

    /// Global element name of the shape, if it has one.
    pub fn tag_name(&self) -> Option<&str> {
        self.tag_name.as_deref()
    }

    pub fn keyed_as(&self) -> Option<&str> {
        self.keyed_as.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }

    pub fn contracts(&self) -> &[String] {
        &self.contracts
    }

    pub fn symbol_spaces(&self) -> &BTreeSet<String> {
        &self.symbol_spaces
    }

    pub fn attributes(&self) -> &[Property] {
        &self.attributes
    }

    pub fn elements(&self) -> &[Property] {
        &self.elements
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(Property::xml_name)
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(Property::xml_name)
    }

    /// Exact attribute lookup.
    pub fn attribute(&self, name: &str) -> Option<&Property> {
        self.attributes.iter().find(|p| p.xml_name() == name)
    }

    /// Exact element lookup.
    pub fn element(&self, name: &str) -> Option<&Property> {
        self.elements.iter().find(|p| p.xml_name() == name)
    }

    /// Finds a property by document name.
    ///
    /// Exact matches win, attributes before elements. Failing that, and if
    /// the model's config allows it, the first case-insensitive match. Case
    /// folding is per character and Unicode-aware, so `Ärger` matches
    /// `äRGER`.
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        if let Some(found) = self.attribute(name).or_else(|| self.element(name)) {
            return Some(found);
        }
        if !self.config.case_insensitive_lookup {
            return None;
        }
        let found = self
            .attributes
            .iter()
            .chain(&self.elements)
            .find(|p| eq_ignore_case(p.xml_name(), name));
        if let Some(property) = found {
            tracing::trace!(
                requested = name,
                resolved = property.xml_name(),
                "case-insensitive property match"
            );
        }
        found
    }

    /// Reads property `name` of `dom` in the requested shape.
    pub fn get<D: Dom>(&self, dom: &D, name: &str, shape: ValueShape) -> Result<Value<D>> {
        self.property(name)?.get(dom, shape)
    }

    /// Writes property `name` of `dom`.
    pub fn set<D: Dom>(&self, dom: &D, name: &str, value: Value<D>) -> Result<()> {
        let property = self.property(name)?;
        let removes_single_leaf = value.is_null()
            && matches!(
                property,
                Property::AttributeLeaf { .. } | Property::SingleLeaf { .. }
            );
        if removes_single_leaf && !self.config.removes_null_leaves() {
            return Err(ConfigError::UnsupportedOperation {
                xml_name: property.xml_name().to_string(),
                operation: "remove by setting null",
            });
        }
        property.set(dom, value)
    }

    /// Runs `injector` over `dom`, tagging any failure with the node's
    /// source location.
    pub fn inject<D, T, I>(&self, injector: &I, dom: &D, target: &mut T) -> Result<()>
    where
        D: Dom,
        I: ConfigInjector<T>,
    {
        injector.inject(dom, target).map_err(|err| match dom.location() {
            Some(location) => err.at(location),
            None => err,
        })
    }

    fn property(&self, name: &str) -> Result<&Property> {
        self.find_property(name)
            .ok_or_else(|| ConfigError::UnknownProperty {
                name: name.to_string(),
                target: self.target_type_name.clone(),
            })
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Appends `property`, or replaces the one with the same name in place.
fn put(properties: &mut Vec<Property>, property: Property) {
    match properties
        .iter_mut()
        .find(|p| p.xml_name() == property.xml_name())
    {
        Some(slot) => *slot = property,
        None => properties.push(property),
    }
}

/// `<name>` → `name`
fn element_name(key: &str) -> Result<&str> {
    match key.strip_prefix('<').and_then(|k| k.strip_suffix('>')) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ConfigError::MalformedMetadata {
            key: key.to_string(),
            reason: "element name must be written as <name>".to_string(),
        }),
    }
}

fn parse_element<C: InjectorCatalog>(
    registry: &mut ModelRegistry<C>,
    element: &str,
    value: &str,
) -> Result<Property> {
    let (collection, kind) = match value.strip_prefix(COLLECTION_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    if kind == LEAF {
        return Ok(Property::leaf(element, collection));
    }
    let model = registry.build_model(kind)?;
    Ok(Property::node(element, model, kind, collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeafRemoval;
    use crate::dom::mem::MemDom;
    use crate::dom::Location;
    use crate::registry::{InjectorDescriptor, MemCatalog};

    fn build(metadata: ConfigMetadata) -> Result<ModelRegistry<MemCatalog>> {
        build_with(metadata, BinderConfig::default())
    }

    fn build_with(
        metadata: ConfigMetadata,
        config: BinderConfig,
    ) -> Result<ModelRegistry<MemCatalog>> {
        let catalog = MemCatalog::new().with(
            "Server",
            InjectorDescriptor::new("ServerInjector", metadata),
        );
        let mut registry = ModelRegistry::with_config(catalog, config);
        registry.build_model("Server")?;
        Ok(registry)
    }

    fn model(registry: &ModelRegistry<MemCatalog>) -> &ConfigModel {
        registry.model(ModelId::new(0)).unwrap()
    }

    fn server() -> ConfigMetadata {
        ConfigMetadata::new().with(TARGET, "com.acme.Server")
    }

    // --- Parsing ---

    #[test]
    fn test_parse_identity_fields() {
        let metadata = server()
            .with(KEY, "@name")
            .with(KEYED_AS, "com.acme.Server")
            .with(TARGET_CONTRACTS, "com.acme.Named")
            .with(TARGET_CONTRACTS, "com.acme.Startable")
            .with(SYMBOL_SPACES, "com.acme.Pool")
            .with(INDEX_KEY, "com.acme.Server:server")
            .with(INDEX_KEY, "ConfigInjector:server")
            .with("unrelated", "ignored");
        let registry = build(metadata).unwrap();
        let model = model(&registry);

        assert_eq!(model.injector(), "ServerInjector");
        assert_eq!(model.target_type_name(), "com.acme.Server");
        assert_eq!(model.key(), Some("@name"));
        assert_eq!(model.keyed_as(), Some("com.acme.Server"));
        assert!(model.is_keyed());
        assert_eq!(model.contracts(), ["com.acme.Named", "com.acme.Startable"]);
        assert!(model.symbol_spaces().contains("com.acme.Pool"));
        assert_eq!(model.tag_name(), Some("server"));
    }

    #[test]
    fn test_tag_name_last_match_wins() {
        let metadata = server()
            .with(INDEX_KEY, "ConfigInjector:first")
            .with(INDEX_KEY, "ConfigInjector:second");
        let registry = build(metadata).unwrap();
        assert_eq!(model(&registry).tag_name(), Some("second"));
    }

    #[test]
    fn test_parse_properties_in_order() {
        let metadata = server()
            .with("@name", "required")
            .with("@port", "optional")
            .with("@port", "default:8080")
            .with("<description>", "leaf")
            .with("<jvm-option>", "collection:leaf");
        let registry = build(metadata).unwrap();
        let model = model(&registry);

        assert_eq!(model.attribute_names().collect::<Vec<_>>(), ["name", "port"]);
        assert_eq!(
            model.element_names().collect::<Vec<_>>(),
            ["description", "jvm-option"]
        );
        assert_eq!(model.attribute("port").unwrap().default_value(), Some("8080"));
        assert_eq!(model.attribute("name").unwrap().default_value(), None);
        assert!(model.element("jvm-option").unwrap().is_collection());
        assert!(!model.element("description").unwrap().is_collection());
    }

    #[test]
    fn test_metadata_set_keeps_attribute_position() {
        let mut metadata = server().with("@a", "x").with("@b", "x");
        metadata.set("@a", vec!["default:1".to_string()]);
        let registry = build(metadata).unwrap();
        let model = model(&registry);
        assert_eq!(model.attribute_names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(model.attribute("a").unwrap().default_value(), Some("1"));
    }

    #[test]
    fn test_missing_target() {
        let err = build(ConfigMetadata::new().with("@name", "required")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingMandatoryField { field: "target", .. }
        ));
    }

    #[test]
    fn test_key_without_keyed_as() {
        assert!(matches!(
            build(server().with(KEY, "@name")),
            Err(ConfigError::InconsistentKeyMetadata { keyed_as: None, .. })
        ));
        assert!(matches!(
            build(server().with(KEYED_AS, "com.acme.Server")),
            Err(ConfigError::InconsistentKeyMetadata { key: None, .. })
        ));
    }

    #[test]
    fn test_malformed_element_entries() {
        for key in ["<>", "<open"] {
            let err = build(server().with(key, "leaf")).unwrap_err();
            assert!(
                matches!(err, ConfigError::MalformedMetadata { .. }),
                "{}: {:?}",
                key,
                err
            );
        }

        let mut metadata = server();
        metadata.set("<empty>", Vec::new());
        assert!(matches!(
            build(metadata),
            Err(ConfigError::MalformedMetadata { .. })
        ));
    }

    // --- Name resolution ---

    #[test]
    fn test_find_property_case_insensitive_fallback() {
        let registry = build(server().with("@Foo", "x")).unwrap();
        let model = model(&registry);
        assert!(model.attribute("foo").is_none());
        assert_eq!(model.find_property("foo").map(Property::xml_name), Some("Foo"));
    }

    #[test]
    fn test_find_property_folds_non_ascii_case() {
        let registry = build(server().with("@Ärger", "x").with("<größe>", "leaf")).unwrap();
        let model = model(&registry);
        assert_eq!(model.find_property("äRGER").map(Property::xml_name), Some("Ärger"));
        assert_eq!(model.find_property("GRÖßE").map(Property::xml_name), Some("größe"));
        assert!(model.find_property("GROESSE").is_none());
    }

    #[test]
    fn test_find_property_exact_element_beats_attribute() {
        let registry = build(server().with("@Foo", "x").with("<foo>", "leaf")).unwrap();
        let found = model(&registry).find_property("foo").unwrap();
        assert!(matches!(found, Property::SingleLeaf { .. }));
    }

    #[test]
    fn test_find_property_exact_only_when_disabled() {
        let config = BinderConfig {
            case_insensitive_lookup: false,
            ..BinderConfig::default()
        };
        let registry = build_with(server().with("@Foo", "x"), config).unwrap();
        assert!(model(&registry).find_property("foo").is_none());
        assert!(model(&registry).find_property("Foo").is_some());
    }

    // --- Get / set ---

    #[test]
    fn test_get_set_through_case_insensitive_name() {
        let registry = build(server().with("@Port", "default:5")).unwrap();
        let model = model(&registry);
        let dom = MemDom::new();

        assert_eq!(
            model.get(&dom, "port", ValueShape::INTEGER).unwrap(),
            Value::Integer(5)
        );
        model.set(&dom, "PORT", Value::from(7i32)).unwrap();
        assert_eq!(dom.attribute("Port"), Some("7".to_string()));
    }

    #[test]
    fn test_unknown_property() {
        let registry = build(server()).unwrap();
        let err = model(&registry)
            .get(&MemDom::new(), "missing", ValueShape::TEXT)
            .unwrap_err();
        match err {
            ConfigError::UnknownProperty { name, target } => {
                assert_eq!(name, "missing");
                assert_eq!(target, "com.acme.Server");
            }
            other => panic!("Expected UnknownProperty, got {:?}", other),
        }
    }

    #[test]
    fn test_null_leaf_removal_policy() {
        let metadata = server().with("@port", "x").with("<description>", "leaf");
        let dom = MemDom::new()
            .with_attribute("port", "1")
            .with_leaf("description", "d");

        let config = BinderConfig {
            leaf_removal: LeafRemoval::Reject,
            ..BinderConfig::default()
        };
        let registry = build_with(metadata.clone(), config).unwrap();
        for name in ["port", "description"] {
            assert!(matches!(
                model(&registry).set(&dom, name, Value::Null),
                Err(ConfigError::UnsupportedOperation { .. })
            ));
        }
        assert_eq!(dom.attribute("port"), Some("1".to_string()));

        let registry = build(metadata).unwrap();
        model(&registry).set(&dom, "port", Value::Null).unwrap();
        model(&registry).set(&dom, "description", Value::Null).unwrap();
        assert_eq!(dom.attribute("port"), None);
        assert_eq!(dom.leaf_element("description"), None);
    }

    // --- Injection ---

    struct PortInjector;

    impl ConfigInjector<u16> for PortInjector {
        fn inject<D: Dom>(&self, dom: &D, target: &mut u16) -> Result<()> {
            let raw = dom.attribute("port").unwrap_or_default();
            *target = raw.parse().map_err(|_| ConfigError::TypeCoercion {
                xml_name: "port".to_string(),
                value: raw.clone(),
                target: "u16",
            })?;
            Ok(())
        }
    }

    #[test]
    fn test_inject_success() {
        let registry = build(server()).unwrap();
        let dom = MemDom::new().with_attribute("port", "8080");
        let mut port: u16 = 0;
        model(&registry).inject(&PortInjector, &dom, &mut port).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_inject_failure_carries_location() {
        let registry = build(server()).unwrap();
        let location = Location::new("domain.xml", 7, 3);
        let dom = MemDom::new()
            .with_location(location.clone())
            .with_attribute("port", "http");
        let mut port: u16 = 0;

        let err = model(&registry)
            .inject(&PortInjector, &dom, &mut port)
            .unwrap_err();
        assert_eq!(err.location(), Some(&location));
        assert!(matches!(err.root(), ConfigError::TypeCoercion { .. }));
    }
}
