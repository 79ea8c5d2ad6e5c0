use configbean::test_utils::{domain_catalog, server_metadata};
use configbean::{
    BinderConfig, ConfigBean, ConfigError, ConfigMetadata, LeafRemoval, MemDom, ModelRegistry,
    Value,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_reject_policy_from_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("configbean.toml");
    fs::write(
        &path,
        "case_insensitive_lookup = false\nleaf_removal = \"reject\"\n",
    )
    .unwrap();

    let config = BinderConfig::load(&path).unwrap();
    assert_eq!(config.leaf_removal, LeafRemoval::Reject);
    assert!(!config.case_insensitive_lookup);

    let mut registry = ModelRegistry::with_config(domain_catalog(), config);
    let id = registry.build_model("Server").unwrap();
    let server = MemDom::typed("Server").with_attribute("name", "das");
    let bean = ConfigBean::new(server, id);

    assert!(matches!(
        bean.set(&registry, "name", Value::Null),
        Err(ConfigError::UnsupportedOperation { .. })
    ));
    assert!(matches!(
        bean.set(&registry, "NAME", Value::from("x")),
        Err(ConfigError::UnknownProperty { .. })
    ));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = BinderConfig::load(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, BinderConfig::default());
}

#[test]
fn test_metadata_json_keeps_key_order() {
    let json = serde_json::to_string(&server_metadata()).unwrap();
    let parsed = ConfigMetadata::from_json(&json).unwrap();
    assert_eq!(parsed, server_metadata());

    let keys: Vec<&str> = parsed.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        [
            "target",
            "key",
            "keyed-as",
            "index",
            "@name",
            "@port",
            "<description>",
            "<jvm-option>",
            "<listener>",
            "<pool>"
        ]
    );
}

#[test]
fn test_hand_written_json_record_builds() {
    let json = r#"{
        "target": "com.acme.Pool",
        "@size": ["optional", "default:16"],
        "@name": "required"
    }"#;
    let metadata = ConfigMetadata::from_json(json).unwrap();
    let catalog = domain_catalog().with(
        "Pool",
        configbean::InjectorDescriptor::new("PoolInjector", metadata),
    );
    let mut registry = ModelRegistry::new(catalog);
    let id = registry.build_model("Pool").unwrap();
    let model = registry.model(id).unwrap();

    assert_eq!(model.attribute_names().collect::<Vec<_>>(), ["size", "name"]);
    assert_eq!(model.attribute("size").unwrap().default_value(), Some("16"));
}
