use super::*;

#[test]
fn empty_document_uses_default_collection_names() {
    let config = RegistryConfig::from_toml_str("").unwrap();

    assert!(!config.debug);
    assert_eq!(config.collections.thing_visors, DEFAULT_THING_VISORS);
    assert_eq!(config.collections.vthings, DEFAULT_VTHINGS);
    assert_eq!(config.collections.memberships, DEFAULT_MEMBERSHIPS);
    assert_eq!(config.collections.silos, DEFAULT_SILOS);
    assert_eq!(config.collections.flavours, DEFAULT_FLAVOURS);
}

#[test]
fn partial_collections_keep_remaining_defaults() {
    let config = RegistryConfig::from_toml_str(
        r#"
        debug = true

        [collections]
        silos = "silos_v2"
        "#,
    )
    .unwrap();

    assert!(config.debug);
    assert_eq!(config.collections.silos, "silos_v2");
    assert_eq!(config.collections.flavours, DEFAULT_FLAVOURS);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = RegistryConfig::from_toml_str("verbose = true").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = RegistryConfig::from_toml_str("[collections]\nthings = \"x\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn duplicate_collection_names_are_rejected() {
    let err = RegistryConfig::from_toml_str(
        r#"
        [collections]
        silos = "shared"
        flavours = "shared"
        "#,
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert!(err.to_string().contains("shared"));
}

#[test]
fn empty_collection_name_is_rejected() {
    let err = RegistryConfig::from_toml_str("[collections]\nvthings = \"\"").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn load_reports_missing_file_path() {
    let path = std::env::temp_dir().join("viriot-config-does-not-exist.toml");
    let err = RegistryConfig::load(&path).unwrap_err();

    match err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}
