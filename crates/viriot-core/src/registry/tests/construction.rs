use super::*;
use crate::registry::Registry;
use viriot_config::{ConfigError, RegistryConfig};

fn config_with(f: impl FnOnce(&mut RegistryConfig)) -> RegistryConfig {
    let mut config = RegistryConfig::default();
    f(&mut config);
    config
}

#[test]
fn registry_refuses_shared_partitions() {
    let config = config_with(|c| c.collections.flavours = c.collections.thing_visors.clone());

    let err = Registry::try_new(config).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");
}

#[test]
fn registry_refuses_empty_and_nul_collection_names() {
    for config in [
        config_with(|c| c.collections.silos = String::new()),
        config_with(|c| c.collections.memberships = "bad\0name".to_string()),
    ] {
        assert!(matches!(
            Registry::try_new(config),
            Err(ConfigError::Invalid { .. })
        ));
    }
}

#[test]
fn registry_over_distinct_custom_partitions_keeps_kinds_apart() {
    let config = config_with(|c| {
        c.collections.thing_visors = "tvs".to_string();
        c.collections.flavours = "flavours".to_string();
    });
    let mut h = Harness::new();
    h.registry = Registry::try_new(config).unwrap();

    h.seed_thing_visor("x", Status::Pending);
    h.tx(|s| s.add_flavour("x")).unwrap();

    assert_eq!(h.tx(|s| s.get_all_thing_visors()).unwrap().len(), 1);
    assert_eq!(h.tx(|s| s.get_all_flavours()).unwrap().len(), 1);
    assert_eq!(h.host.store().len("tvs"), 1);
    assert_eq!(h.host.store().len("flavours"), 1);
}
