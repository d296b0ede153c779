use serial_test::serial;
use temp_env::with_vars;

use super::*;
use crate::Error;

fn cleanup_all_tier_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("TIER__") || key == "CONFIG_PATH" {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let config = TierConfig::default();

    assert_eq!(config.cache.capacity, 2);
    assert_eq!(config.cache.ttl_ms, 600);
    assert_eq!(config.store.ttl_ms, 600);
    assert_eq!(config.store.capacity(), 4096);
    assert_eq!(config.store.backend, MediumBackend::Memory);
    assert_eq!(config.channels.len(), 3);
    assert_eq!(config.channels[0], ChannelConfig::new(0x10, "TEMP", 84, 4));
    assert_eq!(config.runtime.request_interval_ms, 510);
    assert_eq!(config.runtime.refresh_interval_ms, 800);
    assert!(!config.monitoring.prometheus_enabled);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn new_should_merge_environment_overrides() {
    cleanup_all_tier_env_vars();
    with_vars(
        vec![
            ("TIER__CACHE__CAPACITY", Some("3")),
            ("TIER__STORE__TTL_MS", Some("1500")),
            ("TIER__RUNTIME__MODE", Some("ttl_sweep")),
        ],
        || {
            let config = TierConfig::new().unwrap();

            assert_eq!(config.cache.capacity, 3);
            assert_eq!(config.store.ttl_ms, 1500);
            assert_eq!(config.runtime.mode, RunMode::TtlSweep);
            // untouched sections keep their defaults
            assert_eq!(config.channels.len(), 3);
        },
    );
}

#[test]
#[serial]
fn with_override_config_should_merge_file_settings() {
    cleanup_all_tier_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");

    std::fs::write(
        &config_path,
        r#"
        [cache]
        ttl_ms = 2000

        [store]
        backend = "sled"
        db_dir = "/tmp/tiercache/db"

        [[channels]]
        id = 1
        name = "A"
        base_page = 0

        [[channels]]
        id = 2
        name = "B"
        base_page = 1
        slots = 4

        [[channels]]
        id = 3
        name = "C"
        base_page = 2
        slots = 8
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let base_config = TierConfig::new().expect("success");
        let config = base_config
            .with_override_config(config_path.to_str().unwrap())
            .expect("override should succeed")
            .validate()
            .expect("valid");

        assert_eq!(config.cache.ttl_ms, 2000);
        assert_eq!(config.cache.capacity, 2);
        assert_eq!(config.store.backend, MediumBackend::Sled);
        assert_eq!(config.channels.len(), 3);
        assert_eq!(config.channels[0], ChannelConfig::new(1, "A", 0, 4));
        assert_eq!(config.channels[2], ChannelConfig::new(3, "C", 2, 8));
    });
}

#[test]
#[serial]
fn new_should_load_config_path_file() {
    cleanup_all_tier_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("tier.toml");
    std::fs::write(&config_path, "[runtime]\nrequest_interval_ms = 100\n").unwrap();

    with_vars(vec![("CONFIG_PATH", Some(config_path.to_str().unwrap()))], || {
        let config = TierConfig::new().unwrap();
        assert_eq!(config.runtime.request_interval_ms, 100);
    });
}

fn assert_invalid(config: TierConfig) {
    match config.validate() {
        Err(Error::InvalidConfig(_)) => {}
        other => panic!("expected InvalidConfig, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn validation_should_reject_zero_capacity() {
    let mut config = TierConfig::default();
    config.cache.capacity = 0;
    assert_invalid(config);
}

#[test]
fn validation_should_reject_zero_ttl() {
    let mut config = TierConfig::default();
    config.store.ttl_ms = 0;
    assert_invalid(config);
}

#[test]
fn validation_should_reject_duplicate_channel_ids() {
    let mut config = TierConfig::default();
    config.channels = vec![ChannelConfig::new(1, "A", 0, 4), ChannelConfig::new(1, "B", 10, 4)];
    assert_invalid(config);
}

#[test]
fn validation_should_reject_duplicate_channel_names() {
    let mut config = TierConfig::default();
    config.channels = vec![ChannelConfig::new(1, "A", 0, 4), ChannelConfig::new(2, "A", 10, 4)];
    assert_invalid(config);
}

#[test]
fn validation_should_reject_overlapping_slot_runs() {
    let mut config = TierConfig::default();
    // 9 slots * 4 bytes = 36 bytes, spills into page 1
    config.channels = vec![ChannelConfig::new(1, "A", 0, 9), ChannelConfig::new(2, "B", 1, 4)];
    assert_invalid(config);
}

#[test]
fn validation_should_reject_channels_outside_medium() {
    let mut config = TierConfig::default();
    config.channels = vec![ChannelConfig::new(1, "A", 128, 4)];
    assert_invalid(config);
}

#[test]
fn validation_should_reject_empty_channel_list() {
    let mut config = TierConfig::default();
    config.channels.clear();
    assert_invalid(config);
}

#[test]
fn validation_should_reject_privileged_prometheus_port() {
    let mut config = TierConfig::default();
    config.monitoring.prometheus_enabled = true;
    config.monitoring.prometheus_port = 80;
    assert_invalid(config);
}

#[test]
fn validation_should_reject_ephemeral_prometheus_port() {
    let mut config = TierConfig::default();
    config.monitoring.prometheus_enabled = true;
    config.monitoring.prometheus_port = 0;
    assert_invalid(config);
}

#[test]
fn disabled_exporter_port_is_not_checked() {
    let mut config = TierConfig::default();
    config.monitoring.prometheus_port = 0;
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn metrics_listen_address_should_follow_environment() {
    cleanup_all_tier_env_vars();
    with_vars(
        vec![
            ("TIER__MONITORING__PROMETHEUS_ENABLED", Some("true")),
            ("TIER__MONITORING__LISTEN_ADDR", Some("127.0.0.1")),
            ("TIER__MONITORING__PROMETHEUS_PORT", Some("9200")),
        ],
        || {
            let config = TierConfig::new().unwrap();
            assert!(config.monitoring.prometheus_enabled);
            assert_eq!(config.monitoring.socket_addr(), "127.0.0.1:9200".parse().unwrap());
        },
    );
}

#[test]
fn validation_should_reject_empty_sweep() {
    let mut config = TierConfig::default();
    config.sweep.ttl_values_ms.clear();
    assert_invalid(config);
}
