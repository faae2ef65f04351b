//! Configuration assembly from files on disk.

use std::fs;

use devproxy::config::{load_config, ConfigError, ValidationError};

#[test]
fn shipped_configuration_assembles() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/devproxy.toml");
    let config = load_config(std::path::Path::new(path)).unwrap();

    assert_eq!(config.define.get("__APP_VERSION__").unwrap().literal, "\"0.1.1\"");
    assert!(config.alias.resolve("@").unwrap().ends_with("src"));

    let rule = config.proxy.match_path("/api/widgets").unwrap();
    assert_eq!(rule.upstream_authority(), "10.3.0.182:5000");
    assert!(rule.change_origin());
    assert!(!rule.secure());
}

#[test]
fn malformed_target_fails_before_serving() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devproxy.toml");
    fs::write(
        &path,
        r#"
        [server.proxy."/api"]
        target = "http//missing-colon"
        "#,
    )
    .unwrap();

    match load_config(&path) {
        Err(ConfigError::Validation(errors)) => assert!(matches!(
            &errors[..],
            [ValidationError::InvalidProxyTarget { prefix, .. }] if prefix == "/api"
        )),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn define_substitution_from_file_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devproxy.toml");
    fs::write(
        &path,
        r#"
        [define]
        __APP_VERSION__ = "0.1.1"
        __FEATURES__ = { beta = true }
        "#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    let out = config
        .define
        .apply("const v = __APP_VERSION__, f = __FEATURES__, x = MY__APP_VERSION__;");
    assert_eq!(
        out,
        r#"const v = "0.1.1", f = {"beta":true}, x = MY__APP_VERSION__;"#
    );
}
