// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for basic resolver operations.
//!
//! These tests verify that the resolver works correctly with the built-in
//! sources and handles the common lookup, placeholder and binding cases.

#![cfg(all(feature = "cli", feature = "env", feature = "properties", feature = "yaml"))]


use bootcfg::adapters::{FileAdapter, MapSource};
use bootcfg::prelude::*;
use serde::Deserialize;
use test_helpers::{create_temp_file, init_tracing, MockConfigSource};

#[test]
fn test_resolve_from_properties_file() {
    let file = create_temp_file(
        "properties",
        "message-from-application-properties=Hello, world!\n",
    );
    let resolver = ConfigResolver::builder()
        .with_file(file.path())
        .unwrap()
        .build()
        .unwrap();

    let value = resolver
        .resolve(&ConfigKey::from("message-from-application-properties"))
        .unwrap()
        .unwrap();
    assert_eq!(value.as_str(), "Hello, world!");
}

#[test]
fn test_resolve_missing_key() {
    let resolver = ConfigResolver::new();

    let key = ConfigKey::from("nonexistent.key");
    assert!(resolver.resolve(&key).unwrap().is_none());
    assert!(!resolver.contains(&key).unwrap());
    assert!(matches!(
        resolver.resolve_required(&key),
        Err(ConfigError::ConfigKeyNotFound { .. })
    ));
}

#[test]
fn test_resolve_with_default() {
    let resolver = ConfigResolver::new();

    let value = resolver
        .resolve_with_default(&ConfigKey::from("missing.key"), "default_value")
        .unwrap();
    assert_eq!(value.as_str(), "default_value");
}

#[test]
fn test_typed_values() {
    let file = create_temp_file(
        "yaml",
        "server:\n  port: 8080\n  ratio: 0.75\n  enabled: yes\n",
    );
    let resolver = ConfigResolver::builder()
        .with_file(file.path())
        .unwrap()
        .build()
        .unwrap();

    let port = resolver
        .resolve_required(&ConfigKey::from("server.port"))
        .unwrap();
    assert_eq!(port.as_u32("server.port").unwrap(), 8080);

    let ratio = resolver
        .resolve_required(&ConfigKey::from("server.ratio"))
        .unwrap();
    assert!((ratio.as_f64("server.ratio").unwrap() - 0.75).abs() < f64::EPSILON);

    let enabled = resolver
        .resolve_required(&ConfigKey::from("server.enabled"))
        .unwrap();
    assert!(enabled.as_bool("server.enabled").unwrap());
}

#[test]
fn test_placeholders_across_sources() {
    let file = create_temp_file(
        "properties",
        "app.name=bootiful\napp.greeting=Hello from ${app.name}!\n",
    );
    let resolver = ConfigResolver::builder()
        .with_file(file.path())
        .unwrap()
        .with_cli_args(vec!["--app.name=cli-app"])
        .build()
        .unwrap();

    assert_eq!(
        resolver.resolve_placeholder("app.greeting").unwrap(),
        "Hello from cli-app!"
    );
    assert_eq!(
        resolver.expand("${missing:${app.name}}/${app.name}").unwrap(),
        "cli-app/cli-app"
    );
}

#[test]
fn test_default_not_evaluated_when_key_present() {
    let strict = MockConfigSource::new("strict", 0)
        .with_value("a", "X")
        .failing_on("b");
    let mut resolver = ConfigResolver::new();
    resolver
        .add_source(Box::new(strict), SourcePosition::First)
        .unwrap();

    assert_eq!(resolver.resolve_placeholder("a:${b:C}").unwrap(), "X");
    assert!(matches!(
        resolver.resolve_placeholder("z:${b:C}"),
        Err(ConfigError::SourceError { .. })
    ));
}

#[test]
fn test_neither_key_defined_uses_inner_default() {
    let resolver = ConfigResolver::new();
    assert_eq!(resolver.resolve_placeholder("a:${b:C}").unwrap(), "C");
}

#[test]
fn test_placeholder_cycle_is_an_error() {
    let resolver = ConfigResolver::builder()
        .with_values("loop", [("a", "${b}"), ("b", "${a}")])
        .build()
        .unwrap();

    assert!(matches!(
        resolver.resolve_placeholder("a"),
        Err(ConfigError::PlaceholderCycle { .. })
    ));
}

#[test]
fn test_duplicate_source_name() {
    let mut resolver = ConfigResolver::new();
    resolver
        .add_source(Box::new(MapSource::new("env")), SourcePosition::Last)
        .unwrap();

    let result = resolver.add_source(Box::new(MapSource::new("env")), SourcePosition::Last);
    assert!(matches!(result, Err(ConfigError::DuplicateSource { .. })));
}

#[derive(Debug, Deserialize)]
struct DataSource {
    url: String,
    pool: Pool,
    read_only: Option<bool>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Pool {
    max_size: u32,
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

#[test]
fn test_bind_nested_struct_from_yaml() {
    init_tracing();
    let file = create_temp_file(
        "yaml",
        r#"
datasource:
  url: jdbc:h2:mem:${db.name:test}
  pool:
    max-size: 10
  tags:
    - primary
    - fast
"#,
    );
    let resolver = ConfigResolver::builder()
        .with_file(file.path())
        .unwrap()
        .with_cli_args(vec!["--datasource.pool.maxSize=20"])
        .build()
        .unwrap();

    let ds: DataSource = resolver.bind_typed("datasource").unwrap().bind().unwrap();
    assert_eq!(ds.url, "jdbc:h2:mem:test");
    assert_eq!(ds.pool.max_size, 20);
    assert_eq!(ds.pool.timeout_secs, 30);
    assert_eq!(ds.read_only, None);
    assert_eq!(ds.tags, vec!["primary", "fast"]);
}

#[test]
fn test_bind_missing_and_invalid_fields() {
    let resolver = ConfigResolver::builder()
        .with_values("m", [("datasource.url", "x")])
        .build()
        .unwrap();
    let result: Result<DataSource> = resolver.bind_typed("datasource").unwrap().bind();
    assert!(matches!(
        result,
        Err(ConfigError::MissingRequiredField { ref field, .. }) if field == "pool"
    ));

    let resolver = ConfigResolver::builder()
        .with_values(
            "m",
            [("datasource.url", "x"), ("datasource.pool.max-size", "lots")],
        )
        .build()
        .unwrap();
    let result: Result<DataSource> = resolver.bind_typed("datasource").unwrap().bind();
    assert!(matches!(
        result,
        Err(ConfigError::TypeConversionError { .. })
    ));
}

#[test]
fn test_file_adapter_registered_by_name() {
    let file = create_temp_file("properties", "a=1\n");
    let adapter = FileAdapter::from_file(file.path()).unwrap();
    let name = adapter.name().to_string();

    let resolver = ConfigResolver::builder()
        .with_source(Box::new(adapter))
        .build()
        .unwrap();
    assert_eq!(resolver.source_names(), vec![name.as_str()]);
}
