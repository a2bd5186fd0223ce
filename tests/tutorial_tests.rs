// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the local tutorials against the bundled `config/application.properties`.

#![cfg(all(feature = "tutorials", feature = "properties"))]

use bootcfg::adapters::MemorySink;
use bootcfg::tutorials::{Tutorial, TutorialContext};
use std::path::PathBuf;

fn bundled_context() -> TutorialContext {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("application.properties");
    TutorialContext::new().with_config_file(path)
}

fn run(tutorial: Tutorial, context: &TutorialContext) -> Vec<String> {
    let sink = MemorySink::new();
    tutorial.run(context, &sink).unwrap();
    sink.lines()
}

#[test]
fn test_basic_reads_bundled_file() {
    assert_eq!(
        run(Tutorial::Basic, &bundled_context()),
        vec!["message from application.properties Hello from application.properties!"]
    );
}

#[test]
fn test_value_falls_back_for_misspelled_key() {
    assert_eq!(
        run(Tutorial::Value, &bundled_context()),
        vec![
            "message from application.properties Hello from application.properties!",
            "missing message from application.properties YIKES!",
        ]
    );
}

#[test]
fn test_propertysource_uses_custom_source() {
    assert_eq!(
        run(Tutorial::PropertySource, &bundled_context()),
        vec!["message from custom property source Hello from BootifulPropertySource!"]
    );
}

#[test]
fn test_configuration_properties_binds_prefix() {
    assert_eq!(
        run(Tutorial::ConfigurationProperties, &bundled_context()),
        vec!["message from @ConfigurationProperties Hello from @ConfigurationProperties!"]
    );
}

#[test]
fn test_overrides_beat_bundled_file() {
    let context = bundled_context().with_overrides([
        "--message-from-application-properties=from the command line",
        "--bootiful.message=bound from the command line",
    ]);

    assert_eq!(
        run(Tutorial::Basic, &context),
        vec!["message from application.properties from the command line"]
    );
    assert_eq!(
        run(Tutorial::ConfigurationProperties, &context),
        vec!["message from @ConfigurationProperties bound from the command line"]
    );
}

#[test]
fn test_without_file_basic_prints_null() {
    assert_eq!(
        run(Tutorial::Basic, &TutorialContext::new()),
        vec!["message from application.properties null"]
    );
}
