//! Tests that configuration can be read back after it is written, and that bad files are rejected.

use std::fs;

use similar_asserts::assert_eq;

use query_compiler_configuration::error::ParseConfigurationError;
use query_compiler_configuration::version1::{
    configuration_schema, CONFIGURATION_FILENAME, CONFIGURATION_JSONSCHEMA_FILENAME,
};
use query_compiler_configuration::{parse_configuration, write_configuration, CompilerSettings};

#[tokio::test]
async fn missing_configuration_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = parse_configuration(dir.path())
        .await
        .expect("parse_configuration");
    assert_eq!(settings, CompilerSettings::default());
    assert_eq!(settings.primary_key, "_id");
}

#[tokio::test]
async fn written_configuration_parses_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = CompilerSettings {
        primary_key: "id".to_string(),
        max_predicate_depth: 4,
        case_insensitive_like: false,
        ..CompilerSettings::default()
    };

    write_configuration(&settings, dir.path())
        .await
        .expect("write_configuration");
    assert!(dir.path().join(CONFIGURATION_JSONSCHEMA_FILENAME).exists());

    let parsed = parse_configuration(dir.path())
        .await
        .expect("parse_configuration");
    assert_eq!(parsed, settings);
}

#[tokio::test]
async fn partial_configuration_uses_defaults_for_the_rest() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(CONFIGURATION_FILENAME),
        r#"{ "primaryKey": "uuid" }"#,
    )
    .expect("fs::write");

    let parsed = parse_configuration(dir.path())
        .await
        .expect("parse_configuration");
    assert_eq!(
        parsed,
        CompilerSettings {
            primary_key: "uuid".to_string(),
            ..CompilerSettings::default()
        }
    );
}

#[tokio::test]
async fn unsupported_version_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(CONFIGURATION_FILENAME),
        r#"{ "version": 7 }"#,
    )
    .expect("fs::write");

    let error = parse_configuration(dir.path()).await.unwrap_err();
    assert!(matches!(error, ParseConfigurationError::UnsupportedVersion(7)));
}

#[tokio::test]
async fn malformed_json_reports_its_position() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(CONFIGURATION_FILENAME), "{\n  \"version\": }").expect("fs::write");

    match parse_configuration(dir.path()).await.unwrap_err() {
        ParseConfigurationError::ParseError { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn default_configuration_satisfies_its_schema() {
    let schema = serde_json::to_value(configuration_schema()).expect("serde_json::to_value");
    let compiled = jsonschema::JSONSchema::compile(&schema).expect("JSONSchema::compile");

    let instance = serde_json::to_value(CompilerSettings::default()).expect("to_value");
    assert!(compiled.is_valid(&instance));

    let invalid = serde_json::json!({ "maxPredicateDepth": "deep" });
    assert!(!compiled.is_valid(&invalid));
}
