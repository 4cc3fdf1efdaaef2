use clap::Parser;
use serde_json::json;
use similar_asserts::assert_eq;

use query_compiler_cli::{run, Options};
use query_compiler_configuration::{write_configuration, CompilerSettings};

async fn run_with(args: &[&str]) -> anyhow::Result<String> {
    let options = Options::try_parse_from(std::iter::once("query-compiler").chain(args.iter().copied()))?;
    run(&options).await
}

#[tokio::test]
async fn prints_the_descriptor_by_default() {
    let output = run_with(&["SELECT * FROM users"]).await.unwrap();
    let descriptor: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        descriptor,
        json!({"kind": "select", "table": "users", "ignoreOnConflict": false})
    );
}

#[tokio::test]
async fn prints_sql_with_its_params() {
    let output = run_with(&[
        "--format",
        "sql",
        "--params",
        r#"{"id": 3, "name": "o'neil"}"#,
        "UPDATE t SET name = :name WHERE id = :id",
    ])
    .await
    .unwrap();
    assert_eq!(
        output,
        "UPDATE \"t\" SET \"name\" = $1 WHERE (\"id\" = $2)\n-- $1 = 'o''neil'\n-- $2 = 3"
    );
}

#[tokio::test]
async fn prints_document_commands() {
    let output = run_with(&["--format", "document", "DELETE FROM t WHERE a > 1"])
        .await
        .unwrap();
    let command: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        command,
        json!({"delete": "t", "deletes": [{"q": {"a": {"$gt": 1}}, "limit": 0}]})
    );
}

#[tokio::test]
async fn reads_settings_and_params_from_files() {
    let directory = tempfile::tempdir().unwrap();
    let settings = CompilerSettings {
        primary_key: "id".to_string(),
        ..CompilerSettings::default()
    };
    write_configuration(&settings, directory.path()).await.unwrap();
    let params_file = directory.path().join("params.json");
    std::fs::write(&params_file, r#"{"min": 2}"#).unwrap();

    let output = run_with(&[
        "--configuration",
        directory.path().to_str().unwrap(),
        "--params-file",
        params_file.to_str().unwrap(),
        "SELECT a FROM t WHERE b >= :min",
    ])
    .await
    .unwrap();
    let descriptor: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(descriptor["projection"], json!({"a": true, "id": false}));
    assert_eq!(descriptor["filter"]["value"], json!(2));
}

#[tokio::test]
async fn prints_the_configuration_schema() {
    let output = run_with(&["--print-schema"]).await.unwrap();
    let schema: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(schema["properties"]["primaryKey"].is_object());
}

#[tokio::test]
async fn compile_errors_are_reported() {
    assert!(run_with(&["CALL p(:missing)"]).await.is_err());
    assert!(run_with(&["DROP TABLE t"]).await.is_err());
}

#[test]
fn params_and_params_file_conflict() {
    assert!(Options::try_parse_from([
        "query-compiler",
        "--params",
        "{}",
        "--params-file",
        "p.json",
        "SELECT * FROM t",
    ])
    .is_err());
    assert!(Options::try_parse_from(["query-compiler"]).is_err());
}

#[tokio::test]
async fn placeholder_shaped_params_are_a_parse_error() {
    let error = run_with(&[
        "--params",
        r#"{"a": {"placeholder": "b"}}"#,
        "SELECT * FROM t WHERE x = :a",
    ])
    .await
    .unwrap_err();
    assert!(format!("{error:#}").contains("parsing --params"), "{error:#}");
}
