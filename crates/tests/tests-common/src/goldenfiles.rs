//! Goldenfile test cases.
//!
//! Each case is a directory under `crates/tests/goldenfiles` holding a `statement.sql`, an
//! optional `params.json`, an optional `configuration.json` and the expected
//! `descriptor.json`.

use std::path::PathBuf;

use anyhow::Context;
use tokio::fs;

use query_compiler_configuration::{parse_configuration, CompilerSettings};
use query_engine_descriptor::descriptor::{Params, QueryDescriptor};
use query_engine_translation::translation;

const GOLDENFILES_DIR: &str = "crates/tests/goldenfiles";

/// Find a path relative to the root of the repository.
pub fn get_path_from_project_root(path: impl AsRef<std::path::Path>) -> PathBuf {
    let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("../../../");
    d.push(path);
    d
}

/// The inputs of a goldenfile case.
pub struct Goldenfile {
    pub statement: String,
    pub params: Params,
    pub settings: CompilerSettings,
}

pub async fn read_goldenfile(testname: &str) -> anyhow::Result<Goldenfile> {
    let directory = get_path_from_project_root(GOLDENFILES_DIR).join(testname);

    let statement = fs::read_to_string(directory.join("statement.sql"))
        .await
        .with_context(|| format!("reading the statement of {testname}"))?;

    let params_file = directory.join("params.json");
    let params = if params_file.exists() {
        let contents = fs::read_to_string(&params_file).await?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", params_file.display()))?
    } else {
        Params::new()
    };

    let settings = parse_configuration(&directory).await?;

    Ok(Goldenfile {
        statement,
        params,
        settings,
    })
}

/// Compile the statement of a goldenfile case.
pub async fn compile_goldenfile(testname: &str) -> anyhow::Result<QueryDescriptor> {
    let goldenfile = read_goldenfile(testname).await?;
    let descriptor = translation::compile_with(
        &goldenfile.settings,
        &goldenfile.statement,
        &goldenfile.params,
    )?;
    Ok(descriptor)
}

/// The descriptor a goldenfile case is expected to compile to, as JSON.
pub async fn expected_descriptor(testname: &str) -> anyhow::Result<serde_json::Value> {
    let file = get_path_from_project_root(GOLDENFILES_DIR)
        .join(testname)
        .join("descriptor.json");
    let contents = fs::read_to_string(&file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    Ok(serde_json::from_str(&contents)?)
}
