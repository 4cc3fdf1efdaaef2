//! Command line front end for the statement compiler.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use query_compiler_configuration::{parse_configuration, version1, CompilerSettings};
use query_engine_descriptor::descriptor::Params;
use query_engine_document::document;
use query_engine_sql::sql;
use query_engine_translation::translation;

/// What to print for a compiled statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// The query descriptor as JSON.
    Descriptor,
    /// A parameterized SQL statement followed by its parameters.
    Sql,
    /// The document-store command as JSON.
    Document,
}

#[derive(Debug, Parser)]
#[command(name = "query-compiler", version, about)]
pub struct Options {
    /// Directory holding configuration.json.
    #[arg(long, value_name = "DIR")]
    pub configuration: Option<PathBuf>,

    /// Parameters as a JSON object, e.g. '{"id": 1}'.
    #[arg(long, value_name = "JSON", conflicts_with = "params_file")]
    pub params: Option<String>,

    /// Read the parameters from a JSON file.
    #[arg(long, value_name = "PATH")]
    pub params_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Descriptor)]
    pub format: Format,

    /// Pretty-print JSON and SQL output.
    #[arg(long)]
    pub pretty: bool,

    /// Log more; repeat for even more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print the JSON schema of the configuration file and exit.
    #[arg(long, conflicts_with = "statement")]
    pub print_schema: bool,

    #[arg(required_unless_present = "print_schema")]
    pub statement: Option<String>,
}

/// Install `env_logger`. `RUST_LOG` wins over the verbosity flag.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Compile the statement named by the options and render it.
pub async fn run(options: &Options) -> anyhow::Result<String> {
    if options.print_schema {
        return Ok(serde_json::to_string_pretty(
            &version1::configuration_schema(),
        )?);
    }

    let statement = options
        .statement
        .as_deref()
        .context("no statement given")?;
    let settings = match &options.configuration {
        Some(directory) => parse_configuration(directory)
            .await
            .with_context(|| format!("reading configuration from {}", directory.display()))?,
        None => CompilerSettings::default(),
    };
    let params = read_params(options).await?;

    let descriptor = translation::compile_with(&settings, statement, &params)?;
    tracing::info!(kind = ?descriptor.kind, "compiled statement");

    match options.format {
        Format::Descriptor => to_json(&descriptor, options.pretty),
        Format::Document => to_json(&document::command(&descriptor)?, options.pretty),
        Format::Sql => {
            let rendered = sql::translate(&descriptor)?;
            let mut output = if options.pretty {
                sqlformat::format(
                    &rendered.sql,
                    &sqlformat::QueryParams::None,
                    sqlformat::FormatOptions::default(),
                )
            } else {
                rendered.sql
            };
            for (index, param) in rendered.params.iter().enumerate() {
                output.push_str(&format!("\n-- ${} = {param}", index + 1));
            }
            Ok(output)
        }
    }
}

async fn read_params(options: &Options) -> anyhow::Result<Params> {
    let params = match (&options.params, &options.params_file) {
        (Some(json), _) => serde_json::from_str(json).context("parsing --params")?,
        (None, Some(path)) => {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        (None, None) => Params::new(),
    };
    Ok(params)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
