//! Translate a textual SQL statement into a QueryDescriptor to be run by an executor.

pub mod error;
pub mod filtering;
pub mod helpers;
pub mod statement;
pub mod tokenizer;
pub mod values;

use query_compiler_configuration::CompilerSettings;
use query_engine_descriptor::descriptor::{Params, QueryDescriptor};

use error::Error;
use helpers::Env;

/// Compile a statement with the default settings.
pub fn compile(statement: &str, params: &Params) -> Result<QueryDescriptor, Error> {
    compile_with(&CompilerSettings::default(), statement, params)
}

/// Compile a statement.
///
/// This is a pure function of its arguments: it reads `params` without modifying it and
/// returns a fresh descriptor, so it can be called from any number of threads at once.
pub fn compile_with(
    settings: &CompilerSettings,
    statement: &str,
    params: &Params,
) -> Result<QueryDescriptor, Error> {
    let statement = normalize(statement);
    let env = Env::new(settings, params);

    let result = tokenizer::tokenize(statement)
        .and_then(|tokens| statement::translate(&env, &tokens));

    match &result {
        Ok(descriptor) => tracing::debug!(
            kind = ?descriptor.kind,
            table = %descriptor.table,
            "compiled statement"
        ),
        Err(error) => tracing::debug!(%error, statement, "failed to compile statement"),
    }
    result
}

/// Strip surrounding whitespace and trailing semicolons.
fn normalize(statement: &str) -> &str {
    statement
        .trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace())
}
