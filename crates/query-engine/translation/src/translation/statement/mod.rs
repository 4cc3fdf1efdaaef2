//! Recognise the kind of a statement and hand it to the matching extractor.

pub mod delete;
pub mod insert;
pub mod joins;
pub mod procedure;
pub mod select;
pub mod sorting;
pub mod update;

use query_engine_descriptor::descriptor::QueryDescriptor;

use super::error::Error;
use super::helpers::{Cursor, Env};
use super::tokenizer::Token;

/// Keywords that introduce a procedure invocation.
pub const PROCEDURE_KEYWORDS: &[&str] = &["CALL", "EXEC", "EXECUTE", "BEGIN"];

/// Translate a tokenized statement into a descriptor.
pub fn translate(env: &Env, tokens: &[Token]) -> Result<QueryDescriptor, Error> {
    let mut cursor = Cursor::new(tokens);

    let keyword = match cursor.peek() {
        Some(Token::Word(word)) => word.to_ascii_uppercase(),
        Some(token) => return Err(Error::UnrecognizedStatement(token.to_string())),
        None => return Err(Error::UnrecognizedStatement(String::new())),
    };

    tracing::trace!(keyword, "classified statement");

    match keyword.as_str() {
        "SELECT" => select::translate(env, &mut cursor),
        "INSERT" => insert::translate(env, &mut cursor),
        "UPDATE" => update::translate(env, &mut cursor),
        "DELETE" => delete::translate(env, &mut cursor),
        keyword if PROCEDURE_KEYWORDS.contains(&keyword) => {
            procedure::translate(env, &mut cursor)
        }
        _ => Err(Error::UnrecognizedStatement(keyword)),
    }
}
