//! Translate stored procedure invocations.

use indexmap::IndexMap;

use query_engine_descriptor::descriptor::{QueryDescriptor, StatementKind, Value};

use super::PROCEDURE_KEYWORDS;
use crate::translation::error::Error;
use crate::translation::helpers::{Cursor, Env};
use crate::translation::tokenizer::Token;
use crate::translation::values;

/// `CALL|EXEC|EXECUTE name(args)` or `BEGIN name(args); END`
///
/// A `:name` argument is bound under its own name. A literal argument is named after its
/// 1-based position, `param1`, `param2` and so on.
pub fn translate(env: &Env, cursor: &mut Cursor) -> Result<QueryDescriptor, Error> {
    let block = cursor.at_keyword("BEGIN");
    if !PROCEDURE_KEYWORDS
        .iter()
        .any(|keyword| cursor.eat_keyword(keyword))
    {
        return Err(Error::UnrecognizedStatement(
            cursor.peek().map(ToString::to_string).unwrap_or_default(),
        ));
    }

    let name = cursor.expect_identifier()?;

    let mut fields = IndexMap::new();
    if cursor.eat(&Token::LeftParen) && !cursor.eat(&Token::RightParen) {
        let mut position = 1;
        loop {
            let token = cursor.expect_value()?;
            let (argument, value) = match values::cast_literal(token) {
                Value::Placeholder { placeholder } => {
                    let value = env.bind(Value::Placeholder {
                        placeholder: placeholder.clone(),
                    })?;
                    (placeholder, value)
                }
                literal => (format!("param{position}"), literal),
            };
            if fields.insert(argument.clone(), value).is_some() {
                return Err(Error::MalformedClause(format!(
                    "argument {argument} is passed more than once"
                )));
            }

            position += 1;
            if !cursor.eat(&Token::Comma) {
                break;
            }
        }
        cursor.expect(&Token::RightParen)?;
    }

    if block {
        cursor.eat(&Token::Semicolon);
        cursor.expect_keyword("END")?;
        cursor.eat(&Token::Semicolon);
    }
    cursor.expect_end()?;

    let mut descriptor = QueryDescriptor::new(StatementKind::Procedure, String::new());
    descriptor.procedure_name = Some(name);
    descriptor.fields = fields;
    Ok(descriptor)
}
