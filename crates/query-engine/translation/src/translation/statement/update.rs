//! Translate UPDATE statements.

use indexmap::IndexMap;

use query_engine_descriptor::descriptor::{QueryDescriptor, StatementKind};

use crate::translation::error::Error;
use crate::translation::filtering;
use crate::translation::helpers::{Cursor, Env};
use crate::translation::tokenizer::Token;
use crate::translation::values;

/// `UPDATE table SET field = value[, field = value...] [WHERE ...]`
pub fn translate(env: &Env, cursor: &mut Cursor) -> Result<QueryDescriptor, Error> {
    cursor.expect_keyword("UPDATE")?;
    let table = cursor.expect_identifier()?;
    cursor.expect_keyword("SET")?;

    let mut fields = IndexMap::new();
    loop {
        let field = cursor.expect_identifier()?;
        match cursor.next_token() {
            Some(Token::Symbol(symbol)) if symbol == "=" => {}
            _ => {
                return Err(Error::MalformedClause(format!(
                    "expected '=' after {field} in SET"
                )))
            }
        }
        let value = values::translate_value(env, cursor.expect_value()?)?;
        if fields.insert(field.clone(), value).is_some() {
            return Err(Error::MalformedClause(format!(
                "field {field} is set more than once"
            )));
        }
        if !cursor.eat(&Token::Comma) {
            break;
        }
    }

    let filter = if cursor.eat_keyword("WHERE") {
        Some(filtering::translate_predicate(env, cursor)?)
    } else {
        None
    };
    cursor.expect_end()?;

    let mut descriptor = QueryDescriptor::new(StatementKind::Update, table);
    descriptor.fields = fields;
    descriptor.filter = filter;
    Ok(descriptor)
}
