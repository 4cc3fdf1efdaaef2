//! Translate INSERT statements.

use indexmap::IndexMap;

use query_engine_descriptor::descriptor::{QueryDescriptor, StatementKind};

use crate::translation::error::Error;
use crate::translation::helpers::{Cursor, Env};
use crate::translation::tokenizer::Token;
use crate::translation::values;

/// `INSERT [IGNORE] INTO table (columns) VALUES (values)`
pub fn translate(env: &Env, cursor: &mut Cursor) -> Result<QueryDescriptor, Error> {
    cursor.expect_keyword("INSERT")?;
    let ignore_on_conflict = cursor.eat_keyword("IGNORE");
    cursor.expect_keyword("INTO")?;
    let table = cursor.expect_identifier()?;

    let columns = translate_list(cursor, |cursor| cursor.expect_identifier())?;
    if !(cursor.eat_keyword("VALUES") || cursor.eat_keyword("VALUE")) {
        return Err(Error::MalformedClause(format!(
            "expected VALUES after the column list of {table}"
        )));
    }
    let row = translate_list(cursor, |cursor| cursor.expect_value().cloned())?;
    cursor.expect_end()?;

    if columns.len() != row.len() {
        return Err(Error::ColumnCountMismatch {
            columns: columns.len(),
            values: row.len(),
        });
    }

    let mut fields = IndexMap::new();
    for (column, token) in columns.into_iter().zip(row) {
        let value = values::translate_value(env, &token)?;
        if fields.insert(column.clone(), value).is_some() {
            return Err(Error::MalformedClause(format!(
                "column {column} is listed more than once"
            )));
        }
    }

    let mut descriptor = QueryDescriptor::new(StatementKind::Insert, table);
    descriptor.fields = fields;
    descriptor.ignore_on_conflict = ignore_on_conflict;
    Ok(descriptor)
}

/// Parse a non-empty parenthesised, comma-separated list.
fn translate_list<T>(
    cursor: &mut Cursor,
    mut item: impl FnMut(&mut Cursor) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    cursor.expect(&Token::LeftParen)?;
    if cursor.at(&Token::RightParen) {
        return Err(Error::MalformedClause("empty list".to_string()));
    }
    let mut items = vec![item(cursor)?];
    while cursor.eat(&Token::Comma) {
        items.push(item(cursor)?);
    }
    cursor.expect(&Token::RightParen)?;
    Ok(items)
}
