//! Translate DELETE statements.

use query_engine_descriptor::descriptor::{QueryDescriptor, StatementKind};

use crate::translation::error::Error;
use crate::translation::filtering;
use crate::translation::helpers::{Cursor, Env};

/// `DELETE FROM table [WHERE ...]`
pub fn translate(env: &Env, cursor: &mut Cursor) -> Result<QueryDescriptor, Error> {
    cursor.expect_keyword("DELETE")?;
    cursor.expect_keyword("FROM")?;
    let table = cursor.expect_identifier()?;

    let filter = if cursor.eat_keyword("WHERE") {
        Some(filtering::translate_predicate(env, cursor)?)
    } else {
        None
    };
    cursor.expect_end()?;

    let mut descriptor = QueryDescriptor::new(StatementKind::Delete, table);
    descriptor.filter = filter;
    Ok(descriptor)
}
