//! ORDER BY and LIMIT clauses.

use query_engine_descriptor::descriptor::{Limit, OrderByDirection, OrderByElement};

use crate::translation::error::Error;
use crate::translation::helpers::{Cursor, Env};
use crate::translation::tokenizer::Token;
use crate::translation::values;

/// Translate an optional `ORDER BY field [ASC|DESC], ...` clause.
pub fn translate_order_by(cursor: &mut Cursor) -> Result<Vec<OrderByElement>, Error> {
    if !cursor.eat_keyword("ORDER") {
        return Ok(vec![]);
    }
    cursor.expect_keyword("BY")?;

    let mut elements = vec![];
    loop {
        let field = cursor.expect_identifier()?;
        let direction = if cursor.eat_keyword("DESC") {
            OrderByDirection::Desc
        } else {
            cursor.eat_keyword("ASC");
            OrderByDirection::Asc
        };
        elements.push(OrderByElement { field, direction });

        if !cursor.eat(&Token::Comma) {
            break;
        }
    }
    Ok(elements)
}

/// Translate an optional `LIMIT count`, `LIMIT offset, count` or `LIMIT count OFFSET offset`
/// clause.
pub fn translate_limit(env: &Env, cursor: &mut Cursor) -> Result<Option<Limit>, Error> {
    if !cursor.eat_keyword("LIMIT") {
        return Ok(None);
    }

    let first = values::translate_count(env, cursor.expect_value()?)?;
    let limit = if cursor.eat(&Token::Comma) {
        let count = values::translate_count(env, cursor.expect_value()?)?;
        Limit {
            offset: first,
            count,
        }
    } else if cursor.eat_keyword("OFFSET") {
        let offset = values::translate_count(env, cursor.expect_value()?)?;
        Limit {
            offset,
            count: first,
        }
    } else {
        Limit {
            offset: 0,
            count: first,
        }
    };
    Ok(Some(limit))
}
