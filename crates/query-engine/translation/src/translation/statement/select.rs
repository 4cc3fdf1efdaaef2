//! Translate SELECT statements.

use indexmap::IndexMap;

use query_engine_descriptor::descriptor::{QueryDescriptor, StatementKind};

use super::{joins, sorting};
use crate::translation::error::Error;
use crate::translation::filtering;
use crate::translation::helpers::{Cursor, Env, TableReference};
use crate::translation::tokenizer::Token;

/// An entry in the select list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Column {
    Star,
    Named { name: String, alias: Option<String> },
}

/// `SELECT [DISTINCT] columns FROM table [joins] [WHERE ...] [ORDER BY ...] [LIMIT ...]`
pub fn translate(env: &Env, cursor: &mut Cursor) -> Result<QueryDescriptor, Error> {
    cursor.expect_keyword("SELECT")?;
    let distinct = cursor.eat_keyword("DISTINCT");
    let columns = translate_columns(cursor)?;

    cursor.expect_keyword("FROM")?;
    let table = TableReference::parse(cursor)?;
    let joins = joins::translate_joins(cursor, &table)?;

    let filter = if cursor.eat_keyword("WHERE") {
        Some(filtering::translate_predicate(env, cursor)?)
    } else {
        None
    };
    let order_by = sorting::translate_order_by(cursor)?;
    let limit = sorting::translate_limit(env, cursor)?;
    cursor.expect_end()?;

    let (projection, aliases) = translate_projection(&env.settings.primary_key, columns)?;

    let mut descriptor = if distinct {
        let mut command = QueryDescriptor::new(StatementKind::Command, table.name.clone());
        command.distinct_on = Some(table.name);
        command
    } else {
        QueryDescriptor::new(StatementKind::Select, table.name)
    };
    descriptor.filter = filter;
    descriptor.projection = projection;
    descriptor.aliases = aliases;
    descriptor.joins = joins;
    descriptor.order_by = order_by;
    descriptor.limit = limit;
    Ok(descriptor)
}

fn translate_columns(cursor: &mut Cursor) -> Result<Vec<Column>, Error> {
    if cursor.at_keyword("FROM") || cursor.peek().is_none() {
        return Err(Error::MalformedClause(
            "expected a column list after SELECT".to_string(),
        ));
    }

    let mut columns = vec![];
    loop {
        let column = match cursor.peek() {
            Some(Token::Word(word)) if word == "*" => {
                cursor.next_token();
                Column::Star
            }
            _ => {
                let name = cursor.expect_identifier()?;
                let alias = if cursor.eat_keyword("AS") {
                    Some(cursor.expect_identifier()?)
                } else {
                    None
                };
                Column::Named { name, alias }
            }
        };
        columns.push(column);

        if !cursor.eat(&Token::Comma) {
            break;
        }
    }
    Ok(columns)
}

/// Build the projection and alias maps from the select list.
///
/// `*` alone selects everything and yields empty maps. Otherwise each named column is
/// included, and the primary key is explicitly excluded unless it was named.
fn translate_projection(
    primary_key: &str,
    columns: Vec<Column>,
) -> Result<(IndexMap<String, bool>, IndexMap<String, String>), Error> {
    let mut projection = IndexMap::new();
    let mut aliases = IndexMap::new();

    if columns.contains(&Column::Star) {
        return if columns.len() == 1 {
            Ok((projection, aliases))
        } else {
            Err(Error::MalformedClause(
                "'*' cannot be combined with other columns".to_string(),
            ))
        };
    }

    for column in columns {
        if let Column::Named { name, alias } = column {
            if let Some(alias) = alias {
                aliases.insert(alias, name.clone());
            }
            projection.insert(name, true);
        }
    }
    if !projection.contains_key(primary_key) {
        projection.insert(primary_key.to_string(), false);
    }

    Ok((projection, aliases))
}
