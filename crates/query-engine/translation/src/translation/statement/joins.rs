//! Translate SQL joins into lookup stages.

use query_engine_descriptor::descriptor::LookupStage;

use crate::translation::error::Error;
use crate::translation::helpers::{Cursor, TableReference};
use crate::translation::tokenizer::Token;

/// Join kinds we recognise but cannot express as a lookup.
const UNSUPPORTED_JOINS: &[&str] = &["INNER", "RIGHT", "FULL", "CROSS", "NATURAL"];

/// Translate every JOIN clause following the FROM clause, in clause order.
pub fn translate_joins(
    cursor: &mut Cursor,
    outer: &TableReference,
) -> Result<Vec<LookupStage>, Error> {
    let mut stages = vec![];

    loop {
        if cursor.eat_keyword("LEFT") {
            cursor.eat_keyword("OUTER");
            cursor.expect_keyword("JOIN")?;
        } else if !cursor.eat_keyword("JOIN") {
            if let Some(kind) = UNSUPPORTED_JOINS
                .iter()
                .find(|kind| cursor.at_keyword(kind))
            {
                return Err(Error::UnsupportedJoin((*kind).to_string()));
            }
            break;
        }

        let joined = TableReference::parse(cursor)?;
        cursor.expect_keyword("ON")?;
        let parenthesised = cursor.eat(&Token::LeftParen);
        let left = cursor.expect_identifier()?;
        match cursor.next_token() {
            Some(Token::Symbol(symbol)) if symbol == "=" => {}
            _ => {
                return Err(Error::MalformedClause(format!(
                    "join condition on {} must be an equality",
                    joined.name
                )))
            }
        }
        let right = cursor.expect_identifier()?;
        if parenthesised {
            cursor.expect(&Token::RightParen)?;
        }

        stages.push(lookup_stage(outer, &joined, &left, &right)?);
    }

    Ok(stages)
}

/// Build the lookup stage for `JOIN joined ON left = right`.
///
/// The operand qualified with the joined table's name or alias is the foreign field; the
/// other one is the local field. Exactly one operand must be qualified that way.
pub fn lookup_stage(
    outer: &TableReference,
    joined: &TableReference,
    left: &str,
    right: &str,
) -> Result<LookupStage, Error> {
    let foreign_side = |operand: &str| {
        split_qualifier(operand)
            .filter(|(qualifier, _)| joined.is_named(qualifier))
            .map(|(_, field)| field.to_string())
    };

    let (local, foreign) = match (foreign_side(left), foreign_side(right)) {
        (None, Some(foreign)) => (left, foreign),
        (Some(foreign), None) => (right, foreign),
        _ => {
            return Err(Error::AmbiguousJoinField(format!("{left} = {right}")));
        }
    };

    // the outer table's own qualifier is redundant in a local field.
    let local_field = match split_qualifier(local) {
        Some((qualifier, field)) if outer.is_named(qualifier) => field.to_string(),
        _ => local.to_string(),
    };

    Ok(LookupStage {
        from_table: joined.name.clone(),
        local_field,
        foreign_field: foreign,
        r#as: joined.alias.clone().unwrap_or_else(|| joined.name.clone()),
    })
}

fn split_qualifier(operand: &str) -> Option<(&str, &str)> {
    operand
        .rsplit_once('.')
        .filter(|(qualifier, field)| !qualifier.is_empty() && !field.is_empty())
}
