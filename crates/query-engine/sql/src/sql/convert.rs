//! Convert a descriptor to a low-level SQL string.

use query_engine_descriptor::descriptor::{
    Limit, Logic, LookupStage, Operator, OrderByDirection, OrderByElement, PredicateNode,
    QueryDescriptor, StatementKind, Value,
};

use super::error::Error;
use super::string::SQL;

/// Append the SQL rendering of a value to a statement under construction.
pub trait ToSql {
    fn to_sql(&self, sql: &mut SQL) -> Result<(), Error>;
}

impl ToSql for QueryDescriptor {
    fn to_sql(&self, sql: &mut SQL) -> Result<(), Error> {
        match self.kind {
            StatementKind::Select | StatementKind::Command => select_to_sql(self, sql),
            StatementKind::Insert => insert_to_sql(self, sql),
            StatementKind::Update => update_to_sql(self, sql),
            StatementKind::Delete => {
                sql.append_syntax("DELETE FROM ");
                sql.append_identifier(&self.table);
                where_to_sql(self.filter.as_ref(), sql)
            }
            StatementKind::Procedure => procedure_to_sql(self, sql),
        }
    }
}

fn select_to_sql(descriptor: &QueryDescriptor, sql: &mut SQL) -> Result<(), Error> {
    sql.append_syntax("SELECT ");
    if descriptor.distinct_on.is_some() {
        sql.append_syntax("DISTINCT ");
    }

    let columns: Vec<&String> = descriptor
        .projection
        .iter()
        .filter(|(_, included)| **included)
        .map(|(column, _)| column)
        .collect();
    if columns.is_empty() {
        sql.append_syntax("*");
    }
    for (index, column) in columns.iter().enumerate() {
        if index > 0 {
            sql.append_syntax(", ");
        }
        sql.append_qualified(column);
        let alias = descriptor
            .aliases
            .iter()
            .find(|(_, aliased)| aliased == column)
            .map(|(alias, _)| alias);
        if let Some(alias) = alias {
            sql.append_syntax(" AS ");
            sql.append_identifier(alias);
        }
    }

    sql.append_syntax(" FROM ");
    sql.append_identifier(&descriptor.table);

    for join in &descriptor.joins {
        join_to_sql(&descriptor.table, join, sql);
    }

    where_to_sql(descriptor.filter.as_ref(), sql)?;

    if !descriptor.order_by.is_empty() {
        sql.append_syntax(" ORDER BY ");
        for (index, element) in descriptor.order_by.iter().enumerate() {
            if index > 0 {
                sql.append_syntax(", ");
            }
            element.to_sql(sql)?;
        }
    }

    if let Some(limit) = &descriptor.limit {
        limit.to_sql(sql)?;
    }
    Ok(())
}

/// Unqualified local fields belong to the statement's table.
fn join_to_sql(table: &str, join: &LookupStage, sql: &mut SQL) {
    sql.append_syntax(" LEFT OUTER JOIN ");
    sql.append_identifier(&join.from_table);
    if join.r#as != join.from_table {
        sql.append_syntax(" AS ");
        sql.append_identifier(&join.r#as);
    }
    sql.append_syntax(" ON ");
    if !join.local_field.contains('.') {
        sql.append_identifier(table);
        sql.append_syntax(".");
    }
    sql.append_qualified(&join.local_field);
    sql.append_syntax(" = ");
    sql.append_identifier(&join.r#as);
    sql.append_syntax(".");
    sql.append_qualified(&join.foreign_field);
}

fn where_to_sql(filter: Option<&PredicateNode>, sql: &mut SQL) -> Result<(), Error> {
    match filter {
        None => Ok(()),
        Some(filter) => {
            sql.append_syntax(" WHERE ");
            filter.to_sql(sql)
        }
    }
}

fn insert_to_sql(descriptor: &QueryDescriptor, sql: &mut SQL) -> Result<(), Error> {
    if descriptor.fields.is_empty() {
        return Err(Error::NotSupported("an INSERT without columns".to_string()));
    }
    sql.append_syntax("INSERT INTO ");
    sql.append_identifier(&descriptor.table);

    sql.append_syntax(" (");
    for (index, column) in descriptor.fields.keys().enumerate() {
        if index > 0 {
            sql.append_syntax(", ");
        }
        sql.append_identifier(column);
    }
    sql.append_syntax(") VALUES (");
    for (index, value) in descriptor.fields.values().enumerate() {
        if index > 0 {
            sql.append_syntax(", ");
        }
        value.to_sql(sql)?;
    }
    sql.append_syntax(")");

    if descriptor.ignore_on_conflict {
        sql.append_syntax(" ON CONFLICT DO NOTHING");
    }
    Ok(())
}

fn update_to_sql(descriptor: &QueryDescriptor, sql: &mut SQL) -> Result<(), Error> {
    if descriptor.fields.is_empty() {
        return Err(Error::NotSupported("an UPDATE without assignments".to_string()));
    }
    sql.append_syntax("UPDATE ");
    sql.append_identifier(&descriptor.table);
    sql.append_syntax(" SET ");
    for (index, (column, value)) in descriptor.fields.iter().enumerate() {
        if index > 0 {
            sql.append_syntax(", ");
        }
        sql.append_identifier(column);
        sql.append_syntax(" = ");
        value.to_sql(sql)?;
    }
    where_to_sql(descriptor.filter.as_ref(), sql)
}

fn procedure_to_sql(descriptor: &QueryDescriptor, sql: &mut SQL) -> Result<(), Error> {
    let name = descriptor
        .procedure_name
        .as_ref()
        .ok_or_else(|| Error::NotSupported("a procedure call without a name".to_string()))?;
    sql.append_syntax("CALL ");
    sql.append_qualified(name);
    sql.append_syntax("(");
    for (index, value) in descriptor.fields.values().enumerate() {
        if index > 0 {
            sql.append_syntax(", ");
        }
        value.to_sql(sql)?;
    }
    sql.append_syntax(")");
    Ok(())
}

impl ToSql for PredicateNode {
    fn to_sql(&self, sql: &mut SQL) -> Result<(), Error> {
        match self {
            PredicateNode::Comparison {
                field,
                operator,
                value,
            } => {
                sql.append_syntax("(");
                sql.append_qualified(field);
                if value.is_null() {
                    match operator {
                        Operator::Eq => sql.append_syntax(" IS NULL"),
                        Operator::Ne => sql.append_syntax(" IS NOT NULL"),
                        _ => {
                            return Err(Error::NotSupported(format!(
                                "comparing {field} {} NULL",
                                operator.symbol()
                            )))
                        }
                    }
                } else {
                    operator.to_sql(sql)?;
                    value.to_sql(sql)?;
                }
                sql.append_syntax(")");
            }
            PredicateNode::Pattern {
                field,
                regex,
                case_insensitive,
            } => {
                sql.append_syntax("(");
                sql.append_qualified(field);
                if *case_insensitive {
                    sql.append_syntax(" ~* ");
                } else {
                    sql.append_syntax(" ~ ");
                }
                sql.append_param(Value::Str(regex.clone()));
                sql.append_syntax(")");
            }
            PredicateNode::Group { logic, children } => {
                let connective = match logic {
                    Logic::And => " AND ",
                    Logic::Or => " OR ",
                };
                sql.append_syntax("(");
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        sql.append_syntax(connective);
                    }
                    child.to_sql(sql)?;
                }
                sql.append_syntax(")");
            }
        }
        Ok(())
    }
}

impl ToSql for Operator {
    fn to_sql(&self, sql: &mut SQL) -> Result<(), Error> {
        match self {
            Operator::Eq => sql.append_syntax(" = "),
            Operator::Ne => sql.append_syntax(" <> "),
            Operator::Lt => sql.append_syntax(" < "),
            Operator::Lte => sql.append_syntax(" <= "),
            Operator::Gt => sql.append_syntax(" > "),
            Operator::Gte => sql.append_syntax(" >= "),
        }
        Ok(())
    }
}

impl ToSql for Value {
    fn to_sql(&self, sql: &mut SQL) -> Result<(), Error> {
        match self {
            Value::Null => sql.append_syntax("NULL"),
            Value::Placeholder { placeholder } => {
                return Err(Error::UnboundPlaceholder(placeholder.clone()))
            }
            value => sql.append_param(value.clone()),
        }
        Ok(())
    }
}

impl ToSql for OrderByElement {
    fn to_sql(&self, sql: &mut SQL) -> Result<(), Error> {
        sql.append_qualified(&self.field);
        match self.direction {
            OrderByDirection::Asc => sql.append_syntax(" ASC"),
            OrderByDirection::Desc => sql.append_syntax(" DESC"),
        }
        Ok(())
    }
}

impl ToSql for Limit {
    fn to_sql(&self, sql: &mut SQL) -> Result<(), Error> {
        sql.append_syntax(" LIMIT ");
        sql.append_syntax(&self.count.to_string());
        if self.offset > 0 {
            sql.append_syntax(" OFFSET ");
            sql.append_syntax(&self.offset.to_string());
        }
        Ok(())
    }
}
