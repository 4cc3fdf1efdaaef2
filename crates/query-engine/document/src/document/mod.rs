//! Render a QueryDescriptor as the filter, aggregation pipeline or command document a
//! document store understands.

pub mod error;

use serde_json::{json, Map, Value as Json};

use query_engine_descriptor::descriptor::{
    Logic, LookupStage, Operator, OrderByDirection, PredicateNode, QueryDescriptor,
    StatementKind, Value,
};

use error::Error;

/// A filter document such as `{"age": {"$gte": 18}}`.
pub fn filter(predicate: &PredicateNode) -> Result<Json, Error> {
    match predicate {
        PredicateNode::Comparison {
            field,
            operator,
            value,
        } => {
            let value = to_json(value)?;
            let condition = match operator {
                Operator::Eq => value,
                _ => json!({ operator_name(*operator): value }),
            };
            Ok(json!({ field: condition }))
        }
        PredicateNode::Pattern {
            field,
            regex,
            case_insensitive,
        } => {
            let mut condition = Map::new();
            condition.insert("$regex".to_string(), json!(regex));
            if *case_insensitive {
                condition.insert("$options".to_string(), json!("i"));
            }
            Ok(json!({ field: condition }))
        }
        PredicateNode::Group { logic, children } => {
            let connective = match logic {
                Logic::And => "$and",
                Logic::Or => "$or",
            };
            let children = children.iter().map(filter).collect::<Result<Vec<_>, _>>()?;
            Ok(json!({ connective: children }))
        }
    }
}

fn operator_name(operator: Operator) -> &'static str {
    match operator {
        Operator::Eq => "$eq",
        Operator::Ne => "$ne",
        Operator::Lt => "$lt",
        Operator::Lte => "$lte",
        Operator::Gt => "$gt",
        Operator::Gte => "$gte",
    }
}

fn to_json(value: &Value) -> Result<Json, Error> {
    match value {
        Value::Placeholder { placeholder } => Err(Error::UnboundPlaceholder(placeholder.clone())),
        value => value
            .to_json()
            .ok_or_else(|| Error::NotSupported(format!("the value {value}"))),
    }
}

/// The aggregation pipeline of a select: `$match`, `$lookup`, `$sort`, `$skip`, `$limit`
/// and `$project`, leaving out stages with nothing to do.
pub fn pipeline(descriptor: &QueryDescriptor) -> Result<Vec<Json>, Error> {
    let mut stages = vec![];
    if let Some(predicate) = &descriptor.filter {
        stages.push(json!({ "$match": filter(predicate)? }));
    }
    for join in &descriptor.joins {
        stages.push(json!({ "$lookup": lookup(join) }));
    }
    if let Some(sort) = sort(descriptor) {
        stages.push(json!({ "$sort": sort }));
    }
    if let Some(limit) = &descriptor.limit {
        if limit.offset > 0 {
            stages.push(json!({ "$skip": limit.offset }));
        }
        stages.push(json!({ "$limit": limit.count }));
    }
    if let Some(projection) = projection(descriptor) {
        stages.push(json!({ "$project": projection }));
    }
    Ok(stages)
}

fn lookup(join: &LookupStage) -> Json {
    json!({
        "from": join.from_table,
        "localField": join.local_field,
        "foreignField": join.foreign_field,
        "as": join.r#as,
    })
}

fn sort(descriptor: &QueryDescriptor) -> Option<Map<String, Json>> {
    if descriptor.order_by.is_empty() {
        return None;
    }
    let sort = descriptor
        .order_by
        .iter()
        .map(|element| {
            let direction = match element.direction {
                OrderByDirection::Asc => 1,
                OrderByDirection::Desc => -1,
            };
            (element.field.clone(), json!(direction))
        })
        .collect();
    Some(sort)
}

/// Aliased columns are projected from their source field, `{"total": "$o.total"}`.
fn projection(descriptor: &QueryDescriptor) -> Option<Map<String, Json>> {
    if descriptor.projection.is_empty() {
        return None;
    }
    let projection = descriptor
        .projection
        .iter()
        .map(|(column, included)| {
            let alias = descriptor
                .aliases
                .iter()
                .find(|(_, aliased)| *aliased == column)
                .map(|(alias, _)| alias);
            match alias {
                Some(alias) if *included => (alias.clone(), json!(format!("${column}"))),
                _ => (column.clone(), json!(i32::from(*included))),
            }
        })
        .collect();
    Some(projection)
}

/// The database command running a descriptor.
pub fn command(descriptor: &QueryDescriptor) -> Result<Json, Error> {
    let query = match &descriptor.filter {
        Some(predicate) => filter(predicate)?,
        None => json!({}),
    };

    match descriptor.kind {
        StatementKind::Select if !descriptor.joins.is_empty() => Ok(json!({
            "aggregate": descriptor.table,
            "pipeline": pipeline(descriptor)?,
            "cursor": {},
        })),
        StatementKind::Select => {
            let mut command = Map::new();
            command.insert("find".to_string(), json!(descriptor.table));
            if descriptor.filter.is_some() {
                command.insert("filter".to_string(), query);
            }
            if let Some(projection) = projection(descriptor) {
                command.insert("projection".to_string(), Json::Object(projection));
            }
            if let Some(sort) = sort(descriptor) {
                command.insert("sort".to_string(), Json::Object(sort));
            }
            if let Some(limit) = &descriptor.limit {
                if limit.offset > 0 {
                    command.insert("skip".to_string(), json!(limit.offset));
                }
                command.insert("limit".to_string(), json!(limit.count));
            }
            Ok(Json::Object(command))
        }
        StatementKind::Command => distinct(descriptor, query),
        StatementKind::Insert => Ok(json!({
            "insert": descriptor.table,
            "documents": [fields(descriptor)?],
            "ordered": !descriptor.ignore_on_conflict,
        })),
        StatementKind::Update => Ok(json!({
            "update": descriptor.table,
            "updates": [{
                "q": query,
                "u": { "$set": fields(descriptor)? },
                "multi": true,
            }],
        })),
        StatementKind::Delete => Ok(json!({
            "delete": descriptor.table,
            "deletes": [{ "q": query, "limit": 0 }],
        })),
        StatementKind::Procedure => {
            let name = descriptor
                .procedure_name
                .as_ref()
                .ok_or_else(|| Error::NotSupported("a procedure call without a name".to_string()))?;
            Ok(json!({ "call": name, "args": fields(descriptor)? }))
        }
    }
}

/// A single distinct column maps onto the `distinct` command. Whole documents or several
/// columns are deduplicated by grouping on them in an aggregation.
fn distinct(descriptor: &QueryDescriptor, query: Json) -> Result<Json, Error> {
    let table = descriptor.distinct_on.as_ref().unwrap_or(&descriptor.table);
    let columns: Vec<&String> = descriptor
        .projection
        .iter()
        .filter(|(_, included)| **included)
        .map(|(column, _)| column)
        .collect();

    if let [key] = columns.as_slice() {
        return Ok(json!({ "distinct": table, "key": key, "query": query }));
    }

    let group_key = if columns.is_empty() {
        json!("$$ROOT")
    } else {
        Json::Object(
            columns
                .iter()
                .map(|column| (column.replace('.', "_"), json!(format!("${column}"))))
                .collect(),
        )
    };
    let mut stages = vec![];
    if descriptor.filter.is_some() {
        stages.push(json!({ "$match": query }));
    }
    stages.push(json!({ "$group": { "_id": group_key } }));
    stages.push(json!({ "$replaceRoot": { "newRoot": "$_id" } }));
    if let Some(sort) = sort(descriptor) {
        stages.push(json!({ "$sort": sort }));
    }
    if let Some(limit) = &descriptor.limit {
        if limit.offset > 0 {
            stages.push(json!({ "$skip": limit.offset }));
        }
        stages.push(json!({ "$limit": limit.count }));
    }
    Ok(json!({ "aggregate": table, "pipeline": stages, "cursor": {} }))
}

fn fields(descriptor: &QueryDescriptor) -> Result<Map<String, Json>, Error> {
    descriptor
        .fields
        .iter()
        .map(|(name, value)| Ok::<_, Error>((name.clone(), to_json(value)?)))
        .collect()
}
