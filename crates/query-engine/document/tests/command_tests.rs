use serde_json::json;
use similar_asserts::assert_eq;

use query_engine_descriptor::descriptor::{Params, Value};
use query_engine_document::document::{command, pipeline};
use query_engine_translation::translation::compile;

fn command_for(statement: &str, params: &[(&str, Value)]) -> serde_json::Value {
    let params: Params = params
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect();
    command(&compile(statement, &params).unwrap()).unwrap()
}

#[test]
fn select_becomes_find() {
    assert_eq!(
        command_for(
            "SELECT name, age FROM users WHERE age > 30 ORDER BY age DESC LIMIT 5 OFFSET 10",
            &[]
        ),
        json!({
            "find": "users",
            "filter": {"age": {"$gt": 30}},
            "projection": {"name": 1, "age": 1, "_id": 0},
            "sort": {"age": -1},
            "skip": 10,
            "limit": 5
        })
    );
    assert_eq!(
        command_for("SELECT * FROM users", &[]),
        json!({"find": "users"})
    );
}

#[test]
fn select_with_joins_becomes_aggregate() {
    let descriptor = compile(
        "SELECT name, o.total AS total FROM users u LEFT JOIN orders o ON u.id = o.user_id \
         WHERE name LIKE 'a%' ORDER BY name LIMIT 3",
        &Params::new(),
    )
    .unwrap();
    let stages = vec![
        json!({"$match": {"name": {"$regex": "^a", "$options": "i"}}}),
        json!({"$lookup": {
            "from": "orders",
            "localField": "id",
            "foreignField": "user_id",
            "as": "o"
        }}),
        json!({"$sort": {"name": 1}}),
        json!({"$limit": 3}),
        json!({"$project": {"name": 1, "total": "$o.total", "_id": 0}}),
    ];
    assert_eq!(pipeline(&descriptor).unwrap(), stages);
    assert_eq!(
        command(&descriptor).unwrap(),
        json!({"aggregate": "users", "pipeline": stages, "cursor": {}})
    );
}

#[test]
fn distinct_names_its_key() {
    assert_eq!(
        command_for("SELECT DISTINCT country FROM users WHERE active = true", &[]),
        json!({"distinct": "users", "key": "country", "query": {"active": true}})
    );
}

#[test]
fn distinct_over_documents_or_several_columns_groups() {
    assert_eq!(
        command_for("SELECT DISTINCT * FROM users", &[]),
        json!({
            "aggregate": "users",
            "pipeline": [
                {"$group": {"_id": "$$ROOT"}},
                {"$replaceRoot": {"newRoot": "$_id"}}
            ],
            "cursor": {}
        })
    );
    assert_eq!(
        command_for(
            "SELECT DISTINCT country, city FROM users WHERE age > 18 ORDER BY city LIMIT 2",
            &[]
        ),
        json!({
            "aggregate": "users",
            "pipeline": [
                {"$match": {"age": {"$gt": 18}}},
                {"$group": {"_id": {"country": "$country", "city": "$city"}}},
                {"$replaceRoot": {"newRoot": "$_id"}},
                {"$sort": {"city": 1}},
                {"$limit": 2}
            ],
            "cursor": {}
        })
    );
}

#[test]
fn insert_ignore_is_unordered() {
    assert_eq!(
        command_for(
            "INSERT IGNORE INTO t (a, b) VALUES (:a, NULL)",
            &[("a", Value::from("x"))]
        ),
        json!({"insert": "t", "documents": [{"a": "x", "b": null}], "ordered": false})
    );
}

#[test]
fn update_sets_fields() {
    assert_eq!(
        command_for("UPDATE t SET a = 1 WHERE b = 2 OR c != 3", &[]),
        json!({
            "update": "t",
            "updates": [{
                "q": {"$or": [{"b": 2}, {"c": {"$ne": 3}}]},
                "u": {"$set": {"a": 1}},
                "multi": true
            }]
        })
    );
}

#[test]
fn delete_without_filter_matches_everything() {
    assert_eq!(
        command_for("DELETE FROM t", &[]),
        json!({"delete": "t", "deletes": [{"q": {}, "limit": 0}]})
    );
}

#[test]
fn procedure_becomes_call() {
    assert_eq!(
        command_for("EXEC sync(:id, true)", &[("id", Value::Int(4))]),
        json!({"call": "sync", "args": {"id": 4, "param2": true}})
    );
}
