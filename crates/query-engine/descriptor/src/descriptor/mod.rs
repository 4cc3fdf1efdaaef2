//! Type definitions of the query descriptor handed to executors.

pub mod predicate;
pub mod values;

// re-export without modules
pub use predicate::*;
pub use values::*;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The kind of statement a descriptor was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Procedure,
    /// A store-level command, currently only produced by `SELECT DISTINCT`.
    Command,
}

/// A compiled statement.
///
/// Descriptors are plain data: every compile call produces a fresh one and nothing
/// in the compiler keeps a reference to it afterwards. Which fields are meaningful
/// depends on `kind`:
///
/// - `Select`/`Command`: `filter`, `projection`, `aliases`, `joins`, `order_by`, `limit`
///   (and `distinct_on` for `Command`).
/// - `Insert`: `fields` and `ignore_on_conflict`.
/// - `Update`: `fields` and `filter`.
/// - `Delete`: `filter`.
/// - `Procedure`: `procedure_name` and `fields`, holding the bound arguments in call order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    pub kind: StatementKind,
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub table: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<PredicateNode>,
    #[serde(default)]
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, Value>,
    /// Fields to include (`true`) or exclude (`false`). Empty means all fields.
    #[serde(default)]
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub projection: IndexMap<String, bool>,
    /// Output aliases, from alias to the projected column.
    #[serde(default)]
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub aliases: IndexMap<String, String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<LookupStage>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByElement>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
    #[serde(default)]
    pub ignore_on_conflict: bool,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure_name: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_on: Option<String>,
}

impl QueryDescriptor {
    /// A descriptor of the given kind against a table, with every clause empty.
    pub fn new(kind: StatementKind, table: impl Into<String>) -> Self {
        QueryDescriptor {
            kind,
            table: table.into(),
            filter: None,
            fields: IndexMap::new(),
            projection: IndexMap::new(),
            aliases: IndexMap::new(),
            joins: vec![],
            order_by: vec![],
            limit: None,
            ignore_on_conflict: false,
            procedure_name: None,
            distinct_on: None,
        }
    }
}

/// A join-like stage correlating the statement's table with another one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupStage {
    pub from_table: String,
    pub local_field: String,
    pub foreign_field: String,
    /// The name the joined rows are exposed under.
    pub r#as: String,
}

/// A single element in an ORDER BY clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrderByElement {
    pub field: String,
    pub direction: OrderByDirection,
}

/// A direction for a single ORDER BY element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderByDirection {
    Asc,
    Desc,
}

/// LIMIT and OFFSET clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Limit {
    pub offset: u64,
    pub count: u64,
}
