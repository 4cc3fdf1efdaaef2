//! Predicate trees built from WHERE clauses.

use enum_iterator::Sequence;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::values::Value;

/// A boolean expression over field comparisons.
///
/// A `Group` always has at least two children. A lone condition is represented by
/// the bare leaf; use [`PredicateNode::group`] to build groups so this holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PredicateNode {
    /// `field <operator> value`
    Comparison {
        field: String,
        operator: Operator,
        value: Value,
    },
    /// `field` matches a regular expression.
    #[serde(rename_all = "camelCase")]
    Pattern {
        field: String,
        regex: String,
        case_insensitive: bool,
    },
    /// Children joined by one logical connective.
    Group {
        logic: Logic,
        children: Vec<PredicateNode>,
    },
}

impl PredicateNode {
    /// Join `children` with `logic`, collapsing a single child to itself.
    /// Returns `None` when there are no children.
    pub fn group(logic: Logic, mut children: Vec<PredicateNode>) -> Option<PredicateNode> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(PredicateNode::Group { logic, children }),
        }
    }

    /// The number of comparison and pattern leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            PredicateNode::Comparison { .. } | PredicateNode::Pattern { .. } => 1,
            PredicateNode::Group { children, .. } => {
                children.iter().map(PredicateNode::leaf_count).sum()
            }
        }
    }
}

/// A logical connective.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    /// The spellings that denote this connective in statement text.
    pub fn spellings(self) -> &'static [&'static str] {
        match self {
            Logic::And => &["AND", "&&"],
            Logic::Or => &["OR", "||"],
        }
    }

    /// Recognise a connective, case-insensitively.
    pub fn from_connective(text: &str) -> Option<Logic> {
        enum_iterator::all::<Logic>().find(|logic| {
            logic
                .spellings()
                .iter()
                .any(|spelling| spelling.eq_ignore_ascii_case(text))
        })
    }
}

/// The comparison operators a predicate leaf can use.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Sequence,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Operator {
    /// The symbols that denote this operator. The first one is canonical.
    pub fn symbols(self) -> &'static [&'static str] {
        match self {
            Operator::Eq => &["="],
            Operator::Ne => &["<>", "!="],
            Operator::Lt => &["<"],
            Operator::Lte => &["<="],
            Operator::Gt => &[">"],
            Operator::Gte => &[">="],
        }
    }

    /// The canonical SQL symbol.
    pub fn symbol(self) -> &'static str {
        self.symbols()[0]
    }

    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        enum_iterator::all::<Operator>().find(|operator| operator.symbols().contains(&symbol))
    }
}
