//! Settings for the statement compiler.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CURRENT_VERSION: u32 = 1;
pub const DEFAULT_PRIMARY_KEY: &str = "_id";
pub const DEFAULT_MAX_PREDICATE_DEPTH: usize = 32;

/// The 'CompilerSettings' type collects everything that changes how statements are compiled.
///
/// Compilation is a pure function of the statement, the parameters and these settings,
/// so the same settings value can be shared freely between concurrent compile calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompilerSettings {
    /// Which version of the configuration format are we using
    #[serde(default = "current_version")]
    pub version: u32,
    /// The primary-key-like field that projections exclude unless it is selected explicitly.
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    /// Maximum parenthesis nesting allowed in a WHERE clause.
    #[serde(default = "default_max_predicate_depth")]
    pub max_predicate_depth: usize,
    /// Whether LIKE patterns match case-insensitively.
    #[serde(default = "default_case_insensitive_like")]
    pub case_insensitive_like: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        CompilerSettings {
            version: CURRENT_VERSION,
            primary_key: default_primary_key(),
            max_predicate_depth: DEFAULT_MAX_PREDICATE_DEPTH,
            case_insensitive_like: default_case_insensitive_like(),
        }
    }
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

fn default_primary_key() -> String {
    DEFAULT_PRIMARY_KEY.to_string()
}

fn default_max_predicate_depth() -> usize {
    DEFAULT_MAX_PREDICATE_DEPTH
}

fn default_case_insensitive_like() -> bool {
    true
}
