//! Type definitions of a low-level SQL string representation.

use query_engine_descriptor::descriptor::Value;

/// SQL text with its positional parameters.
///
/// `params[i]` is bound to `$i+1` in `sql`.
#[derive(Debug, Clone, PartialEq)]
pub struct SQL {
    pub sql: String,
    pub params: Vec<Value>,
    /// for internal use and tests only
    pub param_index: u64,
}

impl Default for SQL {
    fn default() -> Self {
        Self::new()
    }
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: vec![],
            param_index: 0,
        }
    }

    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a double-quoted identifier, doubling any embedded quote.
    pub fn append_identifier(&mut self, name: &str) {
        self.sql.push('"');
        self.sql.push_str(&name.replace('"', "\"\""));
        self.sql.push('"');
    }

    /// Append a possibly qualified name such as `orders.total` as `"orders"."total"`.
    pub fn append_qualified(&mut self, name: &str) {
        for (index, part) in name.split('.').enumerate() {
            if index > 0 {
                self.sql.push('.');
            }
            self.append_identifier(part);
        }
    }

    pub fn append_param(&mut self, param: Value) {
        self.param_index += 1;
        self.sql.push_str(&format!("${}", self.param_index));
        self.params.push(param);
    }
}
