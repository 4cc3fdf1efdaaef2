//! Render a QueryDescriptor as a parameterized relational statement.

pub mod convert;
pub mod error;
pub mod string;

use query_engine_descriptor::descriptor::QueryDescriptor;

use convert::ToSql;
use error::Error;
use string::SQL;

/// Render a descriptor as SQL text with its ordered parameter list.
pub fn translate(descriptor: &QueryDescriptor) -> Result<SQL, Error> {
    let mut sql = SQL::new();
    descriptor.to_sql(&mut sql)?;
    Ok(sql)
}
