//! Render query descriptors as relational SQL.

pub mod sql;
