//! Compile textual SQL statements into query descriptors.

pub mod translation;
