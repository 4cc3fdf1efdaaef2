//! The query descriptor: a driver-agnostic structural representation of a compiled statement.

pub mod descriptor;
