//! Render query descriptors as document-store commands.

pub mod document;
