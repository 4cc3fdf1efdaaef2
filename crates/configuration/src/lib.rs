pub mod configuration;
pub mod error;
pub mod version1;

pub use configuration::CompilerSettings;
pub use version1::{parse_configuration, write_configuration};
