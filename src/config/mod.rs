//! Loading layered INI configuration into typed structs.

mod builder;
mod de;
mod error;
mod file;
mod source;

pub use builder::Config;
pub use error::ConfigError;
pub use file::FileSource;
pub use source::{deep_merge, ConfigSource, StrSource};
