pub mod config;
mod error;
pub mod ini;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use ini::{
    parse, ConfigNode, ConfigTree, EnvLookup, IniError, Lookup, NoLookup, Reader,
};
