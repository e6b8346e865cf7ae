//! INI parsing with section inheritance, conditional sections and dotted keys.
//!
//! ```ini
//! name = demo
//!
//! [base]
//! db.host = localhost
//! db.port = 5432
//!
//! ; starts as a copy of [base]
//! [staging : base]
//! db.host = staging.internal
//!
//! ; only present when APP_ENV is "prod", published as "metrics"
//! [metrics (${APP_ENV} == "prod")]
//! endpoint = https://metrics.internal
//! ```

pub mod condition;
mod error;
pub mod header;
pub mod lexer;
mod lookup;
mod reader;
mod tree;

pub use error::{ExprError, IniError, LexError};
pub use lookup::{EnvLookup, Lookup, NoLookup};
pub use reader::{parse, Reader};
pub use tree::{ConfigNode, ConfigTree, DEFAULT_SEPARATOR};
