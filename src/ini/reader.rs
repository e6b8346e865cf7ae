use super::error::IniError;
use super::header::resolve;
use super::lexer::{lex, Entries};
use super::lookup::{Lookup, NoLookup};
use super::tree::{ConfigNode, ConfigTree, DEFAULT_SEPARATOR};

/// Turns INI text into a [`ConfigTree`].
///
/// Sections are processed in source order. Each header is resolved into an
/// output key (see [`header`](super::header)), then the section body is
/// merged into that key's tree with dotted keys expanded.
///
/// ## Example
///
/// ```
/// use std::collections::HashMap;
/// use ini_tree::Reader;
///
/// let lookup: HashMap<String, String> =
///     [("APP_ENV".to_string(), "prod".to_string())].into();
///
/// let tree = Reader::new()
///     .with_lookup(lookup)
///     .parse(
///         "[base]\n\
///          db.host = localhost\n\
///          [prod : base]\n\
///          db.host = db.internal\n\
///          [live ($APP_ENV == prod)]\n\
///          enabled = true\n",
///     )?;
///
/// assert_eq!(
///     tree.get_path("prod.db.host", ".").and_then(|n| n.as_str()),
///     Some("db.internal")
/// );
/// assert!(tree.get("live").is_some());
/// # Ok::<(), ini_tree::IniError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Reader<L = NoLookup> {
    separator: String,
    lookup: L,
}

impl Reader<NoLookup> {
    /// Creates a reader with the `.` separator and no lookup names.
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            lookup: NoLookup,
        }
    }
}

impl Default for Reader<NoLookup> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Lookup> Reader<L> {
    /// Sets the separator used to split dotted keys.
    ///
    /// An empty separator keeps keys flat.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the name/value source for conditional headers.
    pub fn with_lookup<M: Lookup>(self, lookup: M) -> Reader<M> {
        Reader {
            separator: self.separator,
            lookup,
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Parses `input` into a tree.
    ///
    /// Blank input yields an empty tree. Lexing failures surface as
    /// [`IniError::MalformedInput`], bad conditions as
    /// [`IniError::InvalidExpression`]; either aborts the whole parse.
    pub fn parse(&self, input: &str) -> Result<ConfigTree, IniError> {
        let mut config = ConfigTree::new();
        if input.trim().is_empty() {
            return Ok(config);
        }

        for section in lex(input)? {
            let resolution = resolve(&section.header, &mut config, &self.lookup)?;
            let Some(key) = resolution.key() else {
                continue;
            };
            tracing::trace!(key, line = section.line, "resolved section");

            match &section.entries {
                Entries::Scalar(value) => {
                    config.insert(key, ConfigNode::Scalar(value.trim().to_string()));
                }
                Entries::Map(entries) => {
                    if let ConfigNode::Tree(tree) = config
                        .slot(key)
                        .or_insert_with(|| ConfigNode::Tree(ConfigTree::new()))
                    {
                        tree.merge_dotted(
                            entries.iter().map(|(k, v)| (k.as_str(), v.as_str())),
                            &self.separator,
                        );
                    }
                }
            }
        }

        Ok(config)
    }
}

/// Parses `input` with default settings and no lookup names.
pub fn parse(input: &str) -> Result<ConfigTree, IniError> {
    Reader::new().parse(input)
}
