//! Section header grammar and resolution.
//!
//! A header is one of:
//!
//! - `child : parent`, inheritance. The child starts as a copy of the parent.
//! - `alias (condition)`, a conditional section published under `alias`.
//! - anything else, a plain section name.
//!
//! A header containing `(` or `)` is always treated as conditional, so a `:`
//! inside a condition never triggers inheritance.

use super::condition::Condition;
use super::error::{ExprError, IniError};
use super::lookup::Lookup;
use super::tree::{ConfigNode, ConfigTree};

/// Token separating child and parent in an inheritance header.
pub const INHERIT_TOKEN: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Inherit { child: String, parent: String },
    Conditional { alias: String, condition: Condition },
    Plain { name: String },
}

/// What to do with a section after its header is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Skip,
    Inherit(String),
    Accept(String),
}

impl Resolution {
    /// The output key, unless the section is skipped.
    pub fn key(&self) -> Option<&str> {
        match self {
            Resolution::Skip => None,
            Resolution::Inherit(key) | Resolution::Accept(key) => Some(key),
        }
    }
}

impl Header {
    pub fn parse(raw: &str) -> Result<Self, IniError> {
        if let Some(open) = raw.find('(') {
            let alias = raw[..open].trim();
            if alias.is_empty() {
                return Err(IniError::invalid(
                    raw,
                    ExprError::new(0, "missing section name before condition"),
                ));
            }
            let condition =
                Condition::parse(&raw[open..]).map_err(|err| IniError::invalid(raw, err))?;
            return Ok(Header::Conditional {
                alias: alias.to_string(),
                condition,
            });
        }

        if let Some(close) = raw.find(')') {
            return Err(IniError::invalid(raw, ExprError::new(close, "unbalanced ')'")));
        }

        if let Some((child, parent)) = split_inheritance(raw) {
            if child.is_empty() {
                return Err(IniError::invalid(
                    raw,
                    ExprError::new(0, "missing section name before ':'"),
                ));
            }
            return Ok(Header::Inherit {
                child: child.to_string(),
                parent: parent.to_string(),
            });
        }

        Ok(Header::Plain {
            name: raw.trim().to_string(),
        })
    }
}

/// Finds the first `:` flanked on both sides by whitespace or a word
/// character. The parent name stops at any further `:`.
fn split_inheritance(raw: &str) -> Option<(&str, &str)> {
    let flank = |ch: char| ch.is_ascii_whitespace() || ch.is_ascii_alphanumeric() || ch == '_';

    let pos = raw.char_indices().find_map(|(pos, ch)| {
        if ch != INHERIT_TOKEN {
            return None;
        }
        let before = raw[..pos].chars().next_back()?;
        let after = raw[pos + ch.len_utf8()..].chars().next()?;
        (flank(before) && flank(after)).then_some(pos)
    })?;

    let child = raw[..pos].trim();
    let rest = &raw[pos + INHERIT_TOKEN.len_utf8()..];
    let parent = rest.split(INHERIT_TOKEN).next().unwrap_or(rest).trim();
    Some((child, parent))
}

/// Resolves `raw` against the tree built so far and registers the initial
/// value for the resulting key.
///
/// - inheritance: the child slot becomes a snapshot of the parent's tree, or
///   an empty tree if the parent is missing or not a tree;
/// - accepted: an empty tree is registered, replacing any earlier value;
/// - skipped: the tree is left untouched.
pub fn resolve<L: Lookup + ?Sized>(
    raw: &str,
    config: &mut ConfigTree,
    lookup: &L,
) -> Result<Resolution, IniError> {
    match Header::parse(raw)? {
        Header::Inherit { child, parent } => {
            let initial = match config.get(&parent) {
                Some(ConfigNode::Tree(tree)) => tree.clone(),
                _ => {
                    tracing::debug!(%child, %parent, "inheritance parent missing, starting empty");
                    ConfigTree::new()
                }
            };
            config.insert(child.clone(), ConfigNode::Tree(initial));
            Ok(Resolution::Inherit(child))
        }
        Header::Conditional { alias, condition } => {
            if condition.evaluate(lookup) {
                register(config, &alias);
                Ok(Resolution::Accept(alias))
            } else {
                tracing::debug!(header = raw, "condition is false, skipping section");
                Ok(Resolution::Skip)
            }
        }
        Header::Plain { name } => {
            register(config, &name);
            Ok(Resolution::Accept(name))
        }
    }
}

fn register(config: &mut ConfigTree, key: &str) {
    config.insert(key, ConfigNode::Tree(ConfigTree::new()));
}
