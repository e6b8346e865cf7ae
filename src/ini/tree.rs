//! Nested configuration tree and the dotted-key merge.

use indexmap::map::{Entry, IndexMap};
use serde::Serialize;

/// Default separator splitting `a.b.c` into nested levels.
pub const DEFAULT_SEPARATOR: &str = ".";

/// A value in the tree: a scalar string or a nested tree.
///
/// Serializes untagged, so a tree renders as a plain nested map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigNode {
    Scalar(String),
    Tree(ConfigTree),
}

impl ConfigNode {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(value) => Some(value),
            ConfigNode::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            ConfigNode::Tree(tree) => Some(tree),
            ConfigNode::Scalar(_) => None,
        }
    }
}

impl From<&str> for ConfigNode {
    fn from(value: &str) -> Self {
        ConfigNode::Scalar(value.to_string())
    }
}

impl From<ConfigTree> for ConfigNode {
    fn from(tree: ConfigTree) -> Self {
        ConfigNode::Tree(tree)
    }
}

/// Ordered mapping from keys to [`ConfigNode`]s.
///
/// Keys keep the position of their first insertion; replacing a value does
/// not move it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigTree {
    entries: IndexMap<String, ConfigNode>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigNode> {
        self.entries.get_mut(key)
    }

    /// Looks up a nested value by a `separator`-joined path.
    pub fn get_path(&self, path: &str, separator: &str) -> Option<&ConfigNode> {
        let mut segments = split_key(path, separator);
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            current = current.as_tree()?.entries.get(segment)?;
        }
        Some(current)
    }

    pub fn insert(&mut self, key: impl Into<String>, node: ConfigNode) -> Option<ConfigNode> {
        self.entries.insert(key.into(), node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub(crate) fn slot(&mut self, key: &str) -> Entry<'_, String, ConfigNode> {
        self.entries.entry(key.to_string())
    }

    /// Merges `(dotted_key, value)` pairs into this tree.
    ///
    /// Intermediate levels are created on demand and existing trees are
    /// reused. The leaf at the full path is set to the trimmed value; later
    /// pairs win. An empty separator disables flattening.
    pub fn merge_dotted<'a, I>(&mut self, entries: I, separator: &str)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in entries {
            self.set_path(key, value.trim(), separator);
        }
    }

    fn set_path(&mut self, key: &str, value: &str, separator: &str) {
        let mut segments = split_key(key, separator).peekable();
        let mut root = self;

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                root.insert(segment, ConfigNode::Scalar(value.to_string()));
                return;
            }

            let node = root
                .slot(segment)
                .or_insert_with(|| ConfigNode::Tree(ConfigTree::new()));
            if !matches!(node, ConfigNode::Tree(_)) {
                *node = ConfigNode::Tree(ConfigTree::new());
            }
            let ConfigNode::Tree(tree) = node else {
                return;
            };
            root = tree;
        }
    }
}

impl<'a> IntoIterator for &'a ConfigTree {
    type Item = (&'a String, &'a ConfigNode);
    type IntoIter = indexmap::map::Iter<'a, String, ConfigNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ConfigTree {
    type Item = (String, ConfigNode);
    type IntoIter = indexmap::map::IntoIter<String, ConfigNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn split_key<'a>(key: &'a str, separator: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
    if separator.is_empty() {
        Box::new(std::iter::once(key))
    } else {
        Box::new(key.split(separator))
    }
}
