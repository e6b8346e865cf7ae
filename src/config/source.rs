use std::path::{Path, PathBuf};

use crate::ini::{ConfigNode, ConfigTree};

use super::ConfigError;

/// Something that yields INI text for the loader.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Names the source in error messages.
    fn origin(&self) -> &Path;

    /// Returns the INI text, or `None` if an optional source is absent.
    fn read(&self) -> Result<Option<String>, ConfigError>;
}

/// INI text held in memory.
#[derive(Debug, Clone)]
pub struct StrSource {
    name: PathBuf,
    text: String,
}

impl StrSource {
    pub fn new(name: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl ConfigSource for StrSource {
    fn origin(&self) -> &Path {
        &self.name
    }

    fn read(&self) -> Result<Option<String>, ConfigError> {
        Ok(Some(self.text.clone()))
    }
}

/// Merges `overlay` into `base`. Nested trees merge recursively; anything
/// else in the overlay replaces the base value.
pub fn deep_merge(base: &mut ConfigTree, overlay: ConfigTree) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(ConfigNode::Tree(base_tree)), ConfigNode::Tree(overlay_tree)) => {
                deep_merge(base_tree, overlay_tree);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
