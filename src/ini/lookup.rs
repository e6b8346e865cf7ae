//! Name/value sources for conditional section headers.
//!
//! The reader never touches process state by itself; whatever a condition can
//! see is handed in through a [`Lookup`].

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Resolves names referenced as `$NAME` or `${NAME}` inside a condition.
///
/// Returning `None` is not an error: the name evaluates as an empty string.
pub trait Lookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// A lookup that knows no names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl Lookup for NoLookup {
    fn lookup(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Reads names from the process environment.
///
/// With a prefix, `${MODE}` resolves the variable `<prefix>MODE`.
#[derive(Debug, Clone, Default)]
pub struct EnvLookup {
    prefix: String,
}

impl EnvLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Lookup for EnvLookup {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(format!("{}{}", self.prefix, name)).ok()
    }
}

impl<S: BuildHasher> Lookup for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Lookup for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: Lookup + ?Sized> Lookup for &T {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}

impl<T: Lookup + ?Sized> Lookup for Box<T> {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}
