use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::de::from_tree;
use super::file::FileSource;
use super::source::{deep_merge, ConfigSource, StrSource};
use super::ConfigError;
use crate::ini::{ConfigTree, EnvLookup, Lookup, NoLookup, Reader, DEFAULT_SEPARATOR};

/// Builder for loading configuration from multiple INI sources.
///
/// Each source is parsed on its own, so a section can only inherit from
/// sections of the same source. The resulting trees are merged in
/// registration order, with later sources overriding earlier ones. Nested
/// trees are merged recursively; scalars replace whatever was there.
///
/// ## Conditional sections
///
/// Conditions in section headers see the names provided by the lookup set
/// with [`with_lookup`](Self::with_lookup) or [`with_env`](Self::with_env).
/// Without one, every name is empty:
///
/// ```ini
/// [server]
/// host = localhost
/// port = 8080
///
/// ; replaces [server] entirely when MODE is "prod"
/// [server ($MODE == prod)]
/// host = 0.0.0.0
/// port = 80
/// ```
///
/// ## Example
///
/// ```no_run
/// use ini_tree::Config;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct MyConfig {
///     name: String,
///     port: u16,
/// }
///
/// let config: MyConfig = Config::builder()
///     .with_file("config/default.ini", true)
///     .with_file("config/local.ini", false)
///     .with_env("MYAPP_")
///     .build()?;
/// # Ok::<(), ini_tree::ConfigError>(())
/// ```
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    sources: Vec<Box<dyn ConfigSource>>,
    lookup: Box<dyn Lookup + Send + Sync>,
    separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            lookup: Box::new(NoLookup),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("sources", &self.sources)
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds an INI file to be loaded.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds inline INI text. `name` identifies it in error messages.
    pub fn with_str(self, name: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.with_source(StrSource::new(name, text))
    }

    /// Adds a custom source.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Sets the names visible to conditional section headers.
    pub fn with_lookup(mut self, lookup: impl Lookup + Send + Sync + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self
    }

    /// Resolves condition names from environment variables.
    ///
    /// With prefix `MYAPP_`, `${MODE}` reads `MYAPP_MODE`. Pass an empty
    /// prefix to expose the whole environment.
    pub fn with_env(self, prefix: impl Into<String>) -> Self {
        self.with_lookup(EnvLookup::prefixed(prefix))
    }

    /// Sets the separator used to expand dotted keys (default `.`).
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Loads every source and merges the trees without deserializing.
    pub fn build_tree(self) -> Result<ConfigTree, ConfigError> {
        let lookup: &dyn Lookup = &*self.lookup;
        let reader = Reader::new()
            .with_separator(self.separator.as_str())
            .with_lookup(lookup);
        let mut merged = ConfigTree::new();

        for source in &self.sources {
            let Some(text) = source.read()? else {
                continue;
            };
            let tree = reader.parse(&text).map_err(|e| ConfigError::ParseError {
                path: source.origin().to_path_buf(),
                source: e,
            })?;
            deep_merge(&mut merged, tree);
        }

        Ok(merged)
    }

    /// Builds the configuration by loading, merging, and deserializing.
    ///
    /// Scalars are parsed according to the field they land in: `port = 8080`
    /// fills a `u16`, `version = 1.4` fills either a `String` or an `f64`.
    /// Booleans accept `true`/`false`, `on`/`off`, `yes`/`no` and `1`/`0`.
    pub fn build<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        from_tree(self.build_tree()?).map_err(ConfigError::DeserializeError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::{ConfigNode, IniError};
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize)]
    struct AppConfig {
        name: String,
        server: Server,
    }

    #[derive(Debug, Deserialize)]
    struct Server {
        host: String,
        port: u16,
        tls: bool,
    }

    fn ini_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_build_typed() {
        let file = ini_file("name = demo\n[server]\nhost = localhost\nport = 8080\ntls = false\n");

        let config: AppConfig = Config::builder().with_file(file.path(), true).build().unwrap();

        assert_eq!(config.name, "demo");
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8080);
        assert!(!config.server.tls);
    }

    #[test]
    fn test_later_sources_override() {
        let defaults = ini_file("[server]\nhost = localhost\nport = 8080\n");
        let local = ini_file("[server]\nport = 9090\n");

        let tree = Config::builder()
            .with_file(defaults.path(), true)
            .with_file(local.path(), true)
            .build_tree()
            .unwrap();

        assert_eq!(tree.get_path("server.host", "."), Some(&ConfigNode::from("localhost")));
        assert_eq!(tree.get_path("server.port", "."), Some(&ConfigNode::from("9090")));
    }

    #[test]
    fn test_optional_missing_file_skipped() {
        let tree = Config::builder()
            .with_str("inline", "[a]\nx = 1\n")
            .with_file("/nonexistent/local.ini", false)
            .build_tree()
            .unwrap();

        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_required_missing_file() {
        let result = Config::builder()
            .with_file("/nonexistent/default.ini", true)
            .build_tree();

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_error_names_source() {
        let result = Config::builder().with_str("broken.ini", "[oops\n").build_tree();

        match result {
            Err(ConfigError::ParseError { path, source }) => {
                assert_eq!(path, Path::new("broken.ini"));
                assert!(matches!(source, IniError::MalformedInput(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_lookup_drives_conditions() {
        let lookup: HashMap<String, String> = [("MODE".to_string(), "prod".to_string())].into();

        let tree = Config::builder()
            .with_str(
                "a.ini",
                "[server]\nhost = localhost\nport = 8080\n[server ($MODE == prod)]\nhost = 0.0.0.0\n",
            )
            .with_lookup(lookup)
            .build_tree()
            .unwrap();

        assert_eq!(tree.get_path("server.host", "."), Some(&ConfigNode::from("0.0.0.0")));
        assert!(tree.get_path("server.port", ".").is_none());
    }

    #[test]
    fn test_build_keeps_numeric_looking_strings() {
        #[derive(Debug, Deserialize)]
        struct Release {
            version: String,
            build: u32,
        }

        let release: Release = Config::builder()
            .with_str("a.ini", "version = 1.4\nbuild = 12\n")
            .build()
            .unwrap();

        assert_eq!(release.version, "1.4");
        assert_eq!(release.build, 12);
    }

    #[test]
    fn test_default_lookup_is_empty() {
        let tree = Config::builder()
            .with_str("a.ini", "[on ($PATH)]\nx = 1\n")
            .build_tree()
            .unwrap();

        assert!(tree.is_empty());
    }

    #[test]
    fn test_inheritance_does_not_cross_sources() {
        let tree = Config::builder()
            .with_str("base.ini", "[base]\nx = 1\n")
            .with_str("child.ini", "[child : base]\ny = 2\n")
            .build_tree()
            .unwrap();

        assert!(tree.get_path("child.x", ".").is_none());
        assert_eq!(tree.get_path("child.y", "."), Some(&ConfigNode::from("2")));
    }

    #[test]
    fn test_custom_separator() {
        let tree = Config::builder()
            .with_str("a.ini", "[s]\na__b = 1\n")
            .with_separator("__")
            .build_tree()
            .unwrap();

        assert_eq!(tree.get_path("s.a.b", "."), Some(&ConfigNode::from("1")));
    }

    #[test]
    fn test_deserialize_error() {
        let result: Result<AppConfig, _> =
            Config::builder().with_str("a.ini", "name = demo\n").build();

        assert!(matches!(result, Err(ConfigError::DeserializeError(_))));
    }
}
