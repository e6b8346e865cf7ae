use crate::config::ConfigError;
use crate::ini::IniError;
use thiserror::Error;

/// Top-level error type for the ini-tree library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("INI error: {0}")]
    Ini(#[from] IniError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let ini: Error = crate::parse("[oops").unwrap_err().into();
        assert!(matches!(ini, Error::Ini(IniError::MalformedInput(_))));

        let config: Error = ConfigError::FileNotFound("a.ini".into()).into();
        assert_eq!(
            config.to_string(),
            "configuration error: required config file not found: a.ini"
        );
    }
}
