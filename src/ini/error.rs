use thiserror::Error;

/// Diagnostic produced by the INI lexer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

impl LexError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Diagnostic produced while parsing a conditional header expression.
///
/// `position` is the character offset inside the condition text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at offset {position}: {message}")]
pub struct ExprError {
    pub position: usize,
    pub message: String,
}

impl ExprError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IniError {
    #[error("malformed INI input: {0}")]
    MalformedInput(#[from] LexError),

    #[error("invalid section header '{header}': {source}")]
    InvalidExpression { header: String, source: ExprError },
}

impl IniError {
    pub(crate) fn invalid(header: &str, source: ExprError) -> Self {
        IniError::InvalidExpression {
            header: header.to_string(),
            source,
        }
    }
}
