//! Boolean expressions embedded in conditional section headers.
//!
//! A conditional header reads `alias (expression)`:
//!
//! ```ini
//! [database (${APP_ENV} == "prod" && !$READ_ONLY)]
//! host = db.internal
//! ```
//!
//! Operands are lookups (`$NAME`, `${NAME}`), quoted strings or bare words.
//! Supported operators, loosest first: `||`/`or`, `&&`/`and`, `!`/`not`, and
//! the comparisons `==`, `!=`, `<`, `<=`, `>`, `>=`. Names unknown to the
//! lookup evaluate as an empty string.

use std::cmp::Ordering;

use super::error::ExprError;
use super::lookup::Lookup;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Cmp(CmpOp),
    Var(String),
    Str(String),
    Word(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Var(String),
    Literal(String),
}

/// Parsed condition, ready to be evaluated against any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Compare {
        lhs: Operand,
        op: CmpOp,
        rhs: Operand,
    },
    Truthy(Operand),
}

impl Condition {
    /// Parses a full condition, e.g. `($MODE == dev || $DEBUG)`.
    pub fn parse(text: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: text.chars().count(),
        };

        if parser.tokens.is_empty() {
            return Err(ExprError::new(0, "empty condition"));
        }

        let condition = parser.parse_or()?;
        match parser.tokens.get(parser.pos) {
            None => Ok(condition),
            Some((offset, Token::RParen)) => Err(ExprError::new(*offset, "unbalanced ')'")),
            Some((offset, token)) => Err(ExprError::new(
                *offset,
                format!("unexpected {} after condition", describe(token)),
            )),
        }
    }

    pub fn evaluate<L: Lookup + ?Sized>(&self, lookup: &L) -> bool {
        match self {
            Condition::Not(inner) => !inner.evaluate(lookup),
            Condition::And(lhs, rhs) => lhs.evaluate(lookup) && rhs.evaluate(lookup),
            Condition::Or(lhs, rhs) => lhs.evaluate(lookup) || rhs.evaluate(lookup),
            Condition::Compare { lhs, op, rhs } => {
                compare(&lhs.resolve(lookup), *op, &rhs.resolve(lookup))
            }
            Condition::Truthy(operand) => is_truthy(&operand.resolve(lookup)),
        }
    }
}

impl Operand {
    fn resolve<L: Lookup + ?Sized>(&self, lookup: &L) -> String {
        match self {
            Operand::Var(name) => lookup.lookup(name).unwrap_or_default(),
            Operand::Literal(value) => value.clone(),
        }
    }
}

fn compare(lhs: &str, op: CmpOp, rhs: &str) -> bool {
    let ordering = match (lhs.trim().parse::<f64>(), rhs.trim().parse::<f64>()) {
        (Ok(l), Ok(r)) if !matches!(op, CmpOp::Eq | CmpOp::Ne) => l.partial_cmp(&r),
        _ => Some(lhs.cmp(rhs)),
    };

    match (op, ordering) {
        (CmpOp::Eq, _) => lhs == rhs,
        (CmpOp::Ne, _) => lhs != rhs,
        (_, None) => false,
        (CmpOp::Lt, Some(o)) => o == Ordering::Less,
        (CmpOp::Le, Some(o)) => o != Ordering::Greater,
        (CmpOp::Gt, Some(o)) => o == Ordering::Greater,
        (CmpOp::Ge, Some(o)) => o != Ordering::Less,
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty()
        || value == "0"
        || ["false", "off", "no"]
            .iter()
            .any(|falsy| value.eq_ignore_ascii_case(falsy)))
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | '-' | '/')
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        let token = match (ch, next) {
            (c, _) if c.is_whitespace() => {
                i += 1;
                continue;
            }
            ('(', _) => {
                i += 1;
                Token::LParen
            }
            (')', _) => {
                i += 1;
                Token::RParen
            }
            ('&', Some('&')) => {
                i += 2;
                Token::And
            }
            ('|', Some('|')) => {
                i += 2;
                Token::Or
            }
            ('=', Some('=')) => {
                i += 2;
                Token::Cmp(CmpOp::Eq)
            }
            ('!', Some('=')) => {
                i += 2;
                Token::Cmp(CmpOp::Ne)
            }
            ('!', _) => {
                i += 1;
                Token::Not
            }
            ('<', Some('=')) => {
                i += 2;
                Token::Cmp(CmpOp::Le)
            }
            ('<', _) => {
                i += 1;
                Token::Cmp(CmpOp::Lt)
            }
            ('>', Some('=')) => {
                i += 2;
                Token::Cmp(CmpOp::Ge)
            }
            ('>', _) => {
                i += 1;
                Token::Cmp(CmpOp::Gt)
            }
            ('$', Some('{')) => {
                let close = chars[i + 2..]
                    .iter()
                    .position(|&c| c == '}')
                    .ok_or_else(|| ExprError::new(start, "unterminated '${'"))?;
                let name: String = chars[i + 2..i + 2 + close].iter().collect();
                if name.is_empty() || !name.chars().all(is_name_char) {
                    return Err(ExprError::new(start, format!("invalid name '${{{name}}}'")));
                }
                i += close + 3;
                Token::Var(name)
            }
            ('$', _) => {
                i += 1;
                while i < chars.len() && is_name_char(chars[i]) {
                    i += 1;
                }
                if i == start + 1 {
                    return Err(ExprError::new(start, "expected a name after '$'"));
                }
                Token::Var(chars[start + 1..i].iter().collect())
            }
            (quote @ ('"' | '\''), _) => {
                let (value, consumed) = lex_string(&chars[i + 1..], quote)
                    .ok_or_else(|| ExprError::new(start, "unterminated string"))?;
                i += consumed + 1;
                Token::Str(value)
            }
            (c, _) if is_word_char(c) => {
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if word.eq_ignore_ascii_case("and") {
                    Token::And
                } else if word.eq_ignore_ascii_case("or") {
                    Token::Or
                } else if word.eq_ignore_ascii_case("not") {
                    Token::Not
                } else {
                    Token::Word(word)
                }
            }
            (c, _) => {
                return Err(ExprError::new(start, format!("unknown operator '{c}'")));
            }
        };

        tokens.push((start, token));
    }

    Ok(tokens)
}

/// Reads a quoted string body. Returns the value and the number of chars
/// consumed, including the closing quote.
fn lex_string(chars: &[char], quote: char) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if quote == '"' && i + 1 < chars.len() => {
                value.push(chars[i + 1]);
                i += 2;
            }
            c if c == quote => return Some((value, i + 1)),
            c => {
                value.push(c);
                i += 1;
            }
        }
    }

    None
}

fn describe(token: &Token) -> String {
    match token {
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
        Token::And => "'&&'".into(),
        Token::Or => "'||'".into(),
        Token::Not => "'!'".into(),
        Token::Cmp(_) => "comparison".into(),
        Token::Var(name) => format!("'${name}'"),
        Token::Str(value) => format!("string \"{value}\""),
        Token::Word(word) => format!("'{word}'"),
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    /// Offset reported for errors at end of input.
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.end, |(offset, _)| *offset)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, token)| token.clone());
        self.pos += 1;
        token
    }

    fn parse_or(&mut self) -> Result<Condition, ExprError> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.bump();
            let rhs = self.parse_and()?;
            lhs = Condition::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Condition, ExprError> {
        let mut lhs = self.parse_unary()?;
        while self.peek() == Some(&Token::And) {
            self.bump();
            let rhs = self.parse_unary()?;
            lhs = Condition::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Condition, ExprError> {
        if self.peek() == Some(&Token::Not) {
            self.bump();
            let inner = self.parse_unary()?;
            return Ok(Condition::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Condition, ExprError> {
        if self.peek() == Some(&Token::LParen) {
            let open = self.offset();
            self.bump();
            let inner = self.parse_or()?;
            return match self.bump() {
                Some(Token::RParen) => Ok(inner),
                _ => Err(ExprError::new(open, "unbalanced '('")),
            };
        }

        let lhs = self.parse_operand()?;
        match self.peek() {
            Some(Token::Cmp(op)) => {
                let op = *op;
                self.bump();
                let rhs = self.parse_operand()?;
                Ok(Condition::Compare { lhs, op, rhs })
            }
            _ => Ok(Condition::Truthy(lhs)),
        }
    }

    fn parse_operand(&mut self) -> Result<Operand, ExprError> {
        let offset = self.offset();
        match self.bump() {
            Some(Token::Var(name)) => Ok(Operand::Var(name)),
            Some(Token::Str(value)) | Some(Token::Word(value)) => Ok(Operand::Literal(value)),
            Some(token) => Err(ExprError::new(
                offset,
                format!("expected a value, found {}", describe(&token)),
            )),
            None => Err(ExprError::new(offset, "unexpected end of condition")),
        }
    }
}
