//! Positional shortcut arguments and matchers

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::descriptor::Value;

/// Kind of a shortcut argument, used by [`Matcher::TypeOf`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Text,
    Symbol,
    Integer,
    Float,
    Bool,
}

/// One positional argument of a shortcut call
///
/// `Symbol` is a bare identifier such as a format name (`png`) and is kept
/// apart from free `Text` so shortcuts can tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum ShortcutArg {
    Text(String),
    Symbol(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl ShortcutArg {
    pub fn symbol(name: impl Into<String>) -> Self {
        ShortcutArg::Symbol(name.into())
    }

    pub fn kind(&self) -> ArgKind {
        match self {
            ShortcutArg::Text(_) => ArgKind::Text,
            ShortcutArg::Symbol(_) => ArgKind::Symbol,
            ShortcutArg::Integer(_) => ArgKind::Integer,
            ShortcutArg::Float(_) => ArgKind::Float,
            ShortcutArg::Bool(_) => ArgKind::Bool,
        }
    }

    /// Text content of text-bearing arguments (text and symbols)
    pub fn text(&self) -> Option<&str> {
        match self {
            ShortcutArg::Text(text) | ShortcutArg::Symbol(text) => Some(text),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl fmt::Display for ShortcutArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutArg::Text(text) | ShortcutArg::Symbol(text) => f.write_str(text),
            ShortcutArg::Integer(n) => write!(f, "{}", n),
            ShortcutArg::Float(n) => write!(f, "{}", n),
            ShortcutArg::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Parses command-line style tokens: `:name` is a symbol, numbers and
/// booleans are typed, anything else is text.
impl FromStr for ShortcutArg {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix(':').filter(|name| !name.is_empty()) {
            return Ok(ShortcutArg::symbol(name));
        }
        if let Ok(n) = s.parse::<i64>() {
            return Ok(ShortcutArg::Integer(n));
        }
        if let Ok(n) = s.parse::<f64>() {
            return Ok(ShortcutArg::Float(n));
        }
        Ok(match s {
            "true" => ShortcutArg::Bool(true),
            "false" => ShortcutArg::Bool(false),
            _ => ShortcutArg::Text(s.to_string()),
        })
    }
}

impl From<&str> for ShortcutArg {
    fn from(value: &str) -> Self {
        ShortcutArg::Text(value.to_string())
    }
}

impl From<String> for ShortcutArg {
    fn from(value: String) -> Self {
        ShortcutArg::Text(value)
    }
}

impl From<i64> for ShortcutArg {
    fn from(value: i64) -> Self {
        ShortcutArg::Integer(value)
    }
}

impl From<i32> for ShortcutArg {
    fn from(value: i32) -> Self {
        ShortcutArg::Integer(value.into())
    }
}

impl From<f64> for ShortcutArg {
    fn from(value: f64) -> Self {
        ShortcutArg::Float(value)
    }
}

impl From<bool> for ShortcutArg {
    fn from(value: bool) -> Self {
        ShortcutArg::Bool(value)
    }
}

/// Positional matcher for pattern shortcuts
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Covers an equal argument
    Literal(ShortcutArg),
    /// Covers any argument of the given kind
    TypeOf(ArgKind),
    /// Covers a text or symbol argument whose text matches
    Pattern(Regex),
}

impl Matcher {
    /// Compile a [`Matcher::Pattern`]
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Matcher::Pattern(Regex::new(pattern)?))
    }

    pub fn covers(&self, arg: &ShortcutArg) -> bool {
        match self {
            Matcher::Literal(expected) => expected == arg,
            Matcher::TypeOf(kind) => arg.kind() == *kind,
            Matcher::Pattern(regex) => arg.text().is_some_and(|text| regex.is_match(text)),
        }
    }
}

impl From<ArgKind> for Matcher {
    fn from(kind: ArgKind) -> Self {
        Matcher::TypeOf(kind)
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Matcher::Pattern(regex)
    }
}

impl From<ShortcutArg> for Matcher {
    fn from(arg: ShortcutArg) -> Self {
        Matcher::Literal(arg)
    }
}
