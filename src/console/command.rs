//! Console command parsing
//!
//! One command per line:
//!
//! ```text
//! set <key> <value>
//! get <key> [int|float|text]
//! del <key>
//! clear
//! limit [n]
//! count
//! keys
//! stats
//! pressure memory|background
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{CacheError, Result};
use crate::tasks::PressureEvent;

// == Token ==
/// A typed key or value as written on the command line.
///
/// Integer literals become `Int`, other finite numeric literals become
/// `Float`, everything else (and anything in double quotes) is `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Token {
    /// Classifies a raw token.
    pub fn parse(raw: &str) -> Self {
        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            return Token::Text(raw[1..raw.len() - 1].to_string());
        }
        if let Ok(value) = raw.parse::<i64>() {
            return Token::Int(value);
        }
        // Rust also parses "nan" and "inf"; only digit-bearing tokens that
        // fit in a finite f64 count as numbers
        if raw.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(value) = raw.parse::<f64>() {
                if value.is_finite() {
                    return Token::Float(value);
                }
            }
        }
        Token::Text(raw.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(value) => write!(f, "{}", value),
            Token::Float(value) => write!(f, "{:?}", value),
            Token::Text(value) => write!(f, "{:?}", value),
        }
    }
}

// == Value Kind ==
/// Type requested by a typed `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    Text,
}

impl FromStr for ValueKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int" => Ok(ValueKind::Int),
            "float" => Ok(ValueKind::Float),
            "text" => Ok(ValueKind::Text),
            other => Err(CacheError::InvalidCommand(format!(
                "unknown value type '{}', expected int, float or text",
                other
            ))),
        }
    }
}

// == Command ==
/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { key: Token, value: Token },
    Get { key: Token, kind: Option<ValueKind> },
    Del { key: Token },
    Clear,
    /// Show the limit, or set it when a value is given
    Limit(Option<i64>),
    Count,
    Keys,
    Stats,
    Pressure(PressureEvent),
}

impl FromStr for Command {
    type Err = CacheError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| invalid("usage: set <key> <value>"))?;
                return Ok(Command::Set {
                    key: Token::parse(key),
                    value: Token::parse(value.trim()),
                });
            }
            "get" => Command::Get {
                key: Token::parse(args.next().ok_or_else(|| invalid("usage: get <key> [type]"))?),
                kind: args.next().map(str::parse).transpose()?,
            },
            "del" => Command::Del {
                key: Token::parse(args.next().ok_or_else(|| invalid("usage: del <key>"))?),
            },
            "clear" => Command::Clear,
            "limit" => Command::Limit(
                args.next()
                    .map(|raw| {
                        raw.parse::<i64>()
                            .map_err(|_| invalid(format!("limit must be an integer, got '{}'", raw)))
                    })
                    .transpose()?,
            ),
            "count" => Command::Count,
            "keys" => Command::Keys,
            "stats" => Command::Stats,
            "pressure" => Command::Pressure(
                args.next()
                    .ok_or_else(|| invalid("usage: pressure memory|background"))?
                    .parse()?,
            ),
            "" => return Err(invalid("empty command")),
            other => return Err(invalid(format!("unknown command '{}'", other))),
        };

        match args.next() {
            Some(extra) => Err(invalid(format!("unexpected argument '{}'", extra))),
            None => Ok(command),
        }
    }
}

fn invalid(message: impl Into<String>) -> CacheError {
    CacheError::InvalidCommand(message.into())
}
