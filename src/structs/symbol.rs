use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

const MAX_SYMBOL_LEN: usize = 15;

/// Ticker key as accepted at the service boundary: trimmed and uppercased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, IndexError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IndexError::invalid_symbol(input, "symbol is empty"));
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(IndexError::invalid_symbol(
                input,
                format!("{len} characters, at most {MAX_SYMBOL_LEN} allowed"),
            ));
        }

        if !normalized.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(IndexError::invalid_symbol(input, "must start with a letter"));
        }

        if let Some((index, ch)) = normalized
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '.' || c == '-'))
        {
            return Err(IndexError::invalid_symbol(
                input,
                format!("unexpected {ch:?} at position {index}"),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = IndexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_trims() {
        assert_eq!(Symbol::parse(" aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Symbol::parse("brk.b").unwrap().as_str(), "BRK.B");
    }

    #[test]
    fn rejects_empty() {
        let err = Symbol::parse("   ").unwrap_err();
        assert!(matches!(err, IndexError::InvalidSymbol { .. }));
    }

    #[test]
    fn rejects_leading_digit_and_bad_chars() {
        assert!(Symbol::parse("1AAPL").is_err());
        assert!(Symbol::parse("AA PL").is_err());
        assert!(Symbol::parse("AAPL$").is_err());
    }

    #[test]
    fn rejects_overlong() {
        assert!(Symbol::parse("ABCDEFGHIJKLMNOP").is_err());
        assert!(Symbol::parse("ABCDEFGHIJKLMNO").is_ok());
    }

    #[test]
    fn deserializes_through_parse() {
        let symbol: Symbol = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(symbol.to_string(), "MSFT");
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }
}
