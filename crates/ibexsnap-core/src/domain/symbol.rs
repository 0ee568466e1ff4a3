use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Exchange suffix Yahoo appends to Madrid-listed tickers.
pub const EXCHANGE_SUFFIX: &str = ".MC";

/// Normalized provider ticker, including any exchange suffix (`SAN.MC`, `^IBEX`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        // Index symbols carry a leading caret.
        let body = normalized.strip_prefix('^').unwrap_or(&normalized);
        let offset = normalized.len() - body.len();

        match body.chars().next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            Some(first) => return Err(ValidationError::SymbolInvalidStart { ch: first }),
            None => return Err(ValidationError::EmptySymbol),
        }

        for (index, ch) in body.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
            if !valid {
                return Err(ValidationError::SymbolInvalidChar {
                    ch,
                    index: index + offset,
                });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_index(&self) -> bool {
        self.0.starts_with('^')
    }

    /// Ticker shown to readers: the provider symbol without its exchange suffix.
    pub fn display_ticker(&self) -> &str {
        self.0.strip_suffix(EXCHANGE_SUFFIX).unwrap_or(&self.0)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
