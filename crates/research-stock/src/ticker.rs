//! Ticker symbols

use crate::error::{ResearchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_TICKER_LEN: usize = 12;

/// A normalized ticker symbol (`TSLA`, `BRK-B`, `^GSPC`, `EURUSD=X`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parse user input into a ticker
    ///
    /// Input is trimmed and uppercased. Allowed characters are ASCII letters,
    /// digits and `. - ^ =`.
    pub fn parse(input: &str) -> Result<Self> {
        let symbol = input.trim().to_uppercase();

        if symbol.is_empty() {
            return Err(ResearchError::EmptyTicker);
        }

        let valid_chars = symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '^' | '='));

        if !valid_chars || symbol.chars().count() > MAX_TICKER_LEN {
            return Err(ResearchError::InvalidTicker(symbol));
        }

        Ok(Self(symbol))
    }

    /// The symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = ResearchError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_input() {
        assert_eq!(Ticker::parse("  tsla ").unwrap().as_str(), "TSLA");
        assert_eq!(Ticker::parse("brk-b").unwrap().to_string(), "BRK-B");
        assert_eq!(Ticker::parse("^gspc").unwrap().as_str(), "^GSPC");
        assert_eq!(Ticker::parse("eurusd=x").unwrap().as_str(), "EURUSD=X");
        assert_eq!(Ticker::parse("7203.T").unwrap().as_str(), "7203.T");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(Ticker::parse(""), Err(ResearchError::EmptyTicker)));
        assert!(matches!(Ticker::parse("   "), Err(ResearchError::EmptyTicker)));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            Ticker::parse("TS LA"),
            Err(ResearchError::InvalidTicker(ref s)) if s == "TS LA"
        ));
        assert!(matches!(Ticker::parse("TSLA;"), Err(ResearchError::InvalidTicker(_))));
        assert!(matches!(
            Ticker::parse("ABCDEFGHIJKLM"),
            Err(ResearchError::InvalidTicker(_))
        ));
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let ticker: Ticker = serde_json::from_str("\"aapl\"").unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
    }
}
