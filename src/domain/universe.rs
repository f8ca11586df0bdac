//! Symbol lists for multi-symbol evaluation.
//!
//! Symbols keep their case, since coin identifiers are conventionally
//! lowercase while equity tickers are uppercase. Duplicates are detected
//! case-insensitively.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let symbol = token.trim();
        if symbol.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        if !seen.insert(symbol.to_lowercase()) {
            return Err(UniverseError::DuplicateSymbol(symbol.to_string()));
        }
        symbols.push(symbol.to_string());
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_symbols_basic() {
        let result = parse_symbols("AAPL,TSLA,MSFT").unwrap();
        assert_eq!(result, vec!["AAPL", "TSLA", "MSFT"]);
    }

    #[test]
    fn parse_symbols_with_whitespace() {
        let result = parse_symbols("  AAPL , TSLA ,MSFT,  NVDA  ").unwrap();
        assert_eq!(result, vec!["AAPL", "TSLA", "MSFT", "NVDA"]);
    }

    #[test]
    fn parse_symbols_keeps_case() {
        let result = parse_symbols("bitcoin,ethereum").unwrap();
        assert_eq!(result, vec!["bitcoin", "ethereum"]);
    }

    #[test]
    fn parse_symbols_single() {
        assert_eq!(parse_symbols("AMD").unwrap(), vec!["AMD"]);
    }

    #[test]
    fn parse_symbols_empty_token() {
        assert_eq!(parse_symbols("AAPL,,TSLA"), Err(UniverseError::EmptyToken));
        assert_eq!(parse_symbols(""), Err(UniverseError::EmptyToken));
    }

    #[test]
    fn parse_symbols_duplicate() {
        let result = parse_symbols("AAPL,TSLA,aapl");
        assert!(matches!(result, Err(UniverseError::DuplicateSymbol(s)) if s == "aapl"));
    }
}
