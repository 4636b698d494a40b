//! Company name to ticker lookup.
//!
//! The table is loaded once at startup and never mutated afterwards. Matching
//! is exact after trimming and lowercasing; there is no fuzzy or remote lookup.

use std::collections::HashMap;
use std::path::Path;

use crate::{AnalysisError, TickerSymbol};

#[derive(Debug, Clone, Default)]
pub struct TickerResolver {
    table: HashMap<String, TickerSymbol>,
}

impl TickerResolver {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let table = entries
            .into_iter()
            .map(|(name, symbol)| (normalize(name.as_ref()), TickerSymbol::new(symbol)))
            .collect();
        Self { table }
    }

    /// Resolver with no entries; every lookup fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `{ "company name": "TICKER" }` pairs.
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let entries: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| AnalysisError::InvalidData(format!("ticker table: {}", e)))?;
        Ok(Self::new(entries))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidData(format!("cannot read {}: {}", path.display(), e))
        })?;
        let resolver = Self::from_json_str(&json)?;
        tracing::info!("Loaded {} ticker mappings from {}", resolver.len(), path.display());
        Ok(resolver)
    }

    pub fn resolve(&self, company_name: &str) -> Result<TickerSymbol, AnalysisError> {
        self.table
            .get(&normalize(company_name))
            .cloned()
            .ok_or_else(|| AnalysisError::TickerNotFound(company_name.trim().to_string()))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn resolver() -> TickerResolver {
        TickerResolver::new([("Acme Corp", "acme"), ("apple", "AAPL")])
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let r = resolver();
        assert_eq!(r.resolve("acme corp").unwrap().as_str(), "ACME");
        assert_eq!(r.resolve("ACME CORP").unwrap().as_str(), "ACME");
        assert_eq!(r.resolve("  Apple ").unwrap().as_str(), "AAPL");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let r = resolver();
        assert_eq!(
            r.resolve("unknown-co"),
            Err(AnalysisError::TickerNotFound("unknown-co".to_string()))
        );
        // No partial matches
        assert!(r.resolve("acme").is_err());
    }

    #[test]
    fn empty_table_rejects_everything() {
        let r = TickerResolver::empty();
        assert!(r.is_empty());
        assert!(r.resolve("apple").is_err());
    }

    #[test]
    fn loads_table_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Microsoft": "msft", "tesla": "TSLA"}}"#).unwrap();

        let r = TickerResolver::from_file(file.path()).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.resolve("microsoft").unwrap().as_str(), "MSFT");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = TickerResolver::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidData(_)));
    }
}
