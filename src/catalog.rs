use std::fs;
use std::path::Path;

use serde::Deserialize;

/// One keyword rule: an underscore-delimited word group and the canned
/// response it maps to. `words` is the group split and lowercased at
/// load time, in the order it appears in the file.
#[derive(Debug, Clone)]
pub struct CatalogRule {
    pub keywords: String,
    pub words: Vec<String>,
    pub response: String,
}

/// Ordered canned-response catalog loaded once at startup and shared
/// read-only by all requests. Rule order is the match order.
#[derive(Debug, Clone)]
pub struct ResponseCatalog {
    rules: Vec<CatalogRule>,
    default_response: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog default response is empty")]
    EmptyDefault,
    #[error("catalog rule {0:?} has no usable keywords")]
    NoKeywords(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    rules: Vec<RawRule>,
    #[serde(rename = "default")]
    default_response: String,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    keywords: String,
    response: String,
}

impl ResponseCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// Parses and validates the catalog. A missing or empty `default`
    /// entry and rules without any usable word are startup errors.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;

        if file.default_response.trim().is_empty() {
            return Err(CatalogError::EmptyDefault);
        }

        let mut rules = Vec::with_capacity(file.rules.len());
        for rule in file.rules {
            let words: Vec<String> = rule
                .keywords
                .split('_')
                .filter(|word| !word.is_empty())
                .map(|word| word.to_lowercase())
                .collect();
            if words.is_empty() {
                return Err(CatalogError::NoKeywords(rule.keywords));
            }
            rules.push(CatalogRule {
                keywords: rule.keywords,
                words,
                response: rule.response,
            });
        }

        Ok(Self {
            rules,
            default_response: file.default_response,
        })
    }

    pub fn rules(&self) -> &[CatalogRule] {
        &self.rules
    }

    pub fn default_response(&self) -> &str {
        &self.default_response
    }
}
