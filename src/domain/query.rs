//! Label matching

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// How a query string is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-sensitive, unanchored substring test
    #[default]
    Literal,
    /// Unanchored regular expression
    Pattern,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(MatchMode::Literal),
            "pattern" | "regex" => Ok(MatchMode::Pattern),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Literal => write!(f, "literal"),
            MatchMode::Pattern => write!(f, "pattern"),
        }
    }
}

/// A non-empty search query ready for matching.
#[derive(Debug, Clone)]
pub enum Query {
    Literal(String),
    Pattern(Regex),
}

impl Query {
    /// Build a query from raw input. An empty input yields `Ok(None)`.
    pub fn parse(text: &str, mode: MatchMode) -> Result<Option<Self>, DomainError> {
        if text.is_empty() {
            return Ok(None);
        }
        let query = match mode {
            MatchMode::Literal => Query::Literal(text.to_string()),
            MatchMode::Pattern => {
                let re = Regex::new(text).map_err(|e| DomainError::InvalidPattern {
                    pattern: text.to_string(),
                    message: e.to_string(),
                })?;
                Query::Pattern(re)
            }
        };
        Ok(Some(query))
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            Query::Literal(needle) => label.contains(needle.as_str()),
            Query::Pattern(re) => re.is_match(label),
        }
    }
}
