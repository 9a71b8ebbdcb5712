use serde::{Deserialize, Serialize};
use std::fmt;

/// Where in a page a keyword was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLocation {
    /// Anywhere in the fetched page content
    Body,
}

impl MatchLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLocation::Body => "body",
        }
    }
}

impl fmt::Display for MatchLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First page a keyword was found on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub url: String,
    pub location: MatchLocation,
}

/// Outcome for one input keyword.
///
/// A keyword is found exactly when it carries a match, so the flag and the
/// URL can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Trimmed, lower-cased keyword
    pub keyword: String,

    /// Page and location of the first match, if any
    pub matched: Option<KeywordMatch>,
}

impl KeywordRecord {
    pub fn found(
        keyword: impl Into<String>,
        url: impl Into<String>,
        location: MatchLocation,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            matched: Some(KeywordMatch {
                url: url.into(),
                location,
            }),
        }
    }

    pub fn not_found(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            matched: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.matched.is_some()
    }

    pub fn url(&self) -> Option<&str> {
        self.matched.as_ref().map(|m| m.url.as_str())
    }

    pub fn location(&self) -> Option<MatchLocation> {
        self.matched.as_ref().map(|m| m.location)
    }

    /// Flatten into the four-column row handed to report writers
    pub fn to_row(&self) -> ResultRow {
        ResultRow {
            keyword: self.keyword.clone(),
            found: if self.is_found() { "Yes" } else { "No" }.to_string(),
            url: self.url().unwrap_or(NONE).to_string(),
            matched_in: self
                .location()
                .map(|l| l.as_str())
                .unwrap_or(NONE)
                .to_string(),
        }
    }
}

/// Placeholder written in report columns that have no value
pub const NONE: &str = "-";

/// One report row: Keyword, Found, URL, Matched In
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Keyword")]
    pub keyword: String,

    #[serde(rename = "Found")]
    pub found: String,

    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Matched In")]
    pub matched_in: String,
}

impl ResultRow {
    pub const HEADERS: [&'static str; 4] = ["Keyword", "Found", "URL", "Matched In"];

    pub fn columns(&self) -> [&str; 4] {
        [
            self.keyword.as_str(),
            self.found.as_str(),
            self.url.as_str(),
            self.matched_in.as_str(),
        ]
    }
}
