//! Name-pattern filter shared by the storage backends.

use regex::{Regex, RegexBuilder};

use crate::error::AppError;

/// A compiled, case-insensitive name pattern.
///
/// Request patterns may carry SQL `%` wildcards; they are stripped and the
/// remainder is matched as an unanchored regular expression, so `"Fo"`
/// matches `"foo"` and `"Big Fox"` alike.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// Compile a request pattern.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let source = raw.replace('%', "");
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::validation(format!("Invalid name pattern '{raw}': {e}")))?;
        Ok(Self { source, regex })
    }

    /// The pattern with wildcards stripped (used for SQL `~*` matching).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `name` matches this pattern.
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}
