//! Sorting types for list queries.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Whether this is ascending order.
    pub fn is_asc(&self) -> bool {
        matches!(self, Self::Asc)
    }

    /// Parse a request value; `ASC` (any case) is ascending, anything else descending.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Asc,
            Some(s) if s.eq_ignore_ascii_case("asc") => Self::Asc,
            Some(_) => Self::Desc,
        }
    }
}

/// Sort field and direction over an entity-specific field enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort<F> {
    /// Field to sort by.
    pub field: F,
    /// Sort direction.
    pub direction: SortDirection,
}

impl<F> Sort<F> {
    /// Create a new sort.
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Create an ascending sort on the given field.
    pub fn asc(field: F) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Create a descending sort on the given field.
    pub fn desc(field: F) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

impl<F> Sort<F>
where
    F: FromStr<Err = AppError> + Default,
{
    /// Build a sort from optional request values (`sortField`, `sortOrder`).
    pub fn parse(field: Option<&str>, order: Option<&str>) -> Result<Self, AppError> {
        let field = match field {
            Some(raw) => raw.parse()?,
            None => F::default(),
        };
        Ok(Self::new(field, SortDirection::parse_lenient(order)))
    }
}
