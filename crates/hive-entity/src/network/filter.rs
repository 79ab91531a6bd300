//! Network listing filter and sort fields.

use std::collections::HashSet;
use std::str::FromStr;

use hive_core::AppError;
use hive_core::types::NamePattern;

/// Filter applied by [`NetworkRepository::list`](crate::repository::NetworkRepository::list).
#[derive(Debug, Clone, Default)]
pub struct NetworkFilter {
    /// Exact name match.
    pub name: Option<String>,
    /// Case-insensitive pattern, ignored when `name` is set.
    pub name_pattern: Option<NamePattern>,
    /// Restricts results to these network ids.
    pub ids: Option<HashSet<i64>>,
}

impl NetworkFilter {
    /// Whether `network` passes this filter.
    pub fn matches(&self, network: &super::Network) -> bool {
        if let Some(ids) = &self.ids
            && !network.id.is_some_and(|id| ids.contains(&id))
        {
            return false;
        }
        if let Some(name) = &self.name {
            return &network.name == name;
        }
        match &self.name_pattern {
            Some(pattern) => pattern.is_match(&network.name),
            None => true,
        }
    }
}

/// Sortable network columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkSortField {
    #[default]
    Id,
    Name,
}

impl NetworkSortField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
        }
    }
}

impl FromStr for NetworkSortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            _ => Err(AppError::validation(format!(
                "Invalid sort field: '{s}'. Expected one of: ID, Name"
            ))),
        }
    }
}
