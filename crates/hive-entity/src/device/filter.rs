//! Device listing filter and sort fields.

use std::str::FromStr;

use hive_core::AppError;
use hive_core::types::NamePattern;

/// Filter applied by [`DeviceRepository::list`](crate::repository::DeviceRepository::list).
///
/// `name` is an exact match and takes precedence over `name_pattern`.
#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    pub name: Option<String>,
    pub name_pattern: Option<NamePattern>,
    pub status: Option<String>,
    pub network_id: Option<i64>,
    pub network_name: Option<String>,
    pub device_class_id: Option<i64>,
    pub device_class_name: Option<String>,
}

/// Sortable device columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceSortField {
    #[default]
    Id,
    Name,
    Status,
}

impl DeviceSortField {
    /// Column name used by relational backends.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Status => "status",
        }
    }
}

impl FromStr for DeviceSortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "status" => Ok(Self::Status),
            _ => Err(AppError::validation(format!(
                "Invalid sort field: '{s}'. Expected one of: ID, Name, Status"
            ))),
        }
    }
}
