use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::pagination::{PageRequest, Pagination};

pub type Version = models::version::Model;

/// Column a service listing is ordered by. Unknown input falls back to `Name`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    Name,
    CreatedAt,
    UpdatedAt,
}

impl SortColumn {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "created_at" => SortColumn::CreatedAt,
            "updated_at" => SortColumn::UpdatedAt,
            _ => SortColumn::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::CreatedAt => "created_at",
            SortColumn::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction. Anything other than `desc` is ascending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") { SortOrder::Desc } else { SortOrder::Asc }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Listing query: optional substring filters, ordering and page window.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort: SortColumn,
    pub order: SortOrder,
    pub page: PageRequest,
}

impl ServiceFilter {
    /// Build from loosely-typed adapter input, applying defaults and clamping.
    pub fn from_raw(
        name: Option<String>,
        description: Option<String>,
        sort: Option<&str>,
        order: Option<&str>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Self {
        let defaults = PageRequest::default();
        Self {
            name,
            description,
            sort: sort.map(SortColumn::parse).unwrap_or_default(),
            order: order.map(SortOrder::parse).unwrap_or_default(),
            page: PageRequest::normalized(
                page.unwrap_or(defaults.page as i64),
                limit.unwrap_or(defaults.limit as i64),
            ),
        }
    }

    /// Name term to match, `None` when absent or blank.
    pub fn name_term(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Description term to match, `None` when absent or blank.
    pub fn description_term(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

/// Flat service record with its derived version count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub version_count: u64,
}

impl ServiceSummary {
    pub fn from_model(m: models::service::Model, version_count: u64) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
            version_count,
        }
    }
}

/// Single service with its versions eager-loaded, newest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceDetail {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub versions: Vec<Version>,
    pub version_count: u64,
}

impl ServiceDetail {
    pub fn from_model(m: models::service::Model, versions: Vec<Version>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
            version_count: versions.len() as u64,
            versions,
        }
    }
}

/// One page of services plus its pagination metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub services: Vec<ServiceSummary>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update: only `Some` fields are written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ServicePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVersion {
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool { true }

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPatch {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl VersionPatch {
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.description.is_none() && self.is_active.is_none()
    }
}
