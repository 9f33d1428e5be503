use std::{cmp::Ordering, collections::HashMap, str::FromStr};

use derive_more::Display;
use serde::Serialize;

use crate::{entities::project::Project, errors::AppError};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_SORT: &str = "-createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SortField {
    #[display("createdAt")]
    CreatedAt,
    #[display("updatedAt")]
    UpdatedAt,
    #[display("title")]
    Title,
    #[display("category")]
    Category,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
            SortField::Category => "category",
        }
    }
}

/// `[-|+]<field>`; a leading `-` sorts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder { field: SortField::CreatedAt, descending: true }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let field = match name {
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "title" => SortField::Title,
            "category" => SortField::Category,
            _ => return Err(AppError::InvalidFormat("sort".into())),
        };

        Ok(SortOrder { field, descending })
    }
}

impl SortOrder {
    pub fn direction(&self) -> &'static str {
        if self.descending { "DESC" } else { "ASC" }
    }

    /// Same ordering the SQL `ORDER BY <column> <dir>, id <dir>` produces.
    pub fn compare(&self, a: &Project, b: &Project) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Category => a.category.cmp(&b.category),
        }
        .then_with(|| a.id.cmp(&b.id));

        if self.descending { ordering.reverse() } else { ordering }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT, sort: SortOrder::default() }
    }
}

impl PageRequest {
    /// Unparsable or non-positive `page`/`limit` fall back to their defaults;
    /// an unknown `sort` key is rejected.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, AppError> {
        let positive = |key: &str| {
            query.get(key)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0)
        };

        let page = positive("page").unwrap_or(DEFAULT_PAGE);
        let limit = positive("limit").unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let sort = query.get("sort")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SORT)
            .parse()?;

        Ok(PageRequest { page, limit, sort })
    }

    pub fn offset(&self) -> i64 {
        page_offset(self.page, self.limit)
    }

    pub fn total_pages(&self, total: i64) -> u64 {
        let total = total.max(0) as u64;
        total.div_ceil(u64::from(self.limit.max(1)))
    }
}

/// Helper to compute OFFSET safely from 1-based `page` and `limit`.
fn page_offset(page: u32, limit: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (limit as i64)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedProjects {
    pub projects: Vec<Project>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_projects: i64,
}
