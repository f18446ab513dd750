//! Pagination utilities for service layer
//!
//! `Pagination` is the raw query-string shape; `PageRequest` is the normalized,
//! zero-based request handed to repositories; `Page` is what comes back.

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub property: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(property: &str) -> Self { Self { property: property.to_string(), direction: Direction::Asc } }

    pub fn desc(property: &str) -> Self { Self { property: property.to_string(), direction: Direction::Desc } }

    /// Parse `property` or `property,asc|desc` (case-insensitive direction).
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts.next().unwrap_or_default();
        if property.is_empty() {
            return Err(ServiceError::BadRequest("sort property is empty".into()));
        }
        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(d) => return Err(ServiceError::BadRequest(format!("unknown sort direction '{d}'"))),
        };
        if parts.next().is_some() {
            return Err(ServiceError::BadRequest(format!("malformed sort '{raw}'")));
        }
        Ok(Self { property: property.to_string(), direction })
    }
}

/// Normalized page request: zero-based page index, positive size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn of(page: u64, size: u64) -> Self { Self { page, size: size.max(1), sort: None } }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn offset(&self) -> u64 { self.page.saturating_mul(self.size) }

    /// Reject sort properties the repository cannot order by.
    pub fn ensure_sortable(&self, allowed: &[&str]) -> Result<(), ServiceError> {
        match &self.sort {
            Some(sort) if !allowed.contains(&sort.property.as_str()) => Err(ServiceError::BadRequest(format!(
                "cannot sort by '{}'; expected one of {}",
                sort.property,
                allowed.join(", ")
            ))),
            _ => Ok(()),
        }
    }
}

/// Pagination parameters as they arrive on the query string
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Pagination {
    /// 0-based page index
    pub page: Option<u64>,
    /// items per page
    pub size: Option<u64>,
    /// `property[,asc|desc]`
    pub sort: Option<String>,
}

impl Pagination {
    /// Fill defaults and clamp `size` into `1..=max_size`.
    pub fn normalize(&self, default_size: u64, max_size: u64) -> Result<PageRequest, ServiceError> {
        let size = self.size.unwrap_or(default_size).clamp(1, max_size.max(1));
        let page = self.page.unwrap_or(0);
        // offsets are sent to the database as bigint
        if page.checked_mul(size).map_or(true, |offset| offset > i64::MAX as u64) {
            return Err(ServiceError::BadRequest(format!("page {page} is out of range")));
        }
        let mut request = PageRequest::of(page, size);
        if let Some(raw) = self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.with_sort(Sort::parse(raw)?);
        }
        Ok(request)
    }
}

/// A bounded slice of a larger result set plus paging metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
    pub number_of_elements: u64,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.size.max(1);
        let total_pages = total_elements.div_ceil(size);
        let number_of_elements = content.len() as u64;
        Self {
            number: request.page,
            size,
            total_elements,
            total_pages,
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
            number_of_elements,
            empty: content.is_empty(),
            content,
        }
    }

    /// Convert the items, keeping the metadata untouched.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
            number_of_elements: self.number_of_elements,
            empty: self.empty,
        }
    }
}
