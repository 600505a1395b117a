//! Offset pagination for list endpoints.
//!
//! Query shape: `?page=0&size=12&sort=price,asc`. Pages are 0-based. A
//! missing `sort` direction means ascending; a missing `sort` altogether
//! falls back to the endpoint's [`PageableDefault`].

use crate::error::{MarketError, Result};
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use strum_macros::{Display, EnumString};

pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SortField {
    #[strum(serialize = "id")]
    Id,
    #[strum(serialize = "price")]
    Price,
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "createdAt")]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: Direction,
}

impl Sort {
    pub const fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    pub const fn id_desc() -> Self {
        Self::new(SortField::Id, Direction::Desc)
    }

    /// Parse `field[,direction]`
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(',').map(str::trim);
        let field = parts
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| MarketError::Validation("sort field is empty".to_string()))?;
        let field: SortField = field
            .parse()
            .map_err(|_| MarketError::Validation(format!("cannot sort by '{field}'")))?;
        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(dir) => dir
                .parse()
                .map_err(|_| MarketError::Validation(format!("unknown sort direction '{dir}'")))?,
        };
        if parts.next().is_some() {
            return Err(MarketError::Validation(format!("malformed sort '{raw}'")));
        }
        Ok(Self { field, direction })
    }
}

/// Endpoint-level paging defaults
#[derive(Debug, Clone, Copy)]
pub struct PageableDefault {
    pub size: u64,
    pub sort: Sort,
}

impl PageableDefault {
    pub const fn new(size: u64, sort: Sort) -> Self {
        Self { size, sort }
    }
}

/// A resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    pub page: u64,
    pub size: u64,
    pub sort: Sort,
}

impl Pageable {
    pub fn new(page: u64, size: u64, sort: Sort) -> Self {
        Self { page, size, sort }
    }

    pub fn offset(&self) -> usize {
        usize::try_from(self.page.saturating_mul(self.size)).unwrap_or(usize::MAX)
    }

    pub fn limit(&self) -> usize {
        usize::try_from(self.size).unwrap_or(usize::MAX)
    }

    /// Cut the page out of an already sorted sequence
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.limit())
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<u64>,
    size: Option<u64>,
    sort: Option<String>,
}

/// Raw paging parameters from the query string, resolved against an
/// endpoint default with [`PageRequest::resolve`]
#[derive(Debug, Default)]
pub struct PageRequest {
    params: PageParams,
}

impl PageRequest {
    pub fn new(page: Option<u64>, size: Option<u64>, sort: Option<&str>) -> Self {
        Self {
            params: PageParams {
                page,
                size,
                sort: sort.map(str::to_string),
            },
        }
    }

    pub fn resolve(&self, default: PageableDefault) -> Result<Pageable> {
        let size = self.params.size.unwrap_or(default.size);
        if size == 0 {
            return Err(MarketError::Validation("page size must be at least 1".to_string()));
        }
        let sort = match self.params.sort.as_deref() {
            None => default.sort,
            Some(raw) => Sort::parse(raw)?,
        };
        Ok(Pageable {
            page: self.params.page.unwrap_or(0),
            size: size.min(MAX_PAGE_SIZE),
            sort,
        })
    }
}

impl<S> FromRequestParts<S> for PageRequest
where
    S: Send + Sync,
{
    type Rejection = MarketError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let Query(params) = Query::<PageParams>::try_from_uri(&parts.uri)
            .map_err(|e| MarketError::Validation(e.body_text()))?;
        Ok(Self { params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_DEFAULT: PageableDefault = PageableDefault::new(12, Sort::id_desc());

    #[test]
    fn omitted_parameters_take_endpoint_defaults() {
        let pageable = PageRequest::default().resolve(LIST_DEFAULT).unwrap();
        assert_eq!(pageable, Pageable::new(0, 12, Sort::id_desc()));
    }

    #[test]
    fn explicit_parameters_override_defaults() {
        let pageable = PageRequest::new(Some(2), Some(5), Some("price,asc"))
            .resolve(LIST_DEFAULT)
            .unwrap();
        assert_eq!(pageable.page, 2);
        assert_eq!(pageable.offset(), 10);
        assert_eq!(pageable.sort, Sort::new(SortField::Price, Direction::Asc));
    }

    #[test]
    fn sort_without_direction_is_ascending() {
        assert_eq!(
            Sort::parse("createdAt").unwrap(),
            Sort::new(SortField::CreatedAt, Direction::Asc)
        );
        assert_eq!(
            Sort::parse("name,DESC").unwrap(),
            Sort::new(SortField::Name, Direction::Desc)
        );
    }

    #[test]
    fn rejects_bad_paging() {
        assert!(PageRequest::new(None, Some(0), None).resolve(LIST_DEFAULT).is_err());
        assert!(Sort::parse("password,asc").is_err());
        assert!(Sort::parse("id,sideways").is_err());
        assert!(Sort::parse("id,asc,extra").is_err());
    }

    #[test]
    fn size_is_capped() {
        let pageable = PageRequest::new(None, Some(5_000), None)
            .resolve(LIST_DEFAULT)
            .unwrap();
        assert_eq!(pageable.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn slice_takes_the_requested_window() {
        let pageable = Pageable::new(1, 3, Sort::id_desc());
        assert_eq!(pageable.slice(1..=10), vec![4, 5, 6]);
        assert!(Pageable::new(9, 3, Sort::id_desc()).slice(1..=10).is_empty());
    }
}
