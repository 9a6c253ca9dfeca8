//! Page-numbered windows over ordered list queries

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Rows of the requested page
    pub items: Vec<T>,
    /// Total number of rows across all pages
    pub total: i64,
    /// Current page number (1-based)
    pub page: i64,
    /// Rows per page
    pub per_page: i64,
    pub num_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// `?page=N` query parameter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
}

/// A resolved page number for a list of known size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub num_pages: i64,
}

impl Pagination {
    /// Resolves the requested page; an empty list still has a first page,
    /// any other page outside `1..=num_pages` is `NotFound`.
    pub fn resolve(requested: Option<i64>, per_page: i64, total: i64) -> AppResult<Self> {
        let num_pages = if total <= 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        let page = requested.unwrap_or(1);
        if page < 1 || page > num_pages {
            return Err(AppError::NotFound(format!("Invalid page ({})", page)));
        }
        Ok(Self {
            page,
            per_page,
            total,
            num_pages,
        })
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T>
    where
        T: for<'a> ToSchema<'a>,
    {
        Page {
            items,
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            num_pages: self.num_pages,
            has_next: self.page < self.num_pages,
            has_previous: self.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::genre::Genre;

    #[test]
    fn test_empty_list_has_first_page() {
        let p = Pagination::resolve(None, 5, 0).unwrap();
        assert_eq!(p.num_pages, 1);
        assert_eq!(p.offset(), 0);
        assert!(Pagination::resolve(Some(2), 5, 0).is_err());
    }

    #[test]
    fn test_offsets_and_bounds() {
        let p = Pagination::resolve(Some(3), 5, 11).unwrap();
        assert_eq!(p.num_pages, 3);
        assert_eq!(p.offset(), 10);
        assert_eq!(p.limit(), 5);

        assert!(matches!(
            Pagination::resolve(Some(4), 5, 11),
            Err(AppError::NotFound(_))
        ));
        assert!(Pagination::resolve(Some(0), 5, 11).is_err());
        assert!(Pagination::resolve(Some(-1), 10, 11).is_err());
    }

    #[test]
    fn test_page_flags() {
        let genres = vec![Genre {
            id: 1,
            name: "Poetry".to_string(),
        }];
        let page = Pagination::resolve(Some(2), 10, 25).unwrap().into_page(genres);
        assert!(page.has_next);
        assert!(page.has_previous);
        assert_eq!(page.num_pages, 3);

        let last = Pagination::resolve(Some(3), 10, 25).unwrap().into_page(Vec::<Genre>::new());
        assert!(!last.has_next);
    }
}
