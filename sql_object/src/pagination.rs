//! Pagination utilities
//!
//! This module provides the paging arithmetic shared by every paged query:
//! a count callback runs first, the page window is derived from the total,
//! and the fetch callback runs only when there is something to fetch.

use crate::errors::QueryError;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// The slice of rows a fetch callback should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub start_index: i64,
    pub page_no: i64,
    pub page_size: i64,
}

impl PageWindow {
    /// ` limit <start>,<size>` for this window
    pub fn limit_sql(&self) -> String {
        format!(" limit {},{}", self.start_index, self.page_size)
    }
}

/// One page of results with its navigation numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    page_no: i64,
    page_size: i64,
    total_count: i64,
    page_count: i64,
    prev_no: i64,
    next_no: i64,
    start_index: i64,
    items: Vec<T>,
}

impl<T> PageResult<T> {
    /// Derive the page layout from a known total, with no items yet
    ///
    /// `page_no` is clamped into `[1, page_count]`; a zero total still has one page.
    pub fn layout(page_no: i64, page_size: i64, total_count: i64) -> Result<Self, QueryError> {
        if page_size <= 0 {
            return Err(QueryError::invalid(format!(
                "page size must be greater than 0, got {}",
                page_size
            )));
        }

        let page_count = if total_count <= 0 {
            1
        } else if total_count % page_size == 0 {
            total_count / page_size
        } else {
            total_count / page_size + 1
        };
        let page_no = page_no.clamp(1, page_count);

        Ok(Self {
            page_no,
            page_size,
            total_count,
            page_count,
            prev_no: (page_no - 1).max(1),
            next_no: (page_no + 1).min(page_count),
            start_index: (page_no - 1) * page_size,
            items: Vec::new(),
        })
    }

    /// Run `count`, then `fetch` for the resulting window unless the total is below 1
    pub fn paginate<E, C, F>(page_no: i64, page_size: i64, count: C, fetch: F) -> Result<Self, E>
    where
        E: From<QueryError>,
        C: FnOnce() -> Result<i64, E>,
        F: FnOnce(PageWindow) -> Result<Vec<T>, E>,
    {
        let total = count()?;
        let mut page = Self::layout(page_no, page_size, total)?;
        if total < 1 {
            return Ok(page);
        }
        page.items = fetch(page.window())?;
        Ok(page)
    }

    /// Async form of [`PageResult::paginate`]
    pub async fn paginate_async<E, C, CF, F, FF>(
        page_no: i64,
        page_size: i64,
        count: C,
        fetch: F,
    ) -> Result<Self, E>
    where
        E: From<QueryError>,
        C: FnOnce() -> CF,
        CF: Future<Output = Result<i64, E>>,
        F: FnOnce(PageWindow) -> FF,
        FF: Future<Output = Result<Vec<T>, E>>,
    {
        let total = count().await?;
        let mut page = Self::layout(page_no, page_size, total)?;
        if total < 1 {
            return Ok(page);
        }
        page.items = fetch(page.window()).await?;
        Ok(page)
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            start_index: self.start_index,
            page_no: self.page_no,
            page_size: self.page_size,
        }
    }

    pub fn page_no(&self) -> i64 {
        self.page_no
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn total_count(&self) -> i64 {
        self.total_count
    }

    pub fn page_count(&self) -> i64 {
        self.page_count
    }

    pub fn prev_no(&self) -> i64 {
        self.prev_no
    }

    pub fn next_no(&self) -> i64 {
        self.next_no
    }

    pub fn start_index(&self) -> i64 {
        self.start_index
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the items, keeping the layout
    pub fn with_items<U>(self, items: Vec<U>) -> PageResult<U> {
        PageResult {
            page_no: self.page_no,
            page_size: self.page_size,
            total_count: self.total_count,
            page_count: self.page_count,
            prev_no: self.prev_no,
            next_no: self.next_no,
            start_index: self.start_index,
            items,
        }
    }

    pub fn map<U, M>(self, f: M) -> PageResult<U>
    where
        M: FnMut(T) -> U,
    {
        let items: Vec<U> = self.items.into_iter().map(f).collect();
        PageResult {
            page_no: self.page_no,
            page_size: self.page_size,
            total_count: self.total_count,
            page_count: self.page_count,
            prev_no: self.prev_no,
            next_no: self.next_no,
            start_index: self.start_index,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_empty_total_skips_fetch() {
        let fetched = Cell::new(false);
        let page: PageResult<i32> = PageResult::paginate::<QueryError, _, _>(
            0,
            20,
            || Ok(0),
            |_| {
                fetched.set(true);
                Ok(vec![1])
            },
        )
        .unwrap();

        assert!(!fetched.get());
        assert_eq!(page.page_count(), 1);
        assert_eq!(page.page_no(), 1);
        assert_eq!(page.prev_no(), 1);
        assert_eq!(page.next_no(), 1);
        assert!(page.is_empty());
    }

    #[test]
    fn test_last_page_clamps_next() {
        let page: PageResult<i64> = PageResult::paginate::<QueryError, _, _>(
            3,
            10,
            || Ok(25),
            |window| {
                assert_eq!(window.start_index, 20);
                assert_eq!(window.limit_sql(), " limit 20,10");
                Ok((window.start_index..25).collect())
            },
        )
        .unwrap();

        assert_eq!(page.page_count(), 3);
        assert_eq!(page.start_index(), 20);
        assert_eq!(page.prev_no(), 2);
        assert_eq!(page.next_no(), 3);
        assert_eq!(page.items().len(), 5);
    }

    #[test]
    fn test_page_beyond_end_is_clamped() {
        let page = PageResult::<()>::layout(9, 10, 30).unwrap();
        assert_eq!(page.page_no(), 3);
        assert_eq!(page.start_index(), 20);

        let page = PageResult::<()>::layout(-4, 10, 30).unwrap();
        assert_eq!(page.page_no(), 1);
        assert_eq!(page.next_no(), 2);
    }

    #[test]
    fn test_non_positive_page_size_fails_after_count() {
        let counted = Cell::new(false);
        let result = PageResult::<i32>::paginate::<QueryError, _, _>(
            1,
            0,
            || {
                counted.set(true);
                Ok(5)
            },
            |_| Ok(vec![]),
        );
        assert!(counted.get());
        assert!(matches!(result, Err(QueryError::InvalidArgument(_))));
    }

    #[test]
    fn test_count_error_propagates() {
        let result = PageResult::<i32>::paginate(
            1,
            10,
            || Err(QueryError::invalid("boom")),
            |_| Ok(vec![]),
        );
        assert_eq!(result.unwrap_err(), QueryError::invalid("boom"));
    }

    #[test]
    fn test_map_keeps_layout() {
        let page = PageResult::<()>::layout(2, 2, 5).unwrap().with_items(vec![3, 4]);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.page_no(), 2);
        assert_eq!(mapped.items(), &["3".to_string(), "4".to_string()]);
    }

    #[tokio::test]
    async fn test_paginate_async() {
        let page = PageResult::paginate_async::<QueryError, _, _, _, _>(
            2,
            2,
            || async { Ok(3) },
            |window| async move { Ok(vec![window.start_index]) },
        )
        .await
        .unwrap();
        assert_eq!(page.page_count(), 2);
        assert_eq!(page.items(), &[2]);
    }
}
