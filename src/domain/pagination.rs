use serde::Serialize;

use super::{Cursor, DomainError, RecordId};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Anything paginated by its identifier.
pub trait Keyed {
    fn key(&self) -> RecordId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u32);

impl PageSize {
    pub fn new(n: i64) -> Result<Self, DomainError> {
        if n <= 0 {
            return Err(DomainError::invalid_argument(
                "page size should be a positive number",
            ));
        }
        u32::try_from(n)
            .map(Self)
            .map_err(|_| DomainError::invalid_argument(format!("page size {n} is too large")))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    pub cursor: Cursor,
    pub size: PageSize,
}

impl PageRequest {
    pub fn new(cursor: Cursor, size: PageSize) -> Self {
        Self { cursor, size }
    }

    pub fn first(size: PageSize) -> Self {
        Self::new(Cursor::START, size)
    }

    /// Builds a request from raw boundary input: an optional hex cursor and
    /// an optional page size (defaults to 10).
    pub fn parse(start: Option<&str>, size: Option<i64>) -> Result<Self, DomainError> {
        let cursor = Cursor::parse(start)?;
        let size = match size {
            Some(n) => PageSize::new(n)?,
            None => PageSize::default(),
        };
        Ok(Self { cursor, size })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size.get())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Last identifier of a full page; `None` once the collection is exhausted.
    pub next_cursor: Option<RecordId>,
}

impl<T: Keyed> Page<T> {
    pub fn from_items(items: Vec<T>, request: &PageRequest) -> Self {
        let full = items.len() >= request.size.get() as usize;
        let next_cursor = if full {
            items.last().map(Keyed::key)
        } else {
            None
        };
        Self { items, next_cursor }
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// For boundaries that report an empty page as not-found.
    pub fn require_items(self, msg: impl Into<String>) -> Result<Self, DomainError> {
        if self.items.is_empty() {
            Err(DomainError::not_found(msg))
        } else {
            Ok(self)
        }
    }
}

/// Applies keyset semantics to an already-fetched row set: drop rows at or
/// above the cursor, order newest first, keep at most one page.
pub fn keyset_page<T, I>(rows: I, request: &PageRequest) -> Vec<T>
where
    T: Keyed,
    I: IntoIterator<Item = T>,
{
    let mut page: Vec<T> = rows
        .into_iter()
        .filter(|row| request.cursor.admits(row.key()))
        .collect();
    page.sort_by(|a, b| b.key().cmp(&a.key()));
    page.truncate(request.size.get() as usize);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(RecordId);

    impl Keyed for Row {
        fn key(&self) -> RecordId {
            self.0
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|_| Row(RecordId::generate())).collect()
    }

    #[test]
    fn test_page_size_rejects_non_positive() {
        assert_eq!(PageSize::new(0).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(PageSize::new(-3).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert!(PageSize::new(i64::MAX).is_err());
        assert_eq!(PageSize::new(25).unwrap().get(), 25);
    }

    #[test]
    fn test_parse_defaults() {
        let request = PageRequest::parse(None, None).unwrap();
        assert!(request.cursor.is_start());
        assert_eq!(request.size.get(), DEFAULT_PAGE_SIZE);
        assert!(PageRequest::parse(Some("xyz"), None).is_err());
        assert!(PageRequest::parse(None, Some(0)).is_err());
    }

    #[test]
    fn test_keyset_page_is_bounded_and_descending() {
        let all = rows(7);
        let request = PageRequest::first(PageSize::new(3).unwrap());
        let page = keyset_page(all.clone(), &request);

        assert_eq!(page.len(), 3);
        assert_eq!(page, vec![all[6].clone(), all[5].clone(), all[4].clone()]);
    }

    #[test]
    fn test_keyset_page_excludes_cursor() {
        let all = rows(4);
        let request = PageRequest::new(Cursor::after(all[2].0), PageSize::new(10).unwrap());
        let page = keyset_page(all.clone(), &request);

        assert_eq!(page, vec![all[1].clone(), all[0].clone()]);
    }

    #[test]
    fn test_walking_pages_covers_everything_once() {
        let mut all = rows(11);
        let size = PageSize::new(3).unwrap();
        let mut request = PageRequest::first(size);
        let mut seen = Vec::new();

        loop {
            let page = Page::from_items(keyset_page(all.clone(), &request), &request);
            seen.extend(page.items.iter().map(|r| r.0));
            if seen.len() == 3 {
                // Newer rows arriving mid-walk must not leak into later pages.
                all.extend(rows(2));
            }
            match page.next_cursor {
                Some(id) => request = PageRequest::new(Cursor::after(id), size),
                None => break,
            }
        }

        let mut expected: Vec<RecordId> = all.iter().take(11).map(|r| r.0).collect();
        expected.reverse();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_require_items_maps_empty_to_not_found() {
        let page: Page<Row> = Page::from_items(Vec::new(), &PageRequest::default());
        assert!(page.next_cursor.is_none());
        let err = page.require_items("nothing here").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
