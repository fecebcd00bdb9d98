//! Page-following for list endpoints.
//!
//! Every list endpoint answers with the same shape:
//!
//! ```json
//! {
//!   "data": [ ... ],
//!   "pagination": { "count": 3, "page": 1, "items": 1, "pages": 3, "prev": null, "next": 2, "last": 3 }
//! }
//! ```
//!
//! [`follow_pages`] walks the `next` cursor until it reaches zero and
//! returns the concatenated items.

use serde::{Deserialize, Deserializer, Serialize};
use std::future::Future;

/// Cursor describing where a page sits in a listing.
///
/// Missing or `null` fields read as `0`. `next == 0` means there are no
/// further pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of items across all pages
    #[serde(default, deserialize_with = "null_as_zero")]
    pub count: u32,
    /// Current page number
    #[serde(default, deserialize_with = "null_as_zero")]
    pub page: u32,
    /// Items on this page
    #[serde(default, deserialize_with = "null_as_zero")]
    pub items: u32,
    /// Total number of pages
    #[serde(default, deserialize_with = "null_as_zero")]
    pub pages: u32,
    /// Previous page number, 0 on the first page
    #[serde(default, deserialize_with = "null_as_zero")]
    pub prev: u32,
    /// Next page number, 0 on the last page
    #[serde(default, deserialize_with = "null_as_zero")]
    pub next: u32,
    /// Last page number
    #[serde(default, deserialize_with = "null_as_zero")]
    pub last: u32,
}

impl Pagination {
    /// The page to request next, if any.
    pub fn next_page(&self) -> Option<u32> {
        (self.next != 0).then_some(self.next)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, in server order
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Cursor, absent on endpoints that do not paginate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// The page to request next, if any.
    pub fn next_page(&self) -> Option<u32> {
        self.pagination.as_ref().and_then(Pagination::next_page)
    }
}

/// Fetch every page of a listing and return all items in order.
///
/// `fetch` is called with page `1` first, then with each `next` cursor the
/// server returns. Iteration stops when `next` is zero or the page has no
/// `pagination` at all. The first failing fetch aborts the walk and its
/// error is returned; items gathered so far are dropped.
///
/// # Examples
///
/// ```rust
/// use firehydrant_core::pagination::{follow_pages, Page, Pagination};
///
/// # async fn example() -> Result<(), std::io::Error> {
/// let items = follow_pages(|page| async move {
///     let next = if page < 3 { page + 1 } else { 0 };
///     Ok::<_, std::io::Error>(Page {
///         data: vec![page],
///         pagination: Some(Pagination { page, next, ..Default::default() }),
///     })
/// })
/// .await?;
///
/// assert_eq!(items, vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
pub async fn follow_pages<T, E, F, Fut>(mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let current = fetch(page).await?;
        let next = current.next_page();
        items.extend(current.data);

        match next {
            Some(next) => page = next,
            None => return Ok(items),
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}
