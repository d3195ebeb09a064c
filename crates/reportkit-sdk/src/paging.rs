//! Windowed views over server-paged collections.
//!
//! A [`PaginatedList`] holds one contiguous run of pages. Direct loads
//! replace the run; only [`PaginatedList::load_next`] extends it. Indices are
//! absolute positions in the whole server collection, so anything outside
//! the loaded run is out of bounds even if the server has it.

use serde::de::DeserializeOwned;
use tracing::debug;

use reportkit_types::IdElement;

use crate::service::Service;
use crate::source::{Batch, ListSource};
use crate::{Error, Result};

/// The contiguous run of pages currently held by a list.
///
/// Everything is measured in pages of `page_size`: the first loaded element
/// sits at `first_page * page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// The page asked for by the most recent direct load
    pub first_page: usize,
    pub last_page: usize,
    /// Size the server actually used; fixed for the lifetime of the window
    /// and always > 0
    pub page_size: usize,
    /// Element count of the most recently loaded page
    pub last_page_len: usize,
}

impl PageWindow {
    fn single(page: usize, page_size: usize, len: usize) -> Result<Self> {
        let window = Self {
            first_page: page,
            last_page: page,
            page_size: page_size.max(1),
            last_page_len: len,
        };
        window.first_index()?;
        Ok(window)
    }

    /// Absolute index of the first element of the window.
    pub fn first_index(&self) -> Result<usize> {
        self.offset_of(self.first_page)
    }

    /// Offset of the page right after this window.
    fn next_offset(&self) -> Result<usize> {
        let next = self
            .last_page
            .checked_add(1)
            .ok_or_else(|| Error::InvalidArgument("next page is out of range".to_string()))?;
        self.offset_of(next)
    }

    fn offset_of(&self, page: usize) -> Result<usize> {
        page.checked_mul(self.page_size).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "page {page} of size {} is out of range",
                self.page_size
            ))
        })
    }

    fn extended(self, len: usize) -> Self {
        Self {
            last_page: self.last_page + 1,
            last_page_len: len,
            ..self
        }
    }

    /// A full last page means more may exist. A collection whose size is an
    /// exact multiple of the page size reports one extra, empty, page.
    fn has_next(&self) -> bool {
        self.last_page_len == self.page_size
    }
}

/// A list of elements loaded page by page from the server.
#[derive(Debug)]
pub struct PaginatedList<T> {
    service: Service,
    source: ListSource,
    window: Option<PageWindow>,
    items: Vec<T>,
}

/// Alias of [`PaginatedList`] for elements with IDs. The ID lookups
/// ([`contains_id`](PaginatedList::contains_id),
/// [`index_of_id`](PaginatedList::index_of_id)) are available on any
/// `PaginatedList<T: IdElement>`; this alias only names the intent.
pub type PaginatedIdList<T> = PaginatedList<T>;

impl<T> PaginatedList<T> {
    /// An unloaded list; nothing is fetched until a load call.
    pub fn new(service: Service, source: ListSource) -> Self {
        Self {
            service,
            source,
            window: None,
            items: Vec::new(),
        }
    }

    pub fn source(&self) -> &ListSource {
        &self.source
    }

    pub fn window(&self) -> Option<&PageWindow> {
        self.window.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.window.is_some()
    }

    /// True if the list was never loaded or its last page came back full.
    pub fn has_next_page(&self) -> bool {
        self.window.is_none_or(|window| window.has_next())
    }

    pub fn first_loaded_page(&self) -> Option<usize> {
        self.window.map(|w| w.first_page)
    }

    pub fn last_loaded_page(&self) -> Option<usize> {
        self.window.map(|w| w.last_page)
    }

    pub fn page_size(&self) -> Option<usize> {
        self.window.map(|w| w.page_size)
    }

    /// `None` when unloaded or when the window holds no elements.
    pub fn first_loaded_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        self.window.and_then(|w| w.first_index().ok())
    }

    /// `None` when unloaded or when the window holds no elements.
    pub fn last_loaded_index(&self) -> Option<usize> {
        let first = self.first_loaded_index()?;
        self.items.len().checked_sub(1).map(|last| first + last)
    }

    /// Number of loaded elements.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element at an absolute index.
    pub fn get(&self, index: usize) -> Result<&T> {
        self.first_loaded_index()
            .and_then(|first| index.checked_sub(first))
            .and_then(|offset| self.items.get(offset))
            .ok_or(Error::IndexOutOfBounds {
                index,
                first: self.first_loaded_index(),
                last: self.last_loaded_index(),
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn to_list(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }

    pub fn contains(&self, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(element)
    }

    /// Absolute index of the first loaded element equal to `element`.
    pub fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.position(|item| item == element)
    }

    fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        let first = self.first_loaded_index()?;
        self.items.iter().position(predicate).map(|i| first + i)
    }

    fn log_window(&self) {
        if let Some(window) = &self.window {
            debug!(
                field = self.source.field(),
                first_page = window.first_page,
                last_page = window.last_page,
                page_size = window.page_size,
                loaded = self.items.len(),
                "page window updated"
            );
        }
    }
}

impl<T: DeserializeOwned> PaginatedList<T> {
    /// Loads the first page at the server's default page size, replacing
    /// anything loaded before.
    pub fn load(&mut self) -> Result<&mut Self> {
        let batch: Batch<T> = self.source.fetch(&self.service, None)?;
        let page_size = batch
            .size
            .filter(|size| *size > 0)
            .unwrap_or(batch.items.len());
        let window = PageWindow::single(0, page_size, batch.items.len())?;
        self.replace(window, batch.items);
        Ok(self)
    }

    /// Loads the first page with `size` elements. The server may cap the
    /// size.
    pub fn load_with_size(&mut self, size: usize) -> Result<&mut Self> {
        self.load_page(0, size)
    }

    /// Loads exactly one page, replacing anything loaded before.
    ///
    /// The window starts at `page` in units of the size the server used. If
    /// the server caps `size`, the window reads as page `page` of the capped
    /// size, so `first_loaded_index()` is `page * page_size()`.
    pub fn load_page(&mut self, page: usize, size: usize) -> Result<&mut Self> {
        if size == 0 {
            return Err(Error::InvalidArgument(
                "page size must be greater than 0".to_string(),
            ));
        }
        let offset = page.checked_mul(size).ok_or_else(|| {
            Error::InvalidArgument(format!("page {page} of size {size} is out of range"))
        })?;

        let batch: Batch<T> = self.source.fetch(&self.service, Some((offset, size)))?;
        let page_size = batch.size.filter(|s| *s > 0).unwrap_or(size);
        let window = PageWindow::single(page, page_size, batch.items.len()).map_err(|_| {
            Error::InvalidJson(format!("server page size {page_size} is out of range"))
        })?;
        self.replace(window, batch.items);
        Ok(self)
    }

    /// Appends the page after the last loaded one, at the window's page
    /// size. Behaves like [`load`](Self::load) on an unloaded list.
    pub fn load_next(&mut self) -> Result<&mut Self> {
        let Some(window) = self.window else {
            return self.load();
        };

        let offset = window.next_offset()?;
        let mut batch: Batch<T> = self
            .source
            .fetch(&self.service, Some((offset, window.page_size)))?;
        let len = batch.items.len();
        self.items.append(&mut batch.items);
        self.window = Some(window.extended(len));
        self.log_window();
        Ok(self)
    }

    fn replace(&mut self, window: PageWindow, items: Vec<T>) {
        self.window = Some(window);
        self.items = items;
        self.log_window();
    }
}

impl<T: IdElement> PaginatedList<T> {
    /// Whether an element with this ID is among the loaded elements.
    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    /// Absolute index of the loaded element with this ID. IDs on pages not
    /// loaded yet are not found.
    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.position(|item| item.id() == id)
    }
}

impl<'a, T> IntoIterator for &'a PaginatedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
