// Ordered pages plus a bounded cursor.

use std::slice::Chunks;

use super::affordance::Affordances;
use super::error::PagerError;
use super::page::Page;

/// A non-empty, ordered list of pages and the index of the one on display.
///
/// Invariant: `0 <= cursor < pages.len()` and `pages` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSet<P = Page> {
    pages: Vec<P>,
    cursor: usize,
}

impl<P> PageSet<P> {
    pub fn new(pages: Vec<P>) -> Result<Self, PagerError> {
        if pages.is_empty() {
            return Err(PagerError::invalid("a page set needs at least one page"));
        }
        Ok(Self { pages, cursor: 0 })
    }

    pub fn current(&self) -> &P {
        &self.pages[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn size(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[P] {
        &self.pages
    }

    /// Move one page forward. Fails at the last page.
    pub fn advance(&mut self) -> Result<(), PagerError> {
        self.jump_to(self.cursor + 1)
    }

    /// Move one page back. Fails at the first page.
    pub fn retreat(&mut self) -> Result<(), PagerError> {
        let index = self.cursor.checked_sub(1).ok_or(PagerError::OutOfRange {
            index: 0,
            len: self.pages.len(),
        })?;
        self.jump_to(index)
    }

    pub fn jump_to_first(&mut self) {
        self.cursor = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.cursor = self.pages.len() - 1;
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), PagerError> {
        if index >= self.pages.len() {
            return Err(PagerError::OutOfRange {
                index,
                len: self.pages.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    pub fn affordances(&self) -> Affordances {
        Affordances::compute(self.cursor, self.pages.len())
    }
}

/// Split `items` into contiguous slices of at most `max_per_page` items.
///
/// The returned iterator is lazy and can be cloned to restart it. The last
/// slice may be shorter than the rest.
pub fn chunk<T>(items: &[T], max_per_page: usize) -> Result<Chunks<'_, T>, PagerError> {
    if max_per_page == 0 {
        return Err(PagerError::invalid("max_per_page must be positive"));
    }
    Ok(items.chunks(max_per_page))
}
