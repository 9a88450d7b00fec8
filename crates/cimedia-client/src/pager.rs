//! Windowed iteration over a whole workspace
//!
//! The pager asks for small fixed windows starting at offset 0 and stops at
//! the first empty page. There is no snapshot: if the workspace changes
//! between two fetches, a record at the shifted boundary can be skipped or
//! yielded twice.

use crate::{directory::AssetDirectory, types::AssetRecord, ClientError, Result};
use futures::{stream, Stream};
use std::collections::VecDeque;

/// Window used when walking a workspace. Kept small so windowing bugs show
/// up quickly.
pub const PAGE_WINDOW: u32 = 5;

/// Lazy, finite, non-restartable walk over every record in the workspace
#[derive(Debug)]
pub struct WorkspacePager {
    directory: AssetDirectory,
    window: u32,
    offset: u64,
    buffer: VecDeque<AssetRecord>,
    exhausted: bool,
    pages_fetched: usize,
}

impl WorkspacePager {
    pub fn new(directory: AssetDirectory) -> Self {
        Self::with_window(directory, PAGE_WINDOW)
    }

    /// Pager with a custom window; a zero window is bumped to one
    pub fn with_window(directory: AssetDirectory, window: u32) -> Self {
        Self {
            directory,
            window: window.max(1),
            offset: 0,
            buffer: VecDeque::new(),
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Next record, fetching another page when the current one is used up.
    ///
    /// Returns `Ok(None)` once an empty page has been seen. After an error
    /// the pager is finished as well.
    pub async fn next(&mut self) -> Result<Option<AssetRecord>> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(Some(record));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = match self.directory.list_page(self.window, self.offset).await {
                Ok(page) => page,
                Err(e) => {
                    self.exhausted = true;
                    return Err(e);
                }
            };
            self.pages_fetched += 1;

            if page.is_empty() {
                self.exhausted = true;
                return Ok(None);
            }
            self.offset += u64::from(self.window);
            self.buffer.extend(page);
        }
    }

    /// Whether another call to [`next`](Self::next) may yield a record
    pub fn has_next(&self) -> bool {
        !self.buffer.is_empty() || !self.exhausted
    }

    /// Pages requested so far, including the final empty one
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Turn the pager into a stream for use with `futures` combinators
    pub fn into_stream(self) -> impl Stream<Item = Result<AssetRecord>> {
        stream::try_unfold(self, |mut pager| async move {
            let next = pager.next().await?;
            Ok::<_, ClientError>(next.map(|record| (record, pager)))
        })
    }
}
