//! Paginated listing.
//!
//! List RPCs return one page at a time plus an opaque `next_page_token`.
//! [`ItemPager`] hides the tokens and hands out items in server order,
//! fetching the next page only once the current one is used up.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::stream::{self, Stream};
use futures_util::TryStreamExt;
use tracing::trace;

use crate::errors::Result;

/// A list request that can be pointed at a page.
pub trait PageRequest: Clone + Send + 'static {
    /// An empty token selects the first page.
    fn set_page_token(&mut self, token: String);
}

/// One page of a list response.
pub trait PageResponse {
    type Item;

    /// Empty when this is the last page.
    fn next_page_token(&self) -> &str;

    fn into_items(self) -> Vec<Self::Item>;
}

type FetchPage<T> = Box<dyn FnMut(String) -> BoxFuture<'static, Result<(Vec<T>, String)>> + Send>;

enum Cursor {
    First,
    Next(String),
    Done,
}

/// A lazy sequence of items spread over several pages.
///
/// A failed page fetch is yielded once, after which the pager is exhausted;
/// items yielded before the failure stay valid.
pub struct ItemPager<T> {
    fetch: FetchPage<T>,
    buffer: VecDeque<T>,
    cursor: Cursor,
    pages_fetched: usize,
}

impl<T: Send + 'static> ItemPager<T> {
    /// Page over `request`, calling `fetch` once per page.
    pub fn new<Req, Resp, F, Fut>(request: Req, mut fetch: F) -> Self
    where
        Req: PageRequest,
        Resp: PageResponse<Item = T>,
        F: FnMut(Req) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Resp>> + Send + 'static,
    {
        let fetch_page = move |token: String| -> BoxFuture<'static, Result<(Vec<T>, String)>> {
            let mut request = request.clone();
            request.set_page_token(token);
            let response = fetch(request);
            Box::pin(async move {
                let response = response.await?;
                let next = response.next_page_token().to_string();
                Ok((response.into_items(), next))
            })
        };

        Self {
            fetch: Box::new(fetch_page),
            buffer: VecDeque::new(),
            cursor: Cursor::First,
            pages_fetched: 0,
        }
    }

    /// The next item, fetching a new page when the current one is exhausted.
    pub async fn next(&mut self) -> Option<Result<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            match self.fetch_next().await? {
                Ok(items) => self.buffer.extend(items),
                Err(err) => return Some(Err(err)),
            }
        }
    }

    /// The rest of the current page, or the next page if nothing is buffered.
    pub async fn next_page(&mut self) -> Option<Result<Vec<T>>> {
        if !self.buffer.is_empty() {
            return Some(Ok(self.buffer.drain(..).collect()));
        }
        self.fetch_next().await
    }

    /// Number of pages requested so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Adapt into a [`Stream`] of items.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> + Send {
        stream::unfold(self, |mut pager| async move {
            let item = pager.next().await?;
            Some((item, pager))
        })
    }

    /// Drain every page into a `Vec`, stopping at the first failure.
    pub async fn try_collect(self) -> Result<Vec<T>> {
        self.into_stream().try_collect().await
    }

    async fn fetch_next(&mut self) -> Option<Result<Vec<T>>> {
        let token = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return None,
            Cursor::First => String::new(),
            Cursor::Next(token) => token,
        };

        trace!(page = self.pages_fetched + 1, "fetching page");
        self.pages_fetched += 1;
        match (self.fetch)(token).await {
            Ok((items, next)) => {
                if !next.is_empty() {
                    self.cursor = Cursor::Next(next);
                }
                Some(Ok(items))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

impl<T> fmt::Debug for ItemPager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemPager")
            .field("buffered", &self.buffer.len())
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}
