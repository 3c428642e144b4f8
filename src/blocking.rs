//! Blocking calling convention.
//!
//! [`BlockingClient`] drives the async [`Client`] on a private
//! current-thread runtime. Every blocking call is the async call run to
//! completion, so retries, deadlines and cancellation behave identically.
//!
//! ```no_run
//! use video_stitcher::blocking::BlockingClient;
//! use video_stitcher::{resource, Client, GetSlateRequest};
//!
//! # fn example() -> video_stitcher::Result<()> {
//! let stitcher = BlockingClient::new(Client::new("ya29.token")?)?;
//!
//! let name = resource::slate_path("my-project", "us-central1", "my-slate");
//! let slate = stitcher.wait(stitcher.client().get_slate(GetSlateRequest::new(name), None))?;
//! println!("{}", slate.uri);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::Future;

use tokio::runtime::{Builder, Runtime};

use crate::client::Client;
use crate::errors::Result;
use crate::pager::ItemPager;

/// A [`Client`] paired with the runtime that drives it.
///
/// Must not be used from within an async context: blocking on the private
/// runtime from inside another runtime panics.
pub struct BlockingClient {
    client: Client,
    runtime: Runtime,
}

impl BlockingClient {
    pub fn new(client: Client) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { client, runtime })
    }

    /// The async client; pass its futures to [`wait`](Self::wait).
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Block the current thread until `future` completes.
    pub fn wait<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Iterate over a pager, blocking at each page boundary.
    pub fn iter<T: Send + 'static>(&self, pager: ItemPager<T>) -> BlockingIter<'_, T> {
        BlockingIter {
            runtime: &self.runtime,
            pager,
        }
    }
}

impl fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingClient")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

/// Blocking iterator returned by [`BlockingClient::iter`].
pub struct BlockingIter<'a, T> {
    runtime: &'a Runtime,
    pager: ItemPager<T>,
}

impl<T: Send + 'static> Iterator for BlockingIter<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime.block_on(self.pager.next())
    }
}
