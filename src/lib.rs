//! # Video Stitcher client for Rust
//!
//! Typed client for the Video Stitcher API: register CDN keys and slates,
//! create VOD and live ad-stitching sessions, and inspect the ad requests and
//! stitching decisions made for them.
//!
//! Every RPC goes through the same path: resource names are checked, the
//! call is wrapped in the method's timeout and retry policy, then handed to
//! a [`VideoStitcherTransport`]. Mutations return an [`OperationHandle`] to
//! poll; listings return a lazy [`ItemPager`].
//!
//! ## Quick start
//!
//! ```no_run
//! use std::time::Duration;
//! use video_stitcher::{resource, CdnKey, Client, CreateCdnKeyRequest, GoogleCdnKey, PollOptions};
//!
//! #[tokio::main]
//! async fn main() -> video_stitcher::Result<()> {
//!     let client = Client::new("ya29.your-access-token")?;
//!
//!     let mut cdn_key = CdnKey::new("cdn.example.com");
//!     cdn_key.set_google_cdn_key(GoogleCdnKey {
//!         private_key: b"secret".to_vec(),
//!         key_name: "my-key".into(),
//!     });
//!
//!     let request = CreateCdnKeyRequest {
//!         parent: resource::location_path("my-project", "us-central1"),
//!         cdn_key_id: "my-cdn-key".into(),
//!         cdn_key,
//!     };
//!
//!     // Start the operation, then wait up to ten minutes for it.
//!     let mut operation = client.create_cdn_key(request, None).await?;
//!     let created = operation
//!         .wait(Some(PollOptions {
//!             timeout: Duration::from_secs(600),
//!             ..Default::default()
//!         }))
//!         .await?;
//!     println!("created {}", created.name);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Builder pattern
//!
//! ```no_run
//! use std::time::Duration;
//! use video_stitcher::{ClientBuilder, Method, MethodConfig, RetryPolicy};
//!
//! # fn example() -> video_stitcher::Result<()> {
//! let client = ClientBuilder::new()
//!     .credentials_file("/etc/stitcher/token.json")
//!     .host("videostitcher.googleapis.com")
//!     .timeout(Duration::from_secs(30))
//!     .method_config(
//!         Method::CreateVodSession,
//!         MethodConfig {
//!             timeout: Duration::from_secs(10),
//!             retry: Some(RetryPolicy::none()),
//!         },
//!     )
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod blocking;
mod client;
mod errors;
mod models;
mod operation;
mod options;
mod pager;
pub mod resource;
mod retry;
mod transport;

pub use auth::{ClientInfo, StaticToken, TokenProvider};
pub use client::{Client, ClientBuilder};
pub use errors::{Code, Result, Status, StitcherError};
pub use models::*;
pub use operation::{
    Empty, Operation, OperationHandle, OperationMetadata, OperationResult, OperationState,
    PollOptions,
};
pub use options::{CallContext, CallOptions};
pub use pager::{ItemPager, PageRequest, PageResponse};
pub use retry::{MethodConfig, RetryPolicy};
pub use transport::{Method, RestTransport, VideoStitcherTransport};
