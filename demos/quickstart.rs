//! Quick-start tour of the Video Stitcher Rust client.
//!
//! Run with:
//!   VIDEO_STITCHER_ACCESS_TOKEN=$(gcloud auth print-access-token) \
//!   PROJECT_ID=my-project RUST_LOG=video_stitcher=debug \
//!   cargo run --example quickstart
//!
//! Optional: LOCATION (defaults to us-central1), VOD_SESSION_ID and
//! AD_TAG_DETAIL_ID to fetch an ad tag detail, SLATE_ID to delete a slate.

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use video_stitcher::{
    resource, CdnKey, ClientBuilder, CreateCdnKeyRequest, DeleteSlateRequest,
    GetVodAdTagDetailRequest, GoogleCdnKey, ListSlatesRequest, Operation, PollOptions,
};

#[tokio::main]
async fn main() -> video_stitcher::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let project = std::env::var("PROJECT_ID").unwrap_or_else(|_| "my-project".into());
    let location = std::env::var("LOCATION").unwrap_or_else(|_| "us-central1".into());
    let parent = resource::location_path(&project, &location);

    // -----------------------------------------------------------------------
    // 1. Create a client (reads VIDEO_STITCHER_ACCESS_TOKEN from environment)
    // -----------------------------------------------------------------------
    let client = ClientBuilder::new().build()?;

    // -----------------------------------------------------------------------
    // 2. Create a Cloud CDN key and wait for the operation
    // -----------------------------------------------------------------------
    let mut cdn_key = CdnKey::new("cdn.example.com");
    cdn_key.set_google_cdn_key(GoogleCdnKey {
        private_key: b"my-private-key".to_vec(),
        key_name: "my-key".into(),
    });

    let mut operation = client
        .create_cdn_key(
            CreateCdnKeyRequest {
                parent: parent.clone(),
                cdn_key_id: "quickstart-key".into(),
                cdn_key,
            },
            None,
        )
        .await?;
    println!("Started {}", operation.name());

    let created = operation
        .wait(Some(PollOptions {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
            on_progress: Some(Box::new(|op: &Operation| println!("  state: {:?}", op.state()))),
        }))
        .await?;
    println!("Created CDN key: {}", created.name);
    println!();

    // -----------------------------------------------------------------------
    // 3. List slates, page by page behind the scenes
    // -----------------------------------------------------------------------
    let mut slates = client.list_slates(ListSlatesRequest::new(parent.clone()), None)?;
    while let Some(slate) = slates.next().await {
        let slate = slate?;
        println!("  {} | {}", slate.name, slate.uri);
    }
    println!();

    // -----------------------------------------------------------------------
    // 4. Inspect the ad requests made for a VOD session
    // -----------------------------------------------------------------------
    if let (Ok(session), Ok(detail)) = (
        std::env::var("VOD_SESSION_ID"),
        std::env::var("AD_TAG_DETAIL_ID"),
    ) {
        let name = resource::vod_ad_tag_detail_path(&project, &location, &session, &detail);
        let detail = client
            .get_vod_ad_tag_detail(GetVodAdTagDetailRequest::new(name), None)
            .await?;
        for request in &detail.ad_requests {
            println!("  ad request: {}", request.uri);
        }
        println!();
    }

    // -----------------------------------------------------------------------
    // 5. Delete a slate
    // -----------------------------------------------------------------------
    if let Ok(slate_id) = std::env::var("SLATE_ID") {
        let name = resource::slate_path(&project, &location, &slate_id);
        client
            .delete_slate(DeleteSlateRequest::new(name), None)
            .await?
            .wait(None)
            .await?;
        println!("Deleted slate {slate_id}");
    }

    client.close().await;
    Ok(())
}
