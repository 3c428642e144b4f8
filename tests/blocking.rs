mod common;

use std::time::Duration;

use common::*;
use video_stitcher::blocking::BlockingClient;
use video_stitcher::*;

#[test]
fn blocking_calls_share_the_async_path() {
    let stub = StubTransport::new();
    stub.script_get_slate(vec![Err(unavailable("warming up"))]);
    let stitcher = BlockingClient::new(client(&stub)).unwrap();

    let name = resource::slate_path("my-project", "us-central1", "s1");
    let options = CallOptions::new().retry(
        RetryPolicy::default().with_initial_delay(Duration::from_millis(10)),
    );
    let slate = stitcher
        .wait(stitcher.client().get_slate(GetSlateRequest::new(name.clone()), Some(options)))
        .unwrap();

    assert_eq!(slate.name, name);
    assert_eq!(stub.count(Method::GetSlate), 2);
}

#[test]
fn blocking_iteration_crosses_pages() {
    let stub = StubTransport::new();
    stub.add_slate_page("", &["a"], "next");
    stub.add_slate_page("next", &["b", "c"], "");
    let stitcher = BlockingClient::new(client(&stub)).unwrap();

    let pager = stitcher
        .client()
        .list_slates(ListSlatesRequest::new(PARENT), None)
        .unwrap();
    let ids: Vec<String> = stitcher
        .iter(pager)
        .map(|slate| slate.unwrap().name.rsplit('/').next().unwrap().to_string())
        .collect();

    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(stub.count(Method::ListSlates), 2);
}

#[test]
fn blocking_operation_wait() {
    let stub = StubTransport::new();
    stub.script_operations(vec![succeeded_operation("create-s1", &slate("s1"))]);
    let stitcher = BlockingClient::new(client(&stub)).unwrap();

    let request = CreateSlateRequest {
        parent: PARENT.into(),
        slate_id: "s1".into(),
        slate: Slate::new("https://storage.googleapis.com/bucket/s1.mp4"),
    };
    let created = stitcher
        .wait(async {
            let mut operation = stitcher.client().create_slate(request, None).await?;
            operation
                .wait(Some(PollOptions {
                    poll_interval: Duration::from_millis(5),
                    ..Default::default()
                }))
                .await
        })
        .unwrap();

    assert_eq!(created, slate("s1"));
}
