use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_merge_files_in_request_order(ctx: &TestContext) {
    ctx.put_output("verse.mp3", b"VERSE").await;
    tokio::fs::write(ctx.segments_dir().join("intro_s1.mp3"), b"INTRO")
        .await
        .unwrap();

    let response = ctx
        .client
        .post(
            "/api/merge",
            &json!({ "files": ["intro_s1.mp3", "verse.mp3"], "output": "joined.mp3", "crossfade": 0 }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json_body();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Merged 2 files");
    assert_eq!(body["size"], 10);
    assert!(body["output"].as_str().unwrap().ends_with("joined.mp3"));
    assert!((body["duration"].as_f64().unwrap() - 0.010).abs() < 1e-9);

    let merged = tokio::fs::read(ctx.output_dir().join("joined.mp3"))
        .await
        .unwrap();
    assert_eq!(merged, b"INTROVERSE");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_bare_file_list_with_query_options(ctx: &TestContext) {
    ctx.put_output("verse.mp3", b"VERSE").await;
    tokio::fs::write(ctx.segments_dir().join("intro_s1.mp3"), b"INTRO")
        .await
        .unwrap();

    let response = ctx
        .client
        .post(
            "/api/merge?output=joined.mp3&crossfade=0",
            &json!(["intro_s1.mp3", "verse.mp3"]),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json_body();
    assert_eq!(body["message"], "Merged 2 files");
    assert!(body["output"].as_str().unwrap().ends_with("joined.mp3"));

    let merged = tokio::fs::read(ctx.output_dir().join("joined.mp3"))
        .await
        .unwrap();
    assert_eq!(merged, b"INTROVERSE");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_default_output_name_and_clamp_crossfade(ctx: &TestContext) {
    ctx.put_output("a.mp3", &[1u8; 40]).await;
    ctx.put_output("b.mp3", &[2u8; 30]).await;

    let response = ctx
        .client
        .post("/api/merge", &json!({ "files": ["a.mp3", "b.mp3"] }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json_body();
    assert!(body["output"].as_str().unwrap().ends_with("final.mp3"));
    // 0.5s requested, clamped to the 30ms second input
    assert!((body["duration"].as_f64().unwrap() - 0.040).abs() < 1e-9);
    assert!(ctx.output_dir().join("final.mp3").exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_file_list(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/merge", &json!({ "files": [] }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("No files provided");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_name_missing_inputs_and_write_nothing(ctx: &TestContext) {
    ctx.put_output("a.mp3", b"AAAA").await;

    let response = ctx
        .client
        .post(
            "/api/merge",
            &json!({ "files": ["a.mp3", "ghost.mp3"], "output": "out.mp3" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("ghost.mp3");
    assert!(!ctx.output_dir().join("out.mp3").exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsafe_file_names(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/merge", &json!({ "files": ["../final.json"] }))
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.put_output("a.mp3", b"AAAA").await;
    let response = ctx
        .client
        .post(
            "/api/merge",
            &json!({ "files": ["a.mp3"], "output": "../escape.mp3" }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
}
