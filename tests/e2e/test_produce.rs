use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_produce_final_track_in_plan_order(ctx: &TestContext) {
    ctx.plans.write_song(false).await;

    let response = ctx.client.post_empty("/api/produce").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json_body();
    assert_eq!(body["state"], "done");
    assert_eq!(body["project"], "Test Song");
    assert_eq!(body["parts_succeeded"], 2);
    assert_eq!(body["parts_total"], 2);
    assert_eq!(body["normalized"], false);
    assert!(body["final_output"].as_str().unwrap().ends_with("final.mp3"));
    assert_eq!(body["parts"][0]["part_id"], "intro");
    assert_eq!(body["parts"][0]["status"], "merged");
    assert_eq!(body["parts"][0]["segments_succeeded"], 2);

    let intro = tokio::fs::read(ctx.output_dir().join("intro.mp3"))
        .await
        .unwrap();
    assert_eq!(intro, b"[hello][world]");
    let fin = tokio::fs::read(ctx.output_dir().join("final.mp3"))
        .await
        .unwrap();
    assert_eq!(fin, b"[hello][world][again]");

    let primary = ctx.tts.requests_to("primary");
    assert_eq!(primary.len(), 3);
    assert!(ctx.tts.requests_to("fallback").is_empty());
    let hello = primary
        .iter()
        .find(|r| r.body["text"] == "hello")
        .expect("hello was synthesized");
    assert_eq!(hello.body["lang"], "en-GB");
    assert_eq!(hello.body["rate"], "-25%");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_normalized_track_when_enabled(ctx: &TestContext) {
    ctx.plans.write_song(true).await;

    let response = ctx.client.post_empty("/api/produce").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json_body();
    assert_eq!(body["normalized"], true);
    assert!(body["final_output"]
        .as_str()
        .unwrap()
        .ends_with("final_normalized.mp3"));

    let served = ctx
        .client
        .get("/api/output/final_normalized.mp3")
        .await
        .unwrap();
    served.assert_status(StatusCode::OK);
    assert_eq!(served.body_bytes, b"[hello][world][again]");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fall_back_when_primary_endpoint_is_down(ctx: &TestContext) {
    ctx.plans.write_song(false).await;
    ctx.tts.take_primary_down();

    let response = ctx.client.post_empty("/api/produce").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json_body()["state"], "done");

    // Two primary attempts per segment before switching
    assert_eq!(ctx.tts.requests_to("primary").len(), 6);
    let fallback = ctx.tts.requests_to("fallback");
    assert_eq!(fallback.len(), 3);
    assert!(fallback.iter().all(|r| r.body.get("input").is_some()));

    let fin = tokio::fs::read(ctx.output_dir().join("final.mp3"))
        .await
        .unwrap();
    assert_eq!(fin, b"[hello][world][again]");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_parts_whose_segments_all_fail(ctx: &TestContext) {
    let parts = json!([
        {
            "id": "broken", "name": "Broken", "outputFile": "broken.mp3",
            "segments": [ { "id": "s1", "text": "FAIL here" } ]
        },
        {
            "id": "outro", "name": "Outro", "outputFile": "outro.mp3",
            "segments": [
                { "id": "s1", "text": "bye" },
                { "id": "s2", "text": "FAIL too" },
                { "id": "s3", "text": "now" }
            ]
        }
    ]);
    ctx.plans.write(&ctx.plans.plan(parts, false)).await;

    let response = ctx.client.post_empty("/api/produce").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json_body();
    assert_eq!(body["parts_succeeded"], 1);
    assert_eq!(body["parts"][0]["status"], "skipped");
    assert_eq!(body["parts"][1]["segments_succeeded"], 2);
    assert_eq!(body["parts"][1]["segments_total"], 3);
    assert!(!ctx.output_dir().join("broken.mp3").exists());

    let fin = tokio::fs::read(ctx.output_dir().join("final.mp3"))
        .await
        .unwrap();
    assert_eq!(fin, b"[bye][now]");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fail_when_no_part_is_produced(ctx: &TestContext) {
    let parts = json!([
        {
            "id": "broken", "name": "Broken", "outputFile": "broken.mp3",
            "segments": [ { "id": "s1", "text": "FAIL always" } ]
        }
    ]);
    ctx.plans.write(&ctx.plans.plan(parts, false)).await;

    let response = ctx.client.post_empty("/api/produce").await.unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("no parts generated successfully");
    assert!(!ctx.output_dir().join("final.mp3").exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_journal_run_status(ctx: &TestContext) {
    ctx.plans.write_song(false).await;

    ctx.client
        .post_empty("/api/produce")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let log = ctx.client.get("/api/status/log").await.unwrap();
    let body = log.json_body();
    let statuses: Vec<&str> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["processing", "completed"]);
    assert!(body["entries"][1]["output_file"]
        .as_str()
        .unwrap()
        .ends_with("final.mp3"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_without_plan(ctx: &TestContext) {
    let response = ctx.client.post_empty("/api/produce").await.unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Config file not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_invalid_plan_before_synthesis(ctx: &TestContext) {
    let mut plan = ctx.plans.plan(ctx.plans.song_parts(), false);
    plan["ttsApiConfiguration"]["maxRetries"] = json!(0);
    ctx.plans.write(&plan).await;

    let response = ctx.client.post_empty("/api/produce").await.unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("maxRetries");
    assert!(ctx.tts.requests_to("primary").is_empty());
}
