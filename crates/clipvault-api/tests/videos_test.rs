//! Video API integration tests.
//!
//! Run with: `cargo test -p clipvault-api --test videos_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use clipvault_core::Locator;
use helpers::auth::{bearer, token_for};
use helpers::fixtures::{video_record, VIDEO_BYTES};
use helpers::{api_path, setup_test_app, setup_test_app_with, TestOptions, TEST_TTL_SECS};
use uuid::Uuid;

fn video_form(mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from_static(VIDEO_BYTES))
        .file_name("clip.mp4")
        .mime_type(mime_type);
    MultipartForm::new()
        .add_text("title", "ignored")
        .add_part("video", part)
}

#[tokio::test]
async fn test_upload_video_returns_signed_url() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let record = video_record(owner, None);
    app.records.insert(record.clone());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", record.id)))
        .add_header("Authorization", bearer(&token_for(owner)))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], record.id.to_string());
    let url = body["video_url"].as_str().expect("Expected signed video_url");
    assert!(url.starts_with("https://tubes.example/landscape/"), "{url}");
    assert!(url.ends_with(&format!("X-Amz-Expires={}", TEST_TTL_SECS)));

    // The record stores the unsigned locator, never the URL.
    let stored = app.records.get(record.id).unwrap().video_url.unwrap();
    let locator = Locator::decode(Some(&stored)).unwrap();
    assert_eq!(locator.bucket, "tubes");
    assert!(url.contains(&locator.key));
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_upload_by_non_owner_is_forbidden() {
    let app = setup_test_app().await;
    let record = video_record(Uuid::new_v4(), None);
    app.records.insert(record.clone());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", record.id)))
        .add_header("Authorization", bearer(&token_for(Uuid::new_v4())))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert!(app.records.get(record.id).unwrap().video_url.is_none());
    assert!(app.storage.objects().is_empty());
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_upload_wrong_content_type_is_rejected() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let record = video_record(owner, None);
    app.records.insert(record.clone());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", record.id)))
        .add_header("Authorization", bearer(&token_for(owner)))
        .multipart(video_form("video/quicktime"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.records.get(record.id).unwrap().video_url.is_none());
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_upload_without_video_field_is_rejected() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let record = video_record(owner, None);
    app.records.insert(record.clone());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", record.id)))
        .add_header("Authorization", bearer(&token_for(owner)))
        .multipart(MultipartForm::new().add_text("title", "no file here"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_requires_token() {
    let app = setup_test_app().await;
    let record = video_record(Uuid::new_v4(), None);
    app.records.insert(record.clone());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", record.id)))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_to_unknown_or_malformed_id() {
    let app = setup_test_app().await;
    let token = token_for(Uuid::new_v4());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", Uuid::new_v4())))
        .add_header("Authorization", bearer(&token))
        .multipart(video_form("video/mp4"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .client()
        .post(&api_path("/videos/not-a-uuid/upload"))
        .add_header("Authorization", bearer(&token))
        .multipart(video_form("video/mp4"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_cap_is_payload_too_large() {
    let app = setup_test_app_with(TestOptions {
        max_video_size_bytes: 8,
        ..Default::default()
    })
    .await;
    let owner = Uuid::new_v4();
    let record = video_record(owner, None);
    app.records.insert(record.clone());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", record.id)))
        .add_header("Authorization", bearer(&token_for(owner)))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_processing_failure_is_server_error() {
    let app = setup_test_app_with(TestOptions {
        remux_fails: true,
        ..Default::default()
    })
    .await;
    let owner = Uuid::new_v4();
    let record = video_record(owner, None);
    app.records.insert(record.clone());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", record.id)))
        .add_header("Authorization", bearer(&token_for(owner)))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Couldn't process video");
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_get_video_signs_locator_per_read() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let record = video_record(owner, Some("archive,portrait/abc123"));
    app.records.insert(record.clone());

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", record.id)))
        .add_header("Authorization", bearer(&token_for(owner)))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["video_url"],
        "https://archive.example/portrait/abc123?X-Amz-Expires=300"
    );
    assert_eq!(
        app.records.get(record.id).unwrap().video_url.as_deref(),
        Some("archive,portrait/abc123")
    );
}

#[tokio::test]
async fn test_malformed_locator_reads_as_no_video() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();

    for stored in ["", "no-separator", "a,b,c", ",key", "bucket,"] {
        let record = video_record(owner, Some(stored));
        app.records.insert(record.clone());

        let response = app
            .client()
            .get(&api_path(&format!("/videos/{}", record.id)))
            .add_header("Authorization", bearer(&token_for(owner)))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert!(body["video_url"].is_null(), "{stored:?}");
    }
}

#[tokio::test]
async fn test_get_video_of_other_user_is_forbidden() {
    let app = setup_test_app().await;
    let record = video_record(Uuid::new_v4(), Some("tubes,landscape/abc"));
    app.records.insert(record.clone());

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", record.id)))
        .add_header("Authorization", bearer(&token_for(Uuid::new_v4())))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_videos_returns_only_callers_records() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    app.records
        .insert(video_record(owner, Some("tubes,landscape/one")));
    app.records.insert(video_record(owner, None));
    app.records
        .insert(video_record(Uuid::new_v4(), Some("tubes,portrait/other")));

    let response = app
        .client()
        .get(&api_path("/videos"))
        .add_header("Authorization", bearer(&token_for(owner)))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Vec<serde_json::Value> = response.json();
    assert_eq!(body.len(), 2);
    assert!(body.iter().all(|v| v["user_id"] == owner.to_string()));
    let signed: Vec<_> = body.iter().filter_map(|v| v["video_url"].as_str()).collect();
    assert_eq!(signed, vec!["https://tubes.example/landscape/one?X-Amz-Expires=300"]);
}

#[tokio::test]
async fn test_list_videos_requires_token() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/videos")).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_backend_round_trip() {
    let app = setup_test_app_with(TestOptions {
        local_storage: true,
        ..Default::default()
    })
    .await;
    let owner = Uuid::new_v4();
    let record = video_record(owner, None);
    app.records.insert(record.clone());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", record.id)))
        .add_header("Authorization", bearer(&token_for(owner)))
        .multipart(video_form("video/mp4"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let stored = app.records.get(record.id).unwrap().video_url.unwrap();
    assert!(stored.starts_with("local,landscape/"));

    let body: serde_json::Value = response.json();
    let url = body["video_url"].as_str().unwrap();
    let (path, query) = url
        .strip_prefix("http://localhost")
        .unwrap()
        .split_once('?')
        .unwrap();
    let param = |name: &str| {
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix(&format!("{name}=")))
            .unwrap()
            .to_string()
    };

    let download = app
        .client()
        .get(path)
        .add_query_param("expires", param("expires"))
        .add_query_param("signature", param("signature"))
        .await;
    assert_eq!(download.status_code(), StatusCode::OK);
    assert_eq!(download.as_bytes().as_ref(), VIDEO_BYTES);

    let tampered = app
        .client()
        .get(path)
        .add_query_param("expires", param("expires"))
        .add_query_param("signature", "00".repeat(32))
        .await;
    assert_eq!(tampered.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_media_route_disabled_without_local_backend() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/media/tubes/landscape/abc")
        .add_query_param("expires", "4102444800")
        .add_query_param("signature", "00")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;

    let live = app.client().get("/health").await;
    assert_eq!(live.status_code(), StatusCode::OK);
    assert_eq!(live.json::<serde_json::Value>()["status"], "alive");

    let ready = app.client().get("/health/ready").await;
    assert_eq!(ready.status_code(), StatusCode::OK);
    assert_eq!(ready.json::<serde_json::Value>()["database"], "ready");
}
