use std::time::Duration;

use httpmock::prelude::*;
use imagegen::{
    GenerationOptions, GeneratorConfig, GeneratorError, ImageGenerator, ImageQuality, ImageSize,
};
use serde_json::json;

const API_PATH: &str = "/v1/images/generations";

fn generator(server: &MockServer, folder: &std::path::Path) -> ImageGenerator {
    let config = GeneratorConfig::new("test-key")
        .with_endpoint(server.url(API_PATH))
        .with_download_folder(folder)
        .with_delay(Duration::ZERO);
    ImageGenerator::new(config).unwrap()
}

fn is_timestamped(name: &str, suffix: &str) -> bool {
    let Some(stamp) = name.strip_suffix(suffix) else {
        return false;
    };
    let bytes = stamp.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'_'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || b.is_ascii_digit())
}

#[tokio::test]
async fn creates_missing_download_folder() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("nested").join("images");
    let server = MockServer::start_async().await;

    let generator = generator(&server, &folder);

    assert!(folder.is_dir());
    assert_eq!(generator.downloader().folder(), folder.as_path());
}

#[tokio::test]
async fn rejects_blank_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig::new("").with_download_folder(dir.path());

    assert!(matches!(
        ImageGenerator::new(config),
        Err(GeneratorError::Config(_))
    ));
}

#[tokio::test]
async fn sends_bearer_token_and_json_payload() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;

    let api = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(API_PATH)
                .header("Authorization", "Bearer test-key")
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "model": "grok-2-vision-1212",
                    "prompt": "a quiet harbour",
                    "n": 1,
                    "size": "1024x1792",
                    "quality": "low",
                    "style": "natural"
                }));
            then.status(200)
                .json_body(json!({ "data": [{ "url": "http://example/img.png" }] }));
        })
        .await;

    let generator = generator(&server, dir.path());
    let options = GenerationOptions::new()
        .with_size(ImageSize::Portrait1792)
        .with_quality(ImageQuality::Low);
    let response = generator.generate("a quiet harbour", &options).await.unwrap();

    api.assert_async().await;
    assert_eq!(response.first_url(), Some("http://example/img.png"));
}

#[tokio::test]
async fn downloads_first_image_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;

    let api = server
        .mock_async(|when, then| {
            when.method(POST).path(API_PATH);
            then.status(200).json_body(json!({
                "data": [
                    { "url": server.url("/first.png") },
                    { "url": server.url("/second.png") }
                ]
            }));
        })
        .await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET).path("/first.png");
            then.status(200).body(b"FIRST");
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET).path("/second.png");
            then.status(200).body(b"SECOND");
        })
        .await;

    let generator = generator(&server, dir.path());
    let path = generator
        .generate_and_download("two candidates", &GenerationOptions::new())
        .await
        .unwrap();

    api.assert_async().await;
    first.assert_hits_async(1).await;
    second.assert_hits_async(0).await;
    assert_eq!(std::fs::read(&path).unwrap(), b"FIRST");
}

#[tokio::test]
async fn saves_red_fox_with_timestamped_name() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path(API_PATH);
            then.status(200)
                .json_body(json!({ "data": [{ "url": server.url("/img.png") }] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/img.png");
            then.status(200)
                .header("content-type", "image/png")
                .body(b"PNGDATA");
        })
        .await;

    let generator = generator(&server, dir.path());
    let path = generator
        .generate_and_download("A red fox in snow", &GenerationOptions::new())
        .await
        .unwrap();

    assert_eq!(path.parent(), Some(dir.path()));
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(is_timestamped(name, "_A_red_fox_in_snow.png"), "{name}");
    assert_eq!(std::fs::read(&path).unwrap(), b"PNGDATA");
}

#[tokio::test]
async fn repeated_prompt_does_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/img.png");
            then.status(200).body(b"PNGDATA");
        })
        .await;

    let generator = generator(&server, dir.path());
    let url = server.url("/img.png");
    let first = generator.download(&url, "same prompt").await.unwrap();
    let second = generator.download(&url, "same prompt").await.unwrap();

    assert_ne!(first, second);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn empty_image_list_skips_download() {
    let dir = tempfile::tempdir().unwrap();

    for body in [
        json!({ "data": [] }),
        json!({ "created": 1 }),
        json!({ "data": null }),
    ] {
        let server = MockServer::start_async().await;
        let api = server
            .mock_async(|when, then| {
                when.method(POST).path(API_PATH);
                then.status(200).json_body(body.clone());
            })
            .await;
        let image = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).body(b"PNGDATA");
            })
            .await;

        let generator = generator(&server, dir.path());
        let err = generator
            .try_generate_and_download("nothing comes back", &GenerationOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::NoImageUrl));
        assert_eq!(err.to_string(), "No image URL found in response");

        assert!(generator
            .generate_and_download("nothing comes back", &GenerationOptions::new())
            .await
            .is_none());

        api.assert_hits_async(2).await;
        image.assert_hits_async(0).await;
    }

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn error_status_keeps_response_text() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path(API_PATH);
            then.status(429).body("rate limit exceeded");
        })
        .await;

    let generator = generator(&server, dir.path());
    let err = generator
        .try_generate("a cat", &GenerationOptions::new())
        .await
        .unwrap_err();

    match &err {
        GeneratorError::HttpStatus { status, .. } => assert_eq!(status.as_u16(), 429),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.response_body(), Some("rate limit exceeded"));
    assert!(generator
        .generate("a cat", &GenerationOptions::new())
        .await
        .is_none());
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path(API_PATH);
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let generator = generator(&server, dir.path());
    let err = generator
        .try_generate("a cat", &GenerationOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GeneratorError::MalformedResponse(_)));
}

#[tokio::test]
async fn network_failure_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig::new("test-key")
        .with_endpoint("http://127.0.0.1:1/v1/images/generations")
        .with_download_folder(dir.path());
    let generator = ImageGenerator::new(config).unwrap();

    let err = generator
        .try_generate_and_download("a cat", &GenerationOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Network(_)));

    assert!(generator
        .generate_and_download("a cat", &GenerationOptions::new())
        .await
        .is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn failed_image_fetch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/gone.png");
            then.status(404).body("expired");
        })
        .await;

    let generator = generator(&server, dir.path());
    let err = generator
        .try_download(&server.url("/gone.png"), "a cat")
        .await
        .unwrap_err();

    assert!(matches!(err, GeneratorError::HttpStatus { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn unwritable_folder_is_a_filesystem_error() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/img.png");
            then.status(200).body(b"PNGDATA");
        })
        .await;

    let generator = generator(&server, dir.path());
    std::fs::remove_dir(dir.path()).unwrap();

    let err = generator
        .try_download(&server.url("/img.png"), "a cat")
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Filesystem { .. }));
}
