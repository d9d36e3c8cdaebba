//! Full pipeline: file key store, HTTP synthesis against a mock service,
//! WAV encoding, playback and export.

mod common;

use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use common::MockBackend;
use serde_json::json;
use studio::{
    FileKeyStore, GenerationOutcome, GenerationRequest, KeyStore, PlaybackState,
    SessionCoordinator, StudioConfig, StudioError,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

struct Pipeline {
    coordinator: Arc<SessionCoordinator>,
    backend: Arc<MockBackend>,
    workdir: tempfile::TempDir,
}

fn pipeline(server: &MockServer) -> Pipeline {
    studio::telemetry::init_tracing();

    let workdir = tempfile::tempdir().unwrap();
    let vars = [
        ("GEMINI_API_BASE", server.uri()),
        ("GEMINI_TTS_MODEL", "test-model".to_string()),
        ("SYNTHESIS_TIMEOUT_SECS", "5".to_string()),
        (
            "EXPORT_DIR",
            workdir.path().join("out").display().to_string(),
        ),
        (
            "KEY_STORE_PATH",
            workdir.path().join("keys.json").display().to_string(),
        ),
    ];
    let config = StudioConfig::from_lookup(|key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.clone())
    });

    let backend = MockBackend::new();
    let coordinator = SessionCoordinator::from_config(config, backend.clone()).unwrap();
    Pipeline {
        coordinator,
        backend,
        workdir,
    }
}

fn audio_body(samples: usize, rate: u32) -> serde_json::Value {
    let bytes: Vec<u8> = (0..samples as i16).flat_map(|s| s.to_le_bytes()).collect();
    json!({
        "candidates": [{
            "content": {
                "parts": [{
                    "inlineData": {
                        "mimeType": format!("audio/L16;codec=pcm;rate={rate}"),
                        "data": general_purpose::STANDARD.encode(bytes)
                    }
                }]
            }
        }]
    })
}

#[tokio::test]
async fn test_generate_play_and_export_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "stored-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(audio_body(1000, 24_000)))
        .expect(1)
        .mount(&server)
        .await;

    let p = pipeline(&server);
    p.coordinator.spawn_event_loop();
    p.coordinator.set_api_key("stored-key").unwrap();

    let on_disk = FileKeyStore::new(p.workdir.path().join("keys.json"));
    assert_eq!(on_disk.get().unwrap().as_deref(), Some("stored-key"));

    let outcome = p
        .coordinator
        .generate_and_play(&GenerationRequest::new("Hello").with_voice("Zephyr"))
        .await
        .unwrap();
    let GenerationOutcome::Playing { asset, .. } = outcome else {
        panic!("expected playing outcome");
    };
    assert_eq!(asset.bytes().len(), 2044);
    assert_eq!(asset.sample_rate(), 24_000);
    assert_eq!(p.coordinator.playback_state(), PlaybackState::Playing);
    assert_eq!(p.backend.played().len(), 1);

    let path = p.coordinator.export_last_to_default_dir().unwrap();
    assert!(path.starts_with(p.workdir.path().join("out")));
    assert!(path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("zephyr_"));

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 24_000);
    assert_eq!(spec.bits_per_sample, 16);
    let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(samples.len(), 1000);
    assert_eq!(samples[999], 999);
}

#[tokio::test]
async fn test_missing_key_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(audio_body(10, 24_000)))
        .expect(0)
        .mount(&server)
        .await;

    let p = pipeline(&server);
    let err = p
        .coordinator
        .generate_and_play(&GenerationRequest::new("Hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, StudioError::Configuration(_)), "got {err:?}");
    assert!(!p.coordinator.has_api_key());
}

#[tokio::test]
async fn test_service_error_is_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let p = pipeline(&server);
    p.coordinator.set_api_key("bad-key").unwrap();

    let err = p
        .coordinator
        .generate_and_play(&GenerationRequest::new("Hello"))
        .await
        .unwrap_err();

    match err {
        StudioError::Remote { status, message } => {
            assert_eq!(status, Some(400));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected remote error, got {other:?}"),
    }
    assert!(p.coordinator.last_asset().is_none());
    assert!(p.backend.played().is_empty());
}

#[tokio::test]
async fn test_response_without_audio_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I cannot speak" }] } }]
        })))
        .mount(&server)
        .await;

    let p = pipeline(&server);
    p.coordinator.set_api_key("k").unwrap();

    let err = p
        .coordinator
        .generate_and_play(&GenerationRequest::new("Hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, StudioError::EmptyResult), "got {err:?}");
}

#[tokio::test]
async fn test_unencodable_declared_rate_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(audio_body(4, 4_000_000_000)))
        .mount(&server)
        .await;

    let p = pipeline(&server);
    p.coordinator.set_api_key("k").unwrap();

    let err = p
        .coordinator
        .generate_and_play(&GenerationRequest::new("Hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, StudioError::Decode(_)), "got {err:?}");
    assert!(p.coordinator.last_asset().is_none());
    assert!(p.backend.played().is_empty());
}
