use crate::e2e::helpers;

use helpers::mock_services::{
    accept_keys, fail_synthesis, forbid_synthesis, forbid_validation, mock_audio_bytes,
    reject_keys, synthesize_audio,
};
use helpers::{TestContext, BYPASS_SECRET, VALIDATE_PATH};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

const ENDPOINT: &str = "/api/generate-speech";

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_relay_audio_for_text_and_voice(ctx: &TestContext) {
    accept_keys(&ctx.validator, 1).await;
    synthesize_audio(&ctx.speech_api, mock_audio_bytes(), 1).await;

    let response = ctx
        .client
        .post(
            ENDPOINT,
            &json!({
                "text": "សួស្តី ពិភពលោក",
                "voice": "km-KH-SreymomNeural",
                "apiKey": "user-key-1"
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mpeg")
        .assert_header("x-voice-used", "km-KH-SreymomNeural")
        .assert_header("x-character-count", &"សួស្តី ពិភពលោក".chars().count().to_string())
        .assert_header_exists("x-request-id");

    assert_eq!(response.body_bytes, mock_audio_bytes());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_built_ssml_to_speech_api(ctx: &TestContext) {
    accept_keys(&ctx.validator, 1).await;
    Mock::given(method("POST"))
        .and(path(helpers::SYNTHESIZE_PATH))
        .and(body_string_contains("xml:lang=\"en-US\""))
        .and(body_string_contains(
            "<voice name=\"en-US-JennyNeural\">Tom &amp; Jerry</voice>",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(mock_audio_bytes()))
        .expect(1)
        .mount(&ctx.speech_api)
        .await;

    let response = ctx
        .client
        .post(
            ENDPOINT,
            &json!({
                "text": "Tom & Jerry",
                "voice": "en-US-JennyNeural",
                "apiKey": "user-key-1"
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_relay_prebuilt_ssml_verbatim(ctx: &TestContext) {
    let ssml = "<speak version='1.0' xml:lang='km-KH'><voice name='km-KH-PisethNeural'>សួស្តី</voice></speak>";

    Mock::given(method("POST"))
        .and(path(VALIDATE_PATH))
        .and(body_json(json!({
            "apiKey": "user-key-1",
            "charactersNeeded": "សួស្តី".chars().count()
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isValid": true })))
        .expect(1)
        .mount(&ctx.validator)
        .await;
    Mock::given(method("POST"))
        .and(path(helpers::SYNTHESIZE_PATH))
        .and(wiremock::matchers::body_string(ssml))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(mock_audio_bytes()))
        .expect(1)
        .mount(&ctx.speech_api)
        .await;

    let response = ctx
        .client
        .post(ENDPOINT, &json!({ "ssml_data": ssml, "apiKey": "user-key-1" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mpeg")
        .assert_header("x-voice-used", "ssml");
    assert_eq!(response.body_bytes, mock_audio_bytes());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_text_and_markup(ctx: &TestContext) {
    forbid_validation(&ctx.validator).await;
    forbid_synthesis(&ctx.speech_api).await;

    let bodies = vec![
        json!({}),
        json!({ "voice": "en-US-JennyNeural", "apiKey": "user-key-1" }),
        json!({ "text": "", "voice": "en-US-JennyNeural", "apiKey": "user-key-1" }),
        json!({ "ssml_data": "   ", "apiKey": "user-key-1" }),
    ];

    for body in bodies {
        let response = ctx.client.post(ENDPOINT, &body).await.unwrap();
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_voice_even_with_valid_text(ctx: &TestContext) {
    forbid_validation(&ctx.validator).await;
    forbid_synthesis(&ctx.speech_api).await;

    for voice in ["en-US-Jenny", "english", "EN-us-JennyNeural", "en-US-Jenny Neural", ""] {
        let response = ctx
            .client
            .post_with_headers(
                ENDPOINT,
                &json!({ "text": "Hello there", "voice": voice, "apiKey": "user-key-1" }),
                &[("X-Internal-Secret", BYPASS_SECRET)],
            )
            .await
            .unwrap();

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_voice_alongside_ssml(ctx: &TestContext) {
    forbid_validation(&ctx.validator).await;
    forbid_synthesis(&ctx.speech_api).await;

    let response = ctx
        .client
        .post_with_headers(
            ENDPOINT,
            &json!({ "ssml_data": "<speak>Hi</speak>", "voice": "not-a-voice" }),
            &[("X-Internal-Secret", BYPASS_SECRET)],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid voice format: not-a-voice");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_api_key_without_bypass(ctx: &TestContext) {
    forbid_validation(&ctx.validator).await;
    forbid_synthesis(&ctx.speech_api).await;

    for body in [
        json!({ "text": "Hello", "voice": "en-US-JennyNeural" }),
        json!({ "text": "Hello", "voice": "en-US-JennyNeural", "apiKey": "" }),
    ] {
        let response = ctx.client.post(ENDPOINT, &body).await.unwrap();
        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("API Key is required.");
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_validation_with_bypass_secret(ctx: &TestContext) {
    forbid_validation(&ctx.validator).await;
    synthesize_audio(&ctx.speech_api, mock_audio_bytes(), 1).await;

    let response = ctx
        .client
        .post_with_headers(
            ENDPOINT,
            &json!({ "text": "Internal call", "voice": "en-US-JennyNeural" }),
            &[("X-Internal-Secret", BYPASS_SECRET)],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body_bytes, mock_audio_bytes());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_bypass_with_wrong_secret(ctx: &TestContext) {
    forbid_validation(&ctx.validator).await;
    forbid_synthesis(&ctx.speech_api).await;

    let response = ctx
        .client
        .post_with_headers(
            ENDPOINT,
            &json!({ "text": "Internal call", "voice": "en-US-JennyNeural" }),
            &[("X-Internal-Secret", "not-the-secret")],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_403_with_reason_when_key_invalid(ctx: &TestContext) {
    reject_keys(&ctx.validator, 200, "Not enough characters left on this key.").await;
    forbid_synthesis(&ctx.speech_api).await;

    let response = ctx
        .client
        .post(
            ENDPOINT,
            &json!({ "text": "Hello", "voice": "en-US-JennyNeural", "apiKey": "user-key-1" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Not enough characters left on this key.");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_mirror_validator_status_when_not_200(ctx: &TestContext) {
    reject_keys(&ctx.validator, 401, "API key not found.").await;
    forbid_synthesis(&ctx.speech_api).await;

    let response = ctx
        .client
        .post(
            ENDPOINT,
            &json!({ "text": "Hello", "voice": "en-US-JennyNeural", "apiKey": "missing-key" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("API key not found.");
}

#[tokio::test]
async fn it_should_return_500_when_validator_unreachable() {
    let ctx = TestContext::with_config(|config| {
        config.key_validation_url = "http://127.0.0.1:9/api/validate-key".to_string();
    })
    .await
    .unwrap();
    forbid_synthesis(&ctx.speech_api).await;

    let response = ctx
        .client
        .post(
            ENDPOINT,
            &json!({ "text": "Hello", "voice": "en-US-JennyNeural", "apiKey": "user-key-1" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Could not reach API key validation service.");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_mirror_speech_api_status_with_truncated_detail(ctx: &TestContext) {
    accept_keys(&ctx.validator, 1).await;
    let detail = format!("Invalid SSML: {}", "x".repeat(1000));
    fail_synthesis(&ctx.speech_api, 400, &detail).await;

    let response = ctx
        .client
        .post(
            ENDPOINT,
            &json!({ "text": "Hello", "voice": "en-US-JennyNeural", "apiKey": "user-key-1" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    let message = response.error_message();
    assert_eq!(message.chars().count(), 250);
    assert!(detail.starts_with(&message));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_mirror_speech_api_auth_failure(ctx: &TestContext) {
    forbid_validation(&ctx.validator).await;
    fail_synthesis(&ctx.speech_api, 401, "Access denied due to invalid subscription key.").await;

    let response = ctx
        .client
        .post_with_headers(
            ENDPOINT,
            &json!({ "text": "Hello", "voice": "en-US-JennyNeural" }),
            &[("X-Internal-Secret", BYPASS_SECRET)],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Access denied due to invalid subscription key.");
}

#[tokio::test]
async fn it_should_return_500_when_speech_api_unreachable() {
    let ctx = TestContext::with_config(|config| {
        config.azure_speech_endpoint = Some("http://127.0.0.1:9/cognitiveservices/v1".to_string());
    })
    .await
    .unwrap();
    forbid_validation(&ctx.validator).await;

    let response = ctx
        .client
        .post_with_headers(
            ENDPOINT,
            &json!({ "text": "Hello", "voice": "en-US-JennyNeural" }),
            &[("X-Internal-Secret", BYPASS_SECRET)],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Error contacting speech service.");
}

#[tokio::test]
async fn it_should_return_500_when_speech_not_configured() {
    let ctx = TestContext::with_config(|config| {
        config.azure_speech_key = None;
    })
    .await
    .unwrap();
    forbid_validation(&ctx.validator).await;
    forbid_synthesis(&ctx.speech_api).await;

    let response = ctx
        .client
        .post(
            ENDPOINT,
            &json!({ "text": "Hello", "voice": "en-US-JennyNeural", "apiKey": "user-key-1" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Server configuration error");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    forbid_validation(&ctx.validator).await;
    forbid_synthesis(&ctx.speech_api).await;

    let response = ctx
        .client
        .post_raw(ENDPOINT, "{\"text\": ", &[("Content-Type", "application/json")])
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message_contains("Invalid request body");

    // Missing content type is also a caller error
    let response = ctx
        .client
        .post_raw(ENDPOINT, "{}", &[])
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_handle_concurrent_requests_independently(ctx: &TestContext) {
    accept_keys(&ctx.validator, 5).await;
    synthesize_audio(&ctx.speech_api, mock_audio_bytes(), 5).await;

    let requests = (0..5).map(|i| {
        let client = ctx.client.clone();
        async move {
            client
                .post(
                    ENDPOINT,
                    &json!({
                        "text": format!("Request number {}", i),
                        "voice": "en-US-JennyNeural",
                        "apiKey": format!("user-key-{}", i)
                    }),
                )
                .await
                .unwrap()
        }
    });

    for response in futures::future::join_all(requests).await {
        response.assert_status(StatusCode::OK);
        assert_eq!(response.body_bytes, mock_audio_bytes());
    }
}
