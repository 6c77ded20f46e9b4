//! HTTP transport tests against a local mock of the chat-completions API.

use std::sync::atomic::{AtomicU32, Ordering};

use mcq_core::config::{LlmConfig, ProviderPreference};
use mcq_llm::{GenerationClient, LlmError, RetryPolicy, TransportError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "completion_tokens": 87 }
    })
}

fn questions_json() -> String {
    json!({
        "questions": [
            {
                "id": "q1",
                "question": "What do plants convert light into?",
                "options": ["Heat", "Chemical energy", "Sound", "Magnetism"],
                "correct_option_index": 1,
                "hint": "Think about glucose.",
                "explanation": "Photosynthesis stores light as chemical energy."
            },
            {
                "question": "Where does photosynthesis happen?",
                "options": ["Roots", "Chloroplasts", "Bark", "Seeds"],
                "correct_option_index": 1,
                "hint": "Green organelles.",
                "explanation": "Chloroplasts hold chlorophyll."
            }
        ]
    })
    .to_string()
}

fn openai_config(server: &MockServer) -> LlmConfig {
    let mut config = LlmConfig::default();
    config.provider = ProviderPreference::OpenAi;
    config.openai.api_key = Some("sk-test".into());
    config.openai.base_url = server.uri();
    config
}

#[tokio::test]
async fn openai_request_shape_and_parsing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.3,
            "max_tokens": 1200,
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&questions_json())))
        .expect(1)
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&openai_config(&server)).expect("client");
    let questions = client
        .generate("Plants use chloroplasts to photosynthesize.", 5)
        .await
        .expect("questions");

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].id().as_str(), "q1");
    assert_eq!(questions[1].id().as_str(), "q2");
    assert_eq!(questions[1].options()[1], "Chloroplasts");
}

#[tokio::test]
async fn openrouter_sends_attribution_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-or"))
        .and(header("x-title", "PDF MCQ Agent"))
        .and(header("http-referer", "http://localhost"))
        .and(body_partial_json(json!({ "model": "mistralai/mistral-7b-instruct:free" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&questions_json())))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = LlmConfig::default();
    config.openrouter.api_key = Some("sk-or".into());
    config.openrouter.base_url = format!("{}/api/v1", server.uri());

    let client = GenerationClient::from_config(&config).expect("client");
    assert!(client.generate("text", 2).await.is_ok());
}

#[tokio::test]
async fn http_429_is_retried_then_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .expect(3)
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&openai_config(&server))
        .expect("client")
        .with_retry(RetryPolicy::immediate(3));
    let err = client.generate("text", 2).await.expect_err("rate limited");

    match err {
        LlmError::RateLimited { attempts, last_error } => {
            assert_eq!(attempts, 3);
            assert!(last_error.to_string().contains("quota exceeded"));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn http_429_then_success() {
    let server = MockServer::start().await;
    let attempt = AtomicU32::new(0);
    let body = completion(&questions_json());

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(move |_: &wiremock::Request| {
            if attempt.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(429)
            } else {
                ResponseTemplate::new(200).set_body_json(body.clone())
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&openai_config(&server))
        .expect("client")
        .with_retry(RetryPolicy::immediate(3));
    assert_eq!(client.generate("text", 5).await.expect("questions").len(), 2);
}

#[tokio::test]
async fn http_401_aborts_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&openai_config(&server))
        .expect("client")
        .with_retry(RetryPolicy::immediate(3));
    let err = client.generate("text", 2).await.expect_err("unauthorized");

    assert!(matches!(
        err,
        LlmError::Request(TransportError::Status { status: 401, ref body }) if body == "invalid api key"
    ));
}

#[tokio::test]
async fn schema_violation_is_malformed() {
    let server = MockServer::start().await;
    let bad = json!({ "questions": [{ "question": "Q?", "options": ["a", "b"], "correct_option_index": 0, "hint": "h", "explanation": "e" }] });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&bad.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&openai_config(&server)).expect("client");
    let err = client.generate("text", 2).await.expect_err("malformed");
    assert!(matches!(err, LlmError::MalformedResponse(_)));
}

#[tokio::test]
async fn missing_message_content_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&openai_config(&server)).expect("client");
    let err = client.generate("text", 2).await.expect_err("no content");
    assert!(matches!(err, LlmError::Request(TransportError::Decode(_))));
}
