//! Word API Integration Tests
//!
//! Each test builds a fresh router over its own exclusion store, so tests
//! never share state.

use crate::core::llm::router::MockLLMProvider;
use crate::core::server::{router, GENERATION_FAILED, INSUFFICIENT_WARNING, RESET_MESSAGE};
use crate::core::words::{ExclusionStore, WordGenerator};
use crate::tests::mocks::{noun_list, ScriptedProvider};
use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

const BANNED: [&str; 4] = ["car", "book", "dog", "apple"];

fn generator(provider: ScriptedProvider) -> (Arc<WordGenerator>, Arc<ScriptedProvider>) {
    let provider = Arc::new(provider);
    let store = Arc::new(ExclusionStore::new(BANNED));
    let generator = Arc::new(WordGenerator::new(provider.clone(), store));
    (generator, provider)
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_words(app: Router, level: &str) -> (StatusCode, Value) {
    send(app, "POST", "/get-words", Some(json!({ "level": level }))).await
}

fn words_of(body: &Value) -> Vec<String> {
    body["words"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w.as_str().unwrap().to_string())
        .collect()
}

/// Router whose provider must never be reached.
fn unreachable_provider_app() -> Router {
    let mut provider = MockLLMProvider::new();
    provider.expect_chat().times(0);
    let generator = WordGenerator::new(Arc::new(provider), Arc::new(ExclusionStore::default()));
    router(Arc::new(generator))
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn test_full_batch_returns_ok() {
    let (generator, provider) = generator(ScriptedProvider::new().with_text(&noun_list("noun", 20)));
    let app = router(generator.clone());

    let (status, body) = get_words(app, "Beginner").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("warning").is_none());
    assert_eq!(words_of(&body).len(), 20);
    assert_eq!(generator.store().used_len(), 20);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_banned_words_are_filtered_from_response() {
    let reply = "Car, tree, BOOK, river, dog, lamp, apple, cloud, kite, owl, \
                 bridge, coin, drum, fern, gate, harp, island, jar, key, leaf";
    let (generator, _) = generator(ScriptedProvider::new().with_text(reply));

    let (status, body) = get_words(router(generator), "Beginner").await;

    assert_eq!(status, StatusCode::OK);
    let words = words_of(&body);
    assert_eq!(words.len(), 16);
    assert_eq!(&words[..3], ["tree", "river", "lamp"]);
    for banned in BANNED {
        assert!(!words.contains(&banned.to_string()));
    }
}

#[tokio::test]
async fn test_exactly_ten_words_is_sufficient() {
    let (generator, _) = generator(ScriptedProvider::new().with_text(&noun_list("noun", 10)));

    let (status, body) = get_words(router(generator), "Advanced").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("warning").is_none());
    assert_eq!(words_of(&body).len(), 10);
}

#[tokio::test]
async fn test_nine_words_returns_accepted_with_warning() {
    let reply = format!("{}, car, dog", noun_list("noun", 9));
    let (generator, _) = generator(ScriptedProvider::new().with_text(&reply));

    let (status, body) = get_words(router(generator.clone()), "Advanced").await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["warning"], INSUFFICIENT_WARNING);
    assert_eq!(words_of(&body).len(), 9);
    // An insufficient batch is still recorded.
    assert_eq!(generator.store().used_len(), 9);
}

#[tokio::test]
async fn test_empty_reply_returns_accepted_with_no_words() {
    let (generator, _) = generator(ScriptedProvider::new().with_text(" , ,"));

    let (status, body) = get_words(router(generator), "Beginner").await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(words_of(&body).is_empty());
}

#[tokio::test]
async fn test_words_never_repeat_across_calls() {
    // Second reply repeats half of the first one.
    let first = noun_list("noun", 20);
    let second = format!("{}, {}", noun_list("noun", 10), noun_list("other", 10));
    let (generator, provider) =
        generator(ScriptedProvider::new().with_text(&first).with_text(&second));
    let app = router(generator);

    let (_, body1) = get_words(app.clone(), "Beginner").await;
    let (status2, body2) = get_words(app, "Beginner").await;

    let first_words: HashSet<String> = words_of(&body1).into_iter().collect();
    let second_words = words_of(&body2);
    assert_eq!(status2, StatusCode::OK);
    assert_eq!(second_words.len(), 10);
    assert!(second_words.iter().all(|w| !first_words.contains(w)));

    // The second prompt lists what the first call issued.
    let prompts = provider.prompts();
    assert!(prompts[1].contains("\"noun0\""));
    assert!(!prompts[0].contains("\"noun0\""));
}

#[tokio::test]
async fn test_level_is_trimmed_into_prompt() {
    let (generator, provider) = generator(ScriptedProvider::new().with_text(&noun_list("n", 12)));

    let (status, _) = get_words(router(generator), "  Intermediate ").await;

    assert_eq!(status, StatusCode::OK);
    assert!(provider.prompts()[0].contains("appropriate for Intermediate level learners"));
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_missing_level_is_bad_request() {
    let (status, body) = send(unreachable_provider_app(), "POST", "/get-words", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Level is required" }));
}

#[tokio::test]
async fn test_blank_level_is_bad_request() {
    let (status, body) = get_words(unreachable_provider_app(), "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Level is required");
}

#[tokio::test]
async fn test_empty_body_is_bad_request() {
    let (status, body) = send(unreachable_provider_app(), "POST", "/get-words", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Level is required");
}

#[tokio::test]
async fn test_non_string_level_is_bad_request() {
    let (status, body) = send(
        unreachable_provider_app(),
        "POST",
        "/get-words",
        Some(json!({ "level": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Level is required");
}

// =============================================================================
// Provider Failure
// =============================================================================

#[tokio::test]
async fn test_provider_failure_is_server_error() {
    let (generator, _) = generator(ScriptedProvider::new().with_status(502, "bad gateway"));
    generator.store().add_all(["river"]);
    let before = generator.store().snapshot();

    let (status, body) = get_words(router(generator.clone()), "Beginner").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERATION_FAILED }));
    assert_eq!(generator.store().snapshot(), before);
}

#[tokio::test]
async fn test_recovers_after_provider_failure() {
    let (generator, _) = generator(
        ScriptedProvider::new()
            .with_status(500, "boom")
            .with_text(&noun_list("noun", 15)),
    );
    let app = router(generator);

    let (status1, _) = get_words(app.clone(), "Beginner").await;
    let (status2, body2) = get_words(app, "Beginner").await;

    assert_eq!(status1, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(status2, StatusCode::OK);
    assert_eq!(words_of(&body2).len(), 15);
}

// =============================================================================
// Reset
// =============================================================================

#[tokio::test]
async fn test_reset_clears_used_words_but_keeps_banned() {
    let reply = noun_list("noun", 12);
    let (generator, _) = generator(
        ScriptedProvider::new()
            .with_text(&reply)
            .with_text(&format!("car, {reply}")),
    );
    let app = router(generator.clone());

    get_words(app.clone(), "Beginner").await;
    assert_eq!(generator.store().used_len(), 12);

    let (status, body) = send(app.clone(), "POST", "/reset-used-words", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": RESET_MESSAGE }));
    assert_eq!(generator.store().used_len(), 0);

    // Previously issued words are available again; banned ones are not.
    let (status, body) = get_words(app, "Beginner").await;
    assert_eq!(status, StatusCode::OK);
    let words = words_of(&body);
    assert_eq!(words.len(), 12);
    assert!(!words.contains(&"car".to_string()));
}

#[tokio::test]
async fn test_reset_on_empty_store() {
    let (status, body) = send(unreachable_provider_app(), "POST", "/reset-used-words", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], RESET_MESSAGE);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_provider() {
    let (generator, _) = generator(ScriptedProvider::new());

    let (status, body) = send(router(generator), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "scripted");
    assert_eq!(body["model"], "scripted-model");
    assert_eq!(body["configured"], true);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_serialized_generations_see_each_other() {
    // Both replies are identical; only serialization keeps them apart.
    let reply = noun_list("noun", 20);
    let (generator, provider) = generator(
        ScriptedProvider::new()
            .with_text(&reply)
            .with_text(&reply)
            .with_delay(50),
    );
    assert!(generator.is_serialized());
    let app = router(generator.clone());

    let (a, b) = tokio::join!(get_words(app.clone(), "Beginner"), get_words(app, "Beginner"));

    let mut statuses = [a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::ACCEPTED]);

    let prompts = provider.prompts();
    assert!(!prompts[0].contains("\"noun0\""));
    assert!(prompts[1].contains("\"noun0\""));
    assert_eq!(generator.store().used_len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unserialized_generations_share_a_snapshot() {
    let reply = noun_list("noun", 20);
    let provider = Arc::new(
        ScriptedProvider::new()
            .with_text(&reply)
            .with_text(&reply)
            .with_delay(100),
    );
    let generator = Arc::new(
        WordGenerator::new(provider.clone(), Arc::new(ExclusionStore::new(BANNED)))
            .with_serialization(false),
    );
    let app = router(generator.clone());

    let (a, b) = tokio::join!(get_words(app.clone(), "Beginner"), get_words(app, "Beginner"));

    // Both prompts were rendered before either write-back.
    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);

    // Filtering still checks the live store, so no word goes out twice.
    let mut issued = words_of(&a.1);
    issued.extend(words_of(&b.1));
    let unique: HashSet<&String> = issued.iter().collect();
    assert_eq!(unique.len(), issued.len());
    assert_eq!(generator.store().used_len(), 20);
}
