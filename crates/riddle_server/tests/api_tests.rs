use async_trait::async_trait;
use chrono::NaiveDate;
use riddle::{
    Insert, LetterPattern, LongPrompt, MatchPolicy, MemoryStore, NewLongPrompt, NewShortPrompt,
    PromptId, PromptLookup, PromptStore, PromptView, SelectorConfig, ShortPrompt,
};
use riddle_server::types::ErrorResponse;
use riddle_server::{build_router, cors_layer, AppState};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Store whose lookups never complete in time
struct SlowStore(MemoryStore);

#[async_trait]
impl PromptLookup for SlowStore {
    async fn find_one_random_matching(
        &self,
        pattern: &LetterPattern,
        excluded: &HashSet<PromptId>,
    ) -> riddle::Result<Option<ShortPrompt>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        self.0.find_one_random_matching(pattern, excluded).await
    }
}

#[async_trait]
impl PromptStore for SlowStore {
    async fn insert_long_prompt(&self, prompt: NewLongPrompt) -> riddle::Result<Insert<LongPrompt>> {
        self.0.insert_long_prompt(prompt).await
    }

    async fn insert_short_prompt(
        &self,
        prompt: NewShortPrompt,
    ) -> riddle::Result<Insert<ShortPrompt>> {
        self.0.insert_short_prompt(prompt).await
    }

    async fn long_prompt_for_date(&self, date: NaiveDate) -> riddle::Result<Option<LongPrompt>> {
        self.0.long_prompt_for_date(date).await
    }
}

async fn test_store(answers: &[(&str, &str)]) -> Arc<dyn PromptStore> {
    let store = MemoryStore::with_seed(3);
    for (text, answer) in answers {
        store
            .insert_short_prompt(NewShortPrompt::new(*text, *answer))
            .await
            .unwrap();
    }
    Arc::new(store)
}

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_test_server(state: AppState) -> String {
    let app = build_router(Arc::new(state), cors_layer(&[]).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_with(answers: &[(&str, &str)]) -> String {
    let config = SelectorConfig::new().with_match_policy(MatchPolicy::CaseSensitive);
    spawn_test_server(AppState::new(test_store(answers).await, config)).await
}

#[tokio::test]
async fn greeting_returns_hello() {
    let base = spawn_with(&[]).await;
    let resp = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "Hello");
}

#[tokio::test]
async fn select_returns_one_prompt_per_letter() {
    let base = spawn_with(&[("Feline", "cat"), ("Barks", "dog"), ("Moos", "cow")]).await;
    let resp = reqwest::get(format!("{}/spL/co", base)).await.unwrap();

    assert_eq!(resp.status(), 201);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));

    let body: HashMap<String, PromptView> = resp.json().await.unwrap();
    assert_eq!(body.len(), 2);
    for view in body.values() {
        assert_eq!(view.active_guess, "");
        assert_eq!(view.guesses_submitted, 0);
        assert!(!view.locked);
        assert_eq!(view.max_length, view.answer.chars().count());
        let letter = view.answer.chars().nth(view.active_letter_index).unwrap();
        assert!(letter == 'c' || letter == 'o');
    }
}

#[tokio::test]
async fn select_ignores_whitespace_in_letters() {
    let base = spawn_with(&[("Feline", "cat"), ("Barks", "dog")]).await;
    let resp = reqwest::get(format!("{}/spL/c%20d", base)).await.unwrap();

    assert_eq!(resp.status(), 201);
    let body: HashMap<String, PromptView> = resp.json().await.unwrap();
    assert_eq!(body.len(), 2);
}

#[tokio::test]
async fn select_exhausted_pool_is_server_error() {
    let base = spawn_with(&[("Feline", "cat")]).await;
    let resp = reqwest::get(format!("{}/spL/cc", base)).await.unwrap();

    assert_eq!(resp.status(), 500);
    let body: ErrorResponse = resp.json().await.unwrap();
    assert_eq!(body.error.kind, "exhausted_pool");
}

#[tokio::test]
async fn select_too_many_letters_is_rejected() {
    let config = SelectorConfig::new().with_max_letters(3);
    let base = spawn_test_server(AppState::new(test_store(&[]).await, config)).await;
    let resp = reqwest::get(format!("{}/spL/abcdef", base)).await.unwrap();

    assert_eq!(resp.status(), 422);
    let body: ErrorResponse = resp.json().await.unwrap();
    assert_eq!(body.error.kind, "invalid_request");
}

#[tokio::test]
async fn create_short_prompt_is_insert_if_absent() {
    let base = spawn_with(&[]).await;
    let client = reqwest::Client::new();
    let payload = serde_json::json!({"text": "Moos", "answer": "cow"});

    let resp = client
        .post(format!("{}/shortPrompts", base))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(created["answer"], "cow");
    assert!(created["id"].is_string());

    let resp = client
        .post(format!("{}/shortPrompts", base))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: ErrorResponse = resp.json().await.unwrap();
    assert_eq!(body.error.message, "Moos already exists");

    let resp = reqwest::get(format!("{}/spL/w", base)).await.unwrap();
    assert_eq!(resp.status(), 201);
}

#[tokio::test]
async fn long_prompt_by_date() {
    let base = spawn_with(&[]).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/longPrompts", base))
        .json(&serde_json::json!({
            "text": "What has keys but opens no locks?",
            "answer": "piano",
            "date": "2024-06-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = reqwest::get(format!("{}/longPrompts/2024-06-01", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["answer"], "piano");

    let resp = reqwest::get(format!("{}/longPrompts/2024-06-02", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = reqwest::get(format!("{}/longPrompts/not-a-date", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn select_times_out() {
    let state = AppState::new(
        Arc::new(SlowStore(MemoryStore::new())),
        SelectorConfig::default(),
    )
    .with_run_timeout(Duration::from_millis(50));
    let base = spawn_test_server(state).await;

    let resp = reqwest::get(format!("{}/spL/abc", base)).await.unwrap();
    assert_eq!(resp.status(), 504);
    let body: ErrorResponse = resp.json().await.unwrap();
    assert_eq!(body.error.kind, "timeout");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let base = spawn_with(&[]).await;
    let resp = reqwest::get(format!("{}/words", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
}
