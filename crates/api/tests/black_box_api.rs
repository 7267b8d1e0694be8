use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{COOKIE, SET_COOKIE};
use serde_json::json;

use tallybook_store::InMemoryTransactionStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod) over the in-memory store, bound
        // to an ephemeral port.
        let app = tallybook_api::app::build_app(Arc::new(InMemoryTransactionStore::new()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Extract the `sessionId=<uuid>` pair from a creation response.
fn session_cookie(res: &reqwest::Response) -> String {
    let raw = res
        .headers()
        .get(SET_COOKIE)
        .expect("expected a Set-Cookie header")
        .to_str()
        .unwrap();

    let pair = raw.split(';').next().unwrap().trim().to_string();
    assert!(pair.starts_with("sessionId="));
    pair
}

async fn record(
    client: &reqwest::Client,
    base_url: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> reqwest::Response {
    let mut req = client.post(format!("{}/transactions", base_url)).json(&body);
    if let Some(cookie) = cookie {
        req = req.header(COOKIE, cookie);
    }
    req.send().await.unwrap()
}

#[tokio::test]
async fn recording_mints_a_fresh_session_cookie_per_new_client() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = json!({ "title": "new transaction", "amount": 5000, "type": "credit" });

    let first = record(&client, &srv.base_url, None, body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(first.content_length(), Some(0));
    let first_cookie = session_cookie(&first);

    let second = record(&client, &srv.base_url, None, body).await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second_cookie = session_cookie(&second);

    assert_ne!(first_cookie, second_cookie);
}

#[tokio::test]
async fn recording_with_an_existing_cookie_never_rotates_it() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = record(
        &client,
        &srv.base_url,
        None,
        json!({ "title": "first", "amount": 100, "type": "credit" }),
    )
    .await;
    let cookie = session_cookie(&res);

    let res = record(
        &client,
        &srv.base_url,
        Some(&cookie),
        json!({ "title": "second", "amount": 200, "type": "credit" }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res.headers().get(SET_COOKIE).is_none());

    // Both entries landed in the same session.
    let body: serde_json::Value = client
        .get(format!("{}/transactions", srv.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn listing_returns_the_sessions_transactions() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = record(
        &client,
        &srv.base_url,
        None,
        json!({ "title": "new transaction", "amount": 5000, "type": "credit" }),
    )
    .await;
    let cookie = session_cookie(&res);

    let res = client
        .get(format!("{}/transactions", srv.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["title"], "new transaction");
    assert_eq!(transactions[0]["amount"], 5000);
}

#[tokio::test]
async fn a_specific_transaction_can_be_fetched_by_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = record(
        &client,
        &srv.base_url,
        None,
        json!({ "title": "new transaction", "amount": 5000, "type": "credit" }),
    )
    .await;
    let cookie = session_cookie(&res);

    let body: serde_json::Value = client
        .get(format!("{}/transactions", srv.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = body["transactions"][0]["id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/transactions/{}", srv.base_url, id))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let tx: serde_json::Value = res.json().await.unwrap();
    assert_eq!(tx["id"].as_str().unwrap(), id);
    assert_eq!(tx["title"], "new transaction");
    assert_eq!(tx["amount"], 5000);
}

#[tokio::test]
async fn listing_preserves_insertion_order_across_rapid_writes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = record(
        &client,
        &srv.base_url,
        None,
        json!({ "title": "entry 0", "amount": 1, "type": "credit" }),
    )
    .await;
    let cookie = session_cookie(&res);

    for i in 1..5 {
        let res = record(
            &client,
            &srv.base_url,
            Some(&cookie),
            json!({ "title": format!("entry {i}"), "amount": 1, "type": "credit" }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let body: serde_json::Value = client
        .get(format!("{}/transactions", srv.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let titles: Vec<&str> = body["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["entry 0", "entry 1", "entry 2", "entry 3", "entry 4"]);
}

#[tokio::test]
async fn summary_is_credits_minus_debits() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = record(
        &client,
        &srv.base_url,
        None,
        json!({ "title": "credit transaction", "amount": 5000, "type": "credit" }),
    )
    .await;
    let cookie = session_cookie(&res);

    let res = record(
        &client,
        &srv.base_url,
        Some(&cookie),
        json!({ "title": "debit transaction", "amount": 2000, "type": "debit" }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/transactions/summary", srv.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["summary"], json!({ "amount": 3000 }));
}

#[tokio::test]
async fn reads_without_a_session_cookie_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let paths = vec![
        "/transactions".to_string(),
        "/transactions/summary".to_string(),
        format!("/transactions/{}", uuid::Uuid::new_v4()),
    ];

    for path in paths {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path {path}");

        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "missing_session");
        assert!(body.get("transactions").is_none());
    }
}

#[tokio::test]
async fn sessions_are_isolated_from_each_other() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = record(
        &client,
        &srv.base_url,
        None,
        json!({ "title": "alice rent", "amount": 90000, "type": "debit" }),
    )
    .await;
    let alice = session_cookie(&res);

    let res = record(
        &client,
        &srv.base_url,
        None,
        json!({ "title": "bob salary", "amount": 300000, "type": "credit" }),
    )
    .await;
    let bob = session_cookie(&res);

    // Bob only sees his own row.
    let body: serde_json::Value = client
        .get(format!("{}/transactions", srv.base_url))
        .header(COOKIE, &bob)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["title"], "bob salary");

    // Bob's summary ignores Alice's debit.
    let body: serde_json::Value = client
        .get(format!("{}/transactions/summary", srv.base_url))
        .header(COOKIE, &bob)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["summary"]["amount"], 300000);

    // A valid id owned by Alice is a plain 404 for Bob.
    let body: serde_json::Value = client
        .get(format!("{}/transactions", srv.base_url))
        .header(COOKIE, &alice)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let alice_id = body["transactions"][0]["id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/transactions/{}", srv.base_url, alice_id))
        .header(COOKIE, &bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_transaction_ids_are_rejected_up_front() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = record(
        &client,
        &srv.base_url,
        None,
        json!({ "title": "seed", "amount": 1, "type": "credit" }),
    )
    .await;
    let cookie = session_cookie(&res);

    let res = client
        .get(format!("{}/transactions/not-a-uuid", srv.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn invalid_record_payloads_are_rejected_with_field_detail() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let cases = [
        (json!({ "title": "", "amount": 100, "type": "credit" }), "title"),
        (json!({ "title": "rent", "amount": 0, "type": "debit" }), "amount"),
        (json!({ "title": "rent", "amount": -100, "type": "debit" }), "amount"),
        (json!({ "title": "rent", "amount": 100, "type": "transfer" }), "type"),
        // Structurally invalid bodies get the same shape as domain validation.
        (json!({ "amount": 100, "type": "credit" }), "title"),
        (json!({ "title": "rent", "amount": "a lot", "type": "credit" }), "amount"),
    ];

    for (body, field) in cases {
        let res = record(&client, &srv.base_url, None, body.clone()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {body}");

        let detail: serde_json::Value = res.json().await.unwrap();
        assert_eq!(detail["error"], "validation_error");
        assert_eq!(detail["field"], field);
    }
}

#[tokio::test]
async fn health_probe_is_open() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
