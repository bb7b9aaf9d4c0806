use artbox::error::Error;
use artbox::model::Origin;
use artbox::Artbox;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn row(id: &str, user_id: &str, url: &str, prompt: &str, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": user_id,
        "url": url,
        "prompt": prompt,
        "created_at": created_at,
    })
}

#[tokio::test]
async fn list_returns_owner_scoped_rows_newest_first() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/images"))
        .and(query_param("user_id", "eq.u1"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", "test_anon_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row("r2", "u1", "https://example.com/2.jpg", "second", "2024-06-02T00:00:00Z"),
            row("r1", "u1", "https://example.com/1.jpg", "first", "2024-06-01T00:00:00Z"),
        ])))
        .mount(&mock_server)
        .await;

    let store = Artbox::new(&mock_server.uri(), "test_anon_key").images();
    let records = store.list("u1").await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "r2");
    assert_eq!(records[0].owner_id, "u1");
    assert_eq!(records[0].origin, Origin::Remote);
    assert!(records[0].created_at > records[1].created_at);
}

#[tokio::test]
async fn create_posts_payload_and_returns_representation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/images"))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row(
            "r9",
            "u1",
            "https://example.com/9.jpg",
            "a new image",
            "2024-06-03T00:00:00Z"
        )])))
        .mount(&mock_server)
        .await;

    let store = Artbox::new(&mock_server.uri(), "test_anon_key").images();
    let record = store
        .create("u1", "https://example.com/9.jpg", "a new image")
        .await
        .unwrap();

    assert_eq!(record.id, "r9");
    assert_eq!(record.prompt, "a new image");
    assert_eq!(record.owner_id, "u1");
    assert_eq!(record.origin, Origin::Remote);
}

#[tokio::test]
async fn missing_table_is_schema_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/images"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "42P01",
            "message": "relation \"public.images\" does not exist",
        })))
        .mount(&mock_server)
        .await;

    let store = Artbox::new(&mock_server.uri(), "test_anon_key").images();
    let err = store.list("u1").await.unwrap_err();

    assert!(matches!(err, Error::SchemaMissing { .. }));
    assert!(err.triggers_fallback());
}

#[tokio::test]
async fn server_error_is_remote_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/images"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let store = Artbox::new(&mock_server.uri(), "test_anon_key").images();
    let err = store.list("u1").await.unwrap_err();

    assert!(matches!(err, Error::RemoteUnavailable(_)));
    assert!(err.triggers_fallback());
}

#[tokio::test]
async fn delete_matches_both_id_and_owner() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/images"))
        .and(query_param("id", "eq.r1"))
        .and(query_param("user_id", "eq.u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(
            "r1",
            "u1",
            "https://example.com/1.jpg",
            "first",
            "2024-06-01T00:00:00Z"
        )])))
        .mount(&mock_server)
        .await;

    let store = Artbox::new(&mock_server.uri(), "test_anon_key").images();
    assert!(store.delete("r1", "u1").await.unwrap());
}

#[tokio::test]
async fn delete_with_owner_mismatch_is_a_silent_noop() {
    let mock_server = MockServer::start().await;

    // the guessed id exists but belongs to someone else; the owner filter
    // means PostgREST deletes nothing and returns an empty representation
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/images"))
        .and(query_param("id", "eq.r1"))
        .and(query_param("user_id", "eq.intruder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let store = Artbox::new(&mock_server.uri(), "test_anon_key").images();
    assert!(!store.delete("r1", "intruder").await.unwrap());
}
