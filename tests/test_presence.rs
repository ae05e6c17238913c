mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn cursor_updates_show_up_in_presence() {
    let env = common::TestEnv::new();
    let server = env.server();
    common::login(&server, "demo").await;
    let doc = common::upload_markdown(&server, "notes.md", "# Notes", None).await;
    let url = format!("/api/v1/documents/{}/presence", doc["id"].as_str().unwrap());

    let empty: serde_json::Value = server.get(&url).await.json();
    assert!(empty["cursors"].as_array().unwrap().is_empty());
    assert_eq!(empty["is_collaborating"].as_bool(), Some(false));

    let view: serde_json::Value = server
        .put(&url)
        .json(&serde_json::json!({
            "position": 12,
            "selection": { "anchor": 10, "head": 14 }
        }))
        .await
        .json();

    let cursor = &view["cursors"][0];
    assert_eq!(cursor["user_id"].as_str(), Some("demo-demo"));
    assert_eq!(cursor["user_name"].as_str(), Some("Demo Reader"));
    assert_eq!(cursor["position"].as_u64(), Some(12));
    assert_eq!(cursor["selection"]["head"].as_u64(), Some(14));
    assert_eq!(view["is_collaborating"].as_bool(), Some(false));
}

#[tokio::test]
async fn leaving_removes_the_cursor() {
    let env = common::TestEnv::new();
    let server = env.server();
    common::login(&server, "demo").await;
    let doc = common::upload_markdown(&server, "notes.md", "# Notes", None).await;
    let url = format!("/api/v1/documents/{}/presence", doc["id"].as_str().unwrap());

    server.put(&url).json(&serde_json::json!({ "position": 3 })).await;
    server.delete(&url).await.assert_status(StatusCode::NO_CONTENT);

    let view: serde_json::Value = server.get(&url).await.json();
    assert!(view["cursors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn two_readers_are_collaborating() {
    let env = common::TestEnv::new();
    let server = env.server();
    common::login(&server, "demo").await;
    let doc = common::upload_markdown(&server, "notes.md", "# Notes", None).await;
    let doc_id = doc["id"].as_str().unwrap();
    let url = format!("/api/v1/documents/{doc_id}/presence");

    server.put(&url).json(&serde_json::json!({ "position": 1 })).await;
    env.state
        .presence
        .update_cursor(doc_id, "guest", "Guest", Default::default());

    let view: serde_json::Value = server.get(&url).await.json();
    assert_eq!(view["cursors"].as_array().unwrap().len(), 2);
    assert_eq!(view["is_collaborating"].as_bool(), Some(true));
}

#[tokio::test]
async fn second_tab_of_the_same_reader_is_not_collaboration() {
    let env = common::TestEnv::new();
    let first = env.server();
    common::login(&first, "demo").await;
    let doc = common::upload_markdown(&first, "notes.md", "# Notes", None).await;
    let url = format!("/api/v1/documents/{}/presence", doc["id"].as_str().unwrap());

    let second = env.server();
    common::login(&second, "demo").await;

    first.put(&url).json(&serde_json::json!({ "position": 1 })).await;
    let view: serde_json::Value = second
        .put(&url)
        .json(&serde_json::json!({ "position": 7 }))
        .await
        .json();

    let cursors = view["cursors"].as_array().unwrap();
    assert_eq!(cursors.len(), 1);
    assert_eq!(cursors[0]["position"].as_u64(), Some(7));
    assert_eq!(view["is_collaborating"].as_bool(), Some(false));
}

#[tokio::test]
async fn presence_of_foreign_document_is_not_found() {
    let env = common::TestEnv::new();
    let owner = env.server();
    common::login(&owner, "demo").await;
    let doc = common::upload_markdown(&owner, "notes.md", "# Notes", None).await;
    let url = format!("/api/v1/documents/{}/presence", doc["id"].as_str().unwrap());

    let other = env.server_permissive();
    common::login(&other, "admin").await;
    other.get(&url).await.assert_status_not_found();
    other
        .put(&url)
        .json(&serde_json::json!({ "position": 0 }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn deleting_a_document_closes_its_session() {
    let env = common::TestEnv::new();
    let server = env.server();
    common::login(&server, "demo").await;
    let doc = common::upload_markdown(&server, "notes.md", "# Notes", None).await;
    let doc_id = doc["id"].as_str().unwrap();

    server
        .put(&format!("/api/v1/documents/{doc_id}/presence"))
        .json(&serde_json::json!({ "position": 0 }))
        .await;
    server
        .delete(&format!("/api/v1/documents/{doc_id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(env.state.presence.active_cursors(doc_id).is_empty());
}
