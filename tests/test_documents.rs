mod common;

#[tokio::test]
async fn list_returns_most_recent_first() {
    let env = common::TestEnv::new();
    let server = env.server();
    common::login(&server, "demo").await;

    common::upload_markdown(&server, "first.md", "# First", None).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    common::upload_markdown(&server, "second.md", "# Second", None).await;

    let docs: serde_json::Value = server.get("/api/v1/documents").await.json();
    let titles: Vec<&str> = docs
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["second", "first"]);
}

#[tokio::test]
async fn list_filters_by_folder_and_query() {
    let env = common::TestEnv::new();
    let server = env.server();
    common::login(&server, "demo").await;

    let folder = common::create_folder(&server, "Strategy", None).await;
    let folder_id = folder["id"].as_str().unwrap();

    common::upload_markdown(&server, "roadmap.md", "# Roadmap\n\nQuarterly goals", Some(folder_id)).await;
    common::upload_markdown(&server, "groceries.md", "# Groceries\n\nMilk", None).await;

    let filed: serde_json::Value = server
        .get("/api/v1/documents")
        .add_query_param("folder", folder_id)
        .await
        .json();
    assert_eq!(filed.as_array().unwrap().len(), 1);
    assert_eq!(filed[0]["title"].as_str(), Some("roadmap"));

    let unfiled: serde_json::Value = server
        .get("/api/v1/documents")
        .add_query_param("folder", "unfiled")
        .await
        .json();
    assert_eq!(unfiled.as_array().unwrap().len(), 1);
    assert_eq!(unfiled[0]["title"].as_str(), Some("groceries"));

    let found: serde_json::Value = server
        .get("/api/v1/documents")
        .add_query_param("q", "QUARTERLY")
        .await
        .json();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["title"].as_str(), Some("roadmap"));
}

#[tokio::test]
async fn documents_are_private_to_their_owner() {
    let env = common::TestEnv::new();
    let owner = env.server();
    common::login(&owner, "demo").await;
    let doc = common::upload_markdown(&owner, "secret.md", "# Secret", None).await;
    let url = format!("/api/v1/documents/{}", doc["id"].as_str().unwrap());

    let other = env.server_permissive();
    common::login(&other, "admin").await;

    other.get(&url).await.assert_status_not_found();
    other.delete(&url).await.assert_status_not_found();
    let listed: serde_json::Value = other.get("/api/v1/documents").await.json();
    assert!(listed.as_array().unwrap().is_empty());

    owner.get(&url).await.assert_status_ok();
}

#[tokio::test]
async fn update_changes_title_tags_and_preview() {
    let env = common::TestEnv::new();
    let server = env.server();
    common::login(&server, "demo").await;
    let doc = common::upload_markdown(&server, "draft.md", "# Draft", None).await;
    let url = format!("/api/v1/documents/{}", doc["id"].as_str().unwrap());

    let updated: serde_json::Value = server
        .patch(&url)
        .json(&serde_json::json!({
            "title": "  Final Plan  ",
            "content": "# Final\n\nAll done.",
            "tags": ["plan"]
        }))
        .await
        .json();

    assert_eq!(updated["title"].as_str(), Some("Final Plan"));
    assert_eq!(updated["tags"], serde_json::json!(["plan"]));
    assert_eq!(updated["preview"].as_str(), Some("Final All done."));

    let fetched: serde_json::Value = server.get(&url).await.json();
    assert_eq!(fetched["title"].as_str(), Some("Final Plan"));
}

#[tokio::test]
async fn update_rejects_blank_title() {
    let env = common::TestEnv::new();
    let server = env.server_permissive();
    common::login(&server, "demo").await;
    let doc = common::upload_markdown(&server, "draft.md", "# Draft", None).await;
    let url = format!("/api/v1/documents/{}", doc["id"].as_str().unwrap());

    let response = server
        .patch(&url)
        .json(&serde_json::json!({ "title": "   " }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn move_document_between_folders_keeps_counts() {
    let env = common::TestEnv::new();
    let server = env.server();
    common::login(&server, "demo").await;

    let research = common::create_folder(&server, "Research", None).await;
    let personal = common::create_folder(&server, "Personal", None).await;
    let research_id = research["id"].as_str().unwrap();
    let personal_id = personal["id"].as_str().unwrap();

    let doc = common::upload_markdown(&server, "paper.md", "# Paper", Some(research_id)).await;
    let url = format!("/api/v1/documents/{}/folder", doc["id"].as_str().unwrap());

    let moved: serde_json::Value = server
        .put(&url)
        .json(&serde_json::json!({ "folder_id": personal_id }))
        .await
        .json();
    assert_eq!(moved["folder_id"].as_str(), Some(personal_id));

    let count_of = |folders: &serde_json::Value, id: &str| {
        folders
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["id"].as_str() == Some(id))
            .and_then(|f| f["document_count"].as_i64())
    };

    let folders: serde_json::Value = server.get("/api/v1/folders").await.json();
    assert_eq!(count_of(&folders, research_id), Some(0));
    assert_eq!(count_of(&folders, personal_id), Some(1));

    let unfiled: serde_json::Value = server
        .put(&url)
        .json(&serde_json::json!({ "folder_id": null }))
        .await
        .json();
    assert!(unfiled["folder_id"].is_null());

    let folders: serde_json::Value = server.get("/api/v1/folders").await.json();
    assert_eq!(count_of(&folders, personal_id), Some(0));
}

#[tokio::test]
async fn move_into_unknown_folder_is_rejected() {
    let env = common::TestEnv::new();
    let server = env.server_permissive();
    common::login(&server, "demo").await;
    let doc = common::upload_markdown(&server, "paper.md", "# Paper", None).await;

    let response = server
        .put(&format!("/api/v1/documents/{}/folder", doc["id"].as_str().unwrap()))
        .json(&serde_json::json!({ "folder_id": "missing" }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn delete_removes_document_and_stored_file() {
    use grasp::storage::client::StorageClient;

    let env = common::TestEnv::new();
    let server = env.server_permissive();
    common::login(&server, "demo").await;

    let folder = common::create_folder(&server, "Research", None).await;
    let folder_id = folder["id"].as_str().unwrap();
    let doc = common::upload_markdown(&server, "paper.md", "# Paper", Some(folder_id)).await;
    let url = format!("/api/v1/documents/{}", doc["id"].as_str().unwrap());

    server.delete(&url).await.assert_status(axum::http::StatusCode::NO_CONTENT);
    server.get(&url).await.assert_status_not_found();

    let key = doc["storage_key"].as_str().unwrap();
    assert_eq!(env.state.storage_client.get_object(key).await.unwrap(), None);

    let folders: serde_json::Value = server.get("/api/v1/folders").await.json();
    assert_eq!(folders[0]["document_count"].as_i64(), Some(0));
}

#[tokio::test]
async fn seeded_demo_library_is_listed() {
    let env = common::TestEnv::new();
    grasp::demo_seeder::seed_demo_data(&env.state).await;

    let server = env.server();
    common::login(&server, "demo").await;

    let docs: serde_json::Value = server.get("/api/v1/documents").await.json();
    let titles: Vec<&str> = docs
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Product Strategy 2024", "Market Analysis Report"]);

    let tree: serde_json::Value = server.get("/api/v1/folders/tree").await.json();
    let roots: Vec<&str> = tree
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert!(roots.contains(&"Strategy"));
}
