use chrono::{Duration, Utc};

use crate::auth::demo_auth::demo_accounts;
use crate::db::models::{Document, DocumentStatus, Folder, LensSet};
use crate::error::AppError;
use crate::rendering::markdown::plain_preview;
use crate::state::AppState;
use crate::storage::client::document_key;
use crate::upload::pipeline::PREVIEW_CHARS;

struct SeedFolder {
    key: &'static str,
    name: &'static str,
    parent: Option<&'static str>,
}

const SEED_FOLDERS: &[SeedFolder] = &[
    SeedFolder { key: "strategy", name: "Strategy", parent: None },
    SeedFolder { key: "quarterly", name: "Quarterly Reviews", parent: Some("strategy") },
    SeedFolder { key: "planning", name: "Planning", parent: Some("strategy") },
    SeedFolder { key: "research", name: "Research", parent: None },
    SeedFolder { key: "personal", name: "Personal", parent: None },
];

struct SeedDocument {
    key: &'static str,
    title: &'static str,
    file_name: &'static str,
    mime: &'static str,
    file_size: u64,
    folder: &'static str,
    tags: &'static [&'static str],
    days_ago: i64,
    content: &'static str,
}

const SEED_DOCUMENTS: &[SeedDocument] = &[
    SeedDocument {
        key: "product-strategy-2024",
        title: "Product Strategy 2024",
        file_name: "product-strategy-2024.pdf",
        mime: "application/pdf",
        file_size: 2_457_600,
        folder: "strategy",
        tags: &["strategy", "product"],
        days_ago: 1,
        content: include_str!("../demo_data/product_strategy_2024.md"),
    },
    SeedDocument {
        key: "market-analysis",
        title: "Market Analysis Report",
        file_name: "market-analysis.docx",
        mime: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        file_size: 1_234_567,
        folder: "research",
        tags: &["research", "market"],
        days_ago: 2,
        content: include_str!("../demo_data/market_analysis_report.md"),
    },
];

/// Seed ids are derived from the user so seeding twice finds its own records.
fn seed_id(user_id: &str, key: &str) -> String {
    format!("{user_id}-{key}")
}

/// Give every demo account the sample library. Failures are logged per user
/// and do not stop startup.
pub async fn seed_demo_data(state: &AppState) {
    tracing::info!("Starting demo data seeding...");

    for account in demo_accounts() {
        match seed_user(state, &account.user_id).await {
            Ok(true) => tracing::info!(user_id = %account.user_id, "seeded demo library"),
            Ok(false) => {
                tracing::info!(user_id = %account.user_id, "demo library already present, skipping")
            }
            Err(e) => tracing::error!(user_id = %account.user_id, "failed to seed demo library: {e}"),
        }
    }

    tracing::info!("Demo data seeding completed.");
}

/// Returns `false` when the user was already seeded.
pub async fn seed_user(state: &AppState, user_id: &str) -> Result<bool, AppError> {
    let marker = seed_id(user_id, SEED_FOLDERS[0].key);
    if state.folder_repo.find_by_id(&marker).await?.is_some() {
        return Ok(false);
    }

    let now = Utc::now();

    for seed in SEED_FOLDERS {
        let document_count = SEED_DOCUMENTS.iter().filter(|d| d.folder == seed.key).count() as i64;
        state
            .folder_repo
            .insert(Folder {
                id: seed_id(user_id, seed.key),
                name: seed.name.to_string(),
                user_id: user_id.to_string(),
                parent_id: seed.parent.map(|p| seed_id(user_id, p)),
                document_count,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }

    for seed in SEED_DOCUMENTS {
        let id = seed_id(user_id, seed.key);
        let storage_key = document_key(user_id, &id, seed.file_name);

        // The stored original is the markdown itself; a failed put only costs the download.
        if let Err(e) = state
            .storage_client
            .put_object(&storage_key, seed.content.as_bytes().to_vec(), "text/markdown")
            .await
        {
            tracing::warn!(document_id = %id, "failed to store seed file: {e}");
        }

        let created = now - Duration::days(seed.days_ago);
        state
            .document_repo
            .insert(Document {
                id,
                title: seed.title.to_string(),
                content: seed.content.to_string(),
                original_file_name: seed.file_name.to_string(),
                file_type: seed.mime.to_string(),
                file_size: seed.file_size,
                storage_key,
                user_id: user_id.to_string(),
                folder_id: Some(seed_id(user_id, seed.folder)),
                tags: seed.tags.iter().map(|t| t.to_string()).collect(),
                lenses: LensSet::default(),
                status: DocumentStatus::Ready,
                preview: Some(plain_preview(seed.content, PREVIEW_CHARS)),
                created_at: created,
                updated_at: created,
            })
            .await?;
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DocumentFilter;

    #[tokio::test]
    async fn test_seeds_folders_and_documents() {
        let state = AppState::in_memory();
        assert!(seed_user(&state, "demo-demo").await.unwrap());

        let folders = state.folder_repo.list_for_user("demo-demo").await.unwrap();
        assert_eq!(folders.len(), 5);
        let strategy = folders.iter().find(|f| f.name == "Strategy").unwrap();
        assert_eq!(strategy.document_count, 1);
        let planning = folders.iter().find(|f| f.name == "Planning").unwrap();
        assert_eq!(planning.parent_id.as_deref(), Some(strategy.id.as_str()));

        let docs = state
            .document_repo
            .list_for_user("demo-demo", &DocumentFilter::All)
            .await
            .unwrap();
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert!(titles.contains(&"Product Strategy 2024"));
        assert!(titles.contains(&"Market Analysis Report"));
        assert!(docs.iter().all(|d| d.preview.is_some()));
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let state = AppState::in_memory();
        assert!(seed_user(&state, "demo-demo").await.unwrap());
        assert!(!seed_user(&state, "demo-demo").await.unwrap());

        let docs = state
            .document_repo
            .list_for_user("demo-demo", &DocumentFilter::All)
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[tokio::test]
    async fn test_every_demo_account_is_seeded() {
        let state = AppState::in_memory();
        seed_demo_data(&state).await;

        for account in demo_accounts() {
            let folders = state.folder_repo.list_for_user(&account.user_id).await.unwrap();
            assert_eq!(folders.len(), 5);
        }
    }
}
