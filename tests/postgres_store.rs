// Runs against a real database only when DATABASE_URL is set.

mod common;

use anyhow::Result;
use futures::future::join_all;
use orgres_api::alteration::Alterator;
use orgres_api::client::{RoleClient, ScopeClient};
use orgres_api::database::DatabaseManager;
use orgres_api::server::Stores;
use orgres_api::types::{CreateInput, ListQuery, UpdateInput};
use reqwest::StatusCode;

use common::{random_name, TestServer};

async fn postgres_server() -> Result<Option<TestServer>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return Ok(None);
    };
    let pool = DatabaseManager::connect_url(&url, 5, 10).await?;
    Alterator::new(pool.clone()).ensure_baseline().await?;
    Ok(Some(TestServer::spawn_with(Stores::postgres(pool)).await?))
}

#[tokio::test]
async fn postgres_enforces_unique_names_under_concurrency() -> Result<()> {
    let Some(server) = postgres_server().await? else {
        return Ok(());
    };
    let scopes = ScopeClient::new(&server.base_url)?;

    let input = CreateInput::new(random_name());
    let results = join_all((0..8).map(|_| scopes.create(&input))).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.code() == Some("entity.duplicate_value_of_unique_field")));

    Ok(())
}

#[tokio::test]
async fn postgres_crud_roundtrip() -> Result<()> {
    let Some(server) = postgres_server().await? else {
        return Ok(());
    };
    let scopes = ScopeClient::new(&server.base_url)?;

    let created = scopes.create(&CreateInput::new(random_name())).await?;
    assert_eq!(scopes.get(&created.id).await?, created);
    assert_eq!(created.description, None);

    let (page, total) = scopes.list_with_total(&ListQuery::default()).await?;
    assert!(page.len() <= 20);
    assert!(total.unwrap_or(0) >= 1);

    scopes.delete(&created.id).await?;
    let err = scopes.get(&created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    Ok(())
}

// Roles are only written by this test, so paging over them is stable.
#[tokio::test]
async fn postgres_rename_collision_and_paging() -> Result<()> {
    let Some(server) = postgres_server().await? else {
        return Ok(());
    };
    let roles = RoleClient::new(&server.base_url)?;

    let first = roles.create(&CreateInput::new(random_name())).await?;
    let second = roles.create(&CreateInput::new(random_name())).await?;

    let err = roles
        .update(&second.id, &UpdateInput::default().name(first.name.clone()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.code(), Some("entity.duplicate_value_of_unique_field"));
    assert_eq!(roles.get(&second.id).await?, second);

    let renamed = roles
        .update(&second.id, &UpdateInput::default().name(second.name.clone()))
        .await?;
    assert_eq!(renamed, second);

    for _ in 0..25 {
        roles.create(&CreateInput::new(random_name())).await?;
    }
    let default_page = roles.list(&ListQuery::default()).await?;
    assert_eq!(default_page.len(), 20);
    let second_page = roles.list(&ListQuery::page(2, 10)).await?;
    assert_eq!(second_page.len(), 10);
    assert_eq!(second_page[0], default_page[10]);

    let err = roles
        .create(&CreateInput::new("bad\u{0}name"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.code(), Some("guard.invalid_input"));

    Ok(())
}
