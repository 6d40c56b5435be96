// Deploys and reverts the shipped alterations. Runs only when DATABASE_URL is set.

use anyhow::Result;
use orgres_api::alteration::{scripts, Alterator};
use orgres_api::database::DatabaseManager;
use sqlx::PgPool;

const CONTINUE_VERSION: &str = "1.0.0_beta.14-1667900481-add-passcode-type-continue";

async fn passcode_values(pool: &PgPool) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT e.enumlabel::text FROM pg_enum e \
         JOIN pg_type t ON t.oid = e.enumtypid \
         WHERE t.typname = 'passcode_type' ORDER BY e.enumsortorder",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(label,)| label).collect())
}

#[tokio::test]
async fn deploy_and_rollback_passcode_type() -> Result<()> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return Ok(());
    };
    let pool = DatabaseManager::connect_url(&url, 5, 10).await?;
    let alterator = Alterator::new(pool.clone());
    alterator.ensure_baseline().await?;

    // Start from the baseline regardless of earlier runs
    alterator.rollback(0).await?;
    let before = alterator.status().await?;
    assert_eq!(before.timestamp, 0);
    assert_eq!(before.pending, vec![CONTINUE_VERSION]);
    assert_eq!(passcode_values(&pool).await?, ["SignIn", "Register", "ForgotPassword"]);

    let applied = alterator.deploy(None).await?;
    assert_eq!(applied, vec![CONTINUE_VERSION]);
    let deployed = alterator.status().await?;
    assert_eq!(deployed.timestamp, 1667900481);
    assert!(deployed.pending.is_empty());
    assert!(deployed.updated_at >= before.updated_at);
    assert_eq!(
        passcode_values(&pool).await?,
        ["SignIn", "Register", "ForgotPassword", "Continue"]
    );

    assert!(alterator.deploy(None).await?.is_empty());

    // Concurrent rollbacks revert the script once
    let other = Alterator::with_scripts(pool.clone(), scripts::ALL);
    let (a, b) = tokio::join!(alterator.rollback(0), other.rollback(0));
    assert_eq!(a?.len() + b?.len(), 1);

    assert_eq!(alterator.status().await?.timestamp, 0);
    assert_eq!(passcode_values(&pool).await?, ["SignIn", "Register", "ForgotPassword"]);

    Ok(())
}
