//! Versioned schema alterations.
//!
//! Each script carries a version of the form `<release>-<unix timestamp>-<slug>`.
//! The timestamp orders scripts and is what `_alteration_state` records as
//! "applied up to". Every script runs in its own transaction together with the
//! state update, so a failure leaves the database at the previous script.

pub mod baseline;
pub mod scripts;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use tracing::info;

/// Key for `pg_advisory_xact_lock`, serializing concurrent alterators
const ALTERATION_LOCK_KEY: i64 = 0x6f72_6772_6573; // "orgres"

#[derive(Debug, Error)]
pub enum AlterationError {
    #[error("Invalid alteration version: {0}")]
    InvalidVersion(String),

    #[error("Alteration {next} is not newer than {previous}")]
    OutOfOrder {
        previous: &'static str,
        next: &'static str,
    },

    #[error("Alteration {version} failed: {source}")]
    Failed {
        version: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A forward/backward pair of SQL statement lists
#[derive(Debug, Clone, Copy)]
pub struct AlterationScript {
    pub version: &'static str,
    pub up: &'static [&'static str],
    pub down: &'static [&'static str],
}

impl AlterationScript {
    /// Monotonic version stamp (the second dash-separated segment)
    pub fn timestamp(&self) -> Result<i64, AlterationError> {
        self.version
            .split('-')
            .nth(1)
            .and_then(|segment| segment.parse::<i64>().ok())
            .filter(|ts| *ts > 0)
            .ok_or_else(|| AlterationError::InvalidVersion(self.version.to_string()))
    }
}

/// Validate ordering and pair every script with its timestamp
pub fn ordered(
    scripts: &'static [AlterationScript],
) -> Result<Vec<(i64, &'static AlterationScript)>, AlterationError> {
    let mut out: Vec<(i64, &'static AlterationScript)> = Vec::with_capacity(scripts.len());
    for script in scripts {
        let ts = script.timestamp()?;
        if let Some((previous_ts, previous)) = out.last() {
            if ts <= *previous_ts {
                return Err(AlterationError::OutOfOrder {
                    previous: previous.version,
                    next: script.version,
                });
            }
        }
        out.push((ts, script));
    }
    Ok(out)
}

/// Scripts newer than `current` and not newer than `target` (all when `None`), oldest first
pub fn pending(
    scripts: &'static [AlterationScript],
    current: i64,
    target: Option<i64>,
) -> Result<Vec<(i64, &'static AlterationScript)>, AlterationError> {
    Ok(ordered(scripts)?
        .into_iter()
        .filter(|(ts, _)| *ts > current && target.map_or(true, |t| *ts <= t))
        .collect())
}

/// Applied scripts newer than `target`, newest first, each paired with the
/// timestamp the state falls back to once it is reverted
pub fn revertible(
    scripts: &'static [AlterationScript],
    current: i64,
    target: i64,
) -> Result<Vec<(i64, &'static AlterationScript)>, AlterationError> {
    let ordered = ordered(scripts)?;
    let mut out = Vec::new();
    for (index, (ts, script)) in ordered.iter().enumerate().rev() {
        if *ts > current || *ts <= target {
            continue;
        }
        let previous = if index == 0 { 0 } else { ordered[index - 1].0 };
        out.push((previous, *script));
    }
    Ok(out)
}

#[derive(Debug, Clone, Serialize)]
pub struct AlterationStatus {
    pub timestamp: i64,
    pub updated_at: DateTime<Utc>,
    pub pending: Vec<&'static str>,
}

/// Applies and reverts alteration scripts against a Postgres database
pub struct Alterator {
    pool: PgPool,
    scripts: &'static [AlterationScript],
}

impl Alterator {
    pub fn new(pool: PgPool) -> Self {
        Self::with_scripts(pool, scripts::ALL)
    }

    pub fn with_scripts(pool: PgPool, scripts: &'static [AlterationScript]) -> Self {
        Self { pool, scripts }
    }

    /// Create base tables and the state row if missing
    pub async fn ensure_baseline(&self) -> Result<(), AlterationError> {
        let mut tx = self.pool.begin().await?;
        Self::lock(&mut *tx).await?;
        for statement in baseline::STATEMENTS {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn status(&self) -> Result<AlterationStatus, AlterationError> {
        let (timestamp, updated_at) = self.state().await?;
        let pending = pending(self.scripts, timestamp, None)?
            .into_iter()
            .map(|(_, script)| script.version)
            .collect();
        Ok(AlterationStatus {
            timestamp,
            updated_at,
            pending,
        })
    }

    /// Apply pending scripts up to `target` (inclusive). Returns applied versions.
    pub async fn deploy(&self, target: Option<i64>) -> Result<Vec<&'static str>, AlterationError> {
        let (current, _) = self.state().await?;
        let mut applied = Vec::new();

        for (ts, script) in pending(self.scripts, current, target)? {
            let mut tx = self.pool.begin().await?;
            Self::lock(&mut *tx).await?;

            // Another alterator may have moved the state while we waited on the lock
            if Self::locked_state(&mut *tx).await? >= ts {
                continue;
            }

            Self::run(&mut *tx, script.version, script.up).await?;
            Self::set_state(&mut *tx, ts).await?;
            tx.commit().await?;

            info!("Applied alteration {}", script.version);
            applied.push(script.version);
        }

        Ok(applied)
    }

    /// Revert applied scripts newer than `target`, newest first. Returns reverted versions.
    pub async fn rollback(&self, target: i64) -> Result<Vec<&'static str>, AlterationError> {
        let (current, _) = self.state().await?;
        let mut reverted = Vec::new();

        for (previous, script) in revertible(self.scripts, current, target)? {
            let ts = script.timestamp()?;
            let mut tx = self.pool.begin().await?;
            Self::lock(&mut *tx).await?;

            // Already reverted by a concurrent rollback
            if Self::locked_state(&mut *tx).await? < ts {
                continue;
            }

            Self::run(&mut *tx, script.version, script.down).await?;
            Self::set_state(&mut *tx, previous).await?;
            tx.commit().await?;

            info!("Reverted alteration {}", script.version);
            reverted.push(script.version);
        }

        Ok(reverted)
    }

    async fn state(&self) -> Result<(i64, DateTime<Utc>), AlterationError> {
        let row: (i64, DateTime<Utc>) =
            sqlx::query_as("SELECT timestamp, updated_at FROM _alteration_state WHERE singleton")
                .fetch_one(&self.pool)
                .await?;
        Ok(row)
    }

    /// State as seen inside a transaction that already holds the lock
    async fn locked_state(conn: &mut PgConnection) -> Result<i64, AlterationError> {
        let (timestamp,): (i64,) =
            sqlx::query_as("SELECT timestamp FROM _alteration_state WHERE singleton")
                .fetch_one(conn)
                .await?;
        Ok(timestamp)
    }

    async fn lock(conn: &mut PgConnection) -> Result<(), AlterationError> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ALTERATION_LOCK_KEY)
            .execute(conn)
            .await?;
        Ok(())
    }

    async fn run(
        conn: &mut PgConnection,
        version: &'static str,
        statements: &[&str],
    ) -> Result<(), AlterationError> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&mut *conn)
                .await
                .map_err(|source| AlterationError::Failed { version, source })?;
        }
        Ok(())
    }

    async fn set_state(conn: &mut PgConnection, timestamp: i64) -> Result<(), AlterationError> {
        sqlx::query("UPDATE _alteration_state SET timestamp = $1, updated_at = now() WHERE singleton")
            .bind(timestamp)
            .execute(conn)
            .await?;
        Ok(())
    }
}
