//! SQLite backend.
//!
//! Two tables:
//! - `profiles` — one row per student: identity fields and the three summaries
//! - `interactions` — the append-only log, ordered by an autoincrement key
//!
//! Appends insert into `interactions` only when the profile exists, in the
//! same statement, so a concurrent append never lands on a missing profile.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use padhai_core::error::StoreError;
use padhai_core::profile::{Interaction, StudentId, StudentIdentity, StudentProfile, SummaryField};
use padhai_core::store::ProfileStore;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// A SQLite-backed profile store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and run migrations.
    ///
    /// Pass `"sqlite::memory:"` for an ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite profile store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id               TEXT PRIMARY KEY NOT NULL,
                name             TEXT NOT NULL,
                standard         TEXT NOT NULL,
                subject          TEXT NOT NULL,
                like_study       TEXT NOT NULL,
                basic_summary    TEXT NOT NULL DEFAULT '',
                tracking_summary TEXT NOT NULL DEFAULT '',
                guide_summary    TEXT NOT NULL DEFAULT '',
                created_at       TEXT NOT NULL,
                updated_at       TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("profiles table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS interactions (
                iid         INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id  TEXT NOT NULL REFERENCES profiles(id),
                agent       TEXT NOT NULL,
                subject     TEXT NOT NULL,
                evaluation  TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("interactions table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_interactions_student ON interactions(student_id, iid)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("interactions index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn parse_time(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn text(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<String, StoreError> {
        row.try_get(column)
            .map_err(|e| StoreError::QueryFailed(format!("{column} column: {e}")))
    }

    fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Result<StudentProfile, StoreError> {
        Ok(StudentProfile {
            id: StudentId(Self::text(row, "id")?),
            identity: StudentIdentity {
                name: Self::text(row, "name")?,
                standard: Self::text(row, "standard")?,
                subject: Self::text(row, "subject")?,
                like_study: Self::text(row, "like_study")?,
            },
            basic_summary: Self::text(row, "basic_summary")?,
            tracking_summary: Self::text(row, "tracking_summary")?,
            guide_summary: Self::text(row, "guide_summary")?,
            interactions: Vec::new(),
            created_at: Self::parse_time(&Self::text(row, "created_at")?),
            updated_at: Self::parse_time(&Self::text(row, "updated_at")?),
        })
    }

    fn row_to_interaction(row: &sqlx::sqlite::SqliteRow) -> Result<Interaction, StoreError> {
        Ok(Interaction {
            agent: Self::text(row, "agent")?,
            subject: Self::text(row, "subject")?,
            evaluation: Self::text(row, "evaluation")?,
            recorded_at: Self::parse_time(&Self::text(row, "recorded_at")?),
        })
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn insert(&self, profile: StudentProfile) -> Result<StudentId, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Storage(format!("BEGIN failed: {e}")))?;

        let result = sqlx::query(
            r#"
            INSERT INTO profiles (id, name, standard, subject, like_study,
                                  basic_summary, tracking_summary, guide_summary,
                                  created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&profile.id.0)
        .bind(&profile.identity.name)
        .bind(&profile.identity.standard)
        .bind(&profile.identity.subject)
        .bind(&profile.identity.like_study)
        .bind(&profile.basic_summary)
        .bind(&profile.tracking_summary)
        .bind(&profile.guide_summary)
        .bind(profile.created_at.to_rfc3339())
        .bind(profile.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(StoreError::Duplicate(profile.id.to_string()));
            }
            Err(e) => return Err(StoreError::Storage(format!("INSERT failed: {e}"))),
        }

        // Seeded log entries go in with the row; a failure rolls both back.
        for interaction in &profile.interactions {
            sqlx::query(
                r#"
                INSERT INTO interactions (student_id, agent, subject, evaluation, recorded_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&profile.id.0)
            .bind(&interaction.agent)
            .bind(&interaction.subject)
            .bind(&interaction.evaluation)
            .bind(interaction.recorded_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Storage(format!("INSERT interaction failed: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Storage(format!("COMMIT failed: {e}")))?;

        debug!("Stored profile {}", profile.id);
        Ok(profile.id)
    }

    async fn get(&self, id: &StudentId) -> Result<Option<StudentProfile>, StoreError> {
        let row = sqlx::query("SELECT * FROM profiles WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("GET profile: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut profile = Self::row_to_profile(&row)?;

        let rows = sqlx::query(
            "SELECT agent, subject, evaluation, recorded_at FROM interactions \
             WHERE student_id = ?1 ORDER BY iid",
        )
        .bind(&id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("GET interactions: {e}")))?;

        profile.interactions = rows
            .iter()
            .map(Self::row_to_interaction)
            .collect::<Result<_, _>>()?;

        Ok(Some(profile))
    }

    async fn set_summary(
        &self,
        id: &StudentId,
        field: SummaryField,
        text: &str,
    ) -> Result<bool, StoreError> {
        // Column names come from a closed enum, never from input.
        let sql = format!(
            "UPDATE profiles SET {} = ?1, updated_at = ?2 WHERE id = ?3",
            field.key()
        );
        let result = sqlx::query(&sql)
            .bind(text)
            .bind(Utc::now().to_rfc3339())
            .bind(&id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("UPDATE {} failed: {e}", field.key())))?;

        debug!(student = %id, field = field.key(), "Summary overwritten");
        Ok(result.rows_affected() > 0)
    }

    async fn append_interaction(
        &self,
        id: &StudentId,
        interaction: Interaction,
    ) -> Result<bool, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Storage(format!("BEGIN failed: {e}")))?;

        let result = sqlx::query(
            r#"
            INSERT INTO interactions (student_id, agent, subject, evaluation, recorded_at)
            SELECT ?1, ?2, ?3, ?4, ?5
            WHERE EXISTS (SELECT 1 FROM profiles WHERE id = ?1)
            "#,
        )
        .bind(&id.0)
        .bind(&interaction.agent)
        .bind(&interaction.subject)
        .bind(&interaction.evaluation)
        .bind(interaction.recorded_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT interaction failed: {e}")))?;

        let appended = result.rows_affected() > 0;
        if appended {
            sqlx::query("UPDATE profiles SET updated_at = ?1 WHERE id = ?2")
                .bind(Utc::now().to_rfc3339())
                .bind(&id.0)
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::Storage(format!("UPDATE updated_at failed: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Storage(format!("COMMIT failed: {e}")))?;

        Ok(appended)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("COUNT: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::QueryFailed(format!("cnt column: {e}")))?;

        Ok(cnt as usize)
    }
}
