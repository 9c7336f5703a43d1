use anyhow::Result;
use shared::ResponseRecord;
#[cfg(test)]
use sqlx::Row;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

/// A response row as read back by tests
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResponse {
    pub id: String,
    pub record: ResponseRecord,
    pub created_at: String,
}

/// DbConnection manages the responses table
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and ensure the schema
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                id TEXT PRIMARY KEY,
                year TEXT NOT NULL,
                innovation REAL NOT NULL,
                equality REAL NOT NULL,
                stability REAL NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Insert a response under `id`
    pub async fn insert_response(&self, id: &str, record: &ResponseRecord, created_at: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO responses (id, year, innovation, equality, stability, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&record.period)
        .bind(record.innovation)
        .bind(record.equality)
        .bind(record.stability)
        .bind(created_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    /// Fetch a single response by id
    #[cfg(test)]
    pub async fn get_response(&self, id: &str) -> Result<Option<StoredResponse>> {
        let row = sqlx::query(
            "SELECT id, year, innovation, equality, stability, created_at FROM responses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| StoredResponse {
            id: r.get("id"),
            record: ResponseRecord {
                period: r.get("year"),
                innovation: r.get("innovation"),
                equality: r.get("equality"),
                stability: r.get("stability"),
            },
            created_at: r.get("created_at"),
        }))
    }

    /// Number of responses stored for a period
    #[cfg(test)]
    pub async fn count_responses(&self, period: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM responses WHERE year = ?")
            .bind(period)
            .fetch_one(&*self.pool)
            .await?;
        Ok(row.get("total"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    fn record(period: &str) -> ResponseRecord {
        ResponseRecord {
            period: period.to_string(),
            innovation: 0.3,
            equality: 0.3,
            stability: 0.4,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_response() {
        let db = setup_test().await;

        db.insert_response("r1", &record("2025"), "2025-03-01T10:00:00Z")
            .await
            .expect("Failed to insert response");

        let stored = db.get_response("r1").await.expect("Failed to get response");
        let stored = stored.expect("response should exist");
        assert_eq!(stored.record, record("2025"));
        assert_eq!(stored.created_at, "2025-03-01T10:00:00Z");
    }

    #[tokio::test]
    async fn test_get_missing_response() {
        let db = setup_test().await;
        let result = db.get_response("missing").await.expect("Query failed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let db = setup_test().await;
        db.insert_response("dup", &record("2025"), "t").await.unwrap();
        assert!(db.insert_response("dup", &record("2025"), "t").await.is_err());
    }

    #[tokio::test]
    async fn test_count_responses_by_period() {
        let db = setup_test().await;
        db.insert_response("a", &record("2025"), "t").await.unwrap();
        db.insert_response("b", &record("2025"), "t").await.unwrap();
        db.insert_response("c", &record("2024"), "t").await.unwrap();

        assert_eq!(db.count_responses("2025").await.unwrap(), 2);
        assert_eq!(db.count_responses("2024").await.unwrap(), 1);
        assert_eq!(db.count_responses("2023").await.unwrap(), 0);
    }
}
