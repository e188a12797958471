use libsql::{Builder, Connection, Transaction};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// Process-wide database handle. Cheap to clone; each logical operation
/// acquires its own connection or unit of work.
pub struct Database {
    db: Arc<libsql::Database>,
    busy_timeout_ms: u64,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let busy_timeout_ms = std::env::var("DATABASE_BUSY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5000);

        let db = if config.url.starts_with("libsql://") || config.url.starts_with("https://") {
            if let Some(ref local_path) = config.local_path {
                Builder::new_remote_replica(
                    local_path,
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            } else {
                Builder::new_remote(
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            }
        } else if config.url == ":memory:" {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let database = Self {
            db: Arc::new(db),
            busy_timeout_ms,
        };
        database.configure_database().await?;
        database.init_schema().await?;

        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }

    /// Acquire a scoped transactional unit of work. Dropping it without
    /// calling [`UnitOfWork::commit`] rolls the transaction back.
    pub async fn begin(&self) -> Result<UnitOfWork> {
        let conn = self.connect()?;
        let tx = conn.transaction().await?;
        Ok(UnitOfWork { tx })
    }

    async fn configure_database(&self) -> Result<()> {
        let conn = self.connect()?;

        let busy_timeout_sql = format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms);
        if let Err(error) = conn.execute_batch(&busy_timeout_sql).await {
            tracing::warn!(
                busy_timeout_ms = self.busy_timeout_ms,
                error = %error,
                "Failed to set SQLite busy_timeout"
            );
        }

        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        schema::init_schema(&conn).await?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }
}

/// One atomic, all-or-nothing persistence scope. Repository methods run
/// against [`UnitOfWork::conn`]; every exit path either commits explicitly
/// or rolls back on drop, so a prompt can never be left committed without
/// its sentiment rows.
pub struct UnitOfWork {
    tx: Transaction,
}

impl UnitOfWork {
    pub fn conn(&self) -> &Connection {
        &self.tx
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::FaqRepository;
    use crate::models::Faq;

    // Connections to :memory: don't share state, so cross-connection
    // assertions need a file-backed database.
    async fn test_database() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("file:{}", dir.path().join("test.db").display()),
            auth_token: None,
            local_path: None,
        };
        (Database::new(&config).await.unwrap(), dir)
    }

    #[tokio::test]
    async fn commit_persists_writes() {
        let (db, _dir) = test_database().await;

        let uow = db.begin().await.unwrap();
        let faq = Faq::new("How do I reset?".to_string(), "From settings.".to_string());
        FaqRepository::create(uow.conn(), &faq).await.unwrap();
        uow.commit().await.unwrap();

        let conn = db.connect().unwrap();
        let faqs = FaqRepository::list_all(&conn).await.unwrap();
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "How do I reset?");
    }

    #[tokio::test]
    async fn rollback_discards_writes() {
        let (db, _dir) = test_database().await;

        let uow = db.begin().await.unwrap();
        let faq = Faq::new("Q".to_string(), "A".to_string());
        FaqRepository::create(uow.conn(), &faq).await.unwrap();
        uow.rollback().await.unwrap();

        let conn = db.connect().unwrap();
        let faqs = FaqRepository::list_all(&conn).await.unwrap();
        assert!(faqs.is_empty());
    }

    #[tokio::test]
    async fn drop_without_commit_discards_writes() {
        let (db, _dir) = test_database().await;

        {
            let uow = db.begin().await.unwrap();
            let faq = Faq::new("Q".to_string(), "A".to_string());
            FaqRepository::create(uow.conn(), &faq).await.unwrap();
            // uow dropped here without commit
        }

        let conn = db.connect().unwrap();
        let faqs = FaqRepository::list_all(&conn).await.unwrap();
        assert!(faqs.is_empty());
    }
}
