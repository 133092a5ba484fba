//! SQLite-backed employee store

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::types::{EmployeeRecord, NewEmployee};

/// Persistent table of employees.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct EmployeeStore {
    pool: SqlitePool,
}

impl EmployeeStore {
    /// Connect to `database_url` and create the employee table if needed.
    ///
    /// In-memory databases are pinned to a single long-lived connection,
    /// otherwise every pooled connection would see its own empty database.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to employee database: {}", database_url);

        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await?
        } else {
            let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    info!("Creating database directory: {}", parent.display());
                    std::fs::create_dir_all(parent)?;
                }
            }

            SqlitePoolOptions::new().connect_with(options).await?
        };

        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS employee (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Employee table ready");
        Ok(())
    }

    /// Look up an employee by email (exact match)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, StoreError> {
        let record = sqlx::query_as::<_, EmployeeRecord>(
            "SELECT id, name, email, role FROM employee WHERE email = ? LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Insert a single employee
    pub async fn insert(&self, employee: &NewEmployee) -> Result<EmployeeRecord, StoreError> {
        let result = sqlx::query("INSERT INTO employee (name, email, role) VALUES (?, ?, ?)")
            .bind(&employee.name)
            .bind(&employee.email)
            .bind(&employee.role)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &employee.email))?;

        Ok(EmployeeRecord {
            id: result.last_insert_rowid(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            role: employee.role.clone(),
        })
    }

    /// Insert all employees in order inside one transaction.
    ///
    /// Any failure rolls the whole batch back; nothing is committed.
    pub async fn insert_batch(&self, employees: &[NewEmployee]) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;

        for employee in employees {
            sqlx::query("INSERT INTO employee (name, email, role) VALUES (?, ?, ?)")
                .bind(&employee.name)
                .bind(&employee.email)
                .bind(&employee.role)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_insert_error(e, &employee.email))?;
        }

        // Dropping `tx` on the error path above rolls back.
        tx.commit().await?;
        debug!("Committed {} employee rows", employees.len());
        Ok(employees.len())
    }

    /// All employees in insertion order
    pub async fn list(&self) -> Result<Vec<EmployeeRecord>, StoreError> {
        let records = sqlx::query_as::<_, EmployeeRecord>(
            "SELECT id, name, email, role FROM employee ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn map_insert_error(error: sqlx::Error, email: &str) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateEmail(email.to_string())
        }
        _ => StoreError::Database(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> EmployeeStore {
        EmployeeStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = memory_store().await;

        let stored = store
            .insert(&NewEmployee::new("Alice", "alice@x.com", "Manager"))
            .await
            .unwrap();
        assert!(stored.id > 0);

        let found = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert!(store.find_by_email("ALICE@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_reported() {
        let store = memory_store().await;
        store
            .insert(&NewEmployee::new("Alice", "alice@x.com", "Manager"))
            .await
            .unwrap();

        let err = store
            .insert(&NewEmployee::new("Other Alice", "alice@x.com", "Staff"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "alice@x.com"));
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let store = memory_store().await;
        store
            .insert(&NewEmployee::new("Bob", "bob@x.com", "Staff"))
            .await
            .unwrap();

        let batch = vec![
            NewEmployee::new("Carol", "carol@x.com", "Staff"),
            NewEmployee::new("Bob Again", "bob@x.com", "Staff"),
            NewEmployee::new("Dave", "dave@x.com", "Staff"),
        ];
        let err = store.insert_batch(&batch).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));

        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.find_by_email("carol@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let store = memory_store().await;
        let batch = vec![
            NewEmployee::new("Zed", "zed@x.com", "Staff"),
            NewEmployee::new("Amy", "amy@x.com", "Manager"),
        ];

        assert_eq!(store.insert_batch(&batch).await.unwrap(), 2);

        let emails: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.email)
            .collect();
        assert_eq!(emails, vec!["zed@x.com", "amy@x.com"]);
    }
}
