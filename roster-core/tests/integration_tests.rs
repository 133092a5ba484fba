//! Integration tests for roster-core: file import against a real SQLite file

use std::io::Write;
use std::sync::Arc;

use roster_core::{
    AccessPolicy, AuthError, CsvImporter, EmployeeStore, ImportError, NewEmployee,
    StaticAuthenticator, StoreError,
};
use tempfile::TempDir;

async fn file_store(dir: &TempDir) -> EmployeeStore {
    let url = format!("sqlite:{}", dir.path().join("nested/data.db").display());
    EmployeeStore::connect(&url).await.unwrap()
}

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn test_import_file_inserts_rows_in_order() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir).await;
    let importer = CsvImporter::new(store.clone());

    let path = write_csv(
        &dir,
        "employees.csv",
        "Name,Email,Role\nAlice,alice@x.com,Manager\nBob,bob@x.com,Staff\n",
    );

    let summary = importer.import_csv(&path).await.unwrap();
    assert_eq!(summary.inserted, 2);

    let employees = store.list().await.unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(
        (employees[0].name.as_str(), employees[0].email.as_str(), employees[0].role.as_str()),
        ("Alice", "alice@x.com", "Manager")
    );
    assert_eq!(
        (employees[1].name.as_str(), employees[1].email.as_str(), employees[1].role.as_str()),
        ("Bob", "bob@x.com", "Staff")
    );
    assert!(employees[0].id < employees[1].id);
}

#[tokio::test]
async fn test_reimport_with_existing_email_aborts_whole_batch() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir).await;
    store
        .insert(&NewEmployee::new("Bob", "bob@x.com", "Staff"))
        .await
        .unwrap();
    let importer = CsvImporter::new(store.clone());

    let path = write_csv(
        &dir,
        "employees.csv",
        "Name,Email,Role\nAlice,alice@x.com,Manager\nBob,bob@x.com,Staff\nCarol,carol@x.com,Staff\n",
    );

    let err = importer.import_csv(&path).await.unwrap_err();
    assert!(matches!(
        err,
        ImportError::Store(StoreError::DuplicateEmail(ref email)) if email == "bob@x.com"
    ));

    assert_eq!(store.count().await.unwrap(), 1);
    assert!(store.find_by_email("alice@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_column_inserts_nothing() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir).await;
    let importer = CsvImporter::new(store.clone());

    let path = write_csv(&dir, "employees.csv", "Name,Email\nAlice,alice@x.com\n");

    let err = importer.import_csv(&path).await.unwrap_err();
    assert!(matches!(err, ImportError::MissingColumns(ref columns) if columns == &vec!["Role"]));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_imported_manager_can_log_in() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir).await;
    let importer = CsvImporter::new(store.clone());
    importer
        .import_reader("Name,Email,Role\nAlice,alice@x.com,Manager\nBob,bob@x.com,Staff\n".as_bytes())
        .await
        .unwrap();

    let directory = StaticAuthenticator::new()
        .with_user("alice@x.com", "a")
        .with_user("bob@x.com", "b");
    let policy = AccessPolicy::new(Arc::new(directory), store);

    assert!(policy.login("alice@x.com", "a").await.is_ok());
    assert!(matches!(
        policy.login("bob@x.com", "b").await,
        Err(AuthError::AccessDenied(_))
    ));
}
