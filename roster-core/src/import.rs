//! CSV employee import
//!
//! The header row must contain `Name`, `Email` and `Role`; other columns are
//! ignored. Every row needs a value in each of those columns. Rows are inserted in file order and committed as one unit, so a
//! single bad row (for example a duplicate email) discards the whole file.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::ImportError;
use crate::logging::{performance, AUDIT_TARGET};
use crate::store::EmployeeStore;
use crate::types::{ImportSummary, NewEmployee};

pub const NAME_COLUMN: &str = "Name";
pub const EMAIL_COLUMN: &str = "Email";
pub const ROLE_COLUMN: &str = "Role";

#[derive(Debug, Clone)]
pub struct CsvImporter {
    store: EmployeeStore,
}

impl CsvImporter {
    pub fn new(store: EmployeeStore) -> Self {
        Self { store }
    }

    /// Import the CSV file at `path`
    pub async fn import_csv(&self, path: impl AsRef<Path>) -> Result<ImportSummary, ImportError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        debug!("Importing employees from {}", path.display());

        let source = path.clone();
        let rows = tokio::task::spawn_blocking(move || parse_rows(File::open(source)?))
            .await
            .map_err(|e| ImportError::Io(std::io::Error::other(e)))??;

        let summary = self.insert(rows).await?;
        info!(
            target: AUDIT_TARGET,
            file = %path.display(),
            inserted = summary.inserted,
            "Employee CSV imported"
        );
        Ok(summary)
    }

    /// Import CSV data from an in-memory reader
    pub async fn import_reader<R: Read>(&self, reader: R) -> Result<ImportSummary, ImportError> {
        let rows = parse_rows(reader)?;
        self.insert(rows).await
    }

    async fn insert(&self, rows: Vec<NewEmployee>) -> Result<ImportSummary, ImportError> {
        let inserted =
            performance::measure_async("import_employees", self.store.insert_batch(&rows)).await?;
        Ok(ImportSummary { inserted })
    }
}

/// Parse CSV data into employees, in file order
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<NewEmployee>, ImportError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = reader.headers()?.clone();
    let position = |column: &str| headers.iter().position(|header| header == column);

    let (name, email, role) = match (
        position(NAME_COLUMN),
        position(EMAIL_COLUMN),
        position(ROLE_COLUMN),
    ) {
        (Some(name), Some(email), Some(role)) => (name, email, role),
        (name, email, role) => {
            let missing = [(NAME_COLUMN, name), (EMAIL_COLUMN, email), (ROLE_COLUMN, role)]
                .into_iter()
                .filter(|(_, index)| index.is_none())
                .map(|(column, _)| column)
                .collect();
            return Err(ImportError::MissingColumns(missing));
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(NewEmployee {
            name: field(&record, name, NAME_COLUMN)?,
            email: field(&record, email, EMAIL_COLUMN)?,
            role: field(&record, role, ROLE_COLUMN)?,
        });
    }

    Ok(rows)
}

/// Non-empty value of `column`, or the file line where it is blank
fn field(record: &StringRecord, index: usize, column: &'static str) -> Result<String, ImportError> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ImportError::MissingValue {
            row: record.position().map_or(0, |position| position.line()),
            column,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_parse_rows_in_file_order() {
        let data = "Name,Email,Role\nAlice,alice@x.com,Manager\nBob,bob@x.com,Staff\n";
        let rows = parse_rows(data.as_bytes()).unwrap();

        assert_eq!(
            rows,
            vec![
                NewEmployee::new("Alice", "alice@x.com", "Manager"),
                NewEmployee::new("Bob", "bob@x.com", "Staff"),
            ]
        );
    }

    #[test]
    fn test_parse_rows_columns_in_any_order() {
        let data = "Role,Department,Email,Name\nManager,Sales,alice@x.com,Alice\n";
        let rows = parse_rows(data.as_bytes()).unwrap();
        assert_eq!(rows, vec![NewEmployee::new("Alice", "alice@x.com", "Manager")]);
    }

    #[test]
    fn test_parse_rows_skips_blank_lines_and_trims() {
        let data = "Name, Email ,Role\n\n Alice , alice@x.com ,Manager\n\n";
        let rows = parse_rows(data.as_bytes()).unwrap();
        assert_eq!(rows, vec![NewEmployee::new("Alice", "alice@x.com", "Manager")]);
    }

    #[test]
    fn test_parse_rows_header_names_are_case_sensitive() {
        let data = "name,email,role\nAlice,alice@x.com,Manager\n";
        let err = parse_rows(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingColumns(columns) if columns == vec!["Name", "Email", "Role"]
        ));
    }

    #[test]
    fn test_parse_rows_missing_role_column() {
        let data = "Name,Email\nAlice,alice@x.com\n";
        let err = parse_rows(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumns(columns) if columns == vec![ROLE_COLUMN]));
    }

    #[test]
    fn test_parse_rows_reports_every_missing_column() {
        let data = "Name,Department\nAlice,Sales\n";
        let err = parse_rows(data.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required columns: Email, Role");
    }

    #[test]
    fn test_parse_rows_blank_value_is_an_error() {
        let data = "Name,Email,Role\nAlice,alice@x.com,Manager\nBob,bob@x.com,  \n";
        let err = parse_rows(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingValue { row: 3, column: "Role" }));
    }

    #[tokio::test]
    async fn test_import_reader_blank_fields_insert_nothing() {
        let store = EmployeeStore::connect("sqlite::memory:").await.unwrap();
        let importer = CsvImporter::new(store.clone());

        let data = "Name,Email,Role\n,,\nBob,bob@x.com,\n";
        let err = importer.import_reader(data.as_bytes()).await.unwrap_err();

        assert!(matches!(err, ImportError::MissingValue { row: 2, column: "Name" }));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[test]
    fn test_parse_rows_ragged_row_is_an_error() {
        let data = "Name,Email,Role\nAlice,alice@x.com\n";
        let err = parse_rows(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::Csv(_)));
    }

    #[tokio::test]
    async fn test_import_reader_duplicate_in_file_aborts_batch() {
        let store = EmployeeStore::connect("sqlite::memory:").await.unwrap();
        let importer = CsvImporter::new(store.clone());

        let data = "Name,Email,Role\nAlice,alice@x.com,Manager\nAlice2,alice@x.com,Staff\n";
        let err = importer.import_reader(data.as_bytes()).await.unwrap_err();

        assert!(matches!(
            err,
            ImportError::Store(StoreError::DuplicateEmail(email)) if email == "alice@x.com"
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_csv_missing_file() {
        let store = EmployeeStore::connect("sqlite::memory:").await.unwrap();
        let importer = CsvImporter::new(store);

        let err = importer
            .import_csv("/nonexistent/employees.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
