use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Row, TypeInfo, ValueRef};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Error executing query: {0}")]
    Execution(#[from] sqlx::Error),
}

/// Column names and row values of one query run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs SQL verbatim against the store file. Each run opens and closes its
/// own connection, so one failing statement never affects the next.
#[derive(Debug, Clone)]
pub struct QueryRunner {
    path: PathBuf,
}

impl QueryRunner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn run(&self, sql: &str) -> Result<QueryResult, QueryError> {
        // The indexing service owns the file; never create it from here.
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(false);
        let mut conn = SqliteConnection::connect_with(&options).await?;

        let rows = sqlx::query(sql).fetch_all(&mut conn).await?;
        conn.close().await?;

        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?;

        Ok(QueryResult { columns, rows })
    }
}

pub fn decode_row(row: &SqliteRow) -> Result<Vec<Value>, sqlx::Error> {
    (0..row.len()).map(|index| decode_cell(row, index)).collect()
}

/// Decodes by the storage class of the value itself, since computed columns
/// (`AVG`, `CASE`, ...) carry no declared type.
fn decode_cell(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" | "NUMERIC" => Number::from_f64(row.try_get_unchecked::<f64, _>(index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::queries::QueryCatalog;
    use serde_json::json;

    pub(crate) const BOOKS_SCHEMA: &str = r#"
        CREATE TABLE IF NOT EXISTS books (
            Book_Id TEXT PRIMARY KEY, Search_Key TEXT, Book_Title TEXT, Book_Subtitle TEXT,
            Book_Authors TEXT, Book_Description TEXT, IndustryIdentifiers TEXT, PageCount INT,
            Categories TEXT, Language TEXT, ImageLinks TEXT, RatingsCount INT, AverageRating REAL,
            Country TEXT, Saleability TEXT, IsEbook BOOLEAN, Amount_ListPrice REAL,
            CurrencyCode_ListPrice TEXT, Amount_RetailPrice REAL, CurrencyCode_RetailPrice TEXT,
            BuyLink TEXT, Year TEXT
        )
    "#;

    /// Creates the `books` table and inserts `(id, authors, list, retail, is_ebook, pages, year)` rows.
    pub(crate) async fn seed(
        path: &Path,
        books: &[(&str, &str, Option<f64>, Option<f64>, Option<bool>, Option<i64>, &str)],
    ) {
        let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
        sqlx::query(BOOKS_SCHEMA).execute(&mut conn).await.unwrap();
        for &(id, authors, list, retail, is_ebook, pages, year) in books {
            sqlx::query(
                "INSERT INTO books (Book_Id, Search_Key, Book_Title, Book_Authors, Amount_ListPrice, \
                 Amount_RetailPrice, IsEbook, PageCount, Year) VALUES (?, 'dune', ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(format!("Title {}", id))
            .bind(authors)
            .bind(list)
            .bind(retail)
            .bind(is_ebook)
            .bind(pages)
            .bind(year)
            .execute(&mut conn)
            .await
            .unwrap();
        }
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn every_standard_query_runs_on_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_data.db");
        seed(&path, &[]).await;
        let runner = QueryRunner::new(&path);

        for (id, query) in QueryCatalog::standard().iter() {
            let result = runner.run(query.sql).await;
            let result = result.unwrap_or_else(|e| panic!("query {} ({}) failed: {}", id, query.name, e));
            assert!(result.is_empty(), "query {} returned rows", query.name);
            assert!(result.columns.is_empty());
        }
    }

    #[tokio::test]
    async fn discount_query_keeps_only_retail_below_80_percent_of_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_data.db");
        seed(
            &path,
            &[
                ("cheap", "A", Some(10.0), Some(7.0), Some(true), None, ""),
                ("edge", "A", Some(10.0), Some(8.0), Some(true), None, ""),
                ("full", "A", Some(10.0), Some(10.0), Some(true), None, ""),
                ("free", "A", Some(0.0), Some(0.0), Some(true), None, ""),
                ("unpriced", "A", None, None, Some(false), None, ""),
            ],
        )
        .await;

        let catalog = QueryCatalog::standard();
        let (_, query) = catalog.resolve("List Books with Discounts Greater than 20%").unwrap();
        let result = QueryRunner::new(&path).run(query.sql).await.unwrap();

        assert_eq!(
            result.columns,
            vec!["Book_Title", "Amount_ListPrice", "Amount_RetailPrice", "Discount_Percentage"]
        );
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0][0], json!("Title cheap"));
        assert!((result.rows[0][3].as_f64().unwrap() - 30.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn decodes_integers_reals_text_and_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_data.db");
        seed(
            &path,
            &[
                ("a", "A, B, C, D", Some(20.0), Some(12.5), Some(true), Some(600), "2015-01-01"),
                ("b", "E", None, None, Some(false), Some(100), "1999"),
            ],
        )
        .await;

        let result = QueryRunner::new(&path)
            .run("SELECT Book_Id, PageCount, Amount_RetailPrice, IsEbook, Subtitle_Missing FROM (SELECT *, NULL AS Subtitle_Missing FROM books) ORDER BY Book_Id")
            .await
            .unwrap();

        assert_eq!(
            result.rows,
            vec![
                vec![json!("a"), json!(600), json!(12.5), json!(1), Value::Null],
                vec![json!("b"), json!(100), Value::Null, json!(0), Value::Null],
            ]
        );
    }

    #[tokio::test]
    async fn more_than_three_authors_counts_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_data.db");
        seed(
            &path,
            &[
                ("four", "A, B, C, D", None, None, None, None, ""),
                ("three", "A, B, C", None, None, None, None, ""),
            ],
        )
        .await;

        let catalog = QueryCatalog::standard();
        let (_, query) = catalog.resolve("Retrieve Books with More than 3 Authors").unwrap();
        let result = QueryRunner::new(&path).run(query.sql).await.unwrap();

        assert_eq!(result.rows, vec![vec![json!("Title four"), json!("A, B, C, D")]]);
    }

    #[tokio::test]
    async fn malformed_sql_is_an_error_and_runner_stays_usable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_data.db");
        seed(&path, &[("a", "A", None, None, None, None, "")]).await;
        let runner = QueryRunner::new(&path);

        let err = runner.run("SELEC nothing FROM books").await.unwrap_err();
        assert!(err.to_string().starts_with("Error executing query"));

        let result = runner.run("SELECT COUNT(*) AS n FROM books").await.unwrap();
        assert_eq!(result.rows, vec![vec![json!(1)]]);
    }

    #[tokio::test]
    async fn missing_store_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        assert!(QueryRunner::new(&path).run("SELECT 1").await.is_err());
        assert!(!path.exists());
    }
}
