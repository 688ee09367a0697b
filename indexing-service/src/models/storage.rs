use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Connection, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),
}

/// One normalized catalog item, as stored in the `books` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub book_id: String,
    pub search_key: String,
    pub title: String,
    pub subtitle: String,
    pub authors: String,
    pub description: String,
    pub industry_identifiers: String,
    pub page_count: Option<i64>,
    pub categories: String,
    pub language: String,
    pub image_links: String,
    pub ratings_count: Option<i64>,
    pub average_rating: Option<f64>,
    pub country: String,
    pub saleability: String,
    pub is_ebook: Option<bool>,
    pub list_price_amount: Option<f64>,
    pub list_price_currency: String,
    pub retail_price_amount: Option<f64>,
    pub retail_price_currency: String,
    pub buy_link: String,
    pub year: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceSummary {
    /// Rows removed by the clear step.
    pub cleared: u64,
    pub inserted: u64,
    /// Rows dropped because their identifier was already in the batch.
    pub ignored: u64,
}

pub const CREATE_BOOKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        Book_Id TEXT PRIMARY KEY,
        Search_Key TEXT,
        Book_Title TEXT,
        Book_Subtitle TEXT,
        Book_Authors TEXT,
        Book_Description TEXT,
        IndustryIdentifiers TEXT,
        PageCount INT,
        Categories TEXT,
        Language TEXT,
        ImageLinks TEXT,
        RatingsCount INT,
        AverageRating REAL,
        Country TEXT,
        Saleability TEXT,
        IsEbook BOOLEAN,
        Amount_ListPrice REAL,
        CurrencyCode_ListPrice TEXT,
        Amount_RetailPrice REAL,
        CurrencyCode_RetailPrice TEXT,
        BuyLink TEXT,
        Year TEXT
    )
"#;

const INSERT_BOOK: &str = r#"
    INSERT OR IGNORE INTO books (
        Book_Id, Search_Key, Book_Title, Book_Subtitle, Book_Authors, Book_Description,
        IndustryIdentifiers, PageCount, Categories, Language, ImageLinks, RatingsCount,
        AverageRating, Country, Saleability, IsEbook, Amount_ListPrice, CurrencyCode_ListPrice,
        Amount_RetailPrice, CurrencyCode_RetailPrice, BuyLink, Year
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const SELECT_BY_KEYWORD: &str = r#"
    SELECT Book_Id, Search_Key, Book_Title, Book_Subtitle, Book_Authors,
           Book_Description, IndustryIdentifiers, PageCount, Categories,
           Language, ImageLinks, RatingsCount, AverageRating, Country,
           Saleability, IsEbook, Amount_ListPrice, CurrencyCode_ListPrice,
           Amount_RetailPrice, CurrencyCode_RetailPrice, BuyLink, Year
    FROM books WHERE Search_Key = ?
    ORDER BY rowid
"#;

/// The `books` table in a SQLite file. Every operation opens its own
/// connection and closes it before returning.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);
        Ok(SqliteConnection::connect_with(&options).await?)
    }

    pub async fn initialize(&self) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        sqlx::query(CREATE_BOOKS_TABLE).execute(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }

    /// Clears the table and inserts `records` in one transaction. A record
    /// whose identifier is already present in the batch is skipped.
    pub async fn replace_all(&self, records: &[BookRecord]) -> Result<ReplaceSummary, StorageError> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;

        sqlx::query(CREATE_BOOKS_TABLE).execute(&mut *tx).await?;
        let cleared = sqlx::query("DELETE FROM books")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut inserted = 0;
        for record in records {
            inserted += sqlx::query(INSERT_BOOK)
                .bind(&record.book_id)
                .bind(&record.search_key)
                .bind(&record.title)
                .bind(&record.subtitle)
                .bind(&record.authors)
                .bind(&record.description)
                .bind(&record.industry_identifiers)
                .bind(record.page_count)
                .bind(&record.categories)
                .bind(&record.language)
                .bind(&record.image_links)
                .bind(record.ratings_count)
                .bind(record.average_rating)
                .bind(&record.country)
                .bind(&record.saleability)
                .bind(record.is_ebook)
                .bind(record.list_price_amount)
                .bind(&record.list_price_currency)
                .bind(record.retail_price_amount)
                .bind(&record.retail_price_currency)
                .bind(&record.buy_link)
                .bind(&record.year)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        conn.close().await?;

        let summary = ReplaceSummary {
            cleared,
            inserted,
            ignored: records.len() as u64 - inserted,
        };
        info!(
            "Replaced {} rows with {} ({} duplicates ignored) in {}",
            summary.cleared,
            summary.inserted,
            summary.ignored,
            self.path.display()
        );
        Ok(summary)
    }

    /// Rows whose search keyword equals `keyword` exactly (case-sensitive).
    pub async fn load_by_keyword(&self, keyword: &str) -> Result<Vec<BookRecord>, StorageError> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query(SELECT_BY_KEYWORD)
            .bind(keyword)
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;

        let books = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let mut conn = self.connect().await?;
        let count = sqlx::query("SELECT COUNT(*) AS count FROM books")
            .fetch_one(&mut conn)
            .await?
            .try_get::<i64, _>("count")?;
        conn.close().await?;
        Ok(count)
    }
}

fn record_from_row(row: &SqliteRow) -> Result<BookRecord, sqlx::Error> {
    Ok(BookRecord {
        book_id: row.try_get("Book_Id")?,
        search_key: row.try_get("Search_Key")?,
        title: row.try_get("Book_Title")?,
        subtitle: row.try_get("Book_Subtitle")?,
        authors: row.try_get("Book_Authors")?,
        description: row.try_get("Book_Description")?,
        industry_identifiers: row.try_get("IndustryIdentifiers")?,
        page_count: row.try_get("PageCount")?,
        categories: row.try_get("Categories")?,
        language: row.try_get("Language")?,
        image_links: row.try_get("ImageLinks")?,
        ratings_count: row.try_get("RatingsCount")?,
        average_rating: row.try_get("AverageRating")?,
        country: row.try_get("Country")?,
        saleability: row.try_get("Saleability")?,
        is_ebook: row.try_get("IsEbook")?,
        list_price_amount: row.try_get("Amount_ListPrice")?,
        list_price_currency: row.try_get("CurrencyCode_ListPrice")?,
        retail_price_amount: row.try_get("Amount_RetailPrice")?,
        retail_price_currency: row.try_get("CurrencyCode_RetailPrice")?,
        buy_link: row.try_get("BuyLink")?,
        year: row.try_get("Year")?,
    })
}
