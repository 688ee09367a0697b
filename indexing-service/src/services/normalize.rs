use crate::models::storage::BookRecord;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Missing key 'id'")]
    MissingId,
}

type Section<'a> = Option<&'a Map<String, Value>>;

fn section<'a>(parent: Section<'a>, key: &str) -> Section<'a> {
    parent.and_then(|map| map.get(key)).and_then(Value::as_object)
}

fn field<'a>(map: Section<'a>, key: &str) -> Option<&'a Value> {
    map.and_then(|m| m.get(key)).filter(|v| !v.is_null())
}

fn text(map: Section<'_>, key: &str) -> String {
    field(map, key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn joined(map: Section<'_>, key: &str) -> String {
    field(map, key)
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "))
        .unwrap_or_default()
}

fn encoded(map: Section<'_>, key: &str, fallback: &str) -> String {
    field(map, key)
        .map(Value::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

fn integer(map: Section<'_>, key: &str) -> Option<i64> {
    field(map, key).and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
}

fn real(map: Section<'_>, key: &str) -> Option<f64> {
    field(map, key).and_then(Value::as_f64)
}

/// Text ids are kept as is; integer ids are stored in their decimal form.
fn item_id(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// Flattens one raw `volumes` item into a `books` row.
pub fn normalize_item(item: &Value, keyword: &str) -> Result<BookRecord, NormalizeError> {
    let book_id = item_id(item).ok_or(NormalizeError::MissingId)?;

    let root = item.as_object();
    let volume = section(root, "volumeInfo");
    let sale = section(root, "saleInfo");
    let list_price = section(sale, "listPrice");
    let retail_price = section(sale, "retailPrice");

    Ok(BookRecord {
        book_id,
        search_key: keyword.to_string(),
        title: text(volume, "title"),
        subtitle: text(volume, "subtitle"),
        authors: joined(volume, "authors"),
        description: text(volume, "description"),
        industry_identifiers: encoded(volume, "industryIdentifiers", "[]"),
        page_count: integer(volume, "pageCount"),
        categories: joined(volume, "categories"),
        language: text(volume, "language"),
        image_links: encoded(volume, "imageLinks", "{}"),
        ratings_count: integer(volume, "ratingsCount"),
        average_rating: real(volume, "averageRating"),
        country: text(sale, "country"),
        saleability: text(sale, "saleability"),
        is_ebook: field(sale, "isEbook").and_then(Value::as_bool),
        list_price_amount: real(list_price, "amount"),
        list_price_currency: text(list_price, "currencyCode"),
        retail_price_amount: real(retail_price, "amount"),
        retail_price_currency: text(retail_price, "currencyCode"),
        buy_link: text(sale, "buyLink"),
        year: text(volume, "publishedDate"),
    })
}

#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub records: Vec<BookRecord>,
    pub skipped: usize,
}

/// Normalizes every item, skipping (and logging) the ones that cannot be stored.
pub fn normalize_batch(items: &[Value], keyword: &str) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (position, item) in items.iter().enumerate() {
        match normalize_item(item, keyword) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!("Skipping item {} for '{}': {}", position, keyword, e);
                batch.skipped += 1;
            }
        }
    }

    batch
}
