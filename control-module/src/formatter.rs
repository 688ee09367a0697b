//! Plain-text rendering of search results and query output.

use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::Value;

use crate::models::{BookRow, QueryResponse, QuerySummary};

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn books_table(books: &[BookRow]) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Title", "Authors", "Year", "Pages", "Rating", "eBook", "Retail Price"]);

    for (i, book) in books.iter().enumerate() {
        let price = match book.retail_price_amount {
            Some(amount) => format!("{:.2} {}", amount, book.retail_price_currency).trim_end().to_string(),
            None => String::new(),
        };
        let ebook = match book.is_ebook {
            Some(true) => "yes",
            Some(false) => "no",
            None => "",
        };

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&book.title),
            Cell::new(&book.authors),
            Cell::new(&book.year),
            Cell::new(optional(book.page_count)),
            Cell::new(optional(book.average_rating)),
            Cell::new(ebook),
            Cell::new(price),
        ]);
    }

    table.to_string()
}

/// `thumbnail` from a stored `ImageLinks` JSON string, or the placeholder.
pub fn thumbnail_url(image_links: &str) -> String {
    serde_json::from_str::<Value>(image_links)
        .ok()
        .and_then(|links| links.get("thumbnail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

pub fn thumbnail_lines(books: &[BookRow]) -> Vec<String> {
    books
        .iter()
        .map(|book| {
            let caption = if book.title.is_empty() { &book.book_id } else { &book.title };
            format!("{}: {}", caption, thumbnail_url(&book.image_links))
        })
        .collect()
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Rows numbered from 1, headers lowercased.
pub fn query_table(result: &QueryResponse) -> String {
    let mut table = new_table();

    let mut header = vec!["#".to_string()];
    header.extend(result.columns.iter().map(|c| c.to_lowercase()));
    table.set_header(header);

    for (i, row) in result.rows.iter().enumerate() {
        let mut cells = vec![Cell::new(i + 1)];
        cells.extend(row.iter().map(|v| Cell::new(cell_text(v))));
        table.add_row(cells);
    }

    table.to_string()
}

pub fn query_menu(queries: &[QuerySummary]) -> String {
    queries
        .iter()
        .map(|q| format!("  {:>2}) {}", q.id, q.name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(title: &str, image_links: &str) -> BookRow {
        BookRow {
            book_id: "vol1".to_string(),
            title: title.to_string(),
            image_links: image_links.to_string(),
            ..BookRow::default()
        }
    }

    #[test]
    fn thumbnail_falls_back_to_placeholder() {
        assert_eq!(thumbnail_url(r#"{"thumbnail":"http://x/t.png"}"#), "http://x/t.png");
        assert_eq!(thumbnail_url(r#"{"smallThumbnail":"http://x/s.png"}"#), PLACEHOLDER_IMAGE);
        assert_eq!(thumbnail_url("{}"), PLACEHOLDER_IMAGE);
        assert_eq!(thumbnail_url(""), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn thumbnail_lines_use_title_or_id() {
        let lines = thumbnail_lines(&[book("Dune", "{}"), book("", r#"{"thumbnail":"t"}"#)]);
        assert_eq!(lines, vec![format!("Dune: {}", PLACEHOLDER_IMAGE), "vol1: t".to_string()]);
    }

    #[test]
    fn query_headers_are_lowercased_and_rows_numbered() {
        let result = QueryResponse {
            id: 1,
            name: "Check Availability of eBooks vs Physical Books".to_string(),
            status: "ok".to_string(),
            columns: vec!["Book_Type".to_string(), "Count".to_string()],
            rows: vec![vec![json!("eBooks"), json!(3)], vec![json!("Physical Books"), Value::Null]],
        };

        let rendered = query_table(&result);

        assert!(rendered.contains("book_type"));
        assert!(rendered.contains("count"));
        assert!(!rendered.contains("Book_Type"));
        assert!(rendered.contains("Physical Books"));
        assert!(rendered.lines().any(|line| line.contains("│ 2 ")));
    }

    #[test]
    fn cells_render_without_json_quoting() {
        assert_eq!(cell_text(&json!("Dune")), "Dune");
        assert_eq!(cell_text(&json!(12.5)), "12.5");
        assert_eq!(cell_text(&Value::Null), "");
    }

    #[test]
    fn books_table_shows_price_with_currency() {
        let row = BookRow {
            title: "Emma".to_string(),
            retail_price_amount: Some(9.5),
            retail_price_currency: "USD".to_string(),
            is_ebook: Some(true),
            ..BookRow::default()
        };
        let rendered = books_table(&[row]);
        assert!(rendered.contains("9.50 USD"));
        assert!(rendered.contains("yes"));
    }
}
