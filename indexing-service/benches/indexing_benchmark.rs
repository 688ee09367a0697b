use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexing_service::services::normalize::{normalize_batch, normalize_item};
use serde_json::{json, Value};

fn sample_item(i: usize) -> Value {
    json!({
        "id": format!("vol{}", i),
        "volumeInfo": {
            "title": format!("Test Book {}", i),
            "authors": ["Jane Austen", "Test Author", "Third Author"],
            "industryIdentifiers": [{ "type": "ISBN_13", "identifier": "9780000000000" }],
            "pageCount": 432,
            "categories": ["Fiction"],
            "language": "en",
            "imageLinks": { "smallThumbnail": "http://x/s.png", "thumbnail": "http://x/t.png" },
            "averageRating": 4.5,
            "publishedDate": "1813-01-28"
        },
        "saleInfo": {
            "country": "US",
            "saleability": "FOR_SALE",
            "isEbook": true,
            "listPrice": { "amount": 12.5, "currencyCode": "USD" },
            "retailPrice": { "amount": 8.75, "currencyCode": "USD" }
        }
    })
}

fn benchmark_normalize_item(c: &mut Criterion) {
    let item = sample_item(1342);

    c.bench_function("normalize_item", |b| {
        b.iter(|| normalize_item(black_box(&item), black_box("austen")))
    });
}

fn benchmark_normalize_batch(c: &mut Criterion) {
    let items: Vec<Value> = (0..1000).map(sample_item).collect();

    c.bench_function("normalize_batch_1000", |b| {
        b.iter(|| normalize_batch(black_box(&items), black_box("austen")))
    });
}

fn benchmark_normalize_sparse(c: &mut Criterion) {
    let items: Vec<Value> = (0..1000).map(|i| json!({ "id": format!("bare{}", i) })).collect();

    c.bench_function("normalize_batch_sparse", |b| {
        b.iter(|| normalize_batch(black_box(&items), black_box("austen")))
    });
}

criterion_group!(
    benches,
    benchmark_normalize_item,
    benchmark_normalize_batch,
    benchmark_normalize_sparse
);
criterion_main!(benches);
