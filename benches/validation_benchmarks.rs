use criterion::{Criterion, criterion_group, criterion_main};
use folio::catalog::{CREATE, register_catalog};
use folio::*;
use serde_json::json;
use std::hint::black_box;

fn bench_rule_builders(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");

    let email = is_email("{1} must be an email");
    let isbn = fixed_length(13, "{1} must be exactly {2} characters");
    let ids = is_array_with(
        Some(ValueKind::Number),
        "{1} must be an array of {2}",
        RuleOptions::default().allow_one_element(),
    );

    let address = json!("user@example.com");
    let code = json!("9780441013593");
    let list = json!([1, 2, 3, 4, 5, 6, 7, 8]);

    group.bench_function("is_email", |b| {
        b.iter(|| email.evaluate(black_box(Some(&address))))
    });

    group.bench_function("fixed_length", |b| {
        b.iter(|| isbn.evaluate(black_box(Some(&code))))
    });

    group.bench_function("is_array_of_numbers", |b| {
        b.iter(|| ids.evaluate(black_box(Some(&list))))
    });

    group.bench_function("check_failing", |b| {
        b.iter(|| isbn.check(black_box("isbn"), black_box(Some(&address))))
    });

    group.finish();
}

fn bench_composer(c: &mut Criterion) {
    let mut group = c.benchmark_group("composer");

    let registry = DtoRegistry::new();
    register_catalog(&registry).unwrap();

    let valid = json!({
        "title": "The Left Hand of Darkness",
        "isbn": "9780441478125",
        "authorIds": [3],
        "categoryId": 1,
        "available": true
    });
    let invalid = json!({"title": "", "isbn": "123", "authorIds": ["x"], "available": "no"});

    group.bench_function("validate_field", |b| {
        b.iter(|| {
            registry.validate_field(
                "CreateBook",
                "isbn",
                black_box(Some(&json!("9780441478125"))),
                Some(CREATE),
            )
        })
    });

    group.bench_function("construct_validated_valid", |b| {
        b.iter(|| registry.construct_validated("CreateBook", black_box(&valid), Some(CREATE)))
    });

    group.bench_function("construct_validated_invalid", |b| {
        b.iter(|| registry.construct_validated("CreateBook", black_box(&invalid), Some(CREATE)))
    });

    group.finish();
}

fn bench_formatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatter");

    group.bench_function("two_placeholders", |b| {
        b.iter(|| {
            format_message(
                black_box("{1} must be exactly {2} characters"),
                black_box(&["isbn", "13"]),
            )
        })
    });

    group.bench_function("no_args", |b| {
        b.iter(|| format_message::<&str>(black_box("{1} is required"), &[]))
    });

    group.finish();
}

fn bench_comparator(c: &mut Criterion) {
    let mut group = c.benchmark_group("comparator");

    let expected = json!({
        "categoryName": "Fantasy",
        "books": (0..20).map(|i| json!({"title": format!("Book {}", i), "authorIds": [i]})).collect::<Vec<_>>()
    });
    let actual = json!({
        "id": 1,
        "categoryName": "Fantasy",
        "books": (0..20).map(|i| json!({"id": i, "title": format!("Book {}", i), "authorIds": [i]})).collect::<Vec<_>>()
    });

    group.bench_function("nested_match", |b| {
        b.iter(|| values_equal(black_box(&expected), black_box(&actual)))
    });

    group.bench_function("nested_mismatch_path", |b| {
        let other = json!({"categoryName": "Fantasy", "books": []});
        b.iter(|| find_mismatch(black_box(Some(&expected)), black_box(Some(&other))))
    });

    group.finish();
}

criterion_group!(
    validation_benches,
    bench_rule_builders,
    bench_composer,
    bench_formatter,
    bench_comparator,
);

criterion_main!(validation_benches);
