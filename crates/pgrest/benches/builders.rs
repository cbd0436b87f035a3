use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgrest::{DataRecord, ParamMap, TableRef, Value, statement, where_by_request};

/// `col0=v0&col1=v1&...` with every fourth key a JSON path.
fn build_params(n: usize) -> ParamMap {
    ParamMap::from_pairs((0..n).map(|i| {
        let key = if i % 4 == 3 {
            format!("data->>field{i}:jsonb")
        } else {
            format!("col{i}")
        };
        (key, format!("v{i}"))
    }))
}

fn build_record(n: usize) -> DataRecord {
    (0..n)
        .map(|i| (format!("col{i}"), Value::Int(i as i64)))
        .collect()
}

fn bench_where_by_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("builders/where_by_request");

    for n in [1, 5, 10, 50] {
        let params = build_params(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &params, |b, params| {
            b.iter(|| black_box(where_by_request(params, 1).unwrap()));
        });
    }

    group.finish();
}

fn bench_parse_and_select(c: &mut Criterion) {
    let table = TableRef::new("prest", "public", "test").unwrap();
    let query = "_select=id,name&_order=-id&name=nuveo&data->>description:jsonb=bla&_page=2&_page_size=20";

    c.bench_function("builders/parse_and_select", |b| {
        b.iter(|| {
            let params = ParamMap::parse(black_box(query));
            black_box(statement::select_by_request(&table, &params).unwrap())
        });
    });
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("builders/insert");
    let table = TableRef::new("prest", "public", "test").unwrap();

    for n in [1, 5, 20, 100] {
        let record = build_record(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &record, |b, record| {
            b.iter(|| black_box(statement::insert(&table, record).unwrap()));
        });
    }

    group.finish();
}

fn bench_update_by_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("builders/update_by_request");
    let table = TableRef::new("prest", "public", "test").unwrap();

    for n in [1, 5, 20] {
        let record = build_record(n);
        let params = build_params(n);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(record, params),
            |b, (record, params)| {
                b.iter(|| black_box(statement::update_by_request(&table, record, params).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_where_by_request,
    bench_parse_and_select,
    bench_insert,
    bench_update_by_request
);
criterion_main!(benches);
