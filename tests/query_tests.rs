use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use vesseldb::core::config::{Config, IndexConfig};
use vesseldb::core::database::Database;
use vesseldb::core::error::ErrorKind;
use vesseldb::core::types::{IndexKind, RowId};
use vesseldb::search::results::QueryStatus;

fn open(index: &[(&str, IndexKind)], chunk_size: usize) -> Database {
    let index = IndexConfig::new(index.iter().map(|(f, k)| (f.to_string(), *k))).unwrap();
    Database::open(Config::new(index).chunk_size(chunk_size).worker_threads(4)).unwrap()
}

fn ids(db: &Database, query: &str) -> Vec<Value> {
    db.query(query)
        .records
        .iter()
        .map(|r| r.get_field("id").cloned().unwrap_or(Value::Null))
        .collect()
}

fn random_records(seed: u64, count: usize) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    let builders = ["Namura", "Imabari", "Oshima", "Hyundai"];
    (0..count)
        .map(|i| {
            let mut record = json!({
                "id": i,
                "builder": builders[rng.gen_range(0..builders.len())],
                "code": rng.gen_range(-20..20),
                "built": format!("20{:02}-01-01", rng.gen_range(0..5)),
            });
            // Some records lack fields or carry values that are skipped.
            match rng.gen_range(0..10) {
                0 => {
                    record.as_object_mut().unwrap().remove("code");
                }
                1 => record["code"] = json!("n/a"),
                2 => record["code"] = json!("7"),
                3 => record["builder"] = json!(""),
                4 => record["built"] = Value::Null,
                _ => {}
            }
            record
        })
        .collect()
}

fn as_set(rows: &[RowId]) -> HashSet<RowId> {
    rows.iter().copied().collect()
}

fn is_strictly_ascending(rows: &[RowId]) -> bool {
    rows.windows(2).all(|w| w[0] < w[1])
}

#[test]
fn test_concrete_scenario() {
    let mut db = open(&[("code", IndexKind::Integer)], 10_000);
    db.load_records(vec![
        json!({"id": 1, "code": 5}),
        json!({"id": 2, "code": 9}),
        json!({"id": 3, "code": 5}),
    ])
    .unwrap();

    assert_eq!(ids(&db, "WHERE code = 5"), vec![json!(1), json!(3)]);
    assert_eq!(ids(&db, "WHERE code > 5"), vec![json!(2)]);
    assert_eq!(ids(&db, "WHERE code = 5 AND id > 1"), vec![json!(3)]);
}

/// Keys each record contributes to a field's index, following the classification rules.
fn expected_keys(records: &[Value], field: &str, kind: IndexKind) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| match (kind, &r[field]) {
            (IndexKind::Integer, Value::Number(n)) => n.as_i64().map(|v| v.to_string()),
            (IndexKind::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(|v| v.to_string()),
            (IndexKind::String | IndexKind::Date, Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_ingestion_completeness() {
    let records = random_records(1, 1_234);
    let fields = [
        ("builder", IndexKind::String),
        ("code", IndexKind::Integer),
        ("built", IndexKind::Date),
    ];

    let mut per_chunk_size = Vec::new();
    for chunk_size in [1, 7, 100, 10_000] {
        let mut db = open(&fields, chunk_size);
        db.load_records(records.clone()).unwrap();

        let store = db.records();
        assert_eq!(store.len(), records.len());
        for (i, expected) in records.iter().enumerate() {
            assert_eq!(store.get(RowId(i)).unwrap().value(), expected);
        }
        assert_eq!(db.stats().chunk_count, records.len().div_ceil(chunk_size));

        let stats = db.index_stats(usize::MAX);
        for (i, (field, kind)) in fields.iter().enumerate() {
            let keys = expected_keys(&records, field, *kind);
            let distinct: HashSet<&String> = keys.iter().collect();
            let indexed = &stats.fields[i];
            assert_eq!(indexed.field, *field);
            assert_eq!(indexed.indexed_rows, keys.len(), "{} rows, chunk size {}", field, chunk_size);
            assert_eq!(indexed.unique_values, distinct.len(), "{} keys, chunk size {}", field, chunk_size);
            assert_eq!(indexed.top_values.iter().map(|(_, n)| n).sum::<usize>(), keys.len());
        }
        per_chunk_size.push(stats);
    }

    assert!(per_chunk_size.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_index_and_scan_agree_on_equality() {
    let records = random_records(2, 3_000);
    let mut indexed = open(
        &[("builder", IndexKind::String), ("code", IndexKind::Integer), ("built", IndexKind::Date)],
        250,
    );
    indexed.load_records(records.clone()).unwrap();
    let mut plain = open(&[], 250);
    plain.load_records(records).unwrap();

    let queries = [
        "builder = Namura",
        "builder = Hyundai",
        "code = 7",
        "code = -20",
        "code = 0",
        "built = 2003-01-01",
        "builder = nobody",
    ];
    for query in queries {
        let via_index = indexed.query(query);
        let via_scan = plain.query(query);
        assert_eq!(as_set(&via_index.rows), as_set(&via_scan.rows), "{}", query);
        assert!(is_strictly_ascending(&via_index.rows));
        assert!(is_strictly_ascending(&via_scan.rows));
    }
}

#[test]
fn test_integer_range_correctness() {
    let records = random_records(3, 2_000);
    let mut db = open(&[("code", IndexKind::Integer)], 128);
    db.load_records(records.clone()).unwrap();

    for bound in [-21i64, -5, 0, 3, 19, 20] {
        for (op, keep) in [(">", true), ("<", false)] {
            let expected: Vec<RowId> = records
                .iter()
                .enumerate()
                .filter_map(|(i, r)| {
                    let code = match &r["code"] {
                        Value::Number(n) => n.as_i64(),
                        Value::String(s) => s.trim().parse::<i64>().ok(),
                        _ => None,
                    }?;
                    let hit = if keep { code > bound } else { code < bound };
                    hit.then_some(RowId(i))
                })
                .collect();
            let found = db.query(&format!("WHERE code {} {}", op, bound));
            assert_eq!(found.rows, expected, "code {} {}", op, bound);
        }
    }
}

#[test]
fn test_and_is_intersection() {
    let records = random_records(4, 2_500);
    let mut db = open(&[("builder", IndexKind::String), ("code", IndexKind::Integer)], 300);
    db.load_records(records).unwrap();

    let pairs = [
        ("builder = Oshima", "code > 0"),
        ("code < 5", "id > 1000"),
        ("id < 200", "builder = Imabari"),
        ("code = 7", "code = 7"),
    ];
    for (left, right) in pairs {
        let left_rows = as_set(&db.query(left).rows);
        let right_rows = as_set(&db.query(right).rows);
        let both = db.query(&format!("{} AND {}", left, right));

        let expected: HashSet<RowId> = left_rows.intersection(&right_rows).copied().collect();
        assert_eq!(as_set(&both.rows), expected);
        assert_eq!(both.rows.len(), expected.len());
        assert!(is_strictly_ascending(&both.rows));
        assert_eq!(both.records.len(), both.rows.len());
    }
}

#[test]
fn test_cache_idempotence() {
    let mut db = open(&[("code", IndexKind::Integer)], 50);
    db.load_records(random_records(5, 500)).unwrap();

    let first = db.query("WHERE id > 100");
    let executed = db.stats().queries_executed;
    let second = db.query("WHERE id > 100");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(db.stats().queries_executed, executed);
    assert_eq!(db.stats().cache_stats.hit_count, 1);

    // A different spelling is a different key.
    let third = db.query("WHERE id >  100");
    assert_eq!(third.rows, first.rows);
    assert_eq!(db.stats().queries_executed, executed + 1);
}

#[test]
fn test_chunk_size_invariance() {
    let records = random_records(6, 1_000);
    let queries = ["code = 7", "code > 3", "builder = Namura", "id < 50", "code < 0 AND builder = Oshima"];

    let results: Vec<Vec<Vec<RowId>>> = [1, 7, 10_000]
        .into_iter()
        .map(|chunk_size| {
            let mut db = open(&[("builder", IndexKind::String), ("code", IndexKind::Integer)], chunk_size);
            db.load_records(records.clone()).unwrap();
            queries.iter().map(|q| db.query(q).rows.clone()).collect()
        })
        .collect();

    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}

#[test]
fn test_query_statuses() {
    let mut db = open(&[("code", IndexKind::Integer)], 10);
    db.load_records(vec![json!({"id": 1, "code": 5})]).unwrap();

    let unparseable = db.query("WHERE nothing here");
    assert_eq!(unparseable.status, QueryStatus::Unparseable);
    assert!(unparseable.is_empty());

    let unsupported = db.query("code = 5 AND id = 1 AND id > 0");
    assert_eq!(unsupported.status, QueryStatus::Unsupported);
    assert!(unsupported.is_empty());

    // Both outcomes are cached like any other result.
    let executed = db.stats().queries_executed;
    db.query("WHERE nothing here");
    assert_eq!(db.stats().queries_executed, executed);

    let ok = db.query("code = 5 AND garbage");
    assert_eq!(ok.status, QueryStatus::Ok);
    assert_eq!(ok.len(), 1);

    let non_integer = db.query("code = five");
    assert_eq!(non_integer.status, QueryStatus::Ok);
    assert!(non_integer.is_empty());
}

#[test]
fn test_index_config_field_lookup_ignores_case() {
    let mut db = open(&[("Code", IndexKind::Integer)], 10);
    db.load_records(vec![json!({"id": 1, "Code": 5}), json!({"id": 2, "code": 5})]).unwrap();

    // The configured spelling is read from records, so only the first is indexed.
    assert_eq!(ids(&db, "code = 5"), vec![json!(1)]);
    assert_eq!(ids(&db, "CODE = 5"), vec![json!(1)]);
}

#[test]
fn test_date_comparison_finds_nothing() {
    let mut db = open(&[("built", IndexKind::Date)], 10);
    db.load_records(vec![json!({"built": "2004-05-01"}), json!({"built": "2010-01-01"})]).unwrap();

    assert_eq!(db.query("built = 2004-05-01").len(), 1);
    assert!(db.query("built > 2000").is_empty());
    assert!(db.query("built < 2020-01-01").is_empty());
}

#[test]
fn test_second_load_is_rejected() {
    let mut db = open(&[("code", IndexKind::Integer)], 10);
    db.load_records(vec![json!({"code": 1})]).unwrap();

    let err = db.load_records(vec![json!({"code": 2})]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert_eq!(db.records().len(), 1);
}

#[test]
fn test_classification_failure_aborts_load() {
    let mut db = open(&[("name", IndexKind::String), ("code", IndexKind::Integer)], 4);
    let mut records: Vec<Value> = (0..20).map(|i| json!({"name": format!("v{}", i), "code": i})).collect();
    records[13] = json!({"name": 99, "code": 1});

    let err = db.load_records(records).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Classification);
    assert!(err.context.contains("name"));
    assert!(!db.is_loaded());
    assert!(db.records().is_empty());
    assert!(db.query("code = 1").is_empty());

    let mut db = open(&[("code", IndexKind::Integer)], 4);
    let err = db.load_records(vec![json!({"code": 1.5})]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Classification);
}

#[test]
fn test_concurrent_queries() {
    let mut db = open(&[("code", IndexKind::Integer)], 64);
    db.load_records(random_records(7, 1_000)).unwrap();
    let db = Arc::new(db);
    let expected = db.execute("code > 0").rows;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = Arc::clone(&db);
            std::thread::spawn(move || db.query("code > 0").rows.clone())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
