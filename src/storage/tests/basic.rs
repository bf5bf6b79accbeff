use super::*;
use arrow::array::Array;
use std::collections::HashMap;

#[test]
fn test_empty_store() {
    let (_, store) = shared_store("empty");

    assert!(store.header().unwrap().is_empty());
    assert_eq!(store.column_position("a").unwrap(), None);
    assert!(store.read_all_rows().unwrap().is_empty());
    assert_eq!(store.data_row_count(), 0);
}

#[test]
fn test_first_write_sets_header_verbatim() {
    let (grid, store) = shared_store("t");
    store.ensure_columns(&["a", "b", "a", "c"]).unwrap();

    assert_eq!(store.header().unwrap(), vec!["a", "b", "c"]);
    assert_eq!(grid.rows().len(), 1);
}

#[test]
fn test_ensure_columns_is_idempotent() {
    let (_, store) = shared_store("t");
    store.ensure_columns(&["a", "b"]).unwrap();
    let once = store.header().unwrap();
    store.ensure_columns(&["a", "b"]).unwrap();

    assert_eq!(store.header().unwrap(), once);
}

#[test]
fn test_ensure_columns_appends_right() {
    let (grid, store) = store_from_rows(&[vec!["a", "b"], vec!["1", "2"]]);
    store.ensure_columns(&["c", "a", "d", "c"]).unwrap();

    assert_eq!(store.header().unwrap(), vec!["a", "b", "c", "d"]);
    assert_eq!(grid.rows()[1], vec!["1", "2", "", ""]);
}

#[test]
fn test_column_position_first_occurrence() {
    let (_, store) = store_from_rows(&[vec!["x", "dup", "dup"]]);

    assert_eq!(store.column_position("x").unwrap(), Some(1));
    assert_eq!(store.column_position("dup").unwrap(), Some(2));
    assert_eq!(store.column_position("nope").unwrap(), None);
}

#[test]
fn test_header_union_first_seen() {
    assert_eq!(header_union(&[record(&[("a", "1")])]), vec!["a"]);
    assert_eq!(
        header_union(&[record(&[("a", "1")]), record(&[("b", "2")])]),
        vec!["a", "b"]
    );
    assert_eq!(
        header_union(&[record(&[("b", "1"), ("a", "2")]), record(&[("a", "3"), ("c", "4")])]),
        vec!["b", "a", "c"]
    );
}

#[test]
fn test_append_aligns_to_header() {
    let (grid, store) = store_from_rows(&[vec!["b", "a"], vec!["old-b", "old-a"]]);
    let appended = store
        .append_records(&[
            record(&[("a", "1"), ("b", "2")]),
            record(&[("c", "3")]),
        ])
        .unwrap();

    assert_eq!(appended, 2);
    assert_eq!(
        grid.rows(),
        vec![
            vec!["b", "a", "c"],
            vec!["old-b", "old-a", ""],
            vec!["2", "1", ""],
            vec!["", "", "3"],
        ]
    );
}

#[test]
fn test_append_renders_scalars() {
    let (grid, store) = shared_store("t");
    let rec = Record::new()
        .with("n", 42i64)
        .with("f", 1.5)
        .with("b", true)
        .with("none", ScalarValue::Null);
    store.append_records(&[rec]).unwrap();

    assert_eq!(grid.rows()[1], vec!["42", "1.5", "true", ""]);
}

#[test]
fn test_append_nothing_is_noop() {
    let (grid, store) = shared_store("t");
    assert_eq!(store.append_records(&[]).unwrap(), 0);
    assert!(grid.is_blank());
    assert_eq!(grid.last_row(), 0);
}

#[test]
fn test_read_all_rows() {
    let (_, store) = store_from_rows(&[
        vec!["id", "name"],
        vec!["1", "ada"],
        vec!["2", "bob"],
    ]);
    let rows = store.read_all_rows().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].cell("name"), "bob");
    assert_eq!(rows[0].get("id"), Some(&ScalarValue::from("1")));
}

#[test]
fn test_find_rows_exact_match() {
    let (_, store) = store_from_rows(&[
        vec!["stage", "other"],
        vec!["Stage A", "Stage A"],
        vec!["Stage AB", ""],
        vec!["stage a", ""],
        vec!["Stage A", ""],
    ]);

    assert_eq!(store.find_rows_where("stage", "Stage A").unwrap(), vec![2, 5]);
    assert_eq!(store.find_rows_where("other", "Stage A").unwrap(), vec![2]);
}

#[test]
fn test_find_rows_skips_header() {
    let (_, store) = store_from_rows(&[vec!["stage"], vec!["stage"]]);
    assert_eq!(store.find_rows_where("stage", "stage").unwrap(), vec![2]);
}

#[test]
fn test_delete_rows_where_scattered() {
    let (grid, store) = store_from_rows(&[
        vec!["k", "v"],
        vec!["x", "1"],
        vec!["x", "2"],
        vec!["y", "3"],
        vec!["x", "4"],
        vec!["y", "5"],
        vec!["x", "6"],
        vec!["x", "7"],
    ]);

    assert_eq!(store.delete_rows_where("k", "x").unwrap(), 5);
    assert_eq!(
        grid.rows(),
        vec![vec!["k", "v"], vec!["y", "3"], vec!["y", "5"]]
    );
}

#[test]
fn test_cell_and_distinct_values() {
    let (_, store) = store_from_rows(&[
        vec!["k", "v"],
        vec!["b", "1"],
        vec!["a", "2"],
        vec!["b", "3"],
    ]);

    assert_eq!(store.cell(3, "v").unwrap(), Some("2".to_string()));
    assert_eq!(store.cell(3, "missing").unwrap(), None);
    assert_eq!(store.distinct_values("k").unwrap(), vec!["b", "a"]);
}

#[test]
fn test_lookup_column() {
    let (_, store) = store_from_rows(&[
        vec!["key"],
        vec!["a"],
        vec!["b"],
        vec!["c"],
        vec!["a"],
    ]);
    let values: HashMap<String, String> =
        [("a".to_string(), "10".to_string()), ("c".to_string(), "30".to_string())].into();

    assert_eq!(
        store.lookup_column(3, 3, 1, &values, "0").unwrap(),
        vec![vec!["0"], vec!["30"], vec!["10"]]
    );
    assert!(store.lookup_column(2, 0, 1, &values, "0").unwrap().is_empty());
}

#[test]
fn test_replace_records() {
    let (grid, store) = store_from_rows(&[vec!["old"], vec!["1"]]);
    store.replace_records(&[record(&[("new", "2")])]).unwrap();

    assert_eq!(grid.rows(), vec![vec!["new"], vec!["2"]]);
}

#[test]
fn test_to_record_batch() {
    let (_, store) = store_from_rows(&[
        vec!["id", "name"],
        vec!["1", "ada"],
        vec!["2", ""],
    ]);
    let batch = store.to_record_batch().unwrap();

    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.schema().field(1).name(), "name");
    let names = batch
        .column(1)
        .as_any()
        .downcast_ref::<arrow::array::StringArray>()
        .unwrap();
    assert_eq!(names.value(0), "ada");
    assert_eq!(names.value(1), "");
}

#[test]
fn test_to_record_batch_empty() {
    let (_, store) = shared_store("t");
    let batch = store.to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 0);
}
