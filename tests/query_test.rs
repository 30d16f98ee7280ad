use std::collections::HashSet;
use std::thread;

use tablequery::{
    BooleanColumn, Column, DataFrame, Error, Float64Column, Int64Column, Query, RecordArray,
    Table, Tabular, Value,
};

/// The 4-row scenario table: a = [1, 1, 3, 5], b = [5, 1, 2, 5],
/// c = [4.5, 6.2, 0.5, -3.5]
fn scenario_table() -> Table {
    let mut table = Table::new();
    table.insert("a", Int64Column::new(vec![1, 1, 3, 5])).unwrap();
    table.insert("b", Int64Column::new(vec![5, 1, 2, 5])).unwrap();
    table
        .insert("c", Float64Column::new(vec![4.5, 6.2, 0.5, -3.5]))
        .unwrap();
    table
}

fn scenario_records() -> RecordArray {
    RecordArray::from_rows(
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        vec![
            vec![Value::Int(1), Value::Int(5), Value::Float(4.5)],
            vec![Value::Int(1), Value::Int(1), Value::Float(6.2)],
            vec![Value::Int(3), Value::Int(2), Value::Float(0.5)],
            vec![Value::Int(5), Value::Int(5), Value::Float(-3.5)],
        ],
    )
    .unwrap()
}

#[test]
fn test_scenario_mask_and_count() {
    let table = scenario_table();

    let q = Query::expr("a > 3");
    assert_eq!(q.mask(&table).unwrap(), vec![false, false, false, true]);
    assert_eq!(q.count(&table).unwrap(), 1);

    let q2 = !Query::expr("a > 3") & Query::expr("b > c");
    assert_eq!(q2.count(&table).unwrap(), 2);
    assert_eq!(q2.mask(&table).unwrap(), vec![true, false, true, false]);
}

#[test]
fn test_operator_laws() {
    let table = scenario_table();
    let q1 = Query::expr("a > 2");
    let q2 = Query::expr("b >= 5");

    let m1 = q1.mask(&table).unwrap();
    let m2 = q2.mask(&table).unwrap();

    let and_mask: Vec<bool> = m1.iter().zip(&m2).map(|(&x, &y)| x && y).collect();
    let or_mask: Vec<bool> = m1.iter().zip(&m2).map(|(&x, &y)| x || y).collect();
    let xor_mask: Vec<bool> = m1.iter().zip(&m2).map(|(&x, &y)| x != y).collect();

    assert_eq!((&q1 & &q2).mask(&table).unwrap(), and_mask);
    assert_eq!((&q1 | &q2).mask(&table).unwrap(), or_mask);
    assert_eq!((&q1 ^ &q2).mask(&table).unwrap(), xor_mask);

    let not_mask: Vec<bool> = m1.iter().map(|&x| !x).collect();
    assert_eq!((!&q1).mask(&table).unwrap(), not_mask);
}

#[test]
fn test_de_morgan() {
    let table = scenario_table();
    let q1 = Query::expr("a > 2");
    let q2 = Query::expr("c < 1");

    let lhs = !(&q1 & &q2);
    let rhs = !&q1 | !&q2;
    assert_eq!(lhs.mask(&table).unwrap(), rhs.mask(&table).unwrap());
}

#[test]
fn test_double_negation() {
    let table = scenario_table();
    let q = Query::expr("a > 3");
    let double = !!&q;

    // negating a negation unwraps, so the tree is structurally identical
    assert_eq!(double, q);
    assert_eq!(double.mask(&table).unwrap(), q.mask(&table).unwrap());
}

#[test]
fn test_count_equals_mask_sum() {
    let table = scenario_table();
    for text in ["a > 0", "a > 3", "b == 5", "c < 0", "a > 100"] {
        let q = Query::expr(text);
        let mask = q.mask(&table).unwrap();
        let expected = mask.iter().filter(|&&m| m).count();
        assert_eq!(q.count(&table).unwrap(), expected, "for `{}`", text);
    }
}

#[test]
fn test_filter_matches_mask() {
    let table = scenario_table();
    let q = Query::expr("b >= 2");

    let mask = q.mask(&table).unwrap();
    let filtered = q.filter(&table).unwrap();

    let kept: Vec<i64> = table
        .column("a")
        .unwrap()
        .as_int64()
        .unwrap()
        .values()
        .iter()
        .zip(&mask)
        .filter_map(|(&v, &keep)| if keep { Some(v) } else { None })
        .collect();
    assert_eq!(filtered.column("a").unwrap().as_int64().unwrap().values(), &kept[..]);
    assert_eq!(filtered.nrows(), kept.len());
}

#[test]
fn test_progressive_and_filter() {
    let table = scenario_table();
    let q = Query::expr("a < 4") & Query::expr("b > 1");

    let filtered = q.filter(&table).unwrap();
    assert_eq!(filtered.nrows(), 2);
    assert_eq!(filtered.column("a").unwrap().as_int64().unwrap().values(), &[1, 3]);

    // filter agrees with a single combined mask
    assert_eq!(q.count(&table).unwrap(), 2);
}

#[test]
fn test_idempotent_evaluation() {
    let table = scenario_table();
    let q = Query::expr("a + b > 4") & !Query::expr("c < 0");
    assert_eq!(q.mask(&table).unwrap(), q.mask(&table).unwrap());
    assert_eq!(q.count(&table).unwrap(), q.count(&table).unwrap());
}

#[test]
fn test_reuse_across_backends() {
    let table = scenario_table();
    let records = scenario_records();
    let q = !Query::expr("a > 3") & Query::expr("b > c");

    assert_eq!(q.mask(&table).unwrap(), q.mask(&records).unwrap());
    assert_eq!(q.count(&records).unwrap(), 2);

    let filtered = q.filter(&records).unwrap();
    assert_eq!(filtered.nrows(), 2);
    assert_eq!(filtered.get(0, "a").unwrap(), &Value::Int(1));
    assert_eq!(filtered.get(1, "a").unwrap(), &Value::Int(3));
}

#[test]
fn test_dataframe_filter_keeps_labels() {
    let mut frame = DataFrame::new();
    frame.insert("a", Int64Column::new(vec![1, 1, 3, 5])).unwrap();

    let filtered = Query::expr("a >= 3").filter(&frame).unwrap();
    assert_eq!(filtered.index(), &["2".to_string(), "3".to_string()]);
}

#[test]
fn test_empty_query_is_always_true() {
    let table = scenario_table();
    let q = Query::new();
    assert_eq!(q.mask(&table).unwrap(), vec![true; 4]);
    assert_eq!(q.count(&table).unwrap(), 4);
    assert_eq!(q.filter(&table).unwrap().nrows(), 4);
}

#[test]
fn test_all_and_any() {
    let table = scenario_table();

    let conj = Query::all(["a < 4".into(), "b > 1".into()]);
    assert_eq!(conj.count(&table).unwrap(), 2);

    let disj = Query::any(["a > 3".into(), "c > 6".into()]);
    assert_eq!(disj.mask(&table).unwrap(), vec![false, true, false, true]);

    assert_eq!(Query::all([]).count(&table).unwrap(), 4);
}

#[test]
fn test_module_level_helpers() {
    let table = scenario_table();
    assert_eq!(
        tablequery::query::count(&table, ["a > 3".into()]).unwrap(),
        1
    );
    assert_eq!(
        tablequery::query::mask(&table, ["a < 4".into(), "b > 1".into()]).unwrap(),
        vec![true, false, true, false]
    );
    let filtered = tablequery::query::filter(&table, ["b == 5".into()]).unwrap();
    assert_eq!(filtered.nrows(), 2);
}

#[test]
fn test_empty_table_evaluation() {
    let mut table = Table::new();
    table.insert("a", Int64Column::new(vec![])).unwrap();

    let q = Query::expr("a > 3");
    assert_eq!(q.mask(&table).unwrap(), Vec::<bool>::new());
    assert_eq!(q.count(&table).unwrap(), 0);
    assert_eq!(q.filter(&table).unwrap().nrows(), 0);
}

#[test]
fn test_callable_query() {
    let table = scenario_table();
    let q = Query::columns(
        |cols| {
            let a = cols[0].to_f64()?;
            let b = cols[1].to_f64()?;
            Ok(Column::Boolean(BooleanColumn::new(
                a.iter().zip(&b).map(|(&x, &y)| x + y > 5.0).collect(),
            )))
        },
        &["a", "b"],
    )
    .unwrap();

    assert_eq!(q.mask(&table).unwrap(), vec![true, false, false, true]);
    // composes with expression queries
    assert_eq!((q & Query::expr("c > 0")).count(&table).unwrap(), 1);
}

#[test]
fn test_callable_construction_validation() {
    let always = |_: &[Column]| Ok(Column::Boolean(BooleanColumn::new(vec![])));

    match Query::columns(always, &[]) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("Expected InvalidArgument, got {:?}", other),
    }
    match Query::columns(always, &["a", ""]) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("Expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn test_callable_result_length_mismatch() {
    let table = scenario_table();
    let q = Query::columns(
        |_| Ok(Column::Boolean(BooleanColumn::new(vec![true]))),
        &["a"],
    )
    .unwrap();
    match q.mask(&table) {
        Err(Error::ResultLengthMismatch {
            expected: 4,
            found: 1,
        }) => (),
        other => panic!("Expected ResultLengthMismatch, got {:?}", other),
    }
}

#[test]
fn test_callable_non_boolean_result() {
    let table = scenario_table();
    let q = Query::columns(|cols| Ok(cols[0].clone()), &["a"]).unwrap();
    match q.mask(&table) {
        Err(Error::InvalidResultType(_)) => (),
        other => panic!("Expected InvalidResultType, got {:?}", other),
    }
}

#[test]
fn test_non_boolean_expression_result() {
    let table = scenario_table();
    match Query::expr("a + 1").mask(&table) {
        Err(Error::InvalidResultType(_)) => (),
        other => panic!("Expected InvalidResultType, got {:?}", other),
    }
}

#[test]
fn test_missing_column_fails_at_evaluation() {
    let table = scenario_table();
    // construction is fine
    let q = Query::expr("nonexistent_col > 3");
    match q.mask(&table) {
        Err(Error::ColumnNotFound(name)) => assert_eq!(name, "nonexistent_col"),
        other => panic!("Expected ColumnNotFound, got {:?}", other),
    }
}

#[test]
fn test_structural_equality() {
    assert_eq!(Query::expr("a > 3"), Query::expr("a > 3"));
    // equality is structural, not semantic
    assert_ne!(Query::expr("a > 3"), Query::expr("a>3"));

    let q1 = Query::expr("a > 3") & Query::expr("b > 1");
    let q2 = Query::expr("a > 3") & Query::expr("b > 1");
    assert_eq!(q1, q2);
    assert_ne!(q1, Query::expr("b > 1") & Query::expr("a > 3"));
}

#[test]
fn test_flattening_makes_and_associative() {
    let a = Query::expr("a > 1");
    let b = Query::expr("b > 1");
    let c = Query::expr("c > 1");
    assert_eq!((&a & &b) & &c, &a & (&b & &c));
}

#[test]
fn test_callable_equality_is_identity() {
    let q = Query::columns(
        |_| Ok(Column::Boolean(BooleanColumn::new(vec![]))),
        &["a"],
    )
    .unwrap();
    assert_eq!(q, q.clone());

    let other = Query::columns(
        |_| Ok(Column::Boolean(BooleanColumn::new(vec![]))),
        &["a"],
    )
    .unwrap();
    assert_ne!(q, other);
}

#[test]
fn test_query_as_set_key() {
    let mut seen = HashSet::new();
    seen.insert(Query::expr("a > 3"));
    seen.insert(Query::expr("a > 3") & Query::expr("b > 1"));

    assert!(seen.contains(&Query::expr("a > 3")));
    assert!(seen.contains(&(Query::expr("a > 3") & Query::expr("b > 1"))));
    assert!(!seen.contains(&Query::expr("a > 4")));
}

#[test]
fn test_referenced_columns() {
    let q = Query::expr("a + b > 3") & Query::expr("c < 0");
    let refs = q.referenced_columns().unwrap();
    let expected: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
    assert_eq!(refs.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn test_combination_leaves_operands_untouched() {
    let q1 = Query::expr("a > 3");
    let q2 = Query::expr("b > 1");
    let snapshot = q1.clone();

    let _ = &q1 & &q2;
    let _ = !&q1;
    assert_eq!(q1, snapshot);
}

#[test]
fn test_concurrent_evaluation() {
    let q = Query::expr("a > 3");
    let handles: Vec<_> = (0..4i64)
        .map(|extra| {
            let q = q.clone();
            thread::spawn(move || {
                let mut table = Table::new();
                let mut values = vec![1, 1, 3, 5];
                values.push(extra);
                table.insert("a", Int64Column::new(values)).unwrap();
                q.count(&table).unwrap()
            })
        })
        .collect();
    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![1, 1, 1, 1]);
}
