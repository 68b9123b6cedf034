use primitive_db::engine::{crud, Assignment, Filter};
use primitive_db::storage::{Catalog, ColumnDef, DataType, Row, Value};
use primitive_db::DbError;

fn table_t() -> Catalog {
    Catalog::new()
        .create_table("t", &["a:int", "b:str"])
        .expect("Failed to create table")
}

fn row(id: i64, a: i64, b: &str) -> Row {
    [
        ("ID", Value::Int(id)),
        ("a", Value::Int(a)),
        ("b", Value::from(b)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_first_column_is_always_id() {
    for specs in [vec![], vec!["x:bool"], vec!["z:str", "a:int", "m:bool"]] {
        let catalog = Catalog::new().create_table("t", &specs).unwrap();
        let schema = catalog.get("t").unwrap();
        assert_eq!(schema.columns[0], ColumnDef::new("ID", DataType::Int));
        assert_eq!(schema.column_count(), specs.len() + 1);
    }
}

#[test]
fn test_scenario_delete_then_reuse_id() {
    let catalog = table_t();
    assert_eq!(catalog.get("t").unwrap().column_names(), vec!["ID", "a", "b"]);

    let rows = crud::insert(&catalog, "t", &["5", "x"], &[]).unwrap();
    assert_eq!(rows, vec![row(1, 5, "x")]);

    let selected = crud::select(&rows, Some(&Filter::new("a", 5i64)));
    assert_eq!(selected, vec![row(1, 5, "x")]);

    let rows = crud::delete(&rows, &Filter::new("a", 5i64)).unwrap();
    assert!(rows.is_empty());

    let rows = crud::insert(&catalog, "t", &["1", "y"], &rows).unwrap();
    assert_eq!(rows, vec![row(1, 1, "y")]);
}

#[test]
fn test_ids_strictly_increase() {
    let catalog = table_t();
    let mut rows = Vec::new();
    for i in 0..20 {
        rows = crud::insert(&catalog, "t", &[i.to_string(), format!("v{}", i)], &rows).unwrap();
    }

    let ids: Vec<i64> = rows.iter().filter_map(Row::id).collect();
    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
}

#[test]
fn test_select_without_filter_returns_everything() {
    assert!(crud::select(&[], None).is_empty());

    let rows = vec![row(1, 1, "a"), row(2, 2, "b"), row(3, 1, "c")];
    assert_eq!(crud::select(&rows, None), rows);
}

#[test]
fn test_select_is_type_sensitive() {
    let rows: Vec<Row> = vec![
        [("ID", Value::Int(1)), ("v", Value::Bool(true))].into_iter().collect(),
        [("ID", Value::Int(2)), ("v", Value::Int(1))].into_iter().collect(),
        [("ID", Value::Int(3)), ("v", Value::from("1"))].into_iter().collect(),
    ];

    let by_bool = crud::select(&rows, Some(&Filter::new("v", true)));
    assert_eq!(by_bool.len(), 1);
    assert_eq!(by_bool[0].id(), Some(1));

    let by_int = crud::select(&rows, Some(&Filter::new("v", 1i64)));
    assert_eq!(by_int.len(), 1);
    assert_eq!(by_int[0].id(), Some(2));

    let by_str = crud::select(&rows, Some(&Filter::new("v", "1")));
    assert_eq!(by_str.len(), 1);
    assert_eq!(by_str[0].id(), Some(3));
}

#[test]
fn test_no_match_leaves_rows_unchanged() {
    let rows = vec![row(1, 1, "a"), row(2, 2, "b")];
    let before = rows.clone();

    let err = crud::update(&rows, &[Assignment::new("b", "z")], &Filter::new("a", 3i64)).unwrap_err();
    assert!(matches!(err, DbError::NoMatchingRows(_)));
    assert_eq!(rows, before);

    let err = crud::delete(&rows, &Filter::new("b", "zz")).unwrap_err();
    assert!(matches!(err, DbError::NoMatchingRows(_)));
    assert_eq!(rows, before);
}

#[test]
fn test_wrong_arity_does_not_mutate() {
    let catalog = table_t();
    let rows = vec![row(1, 1, "a")];

    let err = crud::insert(&catalog, "t", &["1", "b", "c"], &rows).unwrap_err();
    assert!(matches!(err, DbError::ArityMismatch { expected: 2, found: 3 }));
    assert_eq!(rows, vec![row(1, 1, "a")]);
}

#[test]
fn test_update_multiple_fields_on_several_rows() {
    let rows = vec![row(1, 1, "a"), row(2, 2, "b"), row(3, 1, "c")];
    let updated = crud::update(
        &rows,
        &[Assignment::new("a", 9i64), Assignment::new("b", "n")],
        &Filter::new("a", 1i64),
    )
    .unwrap();

    assert_eq!(updated, vec![row(1, 9, "n"), row(2, 2, "b"), row(3, 9, "n")]);
}

#[test]
fn test_delete_removes_all_matches_in_order() {
    let rows = vec![row(1, 1, "a"), row(2, 2, "b"), row(3, 1, "c"), row(4, 4, "d")];
    let remaining = crud::delete(&rows, &Filter::new("a", 1i64)).unwrap();
    assert_eq!(remaining, vec![row(2, 2, "b"), row(4, 4, "d")]);
}

#[test]
fn test_bool_column_cast() {
    let catalog = Catalog::new().create_table("flags", &["on:bool"]).unwrap();

    let rows = crud::insert(&catalog, "flags", &["false"], &[]).unwrap();
    assert_eq!(rows[0].get("on"), Some(&Value::Bool(false)));

    let err = crud::insert(&catalog, "flags", &["maybe"], &rows).unwrap_err();
    assert!(matches!(
        err,
        DbError::TypeCastError { ref column, ref value } if column == "on" && value == "maybe"
    ));
}
