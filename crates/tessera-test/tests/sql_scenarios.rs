//! End-to-end statement scenarios.

use tessera_common::{ColumnDef, DataType, ErrorCode, Row, Value};
use tessera_sql::ast::{
    Assignment, CreateIndexStatement, CreateTableStatement, DeleteStatement, DropStatement,
    Expr, InsertStatement, SelectStatement, ShowStatement, Statement, UpdateStatement,
};
use tessera_sql::ExecutionResult;
use tessera_test::utils::{
    ab, create_ab_table, insert_ab, must, select_rows, sorted_rows, table, test_engine,
};

#[test]
fn test_create_insert_select_delete() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    must(insert_ab(&engine, &t, 1, "ab"));
    must(insert_ab(&engine, &t, 2, "cd"));

    let rows = select_rows(
        &engine,
        SelectStatement::new(t.clone()).with_where(Expr::col("a").equals(Expr::int(2))),
    );
    assert_eq!(rows, vec![ab(2, "cd")]);

    let deleted = must(engine.execute(&Statement::Delete(
        DeleteStatement::new(t.clone()).with_where(Expr::col("a").equals(Expr::int(1))),
    )));
    assert_eq!(deleted.rows_affected(), Some(1));
    assert_eq!(select_rows(&engine, SelectStatement::new(t)), vec![ab(2, "cd")]);
}

#[test]
fn test_capacity_boundary_leaves_table_unchanged() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    must(insert_ab(&engine, &t, 1, "abcde"));

    let err = insert_ab(&engine, &t, 2, "abcdef").unwrap_err();
    assert_eq!(err.code(), ErrorCode::Capacity);
    assert_eq!(select_rows(&engine, SelectStatement::new(t)), vec![ab(1, "abcde")]);
}

#[test]
fn test_int_overflow_is_capacity_error() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    let err = insert_ab(&engine, &t, i64::from(i32::MAX) + 1, "x").unwrap_err();
    assert_eq!(err.code(), ErrorCode::Capacity);
    must(insert_ab(&engine, &t, i64::from(i32::MIN), "x"));
}

#[test]
fn test_filter_selectivity_in_any_insert_order() {
    for order in [[1, 2, 3], [3, 1, 2], [2, 3, 1]] {
        let engine = test_engine();
        let t = create_ab_table(&engine);
        for a in order {
            must(insert_ab(&engine, &t, a, "v"));
        }
        let rows = select_rows(
            &engine,
            SelectStatement::new(t).with_where(Expr::int(2).equals(Expr::col("a"))),
        );
        assert_eq!(rows, vec![ab(2, "v")]);
    }
}

#[test]
fn test_string_filter_and_projection() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    must(insert_ab(&engine, &t, 1, "x"));
    must(insert_ab(&engine, &t, 2, "y"));
    must(insert_ab(&engine, &t, 3, "x"));

    let rows = select_rows(
        &engine,
        SelectStatement::new(t)
            .with_columns(["a"])
            .with_where(Expr::col("b").equals(Expr::string("x")))
            .order_by("a", false),
    );
    assert_eq!(
        rows,
        vec![Row::new(vec![Value::Int(3)]), Row::new(vec![Value::Int(1)])]
    );
}

#[test]
fn test_update_in_place() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    must(insert_ab(&engine, &t, 1, "one"));
    must(insert_ab(&engine, &t, 2, "two"));
    let before: Vec<Row> = select_rows(&engine, SelectStatement::new(t.clone()));

    let stmt = UpdateStatement::new(t.clone(), vec![Assignment::new("b", Expr::string("uno"))])
        .with_where(Expr::col("a").equals(Expr::int(1)));
    assert_eq!(must(engine.execute(&Statement::Update(stmt))).rows_affected(), Some(1));

    let after = select_rows(&engine, SelectStatement::new(t));
    assert_eq!(after.len(), before.len());
    // Scan order is unchanged; only the targeted cell differs.
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], ab(1, "uno"));
}

#[test]
fn test_update_to_null_and_not_null_violation() {
    let engine = test_engine();
    let t = table("strict");
    must(engine.execute(&Statement::CreateTable(CreateTableStatement::new(
        t.clone(),
        vec![
            ColumnDef::new("id", DataType::Long).not_null(),
            ColumnDef::new("note", DataType::Char(8)),
        ],
    ))));
    must(engine.execute(&Statement::Insert(InsertStatement::new(
        t.clone(),
        vec![Expr::int(10), Expr::string("n")],
    ))));

    let clear = UpdateStatement::new(t.clone(), vec![Assignment::new("note", Expr::null())]);
    must(engine.execute(&Statement::Update(clear)));
    assert_eq!(
        select_rows(&engine, SelectStatement::new(t.clone())),
        vec![Row::new(vec![Value::Long(10), Value::Null])]
    );

    let bad = UpdateStatement::new(t.clone(), vec![Assignment::new("id", Expr::null())]);
    let err = engine.execute(&Statement::Update(bad)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);

    let missing_id = InsertStatement::new(t, vec![Expr::string("x")]).with_columns(vec!["note".into()]);
    let err = engine.execute(&Statement::Insert(missing_id)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[test]
fn test_order_by_limit_offset() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    for (a, b) in [(4, "d"), (1, "a"), (3, "c"), (2, "b"), (5, "e")] {
        must(insert_ab(&engine, &t, a, b));
    }

    let page = select_rows(
        &engine,
        SelectStatement::new(t.clone())
            .order_by("a", true)
            .with_limit(2)
            .with_offset(1),
    );
    assert_eq!(page, vec![ab(2, "b"), ab(3, "c")]);

    let top = select_rows(
        &engine,
        SelectStatement::new(t).order_by("b", false).with_limit(1),
    );
    assert_eq!(top, vec![ab(5, "e")]);
}

#[test]
fn test_unsupported_predicate_is_rejected() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    let stmt = SelectStatement::new(t).with_where(Expr::col("a").equals(Expr::col("b")));
    let err = engine.execute(&Statement::Select(stmt)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unsupported);
}

#[test]
fn test_show_tables_and_columns() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    must(engine.execute(&Statement::CreateTable(CreateTableStatement::new(
        tessera_sql::ast::TableName::new("aaa", "first"),
        vec![ColumnDef::new("x", DataType::Long).not_null()],
    ))));

    let tables = match must(engine.execute(&Statement::Show(ShowStatement::Tables))) {
        ExecutionResult::Query(result) => result,
        other => panic!("unexpected result {}", other),
    };
    assert_eq!(tables.column_names(), vec!["schema", "name"]);
    assert_eq!(
        tables.rows,
        vec![
            Row::new(vec![Value::from("aaa"), Value::from("first")]),
            Row::new(vec![Value::from("app"), Value::from("t")]),
        ]
    );

    let columns = must(engine.execute(&Statement::Show(ShowStatement::Columns(t))))
        .into_query()
        .unwrap();
    assert_eq!(
        columns.rows,
        vec![
            Row::new(vec![Value::from("a"), Value::from("INT"), Value::from("YES")]),
            Row::new(vec![Value::from("b"), Value::from("VARCHAR(5)"), Value::from("YES")]),
        ]
    );
}

#[test]
fn test_index_lifecycle() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    let create = CreateIndexStatement::new("by_b", t.clone(), vec!["b".into()]);
    must(engine.execute(&Statement::CreateIndex(create.clone())));

    let err = engine.execute(&Statement::CreateIndex(create.clone())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    must(engine.execute(&Statement::CreateIndex(create.if_not_exists())));

    let index = engine.catalog().get_index("app", "t", "by_b").unwrap();
    assert_eq!(index.columns, vec![1]);

    let drop = DropStatement::index(t.clone(), "by_b");
    must(engine.execute(&Statement::Drop(drop.clone())));
    let err = engine.execute(&Statement::Drop(drop.clone())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    must(engine.execute(&Statement::Drop(drop.if_exists())));

    let unknown_column = CreateIndexStatement::new("bad", t, vec!["zz".into()]);
    let err = engine.execute(&Statement::CreateIndex(unknown_column)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
fn test_drop_table_and_schema() {
    let engine = test_engine();
    let t = create_ab_table(&engine);
    must(insert_ab(&engine, &t, 1, "x"));
    must(engine.execute(&Statement::CreateTable(CreateTableStatement::new(
        table("other"),
        vec![ColumnDef::new("c", DataType::Int)],
    ))));

    must(engine.execute(&Statement::Drop(DropStatement::table(t.clone()))));
    let err = engine
        .execute(&Statement::Select(SelectStatement::new(t.clone())))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    // A dropped name can be reused.
    let t = create_ab_table(&engine);
    assert!(sorted_rows(&engine, &t, "a").is_empty());

    must(engine.execute(&Statement::Drop(DropStatement::schema("app"))));
    assert_eq!(engine.catalog().table_count(), 0);
    let err = engine
        .execute(&Statement::Drop(DropStatement::schema("app")))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    must(engine.execute(&Statement::Drop(DropStatement::schema("app").if_exists())));
}

#[test]
fn test_create_table_rejections() {
    let engine = test_engine();
    create_ab_table(&engine);

    let duplicate = CreateTableStatement::new(table("t"), vec![ColumnDef::new("z", DataType::Int)]);
    let err = engine.execute(&Statement::CreateTable(duplicate.clone())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    must(engine.execute(&Statement::CreateTable(duplicate.if_not_exists())));

    let repeated = CreateTableStatement::new(
        table("dup"),
        vec![ColumnDef::new("c", DataType::Int), ColumnDef::new("c", DataType::Long)],
    );
    let err = engine.execute(&Statement::CreateTable(repeated)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);

    let empty = CreateTableStatement::new(table("empty"), Vec::new());
    let err = engine.execute(&Statement::CreateTable(empty)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert_eq!(engine.catalog().table_count(), 1);
}
