//! End-to-end introspection against scripted catalogs.

mod common;

use std::sync::Arc;

use opal_info::{InfoError, SchemaInfo};
use opal_query::{Connection, SqlValue};

use common::{record, CatalogConnection};

fn text(s: &str) -> SqlValue {
    SqlValue::Text(String::from(s))
}

#[test]
fn test_unsupported_driver_rejected() {
    let conn = CatalogConnection::new("oracle");
    let err = SchemaInfo::new(conn as Arc<dyn Connection>).unwrap_err();
    match err {
        InfoError::UnsupportedDriver { driver } => assert_eq!(driver, "oracle"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_mysql_columns_normalized() {
    let conn = CatalogConnection::new("mysql");
    conn.queue_rows(vec![
        record(&[
            ("name", text("id")),
            ("col_type", text("INT")),
            ("full_type", text("int(11)")),
            ("char_size", SqlValue::Null),
            ("num_size", SqlValue::Int(11)),
            ("num_scale", SqlValue::Int(0)),
            ("nullable", text("NO")),
            ("default_value", SqlValue::Null),
            ("extra", text("auto_increment")),
            ("comment", text("")),
            ("is_primary", SqlValue::Int(1)),
        ]),
        record(&[
            ("name", text("status")),
            ("col_type", text("VARCHAR")),
            ("full_type", text("varchar(20)")),
            ("char_size", SqlValue::Int(20)),
            ("num_size", SqlValue::Null),
            ("num_scale", SqlValue::Null),
            ("nullable", text("YES")),
            ("default_value", text("new")),
            ("extra", text("")),
            ("comment", text("order state")),
            ("is_primary", SqlValue::Int(0)),
        ]),
    ]);

    let info = SchemaInfo::new(conn.clone() as Arc<dyn Connection>).unwrap();
    let columns = info.list_columns("app", "orders").unwrap();

    assert_eq!(
        columns.keys().collect::<Vec<_>>(),
        vec!["id", "status"]
    );

    let id = &columns["id"];
    assert!(id.is_primary);
    assert!(id.is_auto_increment);
    assert_eq!(id.is_unsigned, Some(false));
    assert_eq!(id.after_field, None);
    assert!(!id.has_default);

    let status = &columns["status"];
    assert_eq!(status.col_type, "varchar");
    assert_eq!(status.size, Some(20));
    assert!(!status.is_not_null);
    assert_eq!(status.default, Some(text("new")));
    assert_eq!(status.after_field.as_deref(), Some("id"));
    assert_eq!(status.comment.as_deref(), Some("order state"));

    let issued = conn.statements();
    assert_eq!(issued.len(), 1);
    assert!(issued[0].contains("information_schema.COLUMNS"));
    assert!(issued[0].contains("ORDER BY c.ORDINAL_POSITION"));
}

#[test]
fn test_duplicated_catalog_rows_keep_primary_flag() {
    // a PK column that is also part of a foreign-key constraint can come
    // back as two joined rows at the same ordinal position
    let conn = CatalogConnection::new("mysql");
    conn.queue_rows(vec![
        record(&[
            ("name", text("id")),
            ("col_type", text("INT")),
            ("full_type", text("int(11)")),
            ("nullable", text("NO")),
            ("extra", text("")),
            ("is_primary", SqlValue::Int(1)),
        ]),
        record(&[
            ("name", text("id")),
            ("col_type", text("INT")),
            ("full_type", text("int(11)")),
            ("nullable", text("NO")),
            ("extra", text("")),
            ("is_primary", SqlValue::Int(0)),
        ]),
        record(&[
            ("name", text("label")),
            ("col_type", text("VARCHAR")),
            ("full_type", text("varchar(40)")),
            ("nullable", text("YES")),
            ("extra", text("")),
            ("is_primary", SqlValue::Int(0)),
        ]),
    ]);

    let info = SchemaInfo::new(conn as Arc<dyn Connection>).unwrap();
    let columns = info.list_columns("app", "tags").unwrap();

    assert_eq!(columns.len(), 2);
    assert!(columns["id"].is_primary);
    assert_eq!(columns["id"].after_field, None);
    assert_eq!(columns["label"].after_field.as_deref(), Some("id"));
}

#[test]
fn test_pgsql_autoinc_sequence() {
    let conn = CatalogConnection::new("postgres");
    // list_columns fetch
    conn.queue_rows(vec![record(&[
        ("name", text("id")),
        ("col_type", text("integer")),
        ("char_size", SqlValue::Null),
        ("num_size", SqlValue::Int(32)),
        ("num_scale", SqlValue::Int(0)),
        ("nullable", text("NO")),
        (
            "default_value",
            text("nextval('orders_id_seq'::regclass)"),
        ),
        ("is_primary", SqlValue::Int(1)),
    ])]);
    // autoinc_sequence fetch
    conn.queue_rows(vec![record(&[(
        "column_default",
        text("nextval('orders_id_seq'::regclass)"),
    )])]);

    let info = SchemaInfo::new(conn as Arc<dyn Connection>).unwrap();
    let columns = info.list_columns("public", "orders").unwrap();
    assert!(columns["id"].is_auto_increment);
    assert!(!columns["id"].has_default);

    assert_eq!(
        info.autoinc_sequence("public", "orders").unwrap(),
        Some(String::from("orders_id_seq"))
    );
}

#[test]
fn test_sqlite_pragma_round() {
    let conn = CatalogConnection::new("sqlite");
    // PRAGMA table_info fetch
    conn.queue_rows(vec![
        record(&[
            ("cid", SqlValue::Int(0)),
            ("name", text("id")),
            ("type", text("INTEGER")),
            ("notnull", SqlValue::Int(1)),
            ("dflt_value", SqlValue::Null),
            ("pk", SqlValue::Int(1)),
        ]),
        record(&[
            ("cid", SqlValue::Int(1)),
            ("name", text("total")),
            ("type", text("DECIMAL(10,2)")),
            ("notnull", SqlValue::Int(0)),
            ("dflt_value", text("0")),
            ("pk", SqlValue::Int(0)),
        ]),
    ]);
    // sqlite_master create-sql fetch
    conn.queue_rows(vec![record(&[(
        "sql",
        text(
            "CREATE TABLE orders (id INTEGER PRIMARY KEY AUTOINCREMENT, \
             total DECIMAL(10,2) DEFAULT 0)",
        ),
    )])]);

    let info = SchemaInfo::new(conn.clone() as Arc<dyn Connection>).unwrap();
    let columns = info.list_columns("", "orders").unwrap();

    let id = &columns["id"];
    assert!(id.is_primary);
    assert!(id.is_auto_increment);

    let total = &columns["total"];
    assert_eq!(total.col_type, "decimal");
    assert_eq!(total.size, Some(10));
    assert_eq!(total.scale, Some(2));
    assert_eq!(total.default, Some(SqlValue::Float(0.0)));
    assert_eq!(total.after_field.as_deref(), Some("id"));

    // empty schema name resolves to main
    let issued = conn.statements();
    assert!(issued[0].starts_with("PRAGMA \"main\".table_info"));

    assert_eq!(info.autoinc_sequence("", "orders").unwrap(), None);
}

#[test]
fn test_list_tables() {
    let conn = CatalogConnection::new("mariadb");
    conn.queue_rows(vec![
        record(&[("table_name", text("orders"))]),
        record(&[("table_name", text("users"))]),
    ]);

    let info = SchemaInfo::new(conn as Arc<dyn Connection>).unwrap();
    assert_eq!(
        info.list_tables("app").unwrap(),
        vec![String::from("orders"), String::from("users")]
    );
}
