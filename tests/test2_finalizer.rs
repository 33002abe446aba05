mod common;

use common::{last_call, recording_db};
use sql_chain::prelude::*;

#[test]
fn update_bindings_put_set_values_first() -> Result<(), SqlChainError> {
    let db = Database::new();
    // where() before set() on purpose
    let built = db
        .table("users")
        .where_eq("id", 7)
        .set("name", "ann")
        .or_where_cmp("age", "<", 18)
        .set("active", false)
        .build(Action::Update)?;
    assert_eq!(
        built.query,
        "UPDATE users SET name = ?, active = ? WHERE id = ? OR age < ?"
    );
    assert_eq!(
        built.params,
        Params::Positional(vec![
            RowValues::Text("ann".into()),
            RowValues::Bool(false),
            RowValues::Int(7),
            RowValues::Int(18),
        ])
    );
    Ok(())
}

#[test]
fn empty_delete_has_no_where_and_counts_rows() -> Result<(), SqlChainError> {
    let built = Database::new().table("orders").build(Action::Delete)?;
    assert_eq!(built.query, "DELETE FROM orders");
    assert!(built.params.is_empty());

    let (db, connector) = recording_db();
    db.table("orders").delete()?;
    let call = last_call(&connector);
    assert_eq!(call.sql, "DELETE FROM orders");
    assert!(call.params.is_empty());
    assert_eq!(call.backend, BackendKind::Simple);
    assert_eq!(call.return_kind, ReturnKind::RowCount);
    Ok(())
}

#[test]
fn subquery_bindings_follow_outer_bindings() -> Result<(), SqlChainError> {
    let db = Database::new();
    let q = db
        .table("users")
        .where_eq("active", 1)
        .where_sub("id", "IN", |s| {
            s.table("orders")
                .select(["user_id"])
                .where_eq("status", "paid")
        });
    assert_eq!(
        q.to_sql()?,
        "SELECT * FROM users WHERE active = ? AND id IN (SELECT user_id FROM orders WHERE status = ?)"
    );
    assert_eq!(
        q.bindings(),
        &[RowValues::Int(1), RowValues::Text("paid".into())]
    );
    Ok(())
}

#[test]
fn subquery_keeps_its_own_ordering_and_limit() -> Result<(), SqlChainError> {
    let db = Database::new();
    let sql = db
        .table("users")
        .where_sub("id", "=", |s| {
            s.table("orders")
                .select(["user_id"])
                .order_by("total", Direction::Desc)
                .limit(1)
        })
        .to_sql()?;
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE id = (SELECT user_id FROM orders ORDER BY total DESC LIMIT 1)"
    );
    Ok(())
}

#[test]
fn create_filters_by_fillable() -> Result<(), SqlChainError> {
    let (db, connector) = recording_db();
    let id = db.table("t").fillable(["name"]).create([
        ("id", RowValues::Int(1)),
        ("name", RowValues::Text("x".into())),
        ("extra", RowValues::Text("y".into())),
    ])?;
    assert_eq!(id, 42);

    let call = last_call(&connector);
    assert_eq!(call.sql, "INSERT INTO t (name) VALUES (?)");
    assert_eq!(call.params, Params::Positional(vec![RowValues::Text("x".into())]));
    assert_eq!(call.backend, BackendKind::Prepared);
    assert_eq!(call.return_kind, ReturnKind::LastInsertId);
    Ok(())
}

#[test]
fn empty_fillable_allows_every_column() -> Result<(), SqlChainError> {
    let built = Database::new()
        .table("t")
        .fillable(Vec::<String>::new())
        .set("a", 1)
        .set("b", 2)
        .build(Action::Insert)?;
    assert_eq!(built.query, "INSERT INTO t (a, b) VALUES (?, ?)");
    Ok(())
}

#[test]
fn terminals_pin_their_return_kind() -> Result<(), SqlChainError> {
    let (db, connector) = recording_db();

    assert_eq!(db.table("users").where_eq("id", 1).count()?, 3);
    let call = last_call(&connector);
    assert_eq!(call.sql, "SELECT COUNT(*) AS total FROM users WHERE id = ?");
    assert_eq!(call.return_kind, ReturnKind::Count);

    assert!(!db.table("users").exists()?);
    assert_eq!(last_call(&connector).sql, "SELECT 1 FROM users LIMIT 1");

    db.update("users", [("name", "z")]).where_eq("id", 1).update()?;
    let call = last_call(&connector);
    assert_eq!(call.sql, "UPDATE users SET name = ? WHERE id = ?");
    assert_eq!(call.return_kind, ReturnKind::RowCount);

    db.replace("users", [("id", 1)])?;
    let call = last_call(&connector);
    assert_eq!(call.sql, "REPLACE INTO users (id) VALUES (?)");
    assert_eq!(call.return_kind, ReturnKind::RowCount);

    db.table("users").fetch()?;
    let call = last_call(&connector);
    assert_eq!(call.sql, "SELECT * FROM users");
    assert_eq!(call.return_kind, ReturnKind::All);
    assert_eq!(db.last_sql().as_deref(), Some("SELECT * FROM users"));
    Ok(())
}

#[test]
fn build_errors_never_reach_the_backend() {
    let (db, connector) = recording_db();
    let result = db.table("users").where_cmp("id", "= 1 OR", 1).fetch();
    assert!(matches!(result, Err(SqlChainError::BuildError(_))));

    let result = db.table("users").where_eq("id", 1).update();
    assert!(matches!(result, Err(SqlChainError::BuildError(_))));
    assert!(connector.calls.borrow().is_empty());
}
