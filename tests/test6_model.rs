mod common;

use common::{last_call, recording_db};
use sql_chain::prelude::*;

struct User;

impl Model for User {
    const TABLE: &'static str = "users";
    const FILLABLE: &'static [&'static str] = &["name", "age", "status"];
}

struct Order;

impl Model for Order {
    const TABLE: &'static str = "orders";
    const PRIMARY_KEY: &'static str = "order_id";
    const SERVER: Option<&'static str> = Some("shop");
}

fn model_db() -> Result<Database, SqlChainError> {
    let db = Database::new();
    db.configure("main", ServerConfig::default())?;
    db.configure("shop", ServerConfig::default())?;
    db.execute_batch(
        Some("main"),
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INT, status TEXT,
                             role TEXT NOT NULL DEFAULT 'member')",
    )?;
    db.execute_batch(
        Some("shop"),
        "CREATE TABLE orders (order_id INTEGER PRIMARY KEY, total REAL)",
    )?;
    Ok(db)
}

#[test]
fn create_and_replace_apply_the_fillable_list() -> Result<(), SqlChainError> {
    let db = model_db()?;
    let id = User::create(
        &db,
        [
            ("name", RowValues::from("ann")),
            ("age", RowValues::Int(31)),
            ("role", RowValues::from("admin")),
        ],
    )?;
    let user = User::find(&db, id)?;
    assert_eq!(user.get_text("name"), Some("ann"));
    assert_eq!(user.get_text("role"), Some("member"));

    let written = User::replace(
        &db,
        [
            ("id", RowValues::Int(id)),
            ("name", RowValues::from("ann")),
            ("age", RowValues::Int(32)),
        ],
    )?;
    assert_eq!(written, 1);
    // `id` isn't fillable either, so the replace inserted a new row
    assert_eq!(User::all(&db)?.len(), 2);
    assert_eq!(User::find(&db, 999)?.len(), 0);
    db.shutdown();
    Ok(())
}

#[test]
fn queries_start_on_the_model_table() -> Result<(), SqlChainError> {
    let db = model_db()?;
    for (name, age, status) in [("ann", 31, "active"), ("bob", 17, "inactive"), ("cid", 45, "active")] {
        User::create(
            &db,
            [
                ("name", RowValues::from(name)),
                ("age", RowValues::Int(age)),
                ("status", RowValues::from(status)),
            ],
        )?;
    }

    assert_eq!(
        User::select(&db, ["name"]).where_eq("id", 3).field()?,
        RowValues::from("cid")
    );
    assert_eq!(User::where_cmp(&db, "age", ">=", 18).count()?, 2);
    assert_eq!(User::where_eq(&db, "status", "inactive").pluck("name")?, vec![RowValues::from("bob")]);

    let changed = User::update(&db, [("status", "active")]).where_eq("name", "bob").update()?;
    assert_eq!(changed, 1);

    assert_eq!(User::remove(&db, [("age", "<", 18)])?, 1);
    assert_eq!(User::remove(&db, [Filter::eq("status", "active"), Filter::cmp("age", ">", 40)])?, 1);
    assert_eq!(User::all(&db)?.len(), 1);
    db.shutdown();
    Ok(())
}

#[test]
fn models_pinned_to_a_server_use_it() -> Result<(), SqlChainError> {
    let db = model_db()?;
    let id = Order::create(&db, [("total", RowValues::Float(12.5))])?;
    assert_eq!(Order::find(&db, id)?.get_float("total"), Some(12.5));

    // the default server has no orders table
    assert!(matches!(
        db.table("orders").count(),
        Err(SqlChainError::StatementError { .. })
    ));

    let mut cache = RowCache::new();
    let row = Order::cached(&db, &mut cache, id)?;
    assert!(row.exists());
    assert_eq!(row.get_or_fetch(&db, "total")?, RowValues::Float(12.5));
    assert!(cache.contains("orders", id));
    db.shutdown();
    Ok(())
}

#[test]
fn remove_renders_operators() -> Result<(), SqlChainError> {
    let (db, connector) = recording_db();
    User::remove(&db, [("status", "!=", "inactive")])?;
    let call = last_call(&connector);
    assert_eq!(call.sql, "DELETE FROM users WHERE status != ?");
    assert_eq!(call.params, Params::Positional(vec![RowValues::from("inactive")]));

    db.delete("users", [Filter::eq("id", 7), Filter::cmp("age", "<=", 3)])?;
    assert_eq!(
        last_call(&connector).sql,
        "DELETE FROM users WHERE id = ? AND age <= ?"
    );
    assert!(matches!(
        db.delete("users", [("age", "=>", 3)]),
        Err(SqlChainError::BuildError(_))
    ));
    Ok(())
}
