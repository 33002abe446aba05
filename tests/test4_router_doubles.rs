mod common;

use common::{RecordingConnector, last_call, recording_db};
use sql_chain::prelude::*;
use sql_chain::{execute_on, infer_return_kind, select_backend};

#[test]
fn verb_inference_through_the_router() -> Result<(), SqlChainError> {
    let (db, connector) = recording_db();

    db.execute(Some("main"), "select * from users", Params::none(), None)?;
    let call = last_call(&connector);
    assert_eq!(call.return_kind, ReturnKind::All);
    assert_eq!(call.backend, BackendKind::Simple);

    let id = db.execute(
        Some("main"),
        "insert into users(name, age) values(?, ?)",
        vec![RowValues::from("ann"), RowValues::Int(31)],
        None,
    )?;
    let call = last_call(&connector);
    assert_eq!(call.return_kind, ReturnKind::LastInsertId);
    assert_eq!(call.backend, BackendKind::Prepared);
    assert_eq!(id.field(), RowValues::Int(42));
    assert_eq!(id.row().first_column(), Some("last_insert_id"));

    db.execute(None, "DELETE FROM users", Params::none(), None)?;
    assert_eq!(last_call(&connector).return_kind, ReturnKind::RowCount);

    // an explicit kind wins over inference
    db.execute(None, "select count(*) from users", Params::none(), Some(ReturnKind::Count))?;
    assert_eq!(last_call(&connector).return_kind, ReturnKind::Count);
    Ok(())
}

#[test]
fn handles_are_opened_lazily_and_reused() -> Result<(), SqlChainError> {
    let (db, connector) = recording_db();
    assert!(connector.connects.borrow().is_empty());

    db.table("users").fetch()?;
    db.table("users").fetch()?;
    db.table("users").where_eq("id", 1).fetch()?;
    db.table("users").where_eq("id", 2).fetch()?;
    assert_eq!(
        *connector.connects.borrow(),
        vec![
            ("main".to_string(), BackendKind::Simple),
            ("main".to_string(), BackendKind::Prepared),
        ]
    );
    assert_eq!(db.connection_count(), 2);

    db.shutdown();
    assert_eq!(db.connection_count(), 0);
    db.table("users").fetch()?;
    assert_eq!(connector.connects.borrow().len(), 3);
    Ok(())
}

#[test]
fn servers_resolve_case_insensitively_with_a_default() -> Result<(), SqlChainError> {
    let connector = RecordingConnector::default();
    let db = Database::with_connector(connector.clone());
    db.configure("Primary", ServerConfig::default())?;
    db.configure("Reporting", ServerConfig::default())?;

    db.table("t").fetch()?;
    assert_eq!(last_call(&connector).server, "primary");

    db.table("t").on("REPORTING").fetch()?;
    assert_eq!(last_call(&connector).server, "reporting");

    db.set_default_server("reporting")?;
    db.query("select 1", Params::none()).fetch()?;
    assert_eq!(last_call(&connector).server, "reporting");

    assert!(matches!(
        db.set_default_server("archive"),
        Err(SqlChainError::ConfigError(_))
    ));
    Ok(())
}

#[test]
fn execute_on_a_caller_supplied_handle() -> Result<(), SqlChainError> {
    let connector = RecordingConnector::default();
    let mut backend = connector.connect("adhoc", &ServerConfig::default(), BackendKind::Prepared)?;
    let result = execute_on(
        backend.as_mut(),
        "UPDATE t SET a = ?",
        &Params::Positional(vec![RowValues::Int(1)]),
        None,
    )?;
    assert!(matches!(result, NativeResult::RowCount(0)));
    assert_eq!(last_call(&connector).server, "adhoc");
    Ok(())
}

#[test]
fn backend_choice_and_inference_helpers() {
    assert_eq!(select_backend(&Params::none()), BackendKind::Simple);
    assert_eq!(
        select_backend(&Params::named([("id", 1)])),
        BackendKind::Prepared
    );
    assert_eq!(infer_return_kind("SHOW TABLES"), ReturnKind::All);
    assert_eq!(infer_return_kind("alter table t add c int"), ReturnKind::RowCount);
    assert_eq!(infer_return_kind("rename table a to b"), ReturnKind::RowCount);
}

#[test]
fn batches_run_on_the_simple_backend() -> Result<(), SqlChainError> {
    let (db, connector) = recording_db();
    db.execute_batch(None, "CREATE TABLE a (x); CREATE TABLE b (y);")?;
    let call = last_call(&connector);
    assert_eq!(call.backend, BackendKind::Simple);
    assert_eq!(call.sql, "CREATE TABLE a (x); CREATE TABLE b (y);");
    Ok(())
}
