#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use sql_chain::prelude::*;

/// One statement seen by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub server: String,
    pub backend: BackendKind,
    pub sql: String,
    pub params: Params,
    pub return_kind: ReturnKind,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Connector whose backends record every statement and answer with canned results.
#[derive(Debug, Default, Clone)]
pub struct RecordingConnector {
    pub calls: CallLog,
    pub connects: Rc<RefCell<Vec<(String, BackendKind)>>>,
}

impl Connector for RecordingConnector {
    fn connect(
        &self,
        server: &str,
        _config: &ServerConfig,
        kind: BackendKind,
    ) -> Result<Box<dyn Backend>, SqlChainError> {
        self.connects.borrow_mut().push((server.to_string(), kind));
        Ok(Box::new(RecordingBackend {
            server: server.to_string(),
            kind,
            calls: Rc::clone(&self.calls),
        }))
    }
}

pub struct RecordingBackend {
    server: String,
    kind: BackendKind,
    calls: CallLog,
}

impl Backend for RecordingBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn execute(
        &mut self,
        sql: &str,
        params: &Params,
        return_kind: ReturnKind,
    ) -> Result<NativeResult, SqlChainError> {
        self.calls.borrow_mut().push(Call {
            server: self.server.clone(),
            backend: self.kind,
            sql: sql.to_string(),
            params: params.clone(),
            return_kind,
        });
        Ok(match return_kind {
            ReturnKind::All => NativeResult::Simple(SimpleResultSet::new(vec!["id".into()])),
            ReturnKind::RowCount => NativeResult::RowCount(0),
            ReturnKind::LastInsertId => NativeResult::LastInsertId(42),
            ReturnKind::Count => NativeResult::Count(3),
        })
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), SqlChainError> {
        self.calls.borrow_mut().push(Call {
            server: self.server.clone(),
            backend: self.kind,
            sql: sql.to_string(),
            params: Params::none(),
            return_kind: ReturnKind::All,
        });
        Ok(())
    }
}

/// A database wired to a [`RecordingConnector`] with one server, `main`.
pub fn recording_db() -> (Database, RecordingConnector) {
    let connector = RecordingConnector::default();
    let db = Database::with_connector(connector.clone());
    db.configure("main", ServerConfig::default())
        .expect("register main");
    (db, connector)
}

/// The last statement recorded.
pub fn last_call(connector: &RecordingConnector) -> Call {
    connector
        .calls
        .borrow()
        .last()
        .cloned()
        .expect("at least one recorded call")
}
