// SQLite module - both backends run on the bundled SQLite engine
//
// - config: opening and configuring connections, the default `Connector`
// - params: binding `RowValues` to statements
// - query: stepping statements and shaping their results
// - prepared / simple: the two `Backend` implementations

pub mod config;
pub mod params;
pub mod query;

mod prepared;
mod simple;

pub use config::SqliteConnector;
pub use prepared::PreparedBackend;
pub use simple::SimpleBackend;
