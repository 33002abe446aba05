//! Fluent SQL statement builder with a dual-backend execution router.
//!
//! Statements are composed with [`QueryBuilder`] (or written by hand with
//! [`RawQuery`]), routed to one of two client backends, and their results normalized
//! into a [`Collection`]:
//!
//! - statements carrying parameters go to the prepared-statement backend, which binds
//!   typed values and returns typed rows;
//! - parameterless statements go to the simple-query backend, which returns text rows.
//!
//! Either way callers see the same `row`/`field`/`col`/`first`/`last`/`count`/`pluck`
//! contract. Both backends run on the bundled SQLite engine.
//!
//! ```rust
//! use sql_chain::prelude::*;
//!
//! let db = Database::new();
//! db.configure("main", ServerConfig::default())?;
//! db.execute_batch(None, "CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INT, status TEXT)")?;
//! db.create("orders", [("user_id", RowValues::Int(7)), ("status", "paid".into())])?;
//!
//! let buyers = db
//!     .table("orders")
//!     .select(["user_id"])
//!     .where_eq("status", "paid")
//!     .col()?;
//! assert_eq!(buyers, vec![RowValues::Int(7)]);
//! # db.shutdown();
//! # Ok::<(), SqlChainError>(())
//! ```

pub mod cache;
pub mod condition;
pub mod database;
pub mod error;
pub mod executor;
pub mod model;
pub mod placeholders;
pub mod prelude;
pub mod query;
pub mod query_builder;
pub mod registry;
pub mod results;
pub mod sqlite;
pub mod types;

pub use cache::{CachedRow, RowCache};
pub use condition::{Condition, ConditionList, Connective};
pub use database::Database;
pub use error::SqlChainError;
pub use executor::{execute, execute_batch, execute_on, infer_return_kind, select_backend};
pub use query::{QueryAndParams, RawQuery};
pub use model::Model;
pub use query_builder::{Action, BindingList, Direction, Filter, QueryBuilder};
pub use registry::{Backend, ConnectionRegistry, Connector, ServerConfig, ServerConfigBuilder};
pub use results::{Collection, DbRow, NativeResult, ResultSet, SimpleResultSet};
pub use types::{BackendKind, Params, ReturnKind, RowValues};
