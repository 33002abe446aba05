//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::cache::{CachedRow, RowCache};
pub use crate::database::Database;
pub use crate::error::SqlChainError;
pub use crate::query::{QueryAndParams, RawQuery};
pub use crate::model::Model;
pub use crate::query_builder::{Action, Direction, Filter, QueryBuilder};
pub use crate::registry::{Backend, ConnectionRegistry, Connector, ServerConfig};
pub use crate::results::{Collection, DbRow, NativeResult, ResultSet, SimpleResultSet};
pub use crate::types::{BackendKind, Params, ReturnKind, RowValues};
