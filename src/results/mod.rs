mod collection;
mod native;
mod result_set;
mod row;

pub use collection::Collection;
pub use native::NativeResult;
pub use result_set::{ResultSet, SimpleResultSet};
pub use row::DbRow;
