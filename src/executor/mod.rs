mod dispatch;
mod infer;

pub use dispatch::{execute, execute_batch, execute_on, select_backend};
pub use infer::infer_return_kind;
