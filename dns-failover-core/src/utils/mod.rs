//! 通用辅助函数

mod index;

pub use index::index_by;
