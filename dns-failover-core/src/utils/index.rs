//! 列表转索引

use std::collections::BTreeMap;

/// 以 `key_fn` 的结果为键把列表转换为有序映射
///
/// 键重复时保留最后一个。
pub fn index_by<T, F>(items: impl IntoIterator<Item = T>, key_fn: F) -> BTreeMap<String, T>
where
    F: Fn(&T) -> String,
{
    items
        .into_iter()
        .map(|item| (key_fn(&item), item))
        .collect()
}
