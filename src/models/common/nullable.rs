//! 显式 `null` 与缺省字段同样处理
//!
//! `#[serde(default)]` 只覆盖字段缺失的情况，后端对未设置的列会输出 `null`。

use serde::{Deserialize, Deserializer};

/// `null` 时取类型默认值
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
