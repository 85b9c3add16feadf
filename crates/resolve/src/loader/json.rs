use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use varguard_core::{CustomPropertyMapping, LoadError};

use crate::source::collect_properties;

/// JSON 属性文件
///
/// 其他键被忽略。JSON 格式示例：
/// ```json
/// {
///   "customProperties": { "--brand": "#0af" },
///   "custom-properties": { "--gap": "4px" }
/// }
/// ```
#[derive(Debug, Deserialize)]
struct PropertyDocument {
    #[serde(rename = "customProperties", default)]
    custom_properties: Option<IndexMap<String, serde_json::Value>>,
    #[serde(rename = "custom-properties", default)]
    custom_properties_dashed: Option<IndexMap<String, serde_json::Value>>,
}

/// 从 JSON 文件加载属性表
pub async fn load_json_file(path: &Path) -> Result<CustomPropertyMapping, LoadError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoadError::io(path, e))?;
    load_json_str(&json, path)
}

/// 从 JSON 字符串加载属性表（`path` 仅用于错误信息）
pub fn load_json_str(json: &str, path: &Path) -> Result<CustomPropertyMapping, LoadError> {
    let document: PropertyDocument =
        serde_json::from_str(json).map_err(|e| LoadError::json(path, e))?;

    Ok(collect_properties(
        document.custom_properties,
        document.custom_properties_dashed,
    ))
}
