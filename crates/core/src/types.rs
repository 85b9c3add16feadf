use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 自定义属性表：`--name` -> 原始值字符串
///
/// 使用 IndexMap 保持插入顺序，后写入者覆盖先写入者
pub type CustomPropertyMapping = IndexMap<String, String>;

/// 模块路径解析选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ResolverOptions {
    /// 额外的查找目录（按顺序）
    pub paths: Vec<PathBuf>,
    /// 模块目录名（默认 `node_modules`）
    pub module_directories: Vec<String>,
    /// 可接受的文件扩展名（默认 `.css`）
    pub extensions: Vec<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            module_directories: vec!["node_modules".to_string()],
            extensions: vec![".css".to_string()],
        }
    }
}

/// 源码位置（1-based）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// 诊断信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 规则标识
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    /// 出错声明的位置
    pub location: SourceLocation,
    /// 出错的单词（用于定位高亮），配置错误时为空
    pub word: Option<String>,
}

impl Diagnostic {
    pub fn warning(
        rule: impl Into<String>,
        message: impl Into<String>,
        location: SourceLocation,
        word: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity: Severity::Warning,
            message: message.into(),
            location,
            word: Some(word.into()),
        }
    }

    pub fn error(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            severity: Severity::Error,
            message: message.into(),
            location: SourceLocation::default(),
            word: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_options_defaults() {
        let options = ResolverOptions::default();
        assert!(options.paths.is_empty());
        assert_eq!(options.module_directories, vec!["node_modules"]);
        assert_eq!(options.extensions, vec![".css"]);
    }

    #[test]
    fn test_resolver_options_partial_json() {
        let options: ResolverOptions =
            serde_json::from_str(r#"{ "extensions": [".css", ".pcss"] }"#).unwrap();
        assert_eq!(options.extensions, vec![".css", ".pcss"]);
        // 未给出的字段使用默认值
        assert_eq!(options.module_directories, vec!["node_modules"]);
    }

    #[test]
    fn test_resolver_options_rejects_unknown_keys() {
        let result = serde_json::from_str::<ResolverOptions>(r#"{ "alias": {} }"#);
        assert!(result.is_err());
    }
}
