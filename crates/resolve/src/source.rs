use std::fmt;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use futures::FutureExt;
use indexmap::IndexMap;
use serde::Deserialize;
use varguard_core::CustomPropertyMapping;

// ── 配置中的来源描述（可由 JSON 反序列化） ───────────────────────

/// `importFrom` 中的单个来源
///
/// 支持三种 JSON 形态：
/// - `"path/to/file.css"`
/// - `{ "from": "path/to/file.json", "type": "json" }`
/// - `{ "customProperties": { "--x": "1px" } }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    Path(String),
    File(FileSource),
    Inline(InlineProperties),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSource {
    pub from: PathBuf,
    /// 显式指定加载器类型；缺省时由扩展名推断
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// 直接给出的属性表，两种键名都接受
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InlineProperties {
    #[serde(rename = "customProperties", default)]
    pub custom_properties: Option<IndexMap<String, serde_json::Value>>,
    #[serde(rename = "custom-properties", default)]
    pub custom_properties_dashed: Option<IndexMap<String, serde_json::Value>>,
}

impl InlineProperties {
    pub fn into_mapping(self) -> CustomPropertyMapping {
        collect_properties(self.custom_properties, self.custom_properties_dashed)
    }
}

/// 合并两种键名下的属性表，`custom-properties` 覆盖 `customProperties`
///
/// 所有键都保留：字符串原样保存，其他值保存为 JSON 文本
pub(crate) fn collect_properties(
    camel: Option<IndexMap<String, serde_json::Value>>,
    dashed: Option<IndexMap<String, serde_json::Value>>,
) -> CustomPropertyMapping {
    camel
        .into_iter()
        .chain(dashed)
        .flatten()
        .map(|(name, value)| {
            let value = match value {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            };
            (name, value)
        })
        .collect()
}

// ── 程序化来源 ───────────────────────────────────────────────────

/// 调用方提供的来源：除 JSON 形态外，还可以是现成的属性表、工厂函数或异步结果
pub enum ImportSource {
    Spec(SourceSpec),
    Mapping(CustomPropertyMapping),
    /// 工厂函数，返回值可以是任意其他形态（包括异步结果）
    Factory(Box<dyn FnOnce() -> ImportSource + Send>),
    Pending(BoxFuture<'static, CustomPropertyMapping>),
}

impl ImportSource {
    pub fn factory<F>(factory: F) -> Self
    where
        F: FnOnce() -> ImportSource + Send + 'static,
    {
        ImportSource::Factory(Box::new(factory))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: std::future::Future<Output = CustomPropertyMapping> + Send + 'static,
    {
        ImportSource::Pending(future.boxed())
    }
}

impl fmt::Debug for ImportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportSource::Spec(spec) => f.debug_tuple("Spec").field(spec).finish(),
            ImportSource::Mapping(mapping) => f.debug_tuple("Mapping").field(mapping).finish(),
            ImportSource::Factory(_) => f.write_str("Factory(..)"),
            ImportSource::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

impl From<SourceSpec> for ImportSource {
    fn from(spec: SourceSpec) -> Self {
        ImportSource::Spec(spec)
    }
}

impl From<CustomPropertyMapping> for ImportSource {
    fn from(mapping: CustomPropertyMapping) -> Self {
        ImportSource::Mapping(mapping)
    }
}

impl From<&str> for ImportSource {
    fn from(path: &str) -> Self {
        ImportSource::Spec(SourceSpec::Path(path.to_string()))
    }
}

impl From<PathBuf> for ImportSource {
    fn from(path: PathBuf) -> Self {
        ImportSource::Spec(SourceSpec::File(FileSource {
            from: path,
            kind: None,
        }))
    }
}

// ── 规范化后的来源 ───────────────────────────────────────────────

/// 规范化后的来源，按标签分派到对应的加载器
pub enum PropertySource {
    CssFile(PathBuf),
    JsonFile(PathBuf),
    DynamicModule(PathBuf),
    Inline(CustomPropertyMapping),
    Pending(BoxFuture<'static, CustomPropertyMapping>),
    /// 无法识别的类型，加载时得到空表
    Unsupported { kind: String, path: PathBuf },
}

impl fmt::Debug for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertySource::CssFile(path) => f.debug_tuple("CssFile").field(path).finish(),
            PropertySource::JsonFile(path) => f.debug_tuple("JsonFile").field(path).finish(),
            PropertySource::DynamicModule(path) => {
                f.debug_tuple("DynamicModule").field(path).finish()
            }
            PropertySource::Inline(mapping) => f.debug_tuple("Inline").field(mapping).finish(),
            PropertySource::Pending(_) => f.write_str("Pending(..)"),
            PropertySource::Unsupported { kind, path } => f
                .debug_struct("Unsupported")
                .field("kind", kind)
                .field("path", path)
                .finish(),
        }
    }
}

/// 规范化来源列表（保持顺序）
///
/// 这里不会报错：格式不对的来源在加载阶段才失败
pub fn normalize_sources<I>(sources: I) -> Vec<PropertySource>
where
    I: IntoIterator<Item = ImportSource>,
{
    sources.into_iter().map(normalize_source).collect()
}

pub fn normalize_source(source: ImportSource) -> PropertySource {
    match source {
        ImportSource::Pending(future) => PropertySource::Pending(future),
        ImportSource::Factory(factory) => normalize_source(factory()),
        ImportSource::Mapping(mapping) => PropertySource::Inline(mapping),
        ImportSource::Spec(SourceSpec::Inline(inline)) => {
            PropertySource::Inline(inline.into_mapping())
        }
        ImportSource::Spec(SourceSpec::Path(path)) => file_source(PathBuf::from(path), None),
        ImportSource::Spec(SourceSpec::File(FileSource { from, kind })) => file_source(from, kind),
    }
}

fn file_source(path: PathBuf, kind: Option<String>) -> PropertySource {
    let path = std::path::absolute(&path).unwrap_or(path);
    let kind = kind
        .or_else(|| extension_of(&path))
        .unwrap_or_default()
        .to_ascii_lowercase();

    match kind.as_str() {
        "css" => PropertySource::CssFile(path),
        "json" => PropertySource::JsonFile(path),
        "js" | "mjs" | "cjs" | "ts" | "mts" | "cts" => PropertySource::DynamicModule(path),
        _ => PropertySource::Unsupported { kind, path },
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_string())
}
