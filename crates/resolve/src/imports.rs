use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use varguard_core::{
    is_custom_property_name, merge_over, CustomPropertyMapping, LoadError, ResolverOptions,
};
use varguard_css::StyleTree;

use crate::loader::load_css_file;
use crate::module_path::resolve_module_path;

/// 当前解析链上正在处理的文件（规范化路径）
///
/// 每个分支持有自己的副本，兄弟 import 之间互不影响；
/// 只有同一条链上重复出现的文件才算循环
#[derive(Debug, Clone, Default)]
pub struct ImportChain {
    visiting: HashSet<PathBuf>,
}

impl ImportChain {
    /// 以样式表自身为起点的解析链（内存样式表为空链）
    pub async fn starting_at(tree: &StyleTree) -> Self {
        let mut chain = Self::default();
        if let Some(origin) = tree.origin() {
            let canonical = tokio::fs::canonicalize(origin)
                .await
                .unwrap_or_else(|_| origin.to_path_buf());
            chain.visiting.insert(canonical);
        }
        chain
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.visiting.contains(path)
    }

    pub fn with(&self, path: PathBuf) -> Self {
        let mut next = self.clone();
        next.visiting.insert(path);
        next
    }
}

/// 收集样式表可见的全部自定义属性（包括 `@import` 递归引入的）
///
/// 合并顺序：
/// 1. 各个 import 的结果，按 `@import` 出现顺序合并（后者覆盖前者）
/// 2. `@property --name` 注册
/// 3. 样式表自身的自定义属性声明（最高优先级，不区分选择器）
///
/// 单个 import 失败（找不到、读不了、解析失败、循环）只记录日志，贡献空表
pub async fn resolve_tree(
    tree: &StyleTree,
    options: &Arc<ResolverOptions>,
    chain: &ImportChain,
) -> CustomPropertyMapping {
    let source_dir = source_dir(tree);

    let mut specifiers = Vec::new();
    tree.walk_at_rules("import", |rule| {
        if let Some(specifier) = import_specifier(&rule.params) {
            specifiers.push(specifier);
        }
    });

    // 所有 import 并发加载，全部完成后再合并
    let loads = specifiers.into_iter().map(|specifier| {
        load_import(
            specifier,
            source_dir.clone(),
            Arc::clone(options),
            chain.clone(),
        )
    });
    let results = join_all(loads).await;

    let mut mapping = CustomPropertyMapping::new();
    for result in results {
        match result {
            Ok(fragment) => merge_over(&mut mapping, fragment),
            Err(err) => tracing::debug!(%err, "ignoring failed import"),
        }
    }

    tree.walk_at_rules("property", |rule| {
        let name = rule.params.trim();
        if is_custom_property_name(name) {
            let initial = rule
                .descriptors
                .iter()
                .rev()
                .find(|d| d.prop.eq_ignore_ascii_case("initial-value"))
                .map(|d| d.value.clone())
                .unwrap_or_default();
            mapping.insert(name.to_string(), initial);
        }
    });

    tree.walk_decls(
        |decl| is_custom_property_name(&decl.prop),
        |decl| {
            mapping.insert(decl.prop.clone(), decl.value.clone());
        },
    );

    mapping
}

async fn load_import(
    specifier: String,
    source_dir: PathBuf,
    options: Arc<ResolverOptions>,
    chain: ImportChain,
) -> Result<CustomPropertyMapping, LoadError> {
    let path = if Path::new(&specifier).is_absolute() {
        PathBuf::from(&specifier)
    } else {
        resolve_module_path(&specifier, &source_dir, &options).await?
    };
    load_css_file(path, options, chain).await
}

/// 样式表所在目录；内存样式表使用当前工作目录
fn source_dir(tree: &StyleTree) -> PathBuf {
    tree.origin()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
}

/// 从 `@import` 参数中提取路径
///
/// - `"a.css"` / `'a.css'` → `a.css`
/// - `url(a.css)` / `url("a.css") screen` → `a.css`
/// - 远程地址和 `data:` URI 返回 None
pub fn import_specifier(params: &str) -> Option<String> {
    let params = params.trim();

    let raw = if params
        .get(..4)
        .is_some_and(|head| head.eq_ignore_ascii_case("url("))
    {
        let inner = &params[4..];
        let end = inner.find(')')?;
        strip_quotes(inner[..end].trim())
    } else if params.starts_with('"') || params.starts_with('\'') {
        let quote = params.chars().next()?;
        let inner = &params[1..];
        match inner.find(quote) {
            Some(end) => &inner[..end],
            None => inner,
        }
    } else {
        strip_quotes(params.split_whitespace().next()?)
    };

    let raw = raw.trim();
    if raw.is_empty() || is_remote(raw) {
        return None;
    }
    Some(raw.to_string())
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}

fn is_remote(specifier: &str) -> bool {
    let lower = specifier.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("//")
        || lower.starts_with("data:")
}
