use std::sync::Arc;

use varguard_core::{merge_mappings, merge_over, CustomPropertyMapping, ResolverOptions};
use varguard_css::StyleTree;

use crate::imports::{resolve_tree, ImportChain};
use crate::source::PropertySource;

/// 按配置顺序依次解析所有来源并合并
///
/// 顺序是对外承诺：后配置的来源覆盖先配置的来源。
/// 单个来源内部（如 CSS 文件的 import）可以并发，来源之间严格串行。
/// 加载失败的来源贡献空表。
pub async fn resolve_sources(
    sources: Vec<PropertySource>,
    options: Arc<ResolverOptions>,
) -> CustomPropertyMapping {
    let mut mapping = CustomPropertyMapping::new();

    for source in sources {
        let fragment = match source.load(&options).await {
            Ok(fragment) => fragment,
            Err(err) => {
                tracing::warn!(%err, "ignoring custom property source");
                CustomPropertyMapping::new()
            }
        };
        merge_over(&mut mapping, fragment);
    }

    mapping
}

/// 合并已解析的来源与当前样式表自身的属性（样式表优先）
pub async fn resolve_for_stylesheet(
    imported: &CustomPropertyMapping,
    tree: &StyleTree,
    options: &Arc<ResolverOptions>,
) -> CustomPropertyMapping {
    let chain = ImportChain::starting_at(tree).await;
    let local = resolve_tree(tree, options, &chain).await;
    merge_mappings(imported.clone(), local)
}
