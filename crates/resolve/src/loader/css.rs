use std::path::PathBuf;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use varguard_core::{CustomPropertyMapping, LoadError, ResolverOptions};
use varguard_css::parse_stylesheet;

use crate::imports::{resolve_tree, ImportChain};

/// 从 CSS 文件加载属性表（递归跟随其中的 `@import`）
///
/// `chain` 是当前解析链上正在处理的文件，再次遇到时视为循环，返回 `LoadError::Cycle`
pub fn load_css_file(
    path: PathBuf,
    options: Arc<ResolverOptions>,
    chain: ImportChain,
) -> BoxFuture<'static, Result<CustomPropertyMapping, LoadError>> {
    async move {
        let canonical = tokio::fs::canonicalize(&path)
            .await
            .unwrap_or_else(|_| path.clone());
        if chain.contains(&canonical) {
            return Err(LoadError::Cycle(path));
        }
        let chain = chain.with(canonical);

        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LoadError::io(&path, e))?;
        let tree = parse_stylesheet(&source, Some(&path)).map_err(|e| LoadError::CssParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::trace!(path = %path.display(), "resolving custom properties");
        Ok(resolve_tree(&tree, &options, &chain).await)
    }
    .boxed()
}
