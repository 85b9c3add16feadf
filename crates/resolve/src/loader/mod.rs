//! 属性文件加载器
//!
//! 每个加载器从一个已解析的路径得到一张属性表。
//! 加载器本身返回 `Result`，由汇总阶段把失败当作空表处理。

mod css;
mod json;
mod module;

pub use css::load_css_file;
pub use json::{load_json_file, load_json_str};
pub use module::{load_module_file, load_module_str};

use std::sync::Arc;

use varguard_core::{CustomPropertyMapping, LoadError, ResolverOptions};

use crate::imports::ImportChain;
use crate::source::PropertySource;

impl PropertySource {
    /// 按来源类型分派到对应的加载器
    pub async fn load(
        self,
        options: &Arc<ResolverOptions>,
    ) -> Result<CustomPropertyMapping, LoadError> {
        match self {
            PropertySource::Inline(mapping) => Ok(mapping),
            PropertySource::Pending(future) => Ok(future.await),
            PropertySource::CssFile(path) => {
                load_css_file(path, Arc::clone(options), ImportChain::default()).await
            }
            PropertySource::JsonFile(path) => load_json_file(&path).await,
            PropertySource::DynamicModule(path) => load_module_file(&path).await,
            PropertySource::Unsupported { kind, path } => {
                Err(LoadError::UnsupportedKind { kind, path })
            }
        }
    }
}
