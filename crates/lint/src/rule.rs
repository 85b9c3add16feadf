use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use varguard_core::{CustomPropertyMapping, Diagnostic, ResolverOptions, Severity};
use varguard_css::{parse_stylesheet, ParseError, StyleTree};
use varguard_resolve::{normalize_sources, resolve_for_stylesheet, resolve_sources, ImportSource};

use crate::options::{OptionError, PrimaryOption, RuleOptions};
use crate::validate::validate_tree;

/// 规则标识
pub const RULE_NAME: &str = "csstools/value-no-unknown-custom-properties";

type SharedMapping = Shared<BoxFuture<'static, Arc<CustomPropertyMapping>>>;

/// 规则实例
///
/// 启用时持有所有 `importFrom` 来源的解析结果，之后所有样式表共享。
/// 构建时只创建解析任务，不会开始读文件：第一次 `lint_*` 或
/// `imported_properties` 时才开始解析，构建规则因此不需要运行时
pub struct Rule {
    state: RuleState,
}

enum RuleState {
    Disabled,
    /// 配置无效：每个文件报告一次，跳过检查
    Invalid(Vec<OptionError>),
    Enabled {
        resolver: Arc<ResolverOptions>,
        imported: SharedMapping,
    },
}

impl Rule {
    /// 由主选项和次要选项（均为 JSON）构建规则
    pub fn new(primary: &Value, secondary: &Value) -> Self {
        Self::with_sources(primary, secondary, Vec::new())
    }

    /// 同 `new`，`extra` 中的来源排在配置来源之后
    ///
    /// 程序化调用方可以在这里传入工厂函数或异步结果
    pub fn with_sources(primary: &Value, secondary: &Value, extra: Vec<ImportSource>) -> Self {
        let primary = match PrimaryOption::from_value(primary) {
            Ok(primary) => primary,
            Err(err) => return Self::invalid(vec![err]),
        };

        // 禁用时不再校验次要选项
        if primary == PrimaryOption::Disabled {
            return Self::disabled();
        }

        match RuleOptions::from_value(secondary) {
            Ok(options) => Self::enabled(options, extra),
            Err(errors) => Self::invalid(errors),
        }
    }

    /// 由已解析的选项构建启用状态的规则
    pub fn enabled(options: RuleOptions, extra: Vec<ImportSource>) -> Self {
        let resolver = Arc::new(options.resolver);
        let sources = normalize_sources(
            options
                .import_from
                .into_vec()
                .into_iter()
                .map(ImportSource::from)
                .chain(extra),
        );

        let imported = resolve_sources(sources, Arc::clone(&resolver))
            .map(Arc::new)
            .boxed()
            .shared();

        Self {
            state: RuleState::Enabled { resolver, imported },
        }
    }

    pub fn disabled() -> Self {
        Self {
            state: RuleState::Disabled,
        }
    }

    fn invalid(errors: Vec<OptionError>) -> Self {
        for err in &errors {
            tracing::debug!(%err, "invalid rule configuration");
        }
        Self {
            state: RuleState::Invalid(errors),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, RuleState::Enabled { .. })
    }

    /// 所有 `importFrom` 来源合并后的属性表
    ///
    /// 禁用或配置无效时为 None
    pub async fn imported_properties(&self) -> Option<Arc<CustomPropertyMapping>> {
        match &self.state {
            RuleState::Enabled { imported, .. } => Some(imported.clone().await),
            _ => None,
        }
    }

    /// 解析并检查一份 CSS 源码
    ///
    /// 只有规则启用时才会解析；源码无法解析时返回 `Err`
    pub async fn lint_source(
        &self,
        source: &str,
        origin: Option<&Path>,
    ) -> Result<LintReport, ParseError> {
        if !self.is_enabled() {
            return Ok(self.skipped(origin));
        }
        let tree = parse_stylesheet(source, origin)?;
        Ok(self.lint_tree(&tree).await)
    }

    /// 检查已解析的样式表
    pub async fn lint_tree(&self, tree: &StyleTree) -> LintReport {
        let (resolver, imported) = match &self.state {
            RuleState::Enabled { resolver, imported } => (resolver, imported),
            _ => return self.skipped(tree.origin()),
        };

        let imported = imported.clone().await;
        let known = resolve_for_stylesheet(&imported, tree, resolver).await;
        tracing::trace!(
            origin = ?tree.origin(),
            known = known.len(),
            "validating custom property references"
        );

        LintReport {
            origin: tree.origin().map(Path::to_path_buf),
            diagnostics: validate_tree(tree, &known),
        }
    }

    /// 禁用：空报告；配置无效：每个错误一条
    fn skipped(&self, origin: Option<&Path>) -> LintReport {
        let diagnostics = match &self.state {
            RuleState::Invalid(errors) => errors
                .iter()
                .map(|err| Diagnostic::error(RULE_NAME, err.to_string()))
                .collect(),
            _ => Vec::new(),
        };
        LintReport {
            origin: origin.map(Path::to_path_buf),
            diagnostics,
        }
    }
}

/// 单个样式表的检查结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintReport {
    /// 样式表文件，内存样式表为 None
    pub origin: Option<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 未知自定义属性的引用
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// 配置错误
    pub fn invalid_options(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}
