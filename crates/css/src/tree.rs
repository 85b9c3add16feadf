use std::path::{Path, PathBuf};

use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, SourceMap, SourceMapper, Span};
use swc_core::css::ast::{AtRule, AtRuleName, Declaration, DeclarationName, Stylesheet};
use swc_core::css::parser::parse_file;
use swc_core::css::parser::parser::ParserConfig;
use swc_core::css::visit::{Visit, VisitWith};
use varguard_core::SourceLocation;

/// 样式表解析错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("CSS syntax error: {0}")]
    Syntax(String),
}

/// `@` 规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRuleNode {
    /// 规则名（不含 `@`，小写）
    pub name: String,
    /// 原始参数文本（如 `"theme.css" screen`）
    pub params: String,
    pub location: SourceLocation,
    /// 规则块内的声明（如 `@property` 的描述符）
    pub descriptors: Vec<DeclarationNode>,
}

/// 声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationNode {
    pub prop: String,
    /// 原始值文本，不含 `!important`
    pub value: String,
    pub important: bool,
    pub location: SourceLocation,
}

/// 解析后的样式表
///
/// 只保存检查需要的部分：`@` 规则和声明（按源码顺序），
/// 不持有 swc 的 AST，可以跨 await 传递
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTree {
    origin: Option<PathBuf>,
    at_rules: Vec<AtRuleNode>,
    declarations: Vec<DeclarationNode>,
}

impl StyleTree {
    /// 样式表来源文件，内存中的样式表为 None
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn at_rules(&self) -> &[AtRuleNode] {
        &self.at_rules
    }

    pub fn declarations(&self) -> &[DeclarationNode] {
        &self.declarations
    }

    /// 遍历指定名称的 `@` 规则（名称不区分大小写）
    pub fn walk_at_rules<F>(&self, name: &str, mut visitor: F)
    where
        F: FnMut(&AtRuleNode),
    {
        self.at_rules
            .iter()
            .filter(|rule| rule.name.eq_ignore_ascii_case(name))
            .for_each(|rule| visitor(rule));
    }

    /// 遍历满足条件的声明
    pub fn walk_decls<P, F>(&self, mut predicate: P, mut visitor: F)
    where
        P: FnMut(&DeclarationNode) -> bool,
        F: FnMut(&DeclarationNode),
    {
        for decl in &self.declarations {
            if predicate(decl) {
                visitor(decl);
            }
        }
    }
}

/// 解析 CSS 源码为 `StyleTree`
///
/// - `origin`: 样式表文件路径（用于解析相对 `@import`），内存样式表传 None
///
/// 可恢复的语法错误会被忽略，只有致命错误才返回 `Err`
pub fn parse_stylesheet(source: &str, origin: Option<&Path>) -> Result<StyleTree, ParseError> {
    let cm: Lrc<SourceMap> = Default::default();
    let file_name = match origin {
        Some(path) => FileName::Real(path.to_path_buf()),
        None => FileName::Anon,
    };
    let fm = cm.new_source_file(file_name.into(), source.to_string());

    let mut errors = vec![];
    let stylesheet: Stylesheet = parse_file(&fm, None, ParserConfig::default(), &mut errors)
        .map_err(|e| ParseError::Syntax(format!("{:?}", e)))?;

    if !errors.is_empty() {
        tracing::trace!(
            origin = ?origin,
            count = errors.len(),
            "recovered from CSS syntax errors"
        );
    }

    let mut collector = TreeCollector::new(&cm);
    stylesheet.visit_with(&mut collector);

    Ok(StyleTree {
        origin: origin.map(Path::to_path_buf),
        at_rules: collector.at_rules,
        declarations: collector.declarations,
    })
}

/// 遍历 swc AST，收集 `@` 规则和声明
struct TreeCollector<'a> {
    cm: &'a SourceMap,
    at_rules: Vec<AtRuleNode>,
    declarations: Vec<DeclarationNode>,
}

impl<'a> TreeCollector<'a> {
    fn new(cm: &'a SourceMap) -> Self {
        Self {
            cm,
            at_rules: Vec::new(),
            declarations: Vec::new(),
        }
    }

    fn location(&self, span: Span) -> SourceLocation {
        let loc = self.cm.lookup_char_pos(span.lo);
        SourceLocation::new(loc.line, loc.col.0 + 1)
    }

    fn snippet(&self, span: Span) -> String {
        self.cm.span_to_snippet(span).unwrap_or_default()
    }
}

impl Visit for TreeCollector<'_> {
    fn visit_at_rule(&mut self, n: &AtRule) {
        let name = match &n.name {
            AtRuleName::Ident(ident) => ident.value.to_string(),
            AtRuleName::DashedIdent(ident) => dashed(&ident.value),
        }
        .to_ascii_lowercase();
        let params = at_rule_params(&self.snippet(n.span), &name);
        let location = self.location(n.span);

        // 只收集块内的声明；`@supports (prop: value)` 等前导条件不算声明
        let first_inner = self.declarations.len();
        n.block.visit_with(self);
        let descriptors = self.declarations[first_inner..].to_vec();

        self.at_rules.push(AtRuleNode {
            name,
            params,
            location,
            descriptors,
        });
    }

    fn visit_declaration(&mut self, n: &Declaration) {
        let prop = match &n.name {
            DeclarationName::Ident(ident) => ident.value.to_string(),
            DeclarationName::DashedIdent(ident) => dashed(&ident.value),
        };
        let (value, important) = declaration_value(&self.snippet(n.span));

        self.declarations.push(DeclarationNode {
            prop,
            value,
            important: important || n.important.is_some(),
            location: self.location(n.span),
        });

        n.visit_children_with(self);
    }
}

/// swc 的 DashedIdent 不一定带前导 `--`，统一补齐
fn dashed(value: &str) -> String {
    if value.starts_with("--") {
        value.to_string()
    } else {
        format!("--{}", value)
    }
}

/// 从 `@name params { ... }` / `@name params;` 中提取 params
fn at_rule_params(snippet: &str, name: &str) -> String {
    let rest = snippet.trim_start().strip_prefix('@').unwrap_or(snippet);
    let rest = match rest.get(..name.len()) {
        Some(head) if head.eq_ignore_ascii_case(name) => &rest[name.len()..],
        _ => rest,
    };

    let mut quote: Option<char> = None;
    let mut end = rest.len();
    for (i, ch) in rest.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '{' || ch == ';' => {
                end = i;
                break;
            }
            None => {}
        }
    }

    rest[..end].trim().to_string()
}

/// 从 `prop: value !important` 中提取 (value, important)
fn declaration_value(snippet: &str) -> (String, bool) {
    let raw = snippet
        .split_once(':')
        .map(|(_, value)| value)
        .unwrap_or_default()
        .trim()
        .trim_end_matches(';')
        .trim_end();

    split_important(raw)
}

fn split_important(value: &str) -> (String, bool) {
    let lower = value.to_ascii_lowercase();
    if let Some(head) = lower.strip_suffix("important") {
        let head = head.trim_end();
        if let Some(bang) = head.strip_suffix('!') {
            return (value[..bang.len()].trim_end().to_string(), true);
        }
    }
    (value.to_string(), false)
}
