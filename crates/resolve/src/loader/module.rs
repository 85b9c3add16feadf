use std::collections::HashMap;
use std::path::Path;

use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, SourceMap, SourceMapper, Spanned};
use swc_core::ecma::ast::*;
use swc_core::ecma::parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax};
use varguard_core::{CustomPropertyMapping, LoadError};

const CAMEL_KEY: &str = "customProperties";
const DASHED_KEY: &str = "custom-properties";

/// 从 JS/TS 模块加载属性表
///
/// 模块不会被执行：用 swc 解析后静态求值导出的对象字面量。
/// 无法静态求值的值保存为表达式源码，名称仍然计入。
/// 支持的导出形式：
/// - `export default { customProperties: { ... } }`
/// - `module.exports = { customProperties: { ... } }`
/// - `export const customProperties = { ... }`
/// - `exports.customProperties = { ... }`
/// - 默认导出一个顶层 `const` 绑定的对象
pub async fn load_module_file(path: &Path) -> Result<CustomPropertyMapping, LoadError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoadError::io(path, e))?;
    load_module_str(&source, path)
}

/// 从模块源码加载属性表（`path` 用于判断语法和错误信息）
pub fn load_module_str(source: &str, path: &Path) -> Result<CustomPropertyMapping, LoadError> {
    let (cm, module) = parse_module(source, path)?;
    Ok(ModuleExports::collect(&module).into_mapping(&cm))
}

fn parse_module(source: &str, path: &Path) -> Result<(Lrc<SourceMap>, Module), LoadError> {
    // 根据扩展名选择语法
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let syntax = match extension.as_str() {
        "ts" | "mts" | "cts" => Syntax::Typescript(TsSyntax::default()),
        _ => Syntax::Es(EsSyntax::default()),
    };

    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Real(path.to_path_buf()).into(),
        source.to_string(),
    );

    let mut errors = vec![];
    let module = parse_file_as_module(&fm, syntax, EsVersion::latest(), None, &mut errors)
        .map_err(|e| LoadError::ModuleParse {
            path: path.to_path_buf(),
            message: format!("{:?}", e),
        })?;

    if !errors.is_empty() {
        return Err(LoadError::ModuleParse {
            path: path.to_path_buf(),
            message: format!("{:?}", errors),
        });
    }

    Ok((cm, module))
}

/// 模块导出中找到的两种属性表
#[derive(Default)]
struct ModuleExports<'a> {
    /// 顶层 `const name = { ... }` 绑定
    bindings: HashMap<String, &'a ObjectLit>,
    camel: Option<&'a ObjectLit>,
    dashed: Option<&'a ObjectLit>,
}

impl<'a> ModuleExports<'a> {
    fn collect(module: &'a Module) -> Self {
        let mut exports = ModuleExports::default();

        // 先收集顶层绑定，默认导出可能引用它们
        for item in &module.body {
            let decl = match item {
                ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                    decl: Decl::Var(var),
                    ..
                })) => var,
                _ => continue,
            };
            for declarator in &decl.decls {
                if let (Pat::Ident(binding), Some(init)) = (&declarator.name, &declarator.init) {
                    if let Some(object) = object_literal(init) {
                        exports.bindings.insert(binding.id.sym.to_string(), object);
                    }
                }
            }
        }

        for item in &module.body {
            match item {
                // export default { ... }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                    exports.read_exported_object(&export.expr);
                }
                // export const customProperties = { ... }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                    decl: Decl::Var(var),
                    ..
                })) => {
                    for declarator in &var.decls {
                        if let (Pat::Ident(binding), Some(init)) =
                            (&declarator.name, &declarator.init)
                        {
                            exports.read_named_export(&binding.id.sym, init);
                        }
                    }
                }
                // module.exports = { ... } / exports.customProperties = { ... }
                ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) => {
                    if let Expr::Assign(assign) = &**expr {
                        exports.read_commonjs_assign(assign);
                    }
                }
                _ => {}
            }
        }

        exports
    }

    fn read_exported_object(&mut self, expr: &'a Expr) {
        let Some(object) = self.resolve_object(expr) else {
            return;
        };
        for (key, value) in object_entries(object) {
            self.read_named_export(&key, value);
        }
    }

    fn read_named_export(&mut self, name: &str, value: &'a Expr) {
        let object = self.resolve_object(value);
        match name {
            CAMEL_KEY => self.camel = object.or(self.camel),
            DASHED_KEY => self.dashed = object.or(self.dashed),
            _ => {}
        }
    }

    fn read_commonjs_assign(&mut self, assign: &'a AssignExpr) {
        if assign.op != AssignOp::Assign {
            return;
        }
        let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = &assign.left else {
            return;
        };
        let Expr::Ident(object) = &*member.obj else {
            return;
        };
        let Some(prop) = member_prop_name(&member.prop) else {
            return;
        };

        match (&*object.sym, prop.as_str()) {
            ("module", "exports") => self.read_exported_object(&assign.right),
            ("exports", name) => self.read_named_export(name, &assign.right),
            _ => {}
        }
    }

    /// 对象字面量，或引用顶层对象绑定的标识符
    fn resolve_object(&self, expr: &'a Expr) -> Option<&'a ObjectLit> {
        match unwrap_expr(expr) {
            Expr::Ident(ident) => self.bindings.get(&*ident.sym).copied(),
            other => object_literal(other),
        }
    }

    fn into_mapping(self, cm: &SourceMap) -> CustomPropertyMapping {
        let mut mapping = CustomPropertyMapping::new();
        for object in self.camel.into_iter().chain(self.dashed) {
            for (name, value) in object_entries(object) {
                let text = scalar_text(value).unwrap_or_else(|| {
                    tracing::debug!(%name, "keeping non-literal custom property value as source");
                    cm.span_to_snippet(value.span()).unwrap_or_default()
                });
                mapping.insert(name, text);
            }
        }
        mapping
    }
}

/// 去掉括号和 TS 断言：`({ ... } as const)`
fn unwrap_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_expr(&paren.expr),
        Expr::TsAs(ts_as) => unwrap_expr(&ts_as.expr),
        Expr::TsConstAssertion(assertion) => unwrap_expr(&assertion.expr),
        Expr::TsSatisfies(satisfies) => unwrap_expr(&satisfies.expr),
        other => other,
    }
}

fn object_literal(expr: &Expr) -> Option<&ObjectLit> {
    match unwrap_expr(expr) {
        Expr::Object(object) => Some(object),
        _ => None,
    }
}

/// 对象字面量中的 `key: value` 项（跳过展开、方法、计算属性名）
fn object_entries(object: &ObjectLit) -> impl Iterator<Item = (String, &Expr)> {
    object.props.iter().filter_map(|prop| match prop {
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) => prop_name(&kv.key).map(|key| (key, &*kv.value)),
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => Some(str_value(s)),
        PropName::Num(num) => Some(num.value.to_string()),
        _ => None,
    }
}

fn member_prop_name(prop: &MemberProp) -> Option<String> {
    match prop {
        MemberProp::Ident(ident) => Some(ident.sym.to_string()),
        MemberProp::Computed(computed) => match &*computed.expr {
            Expr::Lit(Lit::Str(s)) => Some(str_value(s)),
            _ => None,
        },
        _ => None,
    }
}

/// 字符串、数字、无插值模板字面量
fn scalar_text(expr: &Expr) -> Option<String> {
    match unwrap_expr(expr) {
        Expr::Lit(Lit::Str(s)) => Some(str_value(s)),
        Expr::Lit(Lit::Num(num)) => Some(num.value.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() && tpl.quasis.len() == 1 => {
            tpl.quasis.first().map(|quasi| quasi.raw.to_string())
        }
        _ => None,
    }
}

/// 从 Str 节点提取字符串值
fn str_value(s: &Str) -> String {
    s.value.as_str().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(mapping: &CustomPropertyMapping) -> Vec<(&str, &str)> {
        mapping
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_export_default_object() {
        let source = r#"
            export default {
                customProperties: { '--brand': '#0af', '--gap': 4 },
            };
        "#;
        let mapping = load_module_str(source, Path::new("tokens.mjs")).unwrap();
        assert_eq!(entries(&mapping), vec![("--brand", "#0af"), ("--gap", "4")]);
    }

    #[test]
    fn test_module_exports_with_both_keys() {
        let source = r#"
            module.exports = {
                customProperties: { '--a': 'red' },
                'custom-properties': { '--a': 'blue', '--b': `1px` },
            };
        "#;
        let mapping = load_module_str(source, Path::new("tokens.cjs")).unwrap();
        assert_eq!(entries(&mapping), vec![("--a", "blue"), ("--b", "1px")]);
    }

    #[test]
    fn test_named_export() {
        let source = "export const customProperties = { '--x': '0' };";
        let mapping = load_module_str(source, Path::new("tokens.js")).unwrap();
        assert_eq!(entries(&mapping), vec![("--x", "0")]);
    }

    #[test]
    fn test_exports_property_assignment() {
        let source = "exports.customProperties = { '--y': 'auto' };";
        let mapping = load_module_str(source, Path::new("tokens.js")).unwrap();
        assert_eq!(entries(&mapping), vec![("--y", "auto")]);
    }

    #[test]
    fn test_default_export_through_binding() {
        let source = r#"
            const tokens = { customProperties: { '--z': '2rem' } };
            export default tokens;
        "#;
        let mapping = load_module_str(source, Path::new("tokens.js")).unwrap();
        assert_eq!(entries(&mapping), vec![("--z", "2rem")]);
    }

    #[test]
    fn test_typescript_as_const() {
        let source = r#"
            export default {
                customProperties: { '--ts': 'yes' },
            } as const;
        "#;
        let mapping = load_module_str(source, Path::new("tokens.ts")).unwrap();
        assert_eq!(entries(&mapping), vec![("--ts", "yes")]);
    }

    #[test]
    fn test_keeps_dynamic_values_as_source() {
        let source = r#"
            const base = 4;
            export default {
                customProperties: { '--a': base * 2, '--b': `${base}px`, '--c': '1px' },
            };
        "#;
        let mapping = load_module_str(source, Path::new("tokens.js")).unwrap();
        assert_eq!(
            entries(&mapping),
            vec![("--a", "base * 2"), ("--b", "`${base}px`"), ("--c", "1px")]
        );
    }

    #[test]
    fn test_invalid_module() {
        let result = load_module_str("export default {", Path::new("broken.js"));
        assert!(matches!(result, Err(LoadError::ModuleParse { .. })));
    }
}
