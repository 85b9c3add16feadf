use varguard_core::{value_may_reference_var, CustomPropertyMapping, Diagnostic};
use varguard_css::{parse_value, DeclarationNode, StyleTree, ValueNode};

use crate::rule::RULE_NAME;

/// 检查样式表中所有 `var()` 引用
///
/// 只处理值中可能含有 `var(` 的声明，按声明顺序输出诊断
pub fn validate_tree(tree: &StyleTree, known: &CustomPropertyMapping) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    tree.walk_decls(
        |decl| value_may_reference_var(&decl.value),
        |decl| diagnostics.extend(validate_declaration(decl, known)),
    );

    diagnostics
}

/// 检查单条声明
pub fn validate_declaration(
    decl: &DeclarationNode,
    known: &CustomPropertyMapping,
) -> Vec<Diagnostic> {
    let nodes = parse_value(&decl.value);
    let mut checker = ReferenceChecker {
        decl,
        known,
        diagnostics: Vec::new(),
    };
    checker.check_nodes(&nodes);
    checker.diagnostics
}

struct ReferenceChecker<'a> {
    decl: &'a DeclarationNode,
    known: &'a CustomPropertyMapping,
    diagnostics: Vec<Diagnostic>,
}

impl ReferenceChecker<'_> {
    fn check_nodes(&mut self, nodes: &[ValueNode]) {
        for node in nodes {
            self.check_node(node);
        }
    }

    fn check_node(&mut self, node: &ValueNode) {
        if node.is_var_function() {
            self.check_reference(node.children());
        } else {
            self.check_nodes(node.children());
        }
    }

    /// `args` = `[name, ',', ...fallbacks]`
    fn check_reference(&mut self, args: &[ValueNode]) {
        let Some(ValueNode::Word { text: name, .. }) = args.first() else {
            return;
        };

        if self.known.contains_key(name) {
            return;
        }

        // 只有嵌套的 var() 才算备选
        let fallbacks: Vec<&ValueNode> = args
            .iter()
            .skip_while(|node| **node != ValueNode::Punctuation(','))
            .skip(1)
            .filter(|node| node.is_var_function())
            .collect();

        if fallbacks.is_empty() {
            self.report(name);
            return;
        }

        for fallback in fallbacks {
            self.check_reference(fallback.children());
        }
    }

    fn report(&mut self, name: &str) {
        self.diagnostics.push(Diagnostic::warning(
            RULE_NAME,
            unexpected_message(name, &self.decl.prop),
            self.decl.location,
            name,
        ));
    }
}

pub fn unexpected_message(name: &str, prop: &str) -> String {
    format!(
        "Unexpected custom property \"{}\" inside declaration \"{}\".",
        name, prop
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use varguard_css::parse_stylesheet;

    fn known(names: &[&str]) -> CustomPropertyMapping {
        names
            .iter()
            .map(|name| (name.to_string(), String::new()))
            .collect()
    }

    fn reported(css: &str, names: &[&str]) -> Vec<String> {
        let tree = parse_stylesheet(css, None).unwrap();
        validate_tree(&tree, &known(names))
            .into_iter()
            .filter_map(|diagnostic| diagnostic.word)
            .collect()
    }

    #[test]
    fn test_known_reference() {
        assert!(reported(".a { color: var(--c); }", &["--c"]).is_empty());
    }

    #[test]
    fn test_unknown_reference() {
        assert_eq!(reported(".a { color: var(--d); }", &[]), vec!["--d"]);
    }

    #[test]
    fn test_one_diagnostic_per_occurrence() {
        assert_eq!(
            reported(".a { margin: var(--m) var(--m); }", &[]),
            vec!["--m", "--m"]
        );
    }

    #[test]
    fn test_known_name_ignores_fallback() {
        assert!(reported(".a { color: var(--known, var(--unknown)); }", &["--known"]).is_empty());
    }

    #[test]
    fn test_reports_deepest_unknown_fallback_only() {
        assert_eq!(
            reported(".a { color: var(--unknown1, var(--unknown2)); }", &[]),
            vec!["--unknown2"]
        );
        assert_eq!(
            reported(".a { color: var(--a, var(--b, var(--c))); }", &[]),
            vec!["--c"]
        );
    }

    #[test]
    fn test_known_fallback_satisfies() {
        assert!(reported(".a { color: var(--unknown, var(--known)); }", &["--known"]).is_empty());
    }

    #[test]
    fn test_literal_fallback_is_not_a_fallback() {
        assert_eq!(
            reported(".a { color: var(--unknown, red); }", &[]),
            vec!["--unknown"]
        );
    }

    #[test]
    fn test_nested_in_other_functions() {
        assert_eq!(
            reported(".a { width: calc(100% - var(--gap) * 2); }", &[]),
            vec!["--gap"]
        );
        assert_eq!(
            reported(".a { background: linear-gradient(var(--from), rgb(var(--to))); }", &["--to"]),
            vec!["--from"]
        );
    }

    #[test]
    fn test_supports_conditions_are_ignored() {
        assert_eq!(
            reported("@supports (--flag: 1) { .a { color: red; } } .b { color: var(--flag); }", &[]),
            vec!["--flag"]
        );
        assert_eq!(
            reported("@supports (color: var(--s)) { .a { color: var(--s); } }", &[]),
            vec!["--s"]
        );
    }

    #[test]
    fn test_skips_values_without_var() {
        assert!(reported(".a { color: red; content: \"var(--x)\"; }", &[]).is_empty());
    }

    #[test]
    fn test_empty_value_is_noop() {
        let decl = DeclarationNode {
            prop: "--empty".to_string(),
            value: String::new(),
            important: false,
            location: Default::default(),
        };
        assert!(validate_declaration(&decl, &known(&[])).is_empty());
    }

    #[test]
    fn test_diagnostic_shape() {
        let tree = parse_stylesheet(".y {\n  color: var(--d);\n}", None).unwrap();
        let diagnostics = validate_tree(&tree, &known(&[]));

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.rule, RULE_NAME);
        assert_eq!(
            diagnostic.message,
            "Unexpected custom property \"--d\" inside declaration \"color\"."
        );
        assert_eq!(diagnostic.word.as_deref(), Some("--d"));
        assert_eq!(diagnostic.location.line, 2);
    }
}
