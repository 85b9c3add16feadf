use once_cell::sync::Lazy;
use regex::Regex;

/// 自定义属性名：两个连字符 + 字母 + 任意单词字符或连字符
static CUSTOM_PROPERTY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--[A-Za-z][A-Za-z0-9_-]*$").expect("valid custom property pattern"));

/// `var(` 前面不能紧跟单词字符或连字符
static VAR_FUNCTION_GUARD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[^\w-])var\(").expect("valid var() guard pattern"));

/// 判断属性名是否为自定义属性
///
/// 例如：
/// - "--brand-color" → true
/// - "--1x" → false（首字符必须是字母）
/// - "color" → false
pub fn is_custom_property_name(name: &str) -> bool {
    CUSTOM_PROPERTY_NAME.is_match(name)
}

/// 声明值是否可能包含 `var()` 引用
///
/// 只是廉价的文本预筛，真正的判断在解析之后
pub fn value_may_reference_var(value: &str) -> bool {
    VAR_FUNCTION_GUARD.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_property_names() {
        assert!(is_custom_property_name("--color"));
        assert!(is_custom_property_name("--Brand_color-2"));
        assert!(is_custom_property_name("--x"));
    }

    #[test]
    fn test_rejects_non_custom_names() {
        assert!(!is_custom_property_name("color"));
        assert!(!is_custom_property_name("-webkit-box"));
        assert!(!is_custom_property_name("--"));
        assert!(!is_custom_property_name("--1x"));
        assert!(!is_custom_property_name("--a b"));
    }

    #[test]
    fn test_var_guard() {
        assert!(value_may_reference_var("var(--a)"));
        assert!(value_may_reference_var("calc(1px + var(--a))"));
        assert!(value_may_reference_var("VAR(--a)"));
        assert!(value_may_reference_var("1px,var(--a)"));
    }

    #[test]
    fn test_var_guard_ignores_embedded_names() {
        assert!(!value_may_reference_var("red"));
        assert!(!value_may_reference_var("my-var(--a)"));
        assert!(!value_may_reference_var("envvar(--a)"));
        assert!(!value_may_reference_var(""));
    }
}
