//! 未知自定义属性检查规则
//!
//! - `validate`: 遍历声明值中的 `var()` 引用
//! - `options`: 主选项 / 次要选项的校验
//! - `rule`: 规则实例，持有共享的 `importFrom` 解析结果

pub mod options;
pub mod rule;
pub mod validate;

pub use options::{OneOrMany, OptionError, PrimaryOption, RuleOptions};
pub use rule::{LintReport, Rule, RULE_NAME};
pub use validate::{validate_declaration, validate_tree};
