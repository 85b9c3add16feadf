use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use varguard_core::ResolverOptions;
use varguard_resolve::SourceSpec;

use crate::rule::RULE_NAME;

/// 规则配置错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("Invalid option value \"{value}\" for rule \"{rule}\"", rule = RULE_NAME)]
    InvalidValue { value: String },
    #[error("Invalid option name \"{name}\" for rule \"{rule}\"", rule = RULE_NAME)]
    InvalidName { name: String },
}

/// 单个值或列表
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// 规则的次要选项
///
/// ```json
/// {
///   "importFrom": ["vars.css", { "from": "tokens.json" }],
///   "resolver": { "moduleDirectories": ["node_modules"] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RuleOptions {
    pub import_from: OneOrMany<SourceSpec>,
    pub resolver: ResolverOptions,
}

const OPTION_NAMES: [&str; 2] = ["importFrom", "resolver"];

impl RuleOptions {
    /// 校验并解析次要选项（`null` 等同于未配置）
    ///
    /// 返回所有发现的错误，而不是遇到第一个就停
    pub fn from_value(value: &Value) -> Result<Self, Vec<OptionError>> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(vec![OptionError::InvalidValue {
                    value: display_value(other),
                }])
            }
        };

        let mut errors: Vec<OptionError> = object
            .keys()
            .filter(|key| !OPTION_NAMES.contains(&key.as_str()))
            .map(|key| OptionError::InvalidName { name: key.clone() })
            .collect();

        let mut options = Self::default();
        if let Some(import_from) = object.get("importFrom") {
            match parse_field(import_from) {
                Ok(parsed) => options.import_from = parsed,
                Err(err) => errors.push(err),
            }
        }
        if let Some(resolver) = object.get("resolver") {
            match parse_field(resolver) {
                Ok(parsed) => options.resolver = parsed,
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            Ok(options)
        } else {
            Err(errors)
        }
    }
}

fn parse_field<T: DeserializeOwned>(value: &Value) -> Result<T, OptionError> {
    serde_json::from_value(value.clone()).map_err(|err| {
        tracing::debug!(%err, "rejecting rule option");
        OptionError::InvalidValue {
            value: display_value(value),
        }
    })
}

/// 规则的主选项：只接受 `true` / `false` / `null`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryOption {
    Enabled,
    Disabled,
}

impl PrimaryOption {
    pub fn from_value(value: &Value) -> Result<Self, OptionError> {
        match value {
            Value::Bool(true) => Ok(PrimaryOption::Enabled),
            Value::Bool(false) | Value::Null => Ok(PrimaryOption::Disabled),
            other => Err(OptionError::InvalidValue {
                value: display_value(other),
            }),
        }
    }
}

/// 错误信息中的值：字符串不加引号，其他值按 JSON 输出
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
