use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// 默认配置文件名（当前目录下存在时自动读取）
pub const DEFAULT_CONFIG_FILE: &str = "varguard.json";

/// 配置文件
///
/// ```json
/// {
///   "rule": true,
///   "options": { "importFrom": ["tokens.css"], "resolver": { "paths": ["shared"] } }
/// }
/// ```
///
/// `rule` 和 `options` 原样交给规则校验，这里不检查取值
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "enabled")]
    pub rule: Value,
    #[serde(default)]
    pub options: Value,
}

fn enabled() -> Value {
    Value::Bool(true)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rule: enabled(),
            options: Value::Null,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid config file")
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// 显式指定的配置文件必须存在；否则尝试 `dir` 下的默认文件，没有就用默认配置
    pub async fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path).await;
        }

        let fallback: PathBuf = dir.join(DEFAULT_CONFIG_FILE);
        let exists = tokio::fs::metadata(&fallback)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if exists {
            tracing::debug!(path = %fallback.display(), "using default config file");
            return Self::from_file(&fallback).await;
        }

        Ok(Self::default())
    }
}
