use std::io;
use std::path::PathBuf;

/// 单个来源加载失败的原因
///
/// 加载器返回 `Result<CustomPropertyMapping, LoadError>`，
/// 汇总阶段把任何 `Err` 当作空表处理（合并的单位元），只记录日志
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse stylesheet {path}: {message}")]
    CssParse { path: PathBuf, message: String },

    #[error("failed to parse module {path}: {message}")]
    ModuleParse { path: PathBuf, message: String },

    #[error("cannot resolve import \"{specifier}\" from {base}")]
    Unresolved { specifier: String, base: PathBuf },

    #[error("import cycle detected at {0}")]
    Cycle(PathBuf),

    #[error("unsupported source type \"{kind}\" for {path}")]
    UnsupportedKind { kind: String, path: PathBuf },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
