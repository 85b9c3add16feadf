use std::path::{Path, PathBuf};

use serde::Deserialize;
use varguard_core::{LoadError, ResolverOptions};

/// 解析 `@import` 路径为文件绝对路径（node 风格）
///
/// 查找顺序：
/// 1. 相对 `base_dir` 按 `./<specifier>` 查找
/// 2. 从 `base_dir` 逐级向上，在每个模块目录（如 `node_modules`）中查找
/// 3. 在 `options.paths` 中按顺序查找
///
/// 每个候选依次尝试：文件本身、追加扩展名、目录下 `package.json` 的
/// `style` / `main` 字段、目录下的 `index` + 扩展名。
/// 不会把符号链接解析成真实路径。
pub async fn resolve_module_path(
    specifier: &str,
    base_dir: &Path,
    options: &ResolverOptions,
) -> Result<PathBuf, LoadError> {
    let unresolved = || LoadError::Unresolved {
        specifier: specifier.to_string(),
        base: base_dir.to_path_buf(),
    };

    if specifier.is_empty() {
        return Err(unresolved());
    }

    if let Some(found) = try_candidate(&base_dir.join(specifier), options).await {
        return Ok(found);
    }

    // 显式相对路径不走模块目录查找
    if is_explicitly_relative(specifier) {
        return Err(unresolved());
    }

    for ancestor in base_dir.ancestors() {
        for module_dir in &options.module_directories {
            // 不在 node_modules/node_modules 里再找一遍
            if ancestor.file_name().and_then(|name| name.to_str()) == Some(module_dir.as_str()) {
                continue;
            }
            let candidate = ancestor.join(module_dir).join(specifier);
            if let Some(found) = try_candidate(&candidate, options).await {
                return Ok(found);
            }
        }
    }

    for search_path in &options.paths {
        let root = if search_path.is_absolute() {
            search_path.clone()
        } else {
            base_dir.join(search_path)
        };
        if let Some(found) = try_candidate(&root.join(specifier), options).await {
            return Ok(found);
        }
    }

    Err(unresolved())
}

fn is_explicitly_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}

async fn try_candidate(candidate: &Path, options: &ResolverOptions) -> Option<PathBuf> {
    if let Some(found) = try_file(candidate, options).await {
        return Some(found);
    }
    try_directory(candidate, options).await
}

async fn try_file(candidate: &Path, options: &ResolverOptions) -> Option<PathBuf> {
    if is_file(candidate).await {
        return Some(candidate.to_path_buf());
    }

    for extension in &options.extensions {
        let mut with_extension = candidate.as_os_str().to_owned();
        with_extension.push(extension);
        let with_extension = PathBuf::from(with_extension);
        if is_file(&with_extension).await {
            return Some(with_extension);
        }
    }

    None
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    style: Option<String>,
    main: Option<String>,
}

async fn try_directory(candidate: &Path, options: &ResolverOptions) -> Option<PathBuf> {
    if !is_dir(candidate).await {
        return None;
    }

    // package.json 中 `style` 优先于 `main`
    if let Ok(json) = tokio::fs::read_to_string(candidate.join("package.json")).await {
        if let Ok(manifest) = serde_json::from_str::<PackageManifest>(&json) {
            for entry in [manifest.style, manifest.main].into_iter().flatten() {
                if let Some(found) = try_file(&candidate.join(entry), options).await {
                    return Some(found);
                }
            }
        }
    }

    try_file(&candidate.join("index"), options).await
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_resolves_relative_file() {
        let dir = TempDir::new().unwrap();
        let expected = write(dir.path(), "styles/vars.css", "");

        let found = resolve_module_path("styles/vars.css", dir.path(), &ResolverOptions::default())
            .await
            .unwrap();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_appends_extension() {
        let dir = TempDir::new().unwrap();
        let expected = write(dir.path(), "vars.css", "");

        let found = resolve_module_path("./vars", dir.path(), &ResolverOptions::default())
            .await
            .unwrap();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_resolves_from_ancestor_node_modules() {
        let dir = TempDir::new().unwrap();
        let expected = write(dir.path(), "node_modules/theme/colors.css", "");
        let nested = dir.path().join("src/components");
        fs::create_dir_all(&nested).unwrap();

        let found = resolve_module_path("theme/colors.css", &nested, &ResolverOptions::default())
            .await
            .unwrap();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_package_style_field() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "node_modules/theme/package.json",
            r#"{ "main": "index.js", "style": "dist/theme.css" }"#,
        );
        let expected = write(dir.path(), "node_modules/theme/dist/theme.css", "");

        let found = resolve_module_path("theme", dir.path(), &ResolverOptions::default())
            .await
            .unwrap();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_directory_index() {
        let dir = TempDir::new().unwrap();
        let expected = write(dir.path(), "tokens/index.css", "");

        let found = resolve_module_path("./tokens", dir.path(), &ResolverOptions::default())
            .await
            .unwrap();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_custom_module_directories_and_paths() {
        let dir = TempDir::new().unwrap();
        let vendor = write(dir.path(), "vendor/reset.css", "");
        let shared = write(dir.path(), "shared/brand.css", "");
        let options = ResolverOptions {
            paths: vec![dir.path().join("shared")],
            module_directories: vec!["vendor".to_string()],
            extensions: vec![".css".to_string()],
        };
        let base = dir.path().join("src");
        fs::create_dir_all(&base).unwrap();

        assert_eq!(resolve_module_path("reset", &base, &options).await.unwrap(), vendor);
        assert_eq!(resolve_module_path("brand", &base, &options).await.unwrap(), shared);
    }

    #[tokio::test]
    async fn test_unresolved() {
        let dir = TempDir::new().unwrap();
        let result =
            resolve_module_path("missing.css", dir.path(), &ResolverOptions::default()).await;
        assert!(matches!(result, Err(LoadError::Unresolved { .. })));
    }

    #[tokio::test]
    async fn test_explicit_relative_skips_module_lookup() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "node_modules/vars.css", "");

        let result =
            resolve_module_path("./vars.css", dir.path(), &ResolverOptions::default()).await;
        assert!(result.is_err());
    }
}
