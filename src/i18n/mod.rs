//! Internationalization: locale resolution and UI strings

mod locale;

pub use locale::{cookie_value, primary_language, resolve, Locale, LocaleSource, LOCALE_COOKIE};

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_EN: &str = include_str!("en.yml");
const BUILTIN_ZH: &str = include_str!("zh.yml");

/// Translation strings per locale, with nested keys addressed as `a.b.c`
#[derive(Debug, Clone)]
pub struct Dictionary {
    translations: HashMap<Locale, serde_yaml::Mapping>,
}

impl Dictionary {
    /// Dictionary containing only the strings shipped with the binary
    pub fn builtin() -> Self {
        let mut translations = HashMap::new();
        for (locale, source) in [(Locale::En, BUILTIN_EN), (Locale::Zh, BUILTIN_ZH)] {
            match serde_yaml::from_str::<serde_yaml::Mapping>(source) {
                Ok(data) => {
                    translations.insert(locale, data);
                }
                Err(e) => tracing::error!("Built-in {} dictionary is invalid: {}", locale, e),
            }
        }
        Self { translations }
    }

    /// Built-in strings overridden by `<dir>/<code>.yml` files, if any
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut dict = Self::builtin();
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(dict);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let Some(locale) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Locale::from_code)
            else {
                tracing::debug!("Skipping language file for unsupported locale: {:?}", path);
                continue;
            };

            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<serde_yaml::Mapping>(&content) {
                Ok(data) => {
                    let target = dict.translations.entry(locale).or_default();
                    merge_mapping(target, data);
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(dict)
    }

    /// Look up `key` for `locale`, falling back to English and then the key
    pub fn get(&self, locale: Locale, key: &str) -> String {
        [locale, Locale::En]
            .iter()
            .filter_map(|l| self.translations.get(l))
            .find_map(|data| get_nested_value(data, key))
            .map(yaml_value_to_string)
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(data: &'a serde_yaml::Mapping, key: &str) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?)?;

    for part in parts {
        match current {
            serde_yaml::Value::Mapping(map) => current = map.get(part)?,
            _ => return None,
        }
    }

    Some(current)
}

/// Deep-merge `overlay` into `base`
fn merge_mapping(base: &mut serde_yaml::Mapping, overlay: serde_yaml::Mapping) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(serde_yaml::Value::Mapping(existing)), serde_yaml::Value::Mapping(nested)) => {
                merge_mapping(existing, nested);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_lookup() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.get(Locale::En, "page.toc"), "Contents");
        assert_eq!(dict.get(Locale::Zh, "page.toc"), "目录");
        assert_eq!(dict.get(Locale::Zh, "no.such.key"), "no.such.key");
    }

    #[test]
    fn test_override_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("zh.yml"), "page:\n  toc: 文章目录\n").unwrap();
        fs::write(dir.path().join("fr.yml"), "page:\n  toc: Sommaire\n").unwrap();
        fs::write(dir.path().join("en.yml"), "page: [not, a, map").unwrap();

        let dict = Dictionary::load(dir.path()).unwrap();
        assert_eq!(dict.get(Locale::Zh, "page.toc"), "文章目录");
        // Sibling keys survive the merge
        assert_eq!(dict.get(Locale::Zh, "page.back"), "返回首页");
        // Broken file is ignored, built-ins stay
        assert_eq!(dict.get(Locale::En, "page.toc"), "Contents");
    }

    #[test]
    fn test_missing_directory_is_builtin() {
        let dict = Dictionary::load("/definitely/not/here").unwrap();
        assert_eq!(dict.get(Locale::En, "news.title"), "News");
    }
}
