//! Scaffold a new news item

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::i18n::Locale;
use crate::Site;

/// Create `<content_dir>/<slug>.md` with front-matter filled in
///
/// The slug defaults to the slugified title. An existing file is never
/// overwritten.
pub fn create_news(
    site: &Site,
    title: &str,
    lang: Locale,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}; pass --slug", title);
    }

    fs::create_dir_all(&site.content_dir)?;
    let file_path = site.content_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Utc::now().with_timezone(&site.tz);
    let content = format!(
        "---\ntitle: {}\ndate: {}\nauthor: {}\ntags: []\nlang: {}\n---\n",
        yaml_string(title),
        now.format("%Y-%m-%d %H:%M:%S"),
        yaml_string(&site.config.author),
        lang.code()
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Double-quoted YAML scalar
fn yaml_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
