//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::i18n::Locale;
use crate::Site;

/// List news items or tags, optionally only those in one language
pub fn run(site: &Site, content_type: &str, lang: Option<Locale>) -> Result<()> {
    let loader = site.loader();
    if !loader.is_configured() {
        tracing::warn!("Content directory {:?} does not exist", loader.dir());
    }

    let records: Vec<_> = loader
        .list_all()
        .into_iter()
        .filter(|r| lang.map_or(true, |l| r.lang == l.code()))
        .collect();

    match content_type {
        "news" | "post" | "posts" => {
            println!("News ({}):", records.len());
            for record in records {
                let date = if record.date.is_empty() {
                    "----------".to_string()
                } else {
                    record.date.clone()
                };
                println!(
                    "  {} - {} [{}] ({})",
                    date, record.title, record.slug, record.lang
                );
            }
        }
        "tag" | "tags" => {
            let mut tags: HashMap<String, usize> = HashMap::new();
            for record in &records {
                for tag in &record.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: news, tag", content_type);
        }
    }

    Ok(())
}
