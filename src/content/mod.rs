//! Content module - Markdown records, front-matter, excerpts and rendering

mod excerpt;
mod frontmatter;
pub mod loader;
pub(crate) mod markdown;
mod record;

pub use excerpt::{excerpt, ELLIPSIS, EXCERPT_LENGTH};
pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use record::{
    ContentRecord, NewsListing, RecordSummary, DEFAULT_AUTHOR, DEFAULT_LANG, DEFAULT_TITLE,
};
