//! Configuration module

mod site;

pub use site::BangumiConfig;
pub use site::FeedConfig;
pub use site::GithubConfig;
pub use site::HttpConfig;
pub use site::MarkdownConfig;
pub use site::SiteConfig;
