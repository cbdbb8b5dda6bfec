//! Helper functions shared by the content pipeline, feeds and pages

pub mod date;
pub mod toc;
pub mod url;
pub mod xml;

pub use date::{date_or_epoch, date_rfc2822, date_xml, parse_date};
pub use toc::{extract_headings, heading_id, toc_html, Heading};
pub use url::{encode_segment, full_url, localized, news_path, news_urls};
pub use xml::{cdata, escape_xml};
