//! Plain-text excerpts for listings and feeds

use lazy_static::lazy_static;
use regex::Regex;

/// Maximum excerpt length in characters, before the ellipsis
pub const EXCERPT_LENGTH: usize = 200;

/// Appended to every excerpt, including ones shorter than the limit
pub const ELLIPSIS: &str = "...";

lazy_static! {
    static ref HEADING_LINE: Regex = Regex::new(r"(?m)^#.*$").unwrap();
    static ref IMAGE: Regex = Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap();
    static ref PUNCTUATION: Regex = Regex::new(r"[*_`~>]").unwrap();
}

/// Derive the excerpt for a Markdown body
///
/// Heading lines are dropped, links and images collapse to their text,
/// emphasis/code/quote markers are removed, and the result is cut to
/// [`EXCERPT_LENGTH`] characters followed by [`ELLIPSIS`].
pub fn excerpt(body: &str) -> String {
    let text = HEADING_LINE.replace_all(body, "");
    let text = IMAGE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = PUNCTUATION.replace_all(&text, "");

    let mut out: String = text.trim().chars().take(EXCERPT_LENGTH).collect();
    out.push_str(ELLIPSIS);
    out
}
