//! Markdown rendering with syntax highlighting, math and heading anchors

use latex2mathml::{latex_to_mathml, DisplayStyle};
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::MarkdownConfig;
use crate::helpers::toc::{heading_id, heading_text_piece};

/// Parser options shared by the renderer and the heading extractor
pub(crate) fn parser_options() -> Options {
    // Front-matter is split off before parsing, so no YAML metadata blocks
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_MATH
        | Options::ENABLE_GFM
}

/// Markdown renderer with syntax highlighting
///
/// Loading syntect's syntax and theme sets is expensive; build one renderer
/// at startup and share it behind an `Arc`.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    allow_html: bool,
}

/// Heading whose inline events are buffered until its text is known
struct PendingHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    text: String,
    inner: Vec<Event<'a>>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false, false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool, allow_html: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
            allow_html,
        }
    }

    pub fn from_config(config: &MarkdownConfig) -> Self {
        Self::with_options(
            &config.highlight_theme,
            config.line_number,
            config.allow_html,
        )
    }

    /// Render markdown to HTML
    ///
    /// Never fails: malformed Markdown renders best-effort, bad TeX renders
    /// as an error span, unknown code languages render as plain text.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, parser_options());

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut heading: Option<PendingHeading> = None;

        for event in parser {
            if let Some((lang, content)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => content.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(content, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|l| l.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    heading = Some(PendingHeading {
                        level,
                        id,
                        classes,
                        attrs,
                        text: String::new(),
                        inner: Vec::new(),
                    });
                }
                Event::End(TagEnd::Heading(level)) => {
                    if let Some(pending) = heading.take() {
                        let id = pending
                            .id
                            .unwrap_or_else(|| CowStr::from(heading_id(&pending.text)));
                        events.push(Event::Start(Tag::Heading {
                            level: pending.level,
                            id: Some(id),
                            classes: pending.classes,
                            attrs: pending.attrs,
                        }));
                        events.extend(pending.inner);
                    }
                    events.push(Event::End(TagEnd::Heading(level)));
                }
                other => {
                    if let Some(pending) = heading.as_mut() {
                        if let Some(piece) = heading_text_piece(&other) {
                            pending.text.push_str(piece);
                        }
                        pending.inner.push(self.transform(other));
                    } else {
                        events.push(self.transform(other));
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Math to MathML, raw HTML to escaped text unless allowed
    fn transform<'a>(&self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::InlineMath(tex) => Event::InlineHtml(render_math(&tex, DisplayStyle::Inline).into()),
            Event::DisplayMath(tex) => Event::InlineHtml(render_math(&tex, DisplayStyle::Block).into()),
            Event::Html(raw) | Event::InlineHtml(raw) if !self.allow_html => Event::Text(raw),
            other => other,
        }
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self.theme().and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        let lang_attr = html_escape(lang);
        match highlighted {
            Some(highlighted) if self.line_numbers => {
                let gutter = (1..=code.lines().count().max(1))
                    .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
                    lang_attr, gutter, highlighted
                )
            }
            Some(highlighted) => {
                format!(r#"<figure class="highlight {}">{}</figure>"#, lang_attr, highlighted)
            }
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang_attr,
                html_escape(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_math(tex: &str, style: DisplayStyle) -> String {
    match latex_to_mathml(tex, style) {
        Ok(mathml) => mathml,
        Err(e) => {
            tracing::debug!("Failed to render TeX {:?}: {}", tex, e);
            format!(r#"<code class="math-error">{}</code>"#, html_escape(tex))
        }
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::extract_headings;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains(r#"<figure class="highlight rust">"#));
        assert!(html.contains("main"));
        assert!(!html.contains("```"));
    }

    #[test]
    fn test_line_numbers() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", true, false);
        let html = renderer.render("```\na\nb\n```");
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
    }

    #[test]
    fn test_gfm_extensions() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_math() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Inline $x^2$ here.\n\n$$\\frac{a}{b}$$\n");
        assert!(html.contains("<math"));
        assert!(!html.contains("$x^2$"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("<script>alert(1)</script>\n\nhi <b>there</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));

        let permissive = MarkdownRenderer::with_options("base16-ocean.dark", false, true);
        assert!(permissive.render("hi <b>there</b>").contains("<b>there</b>"));
    }

    #[test]
    fn test_heading_ids_match_extractor() {
        let renderer = MarkdownRenderer::new();
        let md = "# Getting Started!\n\n## Using `pda` & Friends\n\n### 安装 指南\n\n## Custom {#my-id}\n";
        let html = renderer.render(md);
        for heading in extract_headings(md) {
            assert!(
                html.contains(&format!(r#"id="{}""#, heading.id)),
                "missing id {} in {}",
                heading.id,
                html
            );
        }
        assert!(html.contains(r#"id="using-pda-friends""#));
        assert!(html.contains(r#"id="my-id""#));
    }

    #[test]
    fn test_setext_heading_line_break_in_id() {
        let html = MarkdownRenderer::new().render("Foo\nbar\n===\n");
        assert!(html.contains(r#"<h1 id="foo-bar">"#), "{}", html);
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```nosuchlang\n<tag>\n```");
        assert!(html.contains("&lt;tag&gt;"));
    }
}
