//! XML text helpers shared by the feed formatters

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    strip_invalid_xml_chars(s)
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Wrap text in a CDATA section, splitting any `]]>` inside it
pub fn cdata(s: &str) -> String {
    format!(
        "<![CDATA[{}]]>",
        strip_invalid_xml_chars(s).replace("]]>", "]]]]><![CDATA[>")
    )
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
