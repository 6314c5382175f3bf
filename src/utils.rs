/// Maximum characters of website text forwarded to the classifier.
pub const MAX_CONTEXT_CHARS: usize = 2000;

/// Reduce a fetched page to the plain text the classifier sees: script and
/// style bodies removed, tags stripped, the common entities decoded,
/// whitespace collapsed, capped at [`MAX_CONTEXT_CHARS`].
pub fn clean_web_text(html: &str) -> String {
    let stripped = strip_element(html, "script");
    let stripped = strip_element(&stripped, "style");

    let mut text = String::with_capacity(stripped.len());
    let mut in_tag = false;
    for c in stripped.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = decode_entities(&text);
    let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_CONTEXT_CHARS).collect()
}

/// Remove `<tag ...>...</tag>` blocks, including their bodies. Matching is
/// ASCII-case-insensitive; an unterminated block drops the rest of the input.
fn strip_element(html: &str, tag: &str) -> String {
    let mut lower = html.to_string();
    lower.make_ascii_lowercase();
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(start) = lower[pos..].find(&open).map(|i| i + pos) {
        out.push_str(&html[pos..start]);
        match lower[start..].find(&close).map(|i| i + start) {
            Some(end) => pos = end + close.len(),
            None => return out,
        }
    }
    out.push_str(&html[pos..]);
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
