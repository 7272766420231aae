//! HTML fragment rendering for reflowable output targets.
//!
//! Each paragraph block becomes one fragment. A short heading heuristic
//! promotes likely titles to `<h1>`..`<h3>` so reflowable readers build a
//! navigable structure; everything else is a `<p>` with interior line
//! breaks preserved as `<br/>`.

/// Render normalized text as HTML fragments, one per block.
pub fn html_fragments(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(render_block)
        .collect()
}

fn render_block(block: &str) -> String {
    if let Some(level) = heading_level(block) {
        return format!("<h{level}>{}</h{level}>", escape(block));
    }
    let body = block
        .lines()
        .map(escape)
        .collect::<Vec<_>>()
        .join("<br/>");
    format!("<p>{body}</p>")
}

/// Heading heuristic: a single short line with no terminal punctuation
/// that starts with an uppercase letter. Shorter lines rank higher.
fn heading_level(block: &str) -> Option<u8> {
    if block.contains('\n') {
        return None;
    }
    let len = block.chars().count();
    if len == 0 || len >= 60 {
        return None;
    }
    if !block.chars().next().is_some_and(|c| c.is_uppercase()) {
        return None;
    }
    if block.ends_with(['.', '!', '?', ',', ';', ':']) {
        return None;
    }
    Some(if len < 20 {
        1
    } else if len < 40 {
        2
    } else {
        3
    })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
