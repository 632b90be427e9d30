//! Markdown to Telegram HTML
//!
//! Telegram's MarkdownV2 rejects unescaped `.`, `-`, `!` and friends, so
//! script Markdown is converted to the HTML subset Telegram accepts instead.
//! Supported: `#` headings, `- ` / `* ` bullets, `**bold**`, `*italic*`,
//! `` `code` `` and `[text](url)`. Everything else is escaped as text.

use teloxide::utils::html;

/// Render a Markdown message as Telegram HTML
pub fn to_telegram_html(markdown: &str) -> String {
    markdown
        .trim()
        .lines()
        .map(render_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_line(line: &str) -> String {
    let line = line.trim_end();
    let content = line.trim_start();

    if let Some(heading) = heading_text(content) {
        return html::bold(&render_inline(heading));
    }
    if let Some(item) = content.strip_prefix("- ").or_else(|| content.strip_prefix("* ")) {
        return format!("• {}", render_inline(item.trim_start()));
    }
    render_inline(line)
}

fn heading_text(line: &str) -> Option<&str> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(str::trim)
}

fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some((rendered, remaining)) = render_span(rest) {
            out.push_str(&rendered);
            rest = remaining;
            continue;
        }
        let len = c.len_utf8();
        out.push_str(&html::escape(&rest[..len]));
        rest = &rest[len..];
    }

    out
}

/// Render a span starting at the beginning of `text`, if one opens there
fn render_span(text: &str) -> Option<(String, &str)> {
    if let Some(after) = text.strip_prefix("**") {
        let end = after.find("**").filter(|&end| end > 0)?;
        return Some((html::bold(&render_inline(&after[..end])), &after[end + 2..]));
    }
    if let Some(after) = text.strip_prefix('`') {
        let end = after.find('`').filter(|&end| end > 0)?;
        return Some((html::code_inline(&after[..end]), &after[end + 1..]));
    }
    if let Some(after) = text.strip_prefix('[') {
        let close = after.find("](")?;
        let label = &after[..close];
        let target = &after[close + 2..];
        let end = target.find(')')?;
        let url = &target[..end];
        if label.is_empty() || url.is_empty() || url.contains(char::is_whitespace) {
            return None;
        }
        return Some((html::link(url, &render_inline(label)), &target[end + 1..]));
    }
    if let Some(after) = text.strip_prefix('*') {
        if after.starts_with(char::is_whitespace) {
            return None;
        }
        let end = after.find('*').filter(|&end| end > 0)?;
        return Some((html::italic(&render_inline(&after[..end])), &after[end + 1..]));
    }
    None
}
