use super::{OpenSpan, StyleToken};

fn token_for_tag(name: &str) -> Option<StyleToken> {
    match name {
        "b" | "strong" => Some(StyleToken::Bold),
        "i" | "em" => Some(StyleToken::Italic),
        "s" | "strike" | "del" => Some(StyleToken::Strikethrough),
        "u" | "ins" => Some(StyleToken::Underline),
        "tg-spoiler" => Some(StyleToken::Spoiler),
        "code" => Some(StyleToken::InlineCode),
        "pre" => Some(StyleToken::CodeBlock),
        _ => None,
    }
}

pub(super) fn scan(buffer: &str) -> Vec<OpenSpan> {
    let mut stack: Vec<OpenSpan> = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = buffer[cursor..].find('<') {
        let start = cursor + offset;
        let Some(length) = buffer[start..].find('>') else {
            break;
        };
        let end = start + length + 1;
        cursor = end;

        let inner = &buffer[start + 1..end - 1];
        let (closing, inner) = match inner.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, inner),
        };
        let name = inner
            .split(|ch: char| ch.is_ascii_whitespace() || ch == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        // Only the spoiler form of `<span>` is markup.
        let token = match name.as_str() {
            "span" if closing || inner.contains("tg-spoiler") => Some(StyleToken::Spoiler),
            other => token_for_tag(other),
        };
        let Some(token) = token else {
            continue;
        };

        if closing {
            // Unmatched closing tags are literal text; a match deeper in the
            // stack closes everything opened after it.
            if let Some(depth) = stack.iter().rposition(|span| span.token == token) {
                stack.truncate(depth);
            }
        } else {
            stack.push(OpenSpan {
                token,
                opener: buffer[start..end].to_string(),
                closer: format!("</{name}>"),
                position: start,
            });
        }
    }

    stack
}
