use std::ops::Range;

use super::{OpenSpan, StyleToken};
use crate::dialect::Dialect;
use crate::escape::is_escaped;

const FENCE: &str = "```";

struct BracketScan {
    open: Vec<OpenSpan>,
    code_regions: Vec<Range<usize>>,
}

pub(super) fn scan(buffer: &str, dialect: Dialect) -> Vec<OpenSpan> {
    let BracketScan {
        mut open,
        code_regions,
    } = scan_brackets(buffer);
    open.extend(scan_toggles(buffer, dialect, &code_regions));
    open
}

/// Toggle marker starting at `index`, with its width in bytes.
fn toggle_at(bytes: &[u8], index: usize, dialect: Dialect) -> Option<(StyleToken, usize)> {
    let v2 = dialect == Dialect::MarkdownV2;
    let doubled = bytes.get(index + 1) == Some(&bytes[index]);
    match bytes[index] {
        b'*' => Some((StyleToken::Bold, 1)),
        b'_' if v2 && doubled => Some((StyleToken::Underline, 2)),
        b'_' => Some((StyleToken::Italic, 1)),
        b'~' if v2 => Some((StyleToken::Strikethrough, 1)),
        b'|' if v2 && doubled => Some((StyleToken::Spoiler, 2)),
        _ => None,
    }
}

/// Code spans never nest: inside a fence only a run of three or more
/// backticks closes it (the whole run is consumed), inside inline code the
/// next backtick does. At most one code span is open at the end.
fn scan_brackets(buffer: &str) -> BracketScan {
    let bytes = buffer.as_bytes();
    let mut open: Option<OpenSpan> = None;
    let mut code_regions = Vec::new();
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] != b'`' || is_escaped(buffer, index) {
            index += 1;
            continue;
        }
        let run = bytes[index..].iter().take_while(|&&b| b == b'`').count();

        let width = match open.as_ref().map(|span| span.token) {
            Some(StyleToken::CodeBlock) if run < FENCE.len() => run,
            Some(StyleToken::CodeBlock) => {
                close_region(&mut open, &mut code_regions, index + run);
                run
            }
            Some(_) => {
                close_region(&mut open, &mut code_regions, index + 1);
                1
            }
            None if run >= FENCE.len() => {
                open = Some(OpenSpan {
                    token: StyleToken::CodeBlock,
                    opener: fence_opener(buffer, index),
                    closer: FENCE.to_string(),
                    position: index,
                });
                FENCE.len()
            }
            None => {
                let marker = StyleToken::InlineCode.markdown_marker();
                open = Some(OpenSpan {
                    token: StyleToken::InlineCode,
                    opener: marker.to_string(),
                    closer: marker.to_string(),
                    position: index,
                });
                1
            }
        };
        index += width;
    }

    if let Some(span) = &open {
        code_regions.push(span.position..buffer.len());
    }
    BracketScan {
        open: open.into_iter().collect(),
        code_regions,
    }
}

fn close_region(open: &mut Option<OpenSpan>, regions: &mut Vec<Range<usize>>, end: usize) {
    if let Some(span) = open.take() {
        regions.push(span.position..end);
    }
}

/// Reopening text for a fence at `index`: keeps the language line so the
/// first continued line is read as content.
fn fence_opener(buffer: &str, index: usize) -> String {
    let after = &buffer[index + FENCE.len()..];
    let Some(newline) = after.find('\n') else {
        return FENCE.to_string();
    };
    let info = after[..newline].trim_end_matches('\r');
    if info.is_empty() {
        return format!("{FENCE}\n");
    }
    if info
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '+' | '#'))
    {
        return format!("{FENCE}{info}\n");
    }
    FENCE.to_string()
}

fn scan_toggles(buffer: &str, dialect: Dialect, code_regions: &[Range<usize>]) -> Vec<OpenSpan> {
    let bytes = buffer.as_bytes();
    // (token, occurrences, last position)
    let mut seen: Vec<(StyleToken, usize, usize)> = Vec::new();
    let mut index = 0;

    while index < bytes.len() {
        let toggle = toggle_at(bytes, index, dialect).filter(|_| {
            !is_escaped(buffer, index) && !code_regions.iter().any(|region| region.contains(&index))
        });
        let Some((token, width)) = toggle else {
            index += 1;
            continue;
        };
        match seen.iter_mut().find(|(seen_token, ..)| *seen_token == token) {
            Some(entry) => {
                entry.1 += 1;
                entry.2 = index;
            }
            None => seen.push((token, 1, index)),
        }
        index += width;
    }

    seen.into_iter()
        .filter(|(_, count, _)| count % 2 == 1)
        .map(|(token, _, position)| {
            let marker = token.markdown_marker();
            OpenSpan {
                token,
                opener: marker.to_string(),
                closer: marker.to_string(),
                position,
            }
        })
        .collect()
}
