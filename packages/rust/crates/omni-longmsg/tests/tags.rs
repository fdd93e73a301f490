#![allow(missing_docs)]

use omni_longmsg::{
    Dialect, Pairing, StyleToken, close_suffix, open_spans, reopen_prefix,
};

fn assert_closes_cleanly(buffer: &str, dialect: Dialect) {
    let stack = open_spans(buffer, dialect);
    let closed = format!("{buffer}{}", close_suffix(&stack));
    assert!(
        open_spans(&closed, dialect).is_empty(),
        "closing {buffer:?} left spans open: {:?}",
        open_spans(&closed, dialect)
    );
}

#[test]
fn open_bold_span_is_detected_and_closed() {
    let stack = open_spans("*bold start", Dialect::MarkdownV2);
    assert_eq!(stack.tokens(), vec![StyleToken::Bold]);
    assert_eq!(close_suffix(&stack), "*");
    assert_eq!(reopen_prefix(&stack), "*");
    assert_eq!(stack.spans()[0].position, 0);
}

#[test]
fn balanced_markup_has_no_open_spans() {
    assert!(open_spans("*bold* and _italic_ and `code`", Dialect::MarkdownV2).is_empty());
    assert!(open_spans("<b>bold</b> <i>it</i>", Dialect::Html).is_empty());
}

#[test]
fn escaped_markers_are_skipped() {
    assert!(open_spans(r"\*not bold", Dialect::MarkdownV2).is_empty());
    assert!(open_spans(r"price \_ 5 \`x", Dialect::MarkdownV2).is_empty());
    assert_eq!(
        open_spans(r"\\*bold", Dialect::MarkdownV2).tokens(),
        vec![StyleToken::Bold]
    );
}

#[test]
fn nested_spans_close_in_reverse_and_reopen_in_order() {
    let stack = open_spans("*bold _italic", Dialect::MarkdownV2);
    assert_eq!(stack.tokens(), vec![StyleToken::Bold, StyleToken::Italic]);
    assert_eq!(close_suffix(&stack), "_*");
    assert_eq!(reopen_prefix(&stack), "*_");
    assert_closes_cleanly("*bold _italic", Dialect::MarkdownV2);
}

#[test]
fn spans_are_ordered_by_unclosed_occurrence() {
    let stack = open_spans("_a_ *b _c", Dialect::MarkdownV2);
    assert_eq!(stack.tokens(), vec![StyleToken::Bold, StyleToken::Italic]);
    assert_eq!(stack.spans()[0].position, 4);
    assert_eq!(stack.spans()[1].position, 7);
}

#[test]
fn strikethrough_is_tracked_only_in_markdown_v2() {
    assert_eq!(
        open_spans("~gone", Dialect::MarkdownV2).tokens(),
        vec![StyleToken::Strikethrough]
    );
    assert!(open_spans("~gone", Dialect::PlainMarkdown).is_empty());
}

#[test]
fn code_fence_is_not_read_as_inline_code_toggles() {
    assert!(open_spans("```\nlet a = 1;\n```", Dialect::MarkdownV2).is_empty());

    let stack = open_spans("```\nlet a = 1;\n", Dialect::MarkdownV2);
    assert_eq!(stack.tokens(), vec![StyleToken::CodeBlock]);
    assert_eq!(close_suffix(&stack), "```");
}

#[test]
fn reopened_fence_replays_its_language_line() {
    let buffer = "intro\n```rust\nfn main() {\n";
    let stack = open_spans(buffer, Dialect::MarkdownV2);
    assert_eq!(stack.tokens(), vec![StyleToken::CodeBlock]);
    assert_eq!(reopen_prefix(&stack), "```rust\n");
    assert_closes_cleanly(buffer, Dialect::MarkdownV2);
}

#[test]
fn style_markers_inside_code_are_literal() {
    assert!(open_spans("`a*b` and ```\nx_y\n```", Dialect::MarkdownV2).is_empty());
    assert_eq!(
        open_spans("*bold `code*` more", Dialect::MarkdownV2).tokens(),
        vec![StyleToken::Bold]
    );
    assert_eq!(
        open_spans("`open code with * inside", Dialect::MarkdownV2).tokens(),
        vec![StyleToken::InlineCode]
    );
}

#[test]
fn unbalanced_closings_never_panic() {
    let stack = open_spans("a*b*c*", Dialect::MarkdownV2);
    assert_eq!(stack.tokens(), vec![StyleToken::Bold]);
    assert_eq!(stack.spans()[0].position, 5);

    assert!(open_spans("</b></i>text", Dialect::Html).is_empty());
}

#[test]
fn html_tags_keep_attributes_when_reopened() {
    let buffer = "<pre><code class=\"language-rust\">fn main() {";
    let stack = open_spans(buffer, Dialect::Html);
    assert_eq!(
        stack.tokens(),
        vec![StyleToken::CodeBlock, StyleToken::InlineCode]
    );
    assert_eq!(
        reopen_prefix(&stack),
        "<pre><code class=\"language-rust\">"
    );
    assert_eq!(close_suffix(&stack), "</code></pre>");
    assert_closes_cleanly(buffer, Dialect::Html);
}

#[test]
fn html_aliases_close_with_their_own_name() {
    let stack = open_spans("<strong>x <em>y", Dialect::Html);
    assert_eq!(stack.tokens(), vec![StyleToken::Bold, StyleToken::Italic]);
    assert_eq!(close_suffix(&stack), "</em></strong>");
}

#[test]
fn html_closing_a_deeper_element_closes_intervening_ones() {
    assert!(open_spans("<b><i>x</b>", Dialect::Html).is_empty());
    assert_eq!(
        open_spans("<b>a <i>b</i> <s>c", Dialect::Html).tokens(),
        vec![StyleToken::Bold, StyleToken::Strikethrough]
    );
}

#[test]
fn html_ignores_unknown_tags_and_entities() {
    assert!(open_spans("<a href=\"x\">link &lt;b&gt;", Dialect::Html).is_empty());
}

#[test]
fn backticks_inside_an_open_fence_are_content() {
    for dialect in [Dialect::PlainMarkdown, Dialect::MarkdownV2] {
        let stack = open_spans("```\nx `y\n", dialect);
        assert_eq!(stack.tokens(), vec![StyleToken::CodeBlock], "{dialect}");
        assert_eq!(close_suffix(&stack), "```");
        assert_eq!(reopen_prefix(&stack), "```\n");

        assert!(open_spans("```\necho `date` and `\n```", dialect).is_empty());
        assert_closes_cleanly("```\nx `", dialect);
    }
}

#[test]
fn underline_is_matched_before_italic_in_markdown_v2() {
    let stack = open_spans("__under _it", Dialect::MarkdownV2);
    assert_eq!(
        stack.tokens(),
        vec![StyleToken::Underline, StyleToken::Italic]
    );
    assert_eq!(close_suffix(&stack), "___");
    assert_eq!(reopen_prefix(&stack), "___");
    assert_closes_cleanly("__under _it", Dialect::MarkdownV2);

    assert!(open_spans("__x", Dialect::PlainMarkdown).is_empty());
    assert_eq!(
        open_spans(r"\__x", Dialect::MarkdownV2).tokens(),
        vec![StyleToken::Italic]
    );
}

#[test]
fn spoiler_markers_are_tracked() {
    let stack = open_spans("||hidden", Dialect::MarkdownV2);
    assert_eq!(stack.tokens(), vec![StyleToken::Spoiler]);
    assert_eq!(close_suffix(&stack), "||");
    assert!(open_spans(r"a \|\| b", Dialect::MarkdownV2).is_empty());
    assert!(open_spans("||a|| and ||b||", Dialect::MarkdownV2).is_empty());
}

#[test]
fn html_underline_and_spoiler_tags_are_tracked() {
    let stack = open_spans("<u>a <span class=\"tg-spoiler\">b", Dialect::Html);
    assert_eq!(
        stack.tokens(),
        vec![StyleToken::Underline, StyleToken::Spoiler]
    );
    assert_eq!(close_suffix(&stack), "</span></u>");
    assert_eq!(reopen_prefix(&stack), "<u><span class=\"tg-spoiler\">");

    assert_eq!(
        open_spans("<span>plain</span> <tg-spoiler>x", Dialect::Html).tokens(),
        vec![StyleToken::Spoiler]
    );
    assert!(open_spans("<ins>a</ins> <tg-spoiler>b</tg-spoiler>", Dialect::Html).is_empty());
}

#[test]
fn pairing_depends_on_dialect() {
    assert_eq!(StyleToken::Bold.pairing(Dialect::MarkdownV2), Pairing::Toggle);
    assert_eq!(StyleToken::Bold.pairing(Dialect::Html), Pairing::Bracket);
    assert_eq!(
        StyleToken::CodeBlock.pairing(Dialect::PlainMarkdown),
        Pairing::Bracket
    );
}
