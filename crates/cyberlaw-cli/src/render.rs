use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Body,
    Code,
    Rule,
}

/// One terminal line of a rendered answer. List markers and indentation are
/// already part of `text`; `kind` only selects the colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub kind: LineKind,
    pub text: String,
}

const RULE_WIDTH: usize = 40;

/// Flatten markdown into terminal lines: headings, bullet and numbered
/// lists, paragraphs, tables and fenced code. Inline emphasis is dropped.
pub fn render_markdown(source: &str) -> Vec<RenderedLine> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut kind = LineKind::Body;
    // Next number for each open list; `None` for bullet lists.
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_code = false;
    // Cells seen so far in the current table row.
    let mut cells = 0usize;
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;

    for event in Parser::new_ext(source, options) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                flush(&mut out, &mut current, kind);
                kind = LineKind::Heading;
            }
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut out, &mut current, kind);
                kind = LineKind::Body;
            }
            Event::Start(Tag::List(start)) => {
                flush(&mut out, &mut current, kind);
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                flush(&mut out, &mut current, kind);
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                flush(&mut out, &mut current, kind);
                let depth = lists.len().saturating_sub(1);
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}.");
                        *n += 1;
                        marker
                    }
                    _ => "•".to_string(),
                };
                current = format!("{}{marker} ", "  ".repeat(depth));
            }
            Event::Start(Tag::TableHead) => {
                flush(&mut out, &mut current, kind);
                kind = LineKind::Heading;
                cells = 0;
            }
            Event::End(TagEnd::TableHead) => {
                flush(&mut out, &mut current, kind);
                kind = LineKind::Body;
            }
            Event::Start(Tag::TableRow) => {
                flush(&mut out, &mut current, kind);
                cells = 0;
            }
            Event::Start(Tag::TableCell) => {
                if cells > 0 {
                    current.push_str(" | ");
                }
                cells += 1;
            }
            Event::End(TagEnd::TableRow) | Event::End(TagEnd::Table) => {
                flush(&mut out, &mut current, kind);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut out, &mut current, kind);
                in_code = true;
            }
            Event::End(TagEnd::CodeBlock) => in_code = false,
            Event::Text(text) if in_code => {
                for line in text.lines() {
                    out.push(RenderedLine {
                        kind: LineKind::Code,
                        text: format!("    {line}"),
                    });
                }
            }
            Event::Text(text) => current.push_str(&text),
            Event::Code(code) => {
                current.push('`');
                current.push_str(&code);
                current.push('`');
            }
            Event::SoftBreak => current.push(' '),
            Event::HardBreak | Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Item) => {
                flush(&mut out, &mut current, kind);
            }
            Event::Rule => {
                flush(&mut out, &mut current, kind);
                out.push(RenderedLine {
                    kind: LineKind::Rule,
                    text: "─".repeat(RULE_WIDTH),
                });
            }
            _ => {}
        }
    }
    flush(&mut out, &mut current, kind);
    out
}

fn flush(out: &mut Vec<RenderedLine>, current: &mut String, kind: LineKind) {
    let text = std::mem::take(current);
    if text.trim().is_empty() {
        return;
    }
    out.push(RenderedLine {
        kind,
        text: text.trim_end().to_string(),
    });
}
