//! Visual reordering of one wrapped line with the Unicode bidi algorithm.

use unicode_bidi::{BidiInfo, Level};

use super::shaping::is_mark;
use crate::document::Direction;

/// Reorder a single line (no line breaks) from logical to visual order,
/// left to right as it will be drawn. Right-to-left runs are reversed and
/// their paired brackets mirrored.
pub fn visual_line(line: &str, direction: Direction) -> String {
    if line.is_empty() {
        return String::new();
    }

    let level = match direction {
        Direction::Rtl => Level::rtl(),
        Direction::Ltr => Level::ltr(),
    };
    let info = BidiInfo::new(line, Some(level));
    let Some(para) = info.paragraphs.first() else {
        return line.to_string();
    };

    let (levels, runs) = info.visual_runs(para, para.range.clone());
    let mut out = String::with_capacity(line.len());
    for run in runs {
        let text = &line[run.clone()];
        if levels[run.start].is_rtl() {
            push_reversed(&mut out, text);
        } else {
            out.push_str(text);
        }
    }
    out
}

/// Append `text` reversed, keeping each combining mark after its base
/// letter.
fn push_reversed(out: &mut String, text: &str) {
    let mut clusters: Vec<&str> = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if i > start && !is_mark(c) {
            clusters.push(&text[start..i]);
            start = i;
        }
    }
    if start < text.len() {
        clusters.push(&text[start..]);
    }

    for cluster in clusters.into_iter().rev() {
        out.extend(cluster.chars().map(mirror));
    }
}

fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        _ => c,
    }
}
