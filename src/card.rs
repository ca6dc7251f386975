//! Fixed-size boxes drawn for each list row.
//!
//! Every box is exactly [`ROW_HEIGHT`] lines tall and [`CARD_WIDTH`] columns
//! wide so the list can be windowed with a single row size.

use unicode_width::UnicodeWidthChar;

use crate::types::User;
use crate::view::{Line, Span, Style};

pub const ROW_HEIGHT: u32 = 6;
pub const CARD_WIDTH: usize = 60;

const INNER_WIDTH: usize = CARD_WIDTH - 4;
const AVATAR: &str = "◉";
const SKELETON_AVATAR: &str = "○";
const SKELETON_BLOCK: char = '░';

pub fn user_card(user: &User) -> Vec<Line> {
    let name = user.full_name();
    let email = user.email.as_str();

    boxed(vec![
        vec![
            Span::new(AVATAR, Style::Link(user.image.clone())),
            Span::plain(" "),
            Span::new(name, Style::Title),
        ],
        vec![Span::plain("  "), Span::plain(user.affiliation())],
        vec![
            Span::plain("  "),
            Span::new(email, Style::Link(format!("mailto:{email}"))),
        ],
        vec![Span::plain("  "), Span::new(user.phone.as_str(), Style::Muted)],
    ])
}

pub fn card_label(user: &User) -> String {
    format!("User card for {} {}", user.first_name, user.last_name)
}

/// Grey placeholder shaped like a user card.
pub fn skeleton_card() -> Vec<Line> {
    let bar = |percent: usize| {
        let width = (INNER_WIDTH - 2) * percent / 100;
        Span::new(
            SKELETON_BLOCK.to_string().repeat(width),
            Style::Skeleton,
        )
    };

    boxed(vec![
        vec![Span::new(SKELETON_AVATAR, Style::Skeleton), Span::plain(" "), bar(40)],
        vec![Span::plain("  "), bar(60)],
        vec![Span::plain("  "), bar(50)],
        vec![Span::plain("  "), bar(30)],
    ])
}

/// Row shown in place of the loading row after a later page failed.
pub fn load_error_card(message: &str) -> Vec<Line> {
    boxed(vec![
        vec![Span::new("Failed to load more users", Style::Alert)],
        vec![Span::new(message, Style::Muted)],
        vec![],
        vec![Span::plain("Press "), Span::new("r", Style::Title), Span::plain(" to retry")],
    ])
}

/// Frame content lines with a rounded border, padding or cutting each line
/// to the inner width.
fn boxed(content: Vec<Vec<Span>>) -> Vec<Line> {
    let mut lines = Vec::with_capacity(ROW_HEIGHT as usize);
    lines.push(Line::plain(format!("╭{}╮", "─".repeat(CARD_WIDTH - 2))));

    for spans in content {
        let mut spans = fit(spans, INNER_WIDTH);
        let used: usize = spans.iter().map(Span::width).sum();
        spans.insert(0, Span::plain("│ "));
        spans.push(Span::plain(format!("{} │", " ".repeat(INNER_WIDTH - used))));
        lines.push(Line::new(spans));
    }

    lines.push(Line::plain(format!("╰{}╯", "─".repeat(CARD_WIDTH - 2))));
    lines
}

fn fit(spans: Vec<Span>, width: usize) -> Vec<Span> {
    let mut remaining = width;
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        if remaining == 0 {
            break;
        }
        let span_width = span.width();
        if span_width <= remaining {
            remaining -= span_width;
            out.push(span);
        } else {
            let mut text = String::new();
            let mut used = 0;
            for c in span.text.chars() {
                let w = c.width().unwrap_or(0);
                if used + w > remaining - 1 {
                    break;
                }
                used += w;
                text.push(c);
            }
            text.push('…');
            remaining = 0;
            out.push(Span::new(text, span.style));
        }
    }
    out
}
