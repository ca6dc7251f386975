use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::cli::OutputFormat;
use crate::view::{Line, Screen, Span, Style};

/// Global output settings
static OUTPUT_FORMAT: AtomicU8 = AtomicU8::new(0);
static QUIET: AtomicBool = AtomicBool::new(false);

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub fn set_format(format: OutputFormat) {
    let raw = match format {
        OutputFormat::Table => 0,
        OutputFormat::Json => 1,
        OutputFormat::Compact => 2,
    };
    OUTPUT_FORMAT.store(raw, Ordering::Relaxed);
}

pub fn format() -> OutputFormat {
    match OUTPUT_FORMAT.load(Ordering::Relaxed) {
        1 => OutputFormat::Json,
        2 => OutputFormat::Compact,
        _ => OutputFormat::Table,
    }
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print items as a table, JSON, or one line each depending on output mode
pub fn print_table<T, R, F, C>(items: &[T], to_row: F, to_compact: C)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
    C: Fn(&T) -> String,
{
    match format() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
        }
        OutputFormat::Compact => {
            for item in items {
                println!("{}", to_compact(item));
            }
        }
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            let table = Table::new(rows).with(TableStyle::rounded()).to_string();
            println!("{table}");
        }
    }
}

/// Print a message (skipped in quiet mode, wrapped in an object in JSON mode)
pub fn print_message(message: &str) {
    if is_quiet() {
        return;
    }
    match format() {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "message": message }));
        }
        _ => println!("{message}"),
    }
}

/// Draw one frame of the browser. JSON mode emits the frame model, one
/// object per line, instead of terminal text.
pub fn draw_screen(screen: &Screen) -> io::Result<()> {
    let mut stdout = io::stdout().lock();

    if matches!(format(), OutputFormat::Json) {
        let json = serde_json::to_string(screen).map_err(io::Error::other)?;
        writeln!(stdout, "{json}")?;
        return stdout.flush();
    }

    let colorize = colored::control::SHOULD_COLORIZE.should_colorize();
    if colorize {
        write!(stdout, "{CLEAR_SCREEN}")?;
    }
    for line in screen.lines() {
        writeln!(stdout, "{}", paint_line(&line, colorize))?;
    }
    stdout.flush()
}

pub fn paint_line(line: &Line, colorize: bool) -> String {
    if !colorize {
        return line.text();
    }
    line.spans.iter().map(paint_span).collect()
}

fn paint_span(span: &Span) -> String {
    let text = span.text.as_str();
    match &span.style {
        Style::Plain => text.to_string(),
        Style::Header => text.bold().underline().to_string(),
        Style::Title => text.bold().to_string(),
        Style::Muted => text.bright_black().to_string(),
        Style::Alert => text.red().bold().to_string(),
        Style::Skeleton => text.bright_black().dimmed().to_string(),
        Style::Link(target) => hyperlink(
            &strip_control(target),
            &text.blue().underline().to_string(),
        ),
    }
}

/// OSC 8 terminal hyperlink; terminals without support show the text only.
fn hyperlink(target: &str, text: &str) -> String {
    format!("\x1b]8;;{target}\x1b\\{text}\x1b]8;;\x1b\\")
}

/// Drop control characters, ESC and BEL included.
pub fn strip_control(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
