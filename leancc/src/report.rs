//! Terminal rendering of compile errors.

use crate::CompileError;
use console::style;
use leancc_source::Source;
use std::fmt::Write;
use std::path::Path;

/// Renders `error` for the terminal, quoting the offending line of `content` when the error has a location.
///
/// ```text
/// error[syntax]: expected `;`, found `}`
///   --> main.c:1:23
///    |
///  1 | int main() { return 1 }
///    |                       ^
/// ```
pub fn render(error: &CompileError, path: &Path, content: Option<&str>) -> String {
    let mut out = String::new();
    let header = format!("error[{}]", error.code);
    // writing to a String cannot fail
    let _ = writeln!(out, "{}: {}", style(header).red().bold(), style(&error.message).bold());

    if !error.has_location() {
        let _ = writeln!(out, "  {} {}", style("-->").blue().bold(), path.display());
        return out;
    }

    let _ = writeln!(
        out,
        "  {} {}:{}:{}",
        style("-->").blue().bold(),
        path.display(),
        error.line,
        error.column
    );

    let line_text = content.and_then(|content| Source::new(content).line_text(error.line));
    if let Some(line_text) = line_text {
        let gutter = error.line.to_string();
        let pad = " ".repeat(gutter.len());
        let bar = style("|").blue().bold();
        let _ = writeln!(out, "{} {}", pad, bar);
        let _ = writeln!(out, "{} {} {}", style(&gutter).blue().bold(), bar, line_text);
        let _ = writeln!(
            out,
            "{} {} {}{}",
            pad,
            bar,
            " ".repeat(error.column.saturating_sub(1)),
            style("^").red().bold()
        );
    }

    out
}
