//! Diagnostic output for the `ducky` binary.
//!
//! Pretty mode draws source-annotated ariadne reports on stderr, pointing at
//! the offending script line. JSON mode writes one object to stdout so the
//! output can be piped into other tools.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use ducky_toolchain_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// How results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pretty on a terminal and JSON otherwise.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Info => ReportKind::Advice,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Info => Color::Blue,
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Draw every diagnostic against `source` on stderr.
///
/// Diagnostics without a span (or with one past the end of the source) fall
/// back to their one-line `Display` form.
pub(crate) fn render_pretty(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    let config = Config::default().with_compact(false);
    let mut cache = (filename, Source::from(source));

    for diag in diagnostics {
        let Some(span) = diag.span.filter(|s| s.end <= source.len()) else {
            eprintln!("{diag}");
            continue;
        };
        let range = span.start..span.end;
        let label = match diag.line {
            Some(line) => format!("line {line}"),
            None => diag.message.clone(),
        };

        let mut report = Report::build(report_kind(diag.severity), (filename, range.clone()))
            .with_config(config)
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_label(
                Label::new((filename, range))
                    .with_message(label)
                    .with_color(severity_color(diag.severity)),
            );
        if let Some(command) = diag.context.as_ref().and_then(|c| c.get("command")) {
            report = report.with_note(format!("command `{command}`"));
        }
        if let Some(help) = diag.explain() {
            report = report.with_help(help);
        }
        // A broken stderr is not worth failing the run over.
        let _ = report.finish().eprint(&mut cache);
    }
}

/// Print `N errors, M info` to stderr, or nothing for a clean run.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let infos = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Info)
        .count();

    let plural = |n: usize, word: &str| {
        if n == 1 {
            format!("{n} {word}")
        } else {
            format!("{n} {word}s")
        }
    };
    let mut parts = Vec::new();
    if errors > 0 {
        parts.push(plural(errors, "error").fg(Color::Red).to_string());
    }
    if infos > 0 {
        parts.push(format!("{infos} info").fg(Color::Blue).to_string());
    }
    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// Write `value` to stdout as pretty JSON.
pub(crate) fn print_json(value: &serde_json::Value) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
