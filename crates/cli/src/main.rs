mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ducky_toolchain_alphabet::{Alphabet, AlphabetBuilder, load_source_from_path};
use ducky_toolchain_core::catalog::{self, Variant};
use ducky_toolchain_core::{EngineConfig, ErrorPolicy, RenderConfig, Translation, translate_str};
use ducky_toolchain_diagnostics::{self as diag, Diagnostic};
use tracing_subscriber::EnvFilter;

use crate::render::{Format, print_json, print_summary, render_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "ducky",
    version,
    about = "Ducky Script toolchain: translate keystroke scripts into Arduino sketches"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

/// Options shared by every command that runs the engine.
#[derive(Args, Debug)]
struct EngineArgs {
    /// Ducky Script source file.
    source: PathBuf,

    /// Keep translating after an error. The run still exits with status 1.
    #[arg(short = 'e', long)]
    error_ok: bool,

    /// Additional alphabet JSON file; repeatable, later files win.
    #[arg(short = 'a', long = "alphabet", value_name = "ALPHABET", conflicts_with = "disable_alt")]
    alphabets: Vec<PathBuf>,

    /// Type strings with regular keystrokes instead of Alt codes.
    #[arg(long)]
    disable_alt: bool,
}

impl EngineArgs {
    fn config(&self) -> EngineConfig {
        let policy = if self.error_ok {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::FailFast
        };
        EngineConfig::default()
            .with_alt_mode(!self.disable_alt)
            .with_error_policy(policy)
    }

    fn alphabet(&self) -> Result<Alphabet> {
        if self.disable_alt {
            return Ok(AlphabetBuilder::new().build());
        }
        let user = self
            .alphabets
            .iter()
            .map(|path| {
                load_source_from_path(path)
                    .with_context(|| format!("failed to load alphabet '{}'", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        Alphabet::with_builtin(&user).context("failed to load built-in alphabets")
    }

    fn read_source(&self) -> Result<String> {
        fs::read_to_string(&self.source)
            .with_context(|| format!("failed to read '{}'", self.source.display()))
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Translate a script and write the Arduino sketch.
    Build {
        #[command(flatten)]
        engine: EngineArgs,

        /// Sketch directory; the sketch is written as OUTPUT/<dir name>.ino.
        #[arg(short = 'o', long = "out-dir", value_name = "OUTPUT", default_value = "sketch")]
        out_dir: PathBuf,

        /// Spaces per indentation level in the generated sketch.
        #[arg(short, long, default_value_t = 2)]
        indent: usize,

        /// Do not print the success summary.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Translate a script without writing anything and report problems.
    Check {
        #[command(flatten)]
        engine: EngineArgs,
    },

    /// List every command and key name.
    Keys,

    /// Explain a diagnostic ID (e.g. DKY1001).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Build {
            engine,
            out_dir,
            indent,
            quiet,
        } => cmd_build(&engine, &out_dir, indent, quiet, format)?,
        Cmd::Check { engine } => cmd_check(&engine, format)?,
        Cmd::Keys => cmd_keys(format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_build(
    args: &EngineArgs,
    out_dir: &Path,
    indent: usize,
    quiet: bool,
    format: Format,
) -> Result<()> {
    let started = Instant::now();
    let input = args.read_source()?;
    let t = translate_str(
        &input,
        args.config(),
        args.alphabet()?,
        &RenderConfig { indent },
    );

    let written = match &t.sketch {
        Some(sketch) => Some(write_sketch(out_dir, sketch)?),
        None => None,
    };
    tracing::debug!(?written, ok = t.ok, "build finished");

    match format {
        Format::Json => print_json(&serde_json::json!({
            "ok": t.ok,
            "lines": t.lines,
            "sketch": written,
            "diagnostics": t.diagnostics,
        }))?,
        Format::Pretty => {
            report_pretty(args, &input, &t);
            if t.ok && !quiet {
                println!(
                    "Successfully parsed {} line(s) in {}ms",
                    t.lines,
                    started.elapsed().as_millis()
                );
            }
        }
    }

    exit_on_errors(&t.diagnostics);
    Ok(())
}

fn cmd_check(args: &EngineArgs, format: Format) -> Result<()> {
    let input = args.read_source()?;
    let t = translate_str(
        &input,
        args.config(),
        args.alphabet()?,
        &RenderConfig::default(),
    );

    match format {
        Format::Json => print_json(&serde_json::json!({
            "ok": t.ok,
            "lines": t.lines,
            "diagnostics": t.diagnostics,
        }))?,
        Format::Pretty => {
            report_pretty(args, &input, &t);
            if t.ok {
                eprintln!("check ok");
            }
        }
    }

    exit_on_errors(&t.diagnostics);
    Ok(())
}

fn cmd_keys(format: Format) -> Result<()> {
    let entries = catalog::entries();
    match format {
        Format::Json => {
            let list: Vec<_> = entries
                .iter()
                .map(|spec| {
                    serde_json::json!({
                        "names": spec.names,
                        "kind": spec.variant.class(),
                        "syntax": spec.syntax,
                        "description": spec.description,
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(list))?;
        }
        Format::Pretty => {
            let mut heading = None;
            for spec in entries {
                let section = match spec.variant {
                    Variant::SingleKey(_) => "Single keys",
                    Variant::ComboKey(_) => "Combo keys",
                    _ => "Commands",
                };
                if heading != Some(section) {
                    if heading.is_some() {
                        println!();
                    }
                    println!("{section}:");
                    heading = Some(section);
                }
                println!("  {:<32} {}", spec.names.join(" | "), spec.description);
                if !matches!(spec.variant, Variant::SingleKey(_)) {
                    println!("  {:<32} usage: {}", "", spec.syntax);
                }
            }
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    let text = diag::explain(id);
    match format {
        Format::Json => print_json(&serde_json::json!({
            "id": id,
            "explanation": text,
        }))?,
        Format::Pretty => {
            use ariadne::Fmt;
            match text {
                Some(text) => println!("{}: {}", id.fg(ariadne::Color::Cyan), text),
                None => println!("{id}: (no explanation available)"),
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn report_pretty(args: &EngineArgs, input: &str, t: &Translation) {
    if t.diagnostics.is_empty() {
        return;
    }
    let filename = args.source.display().to_string();
    render_pretty(input, &filename, &t.diagnostics);
    print_summary(&t.diagnostics);
}

/// Write `sketch` as `<out_dir>/<dir name>.ino`, creating the directory.
///
/// The Arduino IDE only opens a sketch whose file name matches its folder.
fn write_sketch(out_dir: &Path, sketch: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create '{}'", out_dir.display()))?;
    let dir = fs::canonicalize(out_dir)
        .with_context(|| format!("failed to resolve '{}'", out_dir.display()))?;
    let name = dir
        .file_name()
        .with_context(|| format!("'{}' has no directory name", dir.display()))?;
    let mut file = name.to_os_string();
    file.push(".ino");
    let path = out_dir.join(file);
    fs::write(&path, sketch).with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(path)
}

/// Exit with code 1 if any diagnostic is an error.
/// Info diagnostics do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics.iter().any(Diagnostic::is_error) {
        process::exit(1);
    }
}
