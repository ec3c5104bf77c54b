//! Line dispatcher and run driver.
//!
//! [`Engine`] owns everything that lives for one run: the alphabet, the
//! history, the output assembler, and the diagnostics collected so far.
//! Lines are processed strictly one at a time; each is dispatched, executed,
//! recorded, and followed by a replay pass over the whole history before the
//! next line is looked at.

/// Execution history.
pub mod history;

use ducky_toolchain_alphabet::Alphabet;
use ducky_toolchain_diagnostics::{Diagnostic, Span, codes};
use serde::Serialize;

use self::history::History;
use crate::catalog::{Catalog, CommandClass};
use crate::command::{Command, CommandError, Context, Status};
use crate::emit::RenderConfig;
use crate::emit::sketch::SketchBuilder;

macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

// ─── Configuration ──────────────────────────────────────────────────────────

/// What to do after a line fails with an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop at the first error; no sketch is produced.
    #[default]
    FailFast,
    /// Record the error and continue with the next line.
    Continue,
}

/// Run-wide engine settings.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct EngineConfig {
    /// Type text as Alt codes from the alphabet instead of plain keystrokes.
    pub alt_mode: bool,
    /// Behavior after an error.
    pub error_policy: ErrorPolicy,
    /// Classes of the latest command after which a default delay is not
    /// injected.
    pub default_delay_skip: Vec<CommandClass>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alt_mode: true,
            error_policy: ErrorPolicy::FailFast,
            default_delay_skip: vec![
                CommandClass::Comment,
                CommandClass::DefaultDelay,
                CommandClass::Delay,
            ],
        }
    }
}

impl EngineConfig {
    /// Set [`EngineConfig::alt_mode`].
    pub fn with_alt_mode(mut self, alt_mode: bool) -> Self {
        self.alt_mode = alt_mode;
        self
    }

    /// Set [`EngineConfig::error_policy`].
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set [`EngineConfig::default_delay_skip`].
    pub fn with_default_delay_skip(mut self, skip: Vec<CommandClass>) -> Self {
        self.default_delay_skip = skip;
        self
    }
}

// ─── Results ────────────────────────────────────────────────────────────────

/// Result of translating a whole script.
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    /// Rendered sketch; `None` when the run was halted by an error.
    pub sketch: Option<String>,
    /// Every diagnostic recorded during the run, in line order.
    pub diagnostics: Vec<Diagnostic>,
    /// `true` if no error diagnostics were recorded.
    pub ok: bool,
    /// Number of input lines read, blank lines included.
    pub lines: usize,
}

/// The run stopped at an error under [`ErrorPolicy::FailFast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("translation halted at line {line}")]
pub struct Halted {
    /// 1-based line of the error.
    pub line: usize,
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Line-at-a-time translator.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    alphabet: Alphabet,
    history: History,
    sketch: SketchBuilder,
    diagnostics: Vec<Diagnostic>,
    lines: usize,
    halted: Option<Halted>,
}

impl Engine {
    /// Fresh engine for one run.
    pub fn new(config: EngineConfig, alphabet: Alphabet) -> Self {
        Self {
            config,
            alphabet,
            history: History::default(),
            sketch: SketchBuilder::new(),
            diagnostics: Vec::new(),
            lines: 0,
            halted: None,
        }
    }

    /// Settings of this run.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Commands processed so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Output collected so far.
    pub fn sketch(&self) -> &SketchBuilder {
        &self.sketch
    }

    /// Process the next input line.
    pub fn feed(&mut self, raw: &str) -> Result<(), Halted> {
        self.feed_with_span(raw, None)
    }

    /// Process the next input line, attaching `span` to its diagnostics.
    ///
    /// The line is trimmed at both ends before the name is split off, so an
    /// indented command is dispatched rather than skipped as a line with an
    /// empty name.
    ///
    /// Once halted, further lines are ignored and the same [`Halted`] is
    /// returned.
    pub fn feed_with_span(&mut self, raw: &str, span: Option<Span>) -> Result<(), Halted> {
        if let Some(halted) = self.halted {
            return Err(halted);
        }
        self.lines += 1;
        let line = self.lines;

        let text = raw.trim();
        if text.is_empty() {
            return Ok(());
        }
        let (name, arg) = match text.split_once(' ') {
            Some((name, arg)) => (name, Some(arg)),
            None => (text, None),
        };
        tracing::debug!(line, name, ?arg, "dispatch");

        let Some(spec) = Catalog::global().lookup(name) else {
            self.history.push(Command::undefined(name, arg, line));
            let diag = Diagnostic::error(
                codes::UNDEFINED_COMMAND,
                format!("Undefined command: `{name}`"),
                Some(line),
            )
            .with_context(ctx!("command" => name));
            self.record(diag, span);
            return self.check_halt(line);
        };

        let mut command = Command::new(name, spec.variant, arg, line);
        let result = {
            let ctx = Context {
                alphabet: &self.alphabet,
                config: &self.config,
                history: &self.history,
            };
            command.exec(&ctx)
        };
        match result {
            Ok(emission) => {
                command.status = Status::Executed;
                self.sketch.add(emission.code, &emission.payloads);
            }
            Err(err) => {
                command.status = Status::Failed;
                self.record_command_error(&err, name, line, span);
            }
        }
        self.history.push(command);

        self.replay(line);
        self.check_halt(line)
    }

    /// Translate a whole script, stopping at the first error under
    /// [`ErrorPolicy::FailFast`].
    pub fn translate_str(mut self, input: &str, render: &RenderConfig) -> Translation {
        let mut offset = 0;
        for raw in input.split_inclusive('\n') {
            let start = offset;
            offset += raw.len();
            let content = raw.trim_end_matches(['\n', '\r']);
            let span = Span::new(start, start + content.len());
            if self.feed_with_span(content, Some(span)).is_err() {
                break;
            }
        }
        self.finish(render)
    }

    /// End the run and render the sketch.
    pub fn finish(self, render: &RenderConfig) -> Translation {
        let ok = !self.diagnostics.iter().any(Diagnostic::is_error);
        let sketch = match self.halted {
            Some(_) => None,
            None => Some(self.sketch.render(render)),
        };
        tracing::info!(
            lines = self.lines,
            commands = self.history.len(),
            ok,
            halted = self.halted.is_some(),
            "translation finished"
        );
        Translation {
            sketch,
            diagnostics: self.diagnostics,
            ok,
            lines: self.lines,
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Give every recorded command a chance to inject code after `line`.
    fn replay(&mut self, line: usize) {
        let ctx = Context {
            alphabet: &self.alphabet,
            config: &self.config,
            history: &self.history,
        };
        let mut injected = Vec::new();
        for command in &self.history {
            let code = command.replay(&ctx);
            if !code.is_empty() {
                tracing::debug!(line, source_line = command.line(), "replay injection");
                injected.extend(code);
            }
        }
        self.sketch.add(injected, &[]);
    }

    fn record_command_error(
        &mut self,
        err: &CommandError,
        name: &str,
        line: usize,
        span: Option<Span>,
    ) {
        let diag = Diagnostic::new(err.code(), err.severity(), err.to_string(), Some(line))
            .with_context(ctx!("command" => name));
        self.record(diag, span);
    }

    fn record(&mut self, diag: Diagnostic, span: Option<Span>) {
        let diag = match span {
            Some(span) => diag.with_span(span),
            None => diag,
        };
        tracing::debug!(
            line = diag.line,
            code = %diag.id,
            severity = %diag.severity,
            "{}",
            diag.message
        );
        self.diagnostics.push(diag);
    }

    fn check_halt(&mut self, line: usize) -> Result<(), Halted> {
        let failed = self
            .diagnostics
            .iter()
            .rev()
            .take_while(|d| d.line == Some(line))
            .any(Diagnostic::is_error);
        if failed && self.config.error_policy == ErrorPolicy::FailFast {
            let halted = Halted { line };
            self.halted = Some(halted);
            return Err(halted);
        }
        Ok(())
    }
}

/// Translate `input` in one call.
pub fn translate_str(
    input: &str,
    config: EngineConfig,
    alphabet: Alphabet,
    render: &RenderConfig,
) -> Translation {
    Engine::new(config, alphabet).translate_str(input, render)
}
