//! Command instances: argument grammars, emission, and replay.
//!
//! A [`Command`] is created for every dispatched line, including lines whose
//! name is unknown. Its behavior comes entirely from the catalog
//! [`Variant`] it was created with; the instance itself only carries the raw
//! argument, the source line, and what happened when it ran.

use std::ops::RangeInclusive;
use std::str::FromStr;

use ducky_toolchain_alphabet::Alphabet;
use ducky_toolchain_diagnostics::{Severity, codes};

use crate::catalog::keys::{self, KeyDef};
use crate::catalog::{CommandClass, Variant};
use crate::emit::CodeNode;
use crate::emit::payload::{
    PRESS_COMBO_KEY, PRESS_SINGLE_KEY, PRINT_ALT_STRING, PRINT_DEFAULT_STRING, Payload,
};
use crate::engine::EngineConfig;
use crate::engine::history::History;

/// Inclusive range for every millisecond argument.
pub const MILLIS_RANGE: RangeInclusive<u32> = 1..=100_000;
/// Inclusive range for the repeat count.
pub const REPEAT_RANGE: RangeInclusive<u32> = 1..=100;
/// Inclusive range for the number of preceding commands a repeat covers.
pub const SPAN_RANGE: RangeInclusive<usize> = 1..=100;

const SKIPPED_MESSAGE: &str = "Command skipped due to inoperability of previous ones";

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Failure of a single command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The argument is missing, malformed, or out of range.
    #[error("Invalid command argument(s): {0}")]
    Argument(String),
    /// The argument is valid but the command is not allowed here.
    #[error("Invalid command usage: {0}")]
    Usage(String),
    /// The command was skipped; informational only.
    #[error("{0}")]
    Info(String),
}

impl CommandError {
    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Argument(_) => codes::ARGUMENT,
            CommandError::Usage(_) => codes::USAGE,
            CommandError::Info(_) => codes::SKIPPED,
        }
    }

    /// Diagnostic severity for this error.
    pub fn severity(&self) -> Severity {
        match self {
            CommandError::Argument(_) | CommandError::Usage(_) => Severity::Error,
            CommandError::Info(_) => Severity::Info,
        }
    }

    fn argument(msg: impl Into<String>) -> Self {
        CommandError::Argument(msg.into())
    }
}

// ─── Parsed arguments and output ────────────────────────────────────────────

/// An argument after grammar checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// No argument (comments, single keys).
    None,
    /// A duration in milliseconds.
    Millis(u32),
    /// Repeat `count` times the last `span` commands.
    Repeat {
        /// Loop iterations.
        count: u32,
        /// Number of preceding commands to repeat.
        span: usize,
    },
    /// Text to type, with an optional per-character delay.
    Text {
        /// Literal text.
        text: String,
        /// Pause after each character in milliseconds.
        delay: Option<u32>,
    },
    /// Resolved key expressions following the invoked combo key.
    Keys(Vec<String>),
}

/// Code produced by one successful execution, plus the payloads it calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emission {
    /// Generated statements.
    pub code: Vec<CodeNode>,
    /// Payloads the statements call.
    pub payloads: Vec<&'static Payload>,
}

/// Outcome of a command's first execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Not executed yet.
    Pending,
    /// Executed and emitted its code.
    Executed,
    /// Failed; nothing was emitted for the line.
    Failed,
}

/// Read-only session state handed to every execution.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Character to Alt code mapping.
    pub alphabet: &'a Alphabet,
    /// Run-wide settings.
    pub config: &'a EngineConfig,
    /// Commands processed so far.
    pub history: &'a History,
}

// ─── Command instance ───────────────────────────────────────────────────────

/// One processed line.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    variant: Option<Variant>,
    arg: Option<String>,
    line: usize,
    pub(crate) status: Status,
}

impl Command {
    /// A command resolved to `variant`.
    pub fn new(name: impl Into<String>, variant: Variant, arg: Option<&str>, line: usize) -> Self {
        Self {
            name: name.into(),
            variant: Some(variant),
            arg: arg.map(str::to_string),
            line,
            status: Status::Pending,
        }
    }

    /// Placeholder for a line whose command name is unknown.
    pub fn undefined(name: impl Into<String>, arg: Option<&str>, line: usize) -> Self {
        Self {
            name: name.into(),
            variant: None,
            arg: arg.map(str::to_string),
            line,
            status: Status::Failed,
        }
    }

    /// Name as written in the script.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw argument text.
    pub fn arg(&self) -> Option<&str> {
        self.arg.as_deref()
    }

    /// 1-based source line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Catalog variant, `None` for an undefined command.
    pub fn variant(&self) -> Option<Variant> {
        self.variant
    }

    /// History class.
    pub fn class(&self) -> CommandClass {
        self.variant
            .as_ref()
            .map_or(CommandClass::Undefined, Variant::class)
    }

    /// Outcome of the first execution.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Check the argument against the variant's grammar.
    pub fn parse(&self, ctx: &Context<'_>) -> Result<Argument, CommandError> {
        let Some(variant) = self.variant else {
            return Err(CommandError::argument(format!(
                "undefined command `{}`",
                self.name
            )));
        };
        let arg = self.arg.as_deref();
        match variant {
            Variant::Comment => Ok(Argument::None),
            Variant::Delay | Variant::DefaultDelay => parse_millis(arg)
                .map(Argument::Millis)
                .ok_or_else(|| CommandError::argument("expected integer in range from 1 to 10^5")),
            Variant::Repeat => parse_repeat(arg),
            Variant::String => {
                let text = arg
                    .ok_or_else(|| CommandError::argument("expected string, but got nothing"))?;
                check_alphabet(text, ctx)?;
                Ok(Argument::Text {
                    text: text.to_string(),
                    delay: None,
                })
            }
            Variant::StringDelay => parse_string_delay(arg, ctx),
            Variant::SingleKey(_) => match arg {
                None => Ok(Argument::None),
                Some(_) => Err(CommandError::argument(
                    "command doesn't accept any arguments",
                )),
            },
            Variant::ComboKey(key) => parse_combo(key, arg),
        }
    }

    /// Parse and emit the command's statements.
    ///
    /// Fails with [`CommandError::Usage`] for a default delay that is not the
    /// first command, and with [`CommandError::Info`] for a repeat whose
    /// commands no longer execute.
    pub fn exec(&self, ctx: &Context<'_>) -> Result<Emission, CommandError> {
        let arg = self.parse(ctx)?;
        let Some(variant) = self.variant else {
            return Ok(Emission::default());
        };
        match (variant, arg) {
            (Variant::Delay, Argument::Millis(ms)) => Ok(Emission {
                code: vec![delay_statement(ms)],
                payloads: Vec::new(),
            }),
            (Variant::DefaultDelay, _) => {
                if ctx.history.is_empty() {
                    Ok(Emission::default())
                } else {
                    Err(CommandError::Usage(
                        "command can be used once at the top of script".into(),
                    ))
                }
            }
            (Variant::Repeat, Argument::Repeat { count, span }) => repeat(ctx, count, span),
            (Variant::String | Variant::StringDelay, Argument::Text { text, delay }) => {
                Ok(type_text(&text, delay, ctx))
            }
            (Variant::SingleKey(key), _) => Ok(Emission {
                code: vec![CodeNode::line(format!("pressSingleKey({});", key.constant))],
                payloads: vec![&PRESS_SINGLE_KEY],
            }),
            (Variant::ComboKey(key), Argument::Keys(rest)) => {
                let keys: Vec<String> = std::iter::once(key.constant)
                    .chain(rest.iter().map(String::as_str))
                    .map(|k| format!("(uint8_t){k}"))
                    .collect();
                Ok(Emission {
                    code: vec![CodeNode::line(format!(
                        "pressComboKey({{{}}});",
                        keys.join(", ")
                    ))],
                    payloads: vec![&PRESS_COMBO_KEY],
                })
            }
            _ => Ok(Emission::default()),
        }
    }

    /// Code to inject after the latest line.
    ///
    /// Only an executed default delay produces anything: a wait of its
    /// duration, unless the latest command in history is of a class listed
    /// in [`EngineConfig::default_delay_skip`]. Whether that command itself
    /// succeeded does not matter.
    pub fn replay(&self, ctx: &Context<'_>) -> Vec<CodeNode> {
        if self.variant != Some(Variant::DefaultDelay) || self.status != Status::Executed {
            return Vec::new();
        }
        let Some(latest) = ctx.history.last() else {
            return Vec::new();
        };
        if ctx.config.default_delay_skip.contains(&latest.class()) {
            return Vec::new();
        }
        // The argument already parsed when the command executed.
        match self.parse(ctx) {
            Ok(Argument::Millis(ms)) => vec![delay_statement(ms)],
            _ => Vec::new(),
        }
    }
}

// ─── Grammars ───────────────────────────────────────────────────────────────

fn parse_int<T: FromStr + PartialOrd>(token: &str, range: &RangeInclusive<T>) -> Option<T> {
    token
        .trim()
        .parse::<T>()
        .ok()
        .filter(|n| range.contains(n))
}

fn parse_millis(arg: Option<&str>) -> Option<u32> {
    arg.and_then(|a| parse_int(a, &MILLIS_RANGE))
}

fn parse_repeat(arg: Option<&str>) -> Result<Argument, CommandError> {
    let arg = arg.ok_or_else(|| CommandError::argument("expected 1 or 2 arguments, but got nothing"))?;
    let tokens: Vec<&str> = arg.split_whitespace().collect();
    if tokens.len() > 2 {
        return Err(CommandError::argument(format!(
            "expected 1 or 2 arguments, but got {}",
            tokens.len()
        )));
    }
    let count = tokens
        .first()
        .and_then(|t| parse_int(t, &REPEAT_RANGE))
        .ok_or_else(|| {
            CommandError::argument("first argument expected as integer in range from 1 to 100")
        })?;
    let span = match tokens.get(1) {
        Some(t) => parse_int(t, &SPAN_RANGE).ok_or_else(|| {
            CommandError::argument("second argument expected as integer in range from 1 to 100")
        })?,
        None => 1,
    };
    Ok(Argument::Repeat { count, span })
}

fn parse_string_delay(arg: Option<&str>, ctx: &Context<'_>) -> Result<Argument, CommandError> {
    let arg = arg.ok_or_else(|| CommandError::argument("expected 2 arguments, but got nothing"))?;
    let Some((ms, text)) = arg.split_once(' ') else {
        return Err(CommandError::argument("expected 2 arguments, but got 1"));
    };
    let delay = parse_millis(Some(ms)).ok_or_else(|| {
        CommandError::argument("first argument expected as integer in range from 1 to 10^5")
    })?;
    check_alphabet(text, ctx)?;
    Ok(Argument::Text {
        text: text.to_string(),
        delay: Some(delay),
    })
}

fn check_alphabet(text: &str, ctx: &Context<'_>) -> Result<(), CommandError> {
    if !ctx.config.alt_mode {
        return Ok(());
    }
    match text
        .chars()
        .enumerate()
        .find(|(_, c)| !ctx.alphabet.contains(*c))
    {
        Some((i, c)) => Err(CommandError::argument(format!(
            "undefined character of string `{c}` in {} position",
            i + 1
        ))),
        None => Ok(()),
    }
}

fn parse_combo(invoked: &'static KeyDef, arg: Option<&str>) -> Result<Argument, CommandError> {
    let tokens: Vec<&str> = arg.map(|a| a.split_whitespace().collect()).unwrap_or_default();
    let (first, last) = match tokens.as_slice() {
        [] => {
            return Err(CommandError::argument(
                "expected 1 or 2 arguments, but got nothing",
            ));
        }
        [last] => (None, *last),
        [first, last] => (Some(*first), *last),
        more => {
            return Err(CommandError::argument(format!(
                "expected 1 or 2 arguments, but got {}",
                more.len()
            )));
        }
    };

    let mut keys = Vec::with_capacity(2);
    if let Some(first) = first {
        let Some(modifier) = keys::combo_key(first) else {
            return Err(CommandError::argument(format!(
                "first argument expected as ComboKey, but got `{first}`"
            )));
        };
        if modifier == invoked {
            return Err(CommandError::argument(
                "first argument must not match the command name",
            ));
        }
        keys.push(modifier.constant.to_string());
    }

    if let Some(key) = keys::single_key(last) {
        keys.push(key.constant.to_string());
    } else if let [b @ b'a'..=b'z'] = last.as_bytes() {
        keys.push(format!("'{}'", *b as char));
    } else {
        return Err(CommandError::argument(format!(
            "last argument expected as SingleKey or ASCII lowercase char (a-z), but got `{last}`"
        )));
    }
    Ok(Argument::Keys(keys))
}

// ─── Emission ───────────────────────────────────────────────────────────────

fn delay_statement(ms: u32) -> CodeNode {
    CodeNode::line(format!("delay({ms});"))
}

fn type_text(text: &str, delay: Option<u32>, ctx: &Context<'_>) -> Emission {
    let suffix = delay.map(|ms| format!(", {ms}")).unwrap_or_default();
    if !ctx.config.alt_mode {
        return Emission {
            code: vec![CodeNode::line(format!(
                "printDefaultString(F(\"{}\"){suffix});",
                escape_c_string(text)
            ))],
            payloads: vec![&PRINT_DEFAULT_STRING],
        };
    }
    // Characters were checked against the alphabet while parsing.
    let codes: Vec<String> = text
        .chars()
        .filter_map(|c| ctx.alphabet.get(c))
        .map(|code| format!("{code}_S"))
        .collect();
    Emission {
        code: vec![CodeNode::line(format!(
            "printAltString({{{}}}{suffix});",
            codes.join(", ")
        ))],
        payloads: vec![&PRINT_ALT_STRING],
    }
}

fn escape_c_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn repeat(ctx: &Context<'_>, count: u32, span: usize) -> Result<Emission, CommandError> {
    let selected = ctx.history.tail(span);
    if selected.len() < span {
        return Err(CommandError::argument(format!(
            "there are not enough commands to repeat {} < {span}",
            selected.len()
        )));
    }
    for forbidden in [
        CommandClass::Comment,
        CommandClass::DefaultDelay,
        CommandClass::Repeat,
    ] {
        if let Some(cmd) = selected.iter().find(|c| c.class() == forbidden) {
            return Err(CommandError::argument(format!(
                "cannot repeat the `{}` command",
                cmd.name()
            )));
        }
    }

    let mut body = Vec::new();
    let mut payloads: Vec<&'static Payload> = Vec::new();
    for cmd in selected {
        let emission = cmd
            .exec(ctx)
            .map_err(|_| CommandError::Info(SKIPPED_MESSAGE.into()))?;
        body.extend(emission.code);
        for payload in emission.payloads {
            if !payloads.contains(&payload) {
                payloads.push(payload);
            }
        }
    }
    Ok(Emission {
        code: vec![
            CodeNode::line(format!("for (short i = 0; i < {count}; ++i) {{")),
            CodeNode::block(body),
            CodeNode::line("}"),
        ],
        payloads,
    })
}
