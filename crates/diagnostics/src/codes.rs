//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete.

/// Command argument is absent, malformed, or out of range.
pub const ARGUMENT: &str = "DKY1001";

/// Command is well-formed but used in an invalid position.
pub const USAGE: &str = "DKY1002";

/// Command name does not match any catalog entry.
pub const UNDEFINED_COMMAND: &str = "DKY1003";

/// A repetition was skipped because a repeated command cannot be re-emitted.
pub const SKIPPED: &str = "DKY2001";

/// Every known code, in declaration order.
pub const ALL: &[&str] = &[ARGUMENT, USAGE, UNDEFINED_COMMAND, SKIPPED];

pub(crate) fn explain(id: &str) -> Option<&'static str> {
    match id {
        ARGUMENT => Some(
            "The command argument is missing, malformed, or outside the accepted range. \
             Delays take milliseconds in 1..=100000, REPEAT takes counts in 1..=100, \
             single keys take no argument, and combo keys take one or two key names.",
        ),
        USAGE => Some(
            "The command is valid but appears in the wrong place. DEFAULTDELAY and \
             DEFAULT_DELAY may only be the first command of a script.",
        ),
        UNDEFINED_COMMAND => Some(
            "The line starts with a name that is not a known command. Command names are \
             case-sensitive and written in upper case; run `ducky keys` for the full list.",
        ),
        SKIPPED => Some(
            "REPEAT was skipped because one of the commands it would repeat failed when \
             emitted again, usually because that command was itself invalid.",
        ),
        _ => None,
    }
}
