//! Command catalog: the closed set of invocable commands.
//!
//! The catalog is built once from fixed tables and maps every command name,
//! aliases included, to a [`CommandSpec`]. Aliases share one spec and
//! therefore one [`Variant`]: the variant decides the argument grammar,
//! emission, and replay behavior of every name that refers to it.

/// Single-key and combo-key tables.
pub mod keys;

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use self::keys::{COMBO_KEYS, KeyDef, SINGLE_KEYS};

/// Coarse kind of a processed command, used by stateful commands to inspect
/// history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandClass {
    /// `REM`.
    Comment,
    /// `DELAY`.
    Delay,
    /// `DEFAULTDELAY` / `DEFAULT_DELAY`.
    DefaultDelay,
    /// `REPEAT`.
    Repeat,
    /// `STRING`.
    String,
    /// `STRINGDELAY` / `STRING_DELAY`.
    StringDelay,
    /// A key from the single-key table.
    SingleKey,
    /// A modifier chord from the combo-key table.
    ComboKey,
    /// Placeholder for a line whose command name is unknown.
    Undefined,
}

impl fmt::Display for CommandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandClass::Comment => write!(f, "comment"),
            CommandClass::Delay => write!(f, "delay"),
            CommandClass::DefaultDelay => write!(f, "default_delay"),
            CommandClass::Repeat => write!(f, "repeat"),
            CommandClass::String => write!(f, "string"),
            CommandClass::StringDelay => write!(f, "string_delay"),
            CommandClass::SingleKey => write!(f, "single_key"),
            CommandClass::ComboKey => write!(f, "combo_key"),
            CommandClass::Undefined => write!(f, "undefined"),
        }
    }
}

/// Grammar and emission strategy shared by every name of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Ignores its argument and emits nothing.
    Comment,
    /// Waits for a number of milliseconds.
    Delay,
    /// Injects a wait after subsequent commands.
    DefaultDelay,
    /// Re-emits preceding commands inside a counted loop.
    Repeat,
    /// Types text.
    String,
    /// Types text with a per-character delay.
    StringDelay,
    /// Presses one key.
    SingleKey(&'static KeyDef),
    /// Presses a modifier chord.
    ComboKey(&'static KeyDef),
}

impl Variant {
    /// History class of commands built from this variant.
    pub fn class(&self) -> CommandClass {
        match self {
            Variant::Comment => CommandClass::Comment,
            Variant::Delay => CommandClass::Delay,
            Variant::DefaultDelay => CommandClass::DefaultDelay,
            Variant::Repeat => CommandClass::Repeat,
            Variant::String => CommandClass::String,
            Variant::StringDelay => CommandClass::StringDelay,
            Variant::SingleKey(_) => CommandClass::SingleKey,
            Variant::ComboKey(_) => CommandClass::ComboKey,
        }
    }
}

/// One catalog entry: a variant and every name that invokes it.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Invocable names, canonical name first.
    pub names: &'static [&'static str],
    /// Shared strategy.
    pub variant: Variant,
    /// Usage line for listings.
    pub syntax: String,
    /// One-line description for listings.
    pub description: &'static str,
}

impl CommandSpec {
    /// Canonical (first) name.
    pub fn canonical(&self) -> &'static str {
        self.names[0]
    }
}

/// Name → spec lookup over the fixed command tables.
#[derive(Debug)]
pub struct Catalog {
    specs: Vec<CommandSpec>,
    by_name: HashMap<&'static str, usize>,
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// The process-wide catalog, built on first access.
    pub fn global() -> &'static Catalog {
        CATALOG.get_or_init(Catalog::build)
    }

    fn build() -> Self {
        let mut specs = vec![
            CommandSpec {
                names: &["REM"],
                variant: Variant::Comment,
                syntax: "REM <comment>".into(),
                description: "Comment; the line is not translated",
            },
            CommandSpec {
                names: &["DELAY"],
                variant: Variant::Delay,
                syntax: "DELAY <ms>".into(),
                description: "Pause for 1..=100000 milliseconds",
            },
            CommandSpec {
                names: &["DEFAULTDELAY", "DEFAULT_DELAY"],
                variant: Variant::DefaultDelay,
                syntax: "DEFAULTDELAY <ms>".into(),
                description: "Wait <ms> after every following command; first line only",
            },
            CommandSpec {
                names: &["REPEAT"],
                variant: Variant::Repeat,
                syntax: "REPEAT <count> [<commands>]".into(),
                description: "Repeat the last <commands> (default 1) commands <count> times",
            },
            CommandSpec {
                names: &["STRING"],
                variant: Variant::String,
                syntax: "STRING <text>".into(),
                description: "Type <text>",
            },
            CommandSpec {
                names: &["STRINGDELAY", "STRING_DELAY"],
                variant: Variant::StringDelay,
                syntax: "STRINGDELAY <ms> <text>".into(),
                description: "Type <text>, pausing <ms> after each character",
            },
        ];
        specs.extend(SINGLE_KEYS.iter().map(|key| CommandSpec {
            names: key.names,
            variant: Variant::SingleKey(key),
            syntax: key.canonical().to_string(),
            description: key.description,
        }));
        specs.extend(COMBO_KEYS.iter().map(|key| CommandSpec {
            names: key.names,
            variant: Variant::ComboKey(key),
            syntax: format!("{} [<combo key>] <key or a-z>", key.canonical()),
            description: key.description,
        }));

        let mut by_name = HashMap::new();
        for (i, spec) in specs.iter().enumerate() {
            for name in spec.names {
                let previous = by_name.insert(*name, i);
                debug_assert!(previous.is_none(), "duplicate command name {name}");
            }
        }
        Self { specs, by_name }
    }

    /// Spec invoked by `name`.
    ///
    /// Only names written entirely in upper case are invocable; any name with
    /// a lowercase letter is rejected before lookup.
    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        if !is_invocable_name(name) {
            return None;
        }
        self.by_name.get(name).map(|&i| &self.specs[i])
    }

    /// Every spec in listing order.
    pub fn specs(&self) -> &[CommandSpec] {
        &self.specs
    }
}

/// Every catalog entry in listing order: built-in commands, then single
/// keys, then combo keys.
pub fn entries() -> &'static [CommandSpec] {
    Catalog::global().specs()
}

fn is_invocable_name(name: &str) -> bool {
    name.chars().any(char::is_uppercase) && !name.chars().any(char::is_lowercase)
}
