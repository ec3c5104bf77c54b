//! Alt code alphabets for the Ducky Script toolchain.
//!
//! An [`Alphabet`] maps a single character to the [`AltCode`] that types it
//! on the target machine (hold Alt, type the decimal code on the keypad,
//! release Alt). Alphabets are assembled from one or more
//! [`AlphabetSource`]s with an [`AlphabetBuilder`]: sources are applied in
//! order and later sources override earlier ones key by key.
//!
//! # Example
//! ```
//! use ducky_toolchain_alphabet::{AlphabetBuilder, load_source_from_str};
//!
//! let base = load_source_from_str("base", r#"{ "A": 65, "B": 66 }"#).unwrap();
//! let user = load_source_from_str("user", r#"{ "B": 98 }"#).unwrap();
//! let alphabet = AlphabetBuilder::new().merge(&base).merge(&user).build();
//!
//! assert_eq!(alphabet.get('A').map(|c| c.code()), Some(65));
//! assert_eq!(alphabet.get('B').map(|c| c.code()), Some(98));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur when loading an alphabet source.
#[derive(Debug, Error)]
pub enum AlphabetError {
    /// The source file could not be read.
    #[error("failed to read alphabet {path}: {source}")]
    Io {
        /// Path of the file that failed to load.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization failed.
    #[error("invalid alphabet JSON in {name}: {source}")]
    InvalidJson {
        /// Source name (file path or built-in name).
        name: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A key is not exactly one character.
    #[error("invalid key {key:?} in {name}: expected exactly one character")]
    InvalidKey {
        /// Source name.
        name: String,
        /// The offending key.
        key: String,
    },

    /// A code is outside `1..=65535`.
    #[error("invalid Alt code {code} for {key:?} in {name}: expected 1..=65535")]
    InvalidCode {
        /// Source name.
        name: String,
        /// The character the code was declared for.
        key: char,
        /// The offending code.
        code: u64,
    },
}

/// A decimal Alt code.
///
/// Invariant: the code is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AltCode(u16);

impl AltCode {
    /// Create an Alt code, returning `None` for zero.
    pub fn new(code: u16) -> Option<Self> {
        (code != 0).then_some(Self(code))
    }

    /// The numeric code.
    pub fn code(self) -> u16 {
        self.0
    }
}

impl fmt::Display for AltCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One named set of character → Alt code entries, as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphabetSource {
    name: String,
    entries: BTreeMap<char, AltCode>,
}

impl AlphabetSource {
    /// Source name (file path or built-in name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of characters defined by this source.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this source defines no characters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Built-in sources, applied before any user source.
const BUILTIN: &[(&str, &str)] = &[
    ("builtin:ascii", include_str!("../data/ascii.json")),
    (
        "builtin:cp866-cyrillic",
        include_str!("../data/cp866-cyrillic.json"),
    ),
];

/// Load the built-in sources in application order.
pub fn builtin_sources() -> Result<Vec<AlphabetSource>, AlphabetError> {
    BUILTIN
        .iter()
        .map(|(name, json)| load_source_from_str(name, json))
        .collect()
}

/// Load and validate an [`AlphabetSource`] from a JSON object string.
///
/// Keys must be exactly one character and values integers in `1..=65535`.
pub fn load_source_from_str(name: &str, s: &str) -> Result<AlphabetSource, AlphabetError> {
    let raw: BTreeMap<String, u64> =
        serde_json::from_str(s).map_err(|source| AlphabetError::InvalidJson {
            name: name.to_string(),
            source,
        })?;

    let mut entries = BTreeMap::new();
    for (key, code) in raw {
        let mut chars = key.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return Err(AlphabetError::InvalidKey {
                name: name.to_string(),
                key,
            });
        };
        let alt = u16::try_from(code)
            .ok()
            .and_then(AltCode::new)
            .ok_or_else(|| AlphabetError::InvalidCode {
                name: name.to_string(),
                key: ch,
                code,
            })?;
        entries.insert(ch, alt);
    }

    Ok(AlphabetSource {
        name: name.to_string(),
        entries,
    })
}

/// Read and validate an [`AlphabetSource`] from a JSON file.
pub fn load_source_from_path(path: &Path) -> Result<AlphabetSource, AlphabetError> {
    let text = std::fs::read_to_string(path).map_err(|source| AlphabetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_source_from_str(&path.display().to_string(), &text)
}

/// Accumulates sources into an [`Alphabet`].
#[derive(Debug, Clone, Default)]
pub struct AlphabetBuilder {
    entries: BTreeMap<char, AltCode>,
}

impl AlphabetBuilder {
    /// Start with an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `source` on top of what has been merged so far.
    ///
    /// Characters present in `source` replace earlier entries; characters it
    /// does not mention are kept.
    #[must_use]
    pub fn merge(mut self, source: &AlphabetSource) -> Self {
        self.entries
            .extend(source.entries.iter().map(|(ch, code)| (*ch, *code)));
        self
    }

    /// Apply every source in order.
    #[must_use]
    pub fn merge_all<'a>(self, sources: impl IntoIterator<Item = &'a AlphabetSource>) -> Self {
        sources.into_iter().fold(self, Self::merge)
    }

    /// Freeze the mapping.
    pub fn build(self) -> Alphabet {
        Alphabet {
            entries: self.entries,
        }
    }
}

/// Immutable character → Alt code mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    entries: BTreeMap<char, AltCode>,
}

impl Alphabet {
    /// Built-in sources followed by `user` sources.
    pub fn with_builtin(user: &[AlphabetSource]) -> Result<Self, AlphabetError> {
        let builtin = builtin_sources()?;
        Ok(AlphabetBuilder::new()
            .merge_all(&builtin)
            .merge_all(user)
            .build())
    }

    /// Alt code for `ch`, if defined.
    pub fn get(&self, ch: char) -> Option<AltCode> {
        self.entries.get(&ch).copied()
    }

    /// Whether `ch` is defined.
    pub fn contains(&self, ch: char) -> bool {
        self.entries.contains_key(&ch)
    }

    /// Number of defined characters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no character is defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in character order.
    pub fn iter(&self) -> impl Iterator<Item = (char, AltCode)> + '_ {
        self.entries.iter().map(|(ch, code)| (*ch, *code))
    }
}
