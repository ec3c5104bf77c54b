//! Shared test helpers for `ducky_toolchain_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::LazyLock;

use ducky_toolchain_alphabet::Alphabet;
use ducky_toolchain_core::{
    Diagnostic, EngineConfig, ErrorPolicy, RenderConfig, Translation, translate_str,
};

/// Built-in alphabet, loaded once per test binary.
pub static ALPHABET: LazyLock<Alphabet> = LazyLock::new(|| {
    Alphabet::with_builtin(&[]).unwrap_or_else(|e| panic!("built-in alphabet: {e}"))
});

// ─── Run helpers ────────────────────────────────────────────────────────────

/// Translate with the default configuration (alt mode, fail-fast).
#[allow(dead_code)]
pub fn run(input: &str) -> Translation {
    run_with(input, EngineConfig::default())
}

/// Translate in plain-keystroke mode, fail-fast.
#[allow(dead_code)]
pub fn run_plain(input: &str) -> Translation {
    run_with(input, EngineConfig::default().with_alt_mode(false))
}

/// Translate in plain-keystroke mode, continuing past errors.
#[allow(dead_code)]
pub fn run_continue(input: &str) -> Translation {
    run_with(
        input,
        EngineConfig::default()
            .with_alt_mode(false)
            .with_error_policy(ErrorPolicy::Continue),
    )
}

/// Translate with an explicit configuration.
pub fn run_with(input: &str, config: EngineConfig) -> Translation {
    translate_str(input, config, ALPHABET.clone(), &RenderConfig::default())
}

// ─── Sketch helpers ─────────────────────────────────────────────────────────

/// The rendered sketch, panicking if the run halted.
#[allow(dead_code)]
pub fn sketch(t: &Translation) -> &str {
    t.sketch
        .as_deref()
        .unwrap_or_else(|| panic!("run halted: {:?}", t.diagnostics))
}

/// Statements inside `setup()` between `Keyboard.begin();` and
/// `Keyboard.end();`, trimmed, blank lines dropped.
#[allow(dead_code)]
pub fn body(t: &Translation) -> Vec<String> {
    let text = sketch(t);
    let start = text
        .find("Keyboard.begin();")
        .expect("missing Keyboard.begin()")
        + "Keyboard.begin();".len();
    let end = text.find("Keyboard.end();").expect("missing Keyboard.end()");
    text[start..end]
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// ─── Diagnostic helpers ─────────────────────────────────────────────────────

/// Find the first diagnostic with `id`.
#[allow(dead_code)]
pub fn find_diag<'a>(diags: &'a [Diagnostic], id: &str) -> Option<&'a Diagnostic> {
    diags.iter().find(|d| d.id == id)
}

/// Assert that exactly one diagnostic has `id` and return it.
#[allow(dead_code)]
pub fn single_diag<'a>(diags: &'a [Diagnostic], id: &str) -> &'a Diagnostic {
    let matches: Vec<_> = diags.iter().filter(|d| d.id == id).collect();
    assert_eq!(matches.len(), 1, "expected one {id}, got {diags:?}");
    matches[0]
}
